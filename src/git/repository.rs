use crate::domain::CommitRecord;
use crate::error::{Result, SemanticReleaseError};
use crate::git::{Author, Credentials, Repository};
use git2::{
    build::RepoBuilder, Commit, ErrorCode, FetchOptions, IndexAddOption, PushOptions,
    RemoteCallbacks, Repository as Git2Repo, Signature,
};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    remote: String,
    credentials: Credentials,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(
        path: P,
        remote: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository {
            repo,
            remote: remote.into(),
            credentials,
        })
    }

    /// Clone `url` into `destination`, or reuse a clone already there.
    ///
    /// The clone names its remote `remote`. With `fresh` set an existing
    /// destination is deleted and cloned again, so the release always starts
    /// from the remote state. Without it the destination must already be a
    /// repository with that remote; nothing is deleted.
    pub fn clone_or_open(
        url: &str,
        destination: &Path,
        remote: &str,
        credentials: Credentials,
        fresh: bool,
    ) -> Result<Self> {
        if destination.exists() {
            if !fresh {
                let repo = Git2Repo::open(destination).map_err(|e| {
                    SemanticReleaseError::repository(format!(
                        "{} exists and is not a git repository: {}",
                        destination.display(),
                        e
                    ))
                })?;
                if repo.find_remote(remote).is_err() {
                    return Err(SemanticReleaseError::repository(format!(
                        "existing clone at {} has no remote '{}'",
                        destination.display(),
                        remote
                    )));
                }
                info!(path = %destination.display(), "reusing existing clone");
                return Ok(Git2Repository {
                    repo,
                    remote: remote.to_string(),
                    credentials,
                });
            }
            debug!(path = %destination.display(), "removing previous clone");
            fs::remove_dir_all(destination)?;
        }

        info!(%url, %remote, path = %destination.display(), "cloning repository");
        let repo = {
            let mut fetch_options = FetchOptions::new();
            fetch_options.remote_callbacks(credentials.remote_callbacks());
            RepoBuilder::new()
                .fetch_options(fetch_options)
                .remote_create(|repo, _default_name, url| repo.remote(remote, url))
                .clone(url, destination)
                .map_err(|e| {
                    SemanticReleaseError::repository(format!("cannot clone '{}': {}", url, e))
                })?
        };

        Ok(Git2Repository {
            repo,
            remote: remote.to_string(),
            credentials,
        })
    }

    /// Root of the working tree
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .ok_or_else(|| SemanticReleaseError::repository("repository has no working tree"))
    }

    fn head_commit(&self) -> Result<Commit<'_>> {
        match self.repo.head() {
            Ok(head) => Ok(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Err(SemanticReleaseError::NoCommitsFound)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(SemanticReleaseError::repository(
                "HEAD is detached, cannot determine the branch to push",
            ));
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| SemanticReleaseError::repository("branch name is not valid UTF-8"))
    }

    fn push_callbacks(&self) -> RemoteCallbacks<'_> {
        let mut callbacks = self.credentials.remote_callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(reason) => Err(git2::Error::from_str(&format!(
                "remote rejected {}: {}",
                refname, reason
            ))),
            None => Ok(()),
        });
        callbacks
    }

    fn push_refspecs(&self, refspecs: &[String]) -> Result<()> {
        let mut remote = self.repo.find_remote(&self.remote).map_err(|e| {
            SemanticReleaseError::repository(format!(
                "cannot find remote '{}': {}",
                self.remote, e
            ))
        })?;

        let mut options = PushOptions::new();
        options.remote_callbacks(self.push_callbacks());

        remote.push(refspecs, Some(&mut options)).map_err(|e| {
            SemanticReleaseError::repository(format!("push to '{}' failed: {}", self.remote, e))
        })
    }
}

fn to_record(commit: &Commit<'_>) -> CommitRecord {
    let author = commit.author();
    CommitRecord {
        hash: commit.id().to_string(),
        author_name: author.name().unwrap_or("").to_string(),
        author_email: author.email().unwrap_or("").to_string(),
        message: commit.message().unwrap_or("").to_string(),
        timestamp: author.when().seconds(),
    }
}

impl Repository for Git2Repository {
    fn most_recent_commit(&self) -> Result<CommitRecord> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head.id())?;

        let mut records = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            records.push(to_record(&commit));
        }

        CommitRecord::most_recent(&records)
            .cloned()
            .ok_or(SemanticReleaseError::NoCommitsFound)
    }

    fn tag_names(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn commits_since(&self, base: Option<&str>) -> Result<Vec<CommitRecord>> {
        let head = match self.head_commit() {
            Ok(head) => head,
            Err(SemanticReleaseError::NoCommitsFound) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(head.id())?;

        if let Some(base) = base {
            let base_commit = self
                .repo
                .revparse_single(base)
                .and_then(|object| object.peel_to_commit())
                .map_err(|e| {
                    SemanticReleaseError::repository(format!("cannot resolve '{}': {}", base, e))
                })?;
            revwalk.hide(base_commit.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(to_record(&commit));
        }

        commits.reverse();
        Ok(commits)
    }

    fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        Ok(())
    }

    fn commit(&self, author: &Author, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;
        let parent = self.head_commit()?;
        let signature = Signature::now(&author.name, &author.email)?;

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;
        info!(commit = %oid, "created release commit");

        Ok(())
    }

    fn push(&self) -> Result<()> {
        let branch = self.current_branch()?;
        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        debug!(remote = %self.remote, %refspec, "pushing branch");

        self.push_refspecs(&[refspec])
    }

    fn create_tag(&self, name: &str, tagger: &Author) -> Result<bool> {
        let reference_name = format!("refs/tags/{}", name);

        match self.repo.find_reference(&reference_name) {
            Ok(_) => return Ok(false),
            Err(e) if e.code() == ErrorCode::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let target = self.head_commit()?;
        let signature = Signature::now(&tagger.name, &tagger.email)?;
        let message = format!("Generated by semantic-release {}", name);

        self.repo
            .tag(name, target.as_object(), &signature, &message, false)
            .map_err(|e| {
                SemanticReleaseError::repository(format!("cannot create tag '{}': {}", name, e))
            })?;
        info!(tag = %name, "created annotated tag");

        Ok(true)
    }

    fn push_tags(&self) -> Result<()> {
        let refspecs: Vec<String> = self
            .tag_names()?
            .iter()
            .map(|tag| format!("refs/tags/{}:refs/tags/{}", tag, tag))
            .collect();

        if refspecs.is_empty() {
            return Ok(());
        }
        debug!(remote = %self.remote, count = refspecs.len(), "pushing tags");

        self.push_refspecs(&refspecs)
    }
}
