//! Release orchestration: from the latest commit to a pushed tag.
//!
//! The run is a fixed pipeline. Every step either succeeds or aborts the
//! whole release with its error prefixed by the step ([ReleaseStep]); nothing
//! already done is rolled back.

use crate::analyzer::bump_change_type;
use crate::boundary::BoundaryWarning;
use crate::conventional;
use crate::domain::{resolve_tags, ChangeType, ChangelogEntry, CommitRecord, ProjectLocation, Version};
use crate::error::{ReleaseStep, Result, StepContext};
use crate::files::{FileEditor, VariableFile};
use crate::git::{Author, Repository};
use std::path::PathBuf;
use tracing::info;

/// Message of the commit carrying the release edits.
///
/// It classifies as a skip, so the next run does not release it again.
pub fn release_commit_message(version: Version) -> String {
    format!(
        "skip: Commit automatically generated by Semantic Release. The new tag is {}",
        version
    )
}

/// Where to write the changelog and how to link commits from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogTarget {
    pub path: PathBuf,
    pub location: ProjectLocation,
}

/// What a release run is allowed to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSettings {
    /// `None` disables the changelog update
    pub changelog: Option<ChangelogTarget>,
    pub variable_files: Vec<VariableFile>,
    pub create_tag: bool,
    pub push: bool,
    /// Stop after computing the new version
    pub dry_run: bool,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        ReleaseSettings {
            changelog: None,
            variable_files: Vec::new(),
            create_tag: true,
            push: true,
            dry_run: false,
        }
    }
}

/// Versions involved in a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleasePlan {
    pub current_version: Version,
    pub change_type: ChangeType,
    pub new_version: Version,
}

/// Outcome of classifying the latest commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// The commit asks not to be released
    Skip { change_type: ChangeType },
    Release(ReleasePlan),
}

impl ReleaseDecision {
    pub fn is_skip(&self) -> bool {
        matches!(self, ReleaseDecision::Skip { .. })
    }

    pub fn change_type(&self) -> ChangeType {
        match self {
            ReleaseDecision::Skip { change_type } => *change_type,
            ReleaseDecision::Release(plan) => plan.change_type,
        }
    }

    pub fn plan(&self) -> Option<&ReleasePlan> {
        match self {
            ReleaseDecision::Skip { .. } => None,
            ReleaseDecision::Release(plan) => Some(plan),
        }
    }
}

/// What a release run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// The commit that drove the decision
    pub commit: CommitRecord,
    pub decision: ReleaseDecision,
    /// True when the run stopped after computing the version
    pub dry_run: bool,
    pub committed: bool,
    pub pushed: bool,
    pub tag_created: bool,
    pub tags_pushed: bool,
    pub warnings: Vec<BoundaryWarning>,
}

impl ReleaseOutcome {
    fn new(commit: CommitRecord, decision: ReleaseDecision) -> Self {
        ReleaseOutcome {
            commit,
            decision,
            dry_run: false,
            committed: false,
            pushed: false,
            tag_created: false,
            tags_pushed: false,
            warnings: Vec::new(),
        }
    }
}

/// Drives one release against a repository and its working copy.
pub struct ReleaseOrchestrator<'a, R: ?Sized, F: ?Sized> {
    repo: &'a R,
    files: &'a F,
    settings: ReleaseSettings,
}

impl<'a, R, F> ReleaseOrchestrator<'a, R, F>
where
    R: Repository + ?Sized,
    F: FileEditor + ?Sized,
{
    pub fn new(repo: &'a R, files: &'a F, settings: ReleaseSettings) -> Self {
        ReleaseOrchestrator {
            repo,
            files,
            settings,
        }
    }

    /// Read-only part of the run: classify the commit and, unless it is a
    /// skip, resolve the current version and compute the next one.
    pub fn decide(
        &self,
        commit: &CommitRecord,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<ReleaseDecision> {
        let change_type = conventional::classify(&commit.message).step(ReleaseStep::Classify)?;
        if change_type.is_skip() {
            return Ok(ReleaseDecision::Skip { change_type });
        }

        let resolution = self
            .repo
            .tag_names()
            .map(resolve_tags)
            .step(ReleaseStep::ResolveCurrentVersion)?;
        if !resolution.ignored.is_empty() {
            warnings.push(BoundaryWarning::IgnoredTags {
                tags: resolution.ignored,
            });
        }

        let current_version = resolution.version;
        let new_version =
            bump_change_type(current_version, change_type).step(ReleaseStep::ComputeNewVersion)?;

        Ok(ReleaseDecision::Release(ReleasePlan {
            current_version,
            change_type,
            new_version,
        }))
    }

    /// Run the release.
    ///
    /// A skip commit ends the run successfully without touching anything.
    pub fn run(&self) -> Result<ReleaseOutcome> {
        let commit = self
            .repo
            .most_recent_commit()
            .step(ReleaseStep::FetchLatestCommit)?;
        info!(hash = %commit.short_hash(), subject = %commit.subject(), "latest commit");

        let mut warnings = Vec::new();
        let decision = self.decide(&commit, &mut warnings)?;
        let mut outcome = ReleaseOutcome::new(commit, decision);
        outcome.warnings = warnings;

        let plan = match decision {
            ReleaseDecision::Skip { change_type } => {
                info!(%change_type, "commit requests no release, skipping");
                return Ok(outcome);
            }
            ReleaseDecision::Release(plan) => plan,
        };
        info!(
            current = %plan.current_version,
            new = %plan.new_version,
            change_type = %plan.change_type,
            "computed release version"
        );

        if self.settings.dry_run {
            outcome.dry_run = true;
            return Ok(outcome);
        }

        self.publish(&plan, &mut outcome)?;
        Ok(outcome)
    }

    fn publish(&self, plan: &ReleasePlan, outcome: &mut ReleaseOutcome) -> Result<()> {
        let version = plan.new_version;
        let author = Author::from(&outcome.commit);

        if let Some(target) = &self.settings.changelog {
            self.update_changelog(&outcome.commit, plan, target)
                .step(ReleaseStep::UpdateChangelog)?;
        }

        if !self.settings.variable_files.is_empty() {
            self.update_variable_files(version)
                .step(ReleaseStep::UpdateVariableFiles)?;
        }

        self.repo
            .stage_all()
            .and_then(|_| self.repo.commit(&author, &release_commit_message(version)))
            .step(ReleaseStep::StageAndCommit)?;
        outcome.committed = true;

        if self.settings.push {
            self.repo.push().step(ReleaseStep::PushCommits)?;
            outcome.pushed = true;
        } else {
            outcome.warnings.push(BoundaryWarning::NotPushed { version });
        }

        if self.settings.create_tag {
            let tag = version.to_string();
            outcome.tag_created = self
                .repo
                .create_tag(&tag, &author)
                .step(ReleaseStep::CreateTag)?;

            if !outcome.tag_created {
                outcome
                    .warnings
                    .push(BoundaryWarning::TagAlreadyExists { tag });
            } else if self.settings.push {
                self.repo.push_tags().step(ReleaseStep::PushTags)?;
                outcome.tags_pushed = true;
            }
        }

        info!(version = %version, "release finished");
        Ok(())
    }

    fn update_changelog(
        &self,
        commit: &CommitRecord,
        plan: &ReleasePlan,
        target: &ChangelogTarget,
    ) -> Result<()> {
        let message = conventional::prettify_message(&commit.message)?;
        let entry = ChangelogEntry::build(
            commit,
            plan.change_type,
            plan.current_version,
            plan.new_version,
            &message,
            &target.location,
        )?;

        self.files
            .prepend_changelog_entry(&target.path, &entry.to_string())
    }

    fn update_variable_files(&self, version: Version) -> Result<()> {
        self.files
            .rewrite_variable_files(&self.settings.variable_files, &version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SemanticReleaseError;
    use crate::files::MockFileEditor;
    use crate::git::{MockRepository, RepoCall, RepoOperation};

    const HASH: &str = "b25a9af78c30de0d03ca2ee6d18c66bbc4804395";

    fn commit(message: &str) -> CommitRecord {
        CommitRecord {
            hash: HASH.to_string(),
            author_name: "Jane Doe".to_string(),
            author_email: "jane.doe@example.com".to_string(),
            message: message.to_string(),
            timestamp: 1_700_000_000,
        }
    }

    fn author() -> Author {
        Author::new("Jane Doe", "jane.doe@example.com")
    }

    fn settings() -> ReleaseSettings {
        ReleaseSettings {
            changelog: Some(ChangelogTarget {
                path: PathBuf::from("CHANGELOG.md"),
                location: ProjectLocation {
                    host: "gitlab.com".to_string(),
                    group: "platform".to_string(),
                    project: "billing".to_string(),
                },
            }),
            ..ReleaseSettings::default()
        }
    }

    #[test]
    fn test_feature_release_end_to_end() {
        let repo = MockRepository::new()
            .with_commit(commit("feat(api): add pagination"))
            .with_tag("1.0.0");
        let files = MockFileEditor::new();

        let outcome = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap();

        let plan = outcome.decision.plan().unwrap();
        assert_eq!(plan.current_version, Version::new(1, 0, 0));
        assert_eq!(plan.new_version, Version::new(1, 1, 0));
        assert!(outcome.committed && outcome.pushed && outcome.tag_created && outcome.tags_pushed);
        assert!(outcome.warnings.is_empty());

        let changelog = files.content("CHANGELOG.md").unwrap();
        assert!(changelog.starts_with("\n## v1.1.0\n- feat - [b25a9af]("));
        assert!(changelog.contains("): Add pagination (@jane.doe)\n---\n\n"));

        assert_eq!(
            repo.calls(),
            vec![
                RepoCall::StageAll,
                RepoCall::Commit {
                    author: author(),
                    message: release_commit_message(Version::new(1, 1, 0)),
                },
                RepoCall::Push,
                RepoCall::CreateTag {
                    name: "1.1.0".to_string(),
                    tagger: author(),
                },
                RepoCall::PushTags,
            ]
        );
    }

    #[test]
    fn test_release_commit_message_is_skip() {
        let message = release_commit_message(Version::new(1, 1, 0));
        assert!(message.contains("1.1.0"));
        assert_eq!(conventional::classify(&message).unwrap(), ChangeType::Skip);
    }

    #[test]
    fn test_skip_commit_makes_no_changes() {
        let repo = MockRepository::new()
            .with_commit(commit("skip: update tooling"))
            .with_tag("1.0.0");
        let files = MockFileEditor::new();

        let outcome = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap();

        assert!(outcome.decision.is_skip());
        assert!(repo.calls().is_empty());
        assert!(files.content("CHANGELOG.md").is_none());
    }

    #[test]
    fn test_first_release_without_tags() {
        let repo = MockRepository::new().with_commit(commit("fix: first"));
        let files = MockFileEditor::new();

        let outcome = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap();

        assert_eq!(
            outcome.decision.plan().unwrap().new_version,
            Version::new(1, 0, 0)
        );
    }

    #[test]
    fn test_ignored_tags_are_reported() {
        let repo = MockRepository::new()
            .with_commit(commit("fix: patch"))
            .with_tag("v2.0.0")
            .with_tag("1.2.3");
        let files = MockFileEditor::new();

        let outcome = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap();

        assert_eq!(
            outcome.decision.plan().unwrap().new_version,
            Version::new(1, 2, 4)
        );
        assert_eq!(
            outcome.warnings,
            vec![BoundaryWarning::IgnoredTags {
                tags: vec!["v2.0.0".to_string()]
            }]
        );
    }

    #[test]
    fn test_dry_run_makes_no_changes() {
        let repo = MockRepository::new()
            .with_commit(commit("feat: add"))
            .with_tag("1.0.0");
        let files = MockFileEditor::new();
        let settings = ReleaseSettings {
            dry_run: true,
            ..settings()
        };

        let outcome = ReleaseOrchestrator::new(&repo, &files, settings)
            .run()
            .unwrap();

        assert!(outcome.dry_run);
        assert!(!outcome.committed);
        assert!(repo.calls().is_empty());
        assert!(files.content("CHANGELOG.md").is_none());
    }

    #[test]
    fn test_unclassifiable_commit_fails_at_classify() {
        let repo = MockRepository::new().with_commit(commit("Update README"));
        let files = MockFileEditor::new();

        let err = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap_err();

        assert_eq!(err.step(), Some(ReleaseStep::Classify));
        assert!(err
            .to_string()
            .starts_with("error while finding commit change type within commit message due to:"));
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_empty_history_fails_at_fetch() {
        let repo = MockRepository::new();
        let files = MockFileEditor::new();

        let err = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap_err();

        assert_eq!(err.step(), Some(ReleaseStep::FetchLatestCommit));
        assert!(matches!(err.root(), SemanticReleaseError::NoCommitsFound));
    }

    #[test]
    fn test_push_failure_stops_before_tagging() {
        let repo = MockRepository::new()
            .with_commit(commit("fix: patch"))
            .with_tag("1.0.0")
            .failing_on(RepoOperation::Push);
        let files = MockFileEditor::new();

        let err = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap_err();

        assert_eq!(err.step(), Some(ReleaseStep::PushCommits));
        assert!(err.to_string().starts_with("error during push operation due to:"));
        // The local commit is not rolled back
        assert_eq!(repo.calls().len(), 2);
        assert_eq!(repo.tags(), vec!["1.0.0"]);
    }

    /// Serves a tag listing taken before another release tagged the repository.
    struct StaleTagListing(MockRepository);

    impl Repository for StaleTagListing {
        fn most_recent_commit(&self) -> Result<CommitRecord> {
            self.0.most_recent_commit()
        }
        fn tag_names(&self) -> Result<Vec<String>> {
            Ok(vec!["1.0.0".to_string()])
        }
        fn commits_since(&self, base: Option<&str>) -> Result<Vec<CommitRecord>> {
            self.0.commits_since(base)
        }
        fn stage_all(&self) -> Result<()> {
            self.0.stage_all()
        }
        fn commit(&self, author: &Author, message: &str) -> Result<()> {
            self.0.commit(author, message)
        }
        fn push(&self) -> Result<()> {
            self.0.push()
        }
        fn create_tag(&self, name: &str, tagger: &Author) -> Result<bool> {
            self.0.create_tag(name, tagger)
        }
        fn push_tags(&self) -> Result<()> {
            self.0.push_tags()
        }
    }

    #[test]
    fn test_existing_tag_is_not_pushed() {
        let repo = StaleTagListing(
            MockRepository::new()
                .with_commit(commit("feat: add"))
                .with_tag("1.0.0")
                .with_tag("1.1.0"),
        );
        let files = MockFileEditor::new();

        let outcome = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap();

        assert!(outcome.pushed);
        assert!(!outcome.tag_created);
        assert!(!outcome.tags_pushed);
        assert_eq!(
            outcome.warnings,
            vec![BoundaryWarning::TagAlreadyExists {
                tag: "1.1.0".to_string()
            }]
        );
        assert!(!repo.0.calls().contains(&RepoCall::PushTags));
    }

    #[test]
    fn test_tag_listing_failure_fails_at_resolve() {
        let repo = MockRepository::new()
            .with_commit(commit("feat: add"))
            .failing_on(RepoOperation::TagNames);
        let files = MockFileEditor::new();

        let err = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap_err();

        assert_eq!(err.step(), Some(ReleaseStep::ResolveCurrentVersion));
        assert!(err
            .to_string()
            .starts_with("error while getting most recent tag due to:"));
    }

    #[test]
    fn test_push_disabled() {
        let repo = MockRepository::new()
            .with_commit(commit("fix: patch"))
            .with_tag("1.0.0");
        let files = MockFileEditor::new();
        let settings = ReleaseSettings {
            push: false,
            ..settings()
        };

        let outcome = ReleaseOrchestrator::new(&repo, &files, settings)
            .run()
            .unwrap();

        assert!(!outcome.pushed);
        assert!(outcome.tag_created);
        assert!(!outcome.tags_pushed);
        assert_eq!(
            outcome.warnings,
            vec![BoundaryWarning::NotPushed {
                version: Version::new(1, 0, 1)
            }]
        );
        assert!(!repo.calls().contains(&RepoCall::Push));
        assert!(!repo.calls().contains(&RepoCall::PushTags));
    }

    #[test]
    fn test_variable_files_rewritten() {
        let repo = MockRepository::new()
            .with_commit(commit("breaking change: new api"))
            .with_tag("1.4.2");
        let files = MockFileEditor::new()
            .with_file("setup.py", "__version__ = \"1.4.2\"\n")
            .with_file("version.go", "\tVersion := \"1.4.2\"\n");
        let settings = ReleaseSettings {
            changelog: None,
            variable_files: vec![
                VariableFile::new("setup.py", "__version__"),
                VariableFile::new("version.go", "Version"),
            ],
            ..ReleaseSettings::default()
        };

        ReleaseOrchestrator::new(&repo, &files, settings)
            .run()
            .unwrap();

        assert_eq!(files.content("setup.py").unwrap(), "__version__ = \"2.0.0\"\n");
        assert_eq!(files.content("version.go").unwrap(), "\tVersion := \"2.0.0\"\n");
        assert!(files.content("CHANGELOG.md").is_none());
    }

    #[test]
    fn test_missing_variable_aborts_before_commit() {
        let repo = MockRepository::new()
            .with_commit(commit("fix: patch"))
            .with_tag("1.0.0");
        let files = MockFileEditor::new().with_file("setup.py", "name = \"pkg\"\n");
        let settings = ReleaseSettings {
            variable_files: vec![VariableFile::new("setup.py", "__version__")],
            ..settings()
        };

        let err = ReleaseOrchestrator::new(&repo, &files, settings)
            .run()
            .unwrap_err();

        assert_eq!(err.step(), Some(ReleaseStep::UpdateVariableFiles));
        assert!(matches!(
            err.root(),
            SemanticReleaseError::VariableNotFound { .. }
        ));
        assert!(repo.calls().is_empty());
        // Earlier steps are not rolled back
        assert!(files.content("CHANGELOG.md").is_some());
    }

    #[test]
    fn test_variable_files_are_all_or_nothing() {
        let repo = MockRepository::new()
            .with_commit(commit("fix: patch"))
            .with_tag("1.0.0");
        let files = MockFileEditor::new()
            .with_file("setup.py", "__version__ = \"1.0.0\"\n")
            .with_file("version.go", "package version\n");
        let settings = ReleaseSettings {
            changelog: None,
            variable_files: vec![
                VariableFile::new("setup.py", "__version__"),
                VariableFile::new("version.go", "Version"),
            ],
            ..ReleaseSettings::default()
        };

        let err = ReleaseOrchestrator::new(&repo, &files, settings)
            .run()
            .unwrap_err();

        assert_eq!(err.step(), Some(ReleaseStep::UpdateVariableFiles));
        assert_eq!(files.content("setup.py").unwrap(), "__version__ = \"1.0.0\"\n");
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_variable_file_destination() {
        let repo = MockRepository::new()
            .with_commit(commit("feat: add"))
            .with_tag("1.0.0");
        let files = MockFileEditor::new().with_file("version.py.in", "VERSION = '0.0.0'\n");
        let settings = ReleaseSettings {
            changelog: None,
            variable_files: vec![
                VariableFile::new("version.py.in", "VERSION").with_destination("version.py")
            ],
            ..ReleaseSettings::default()
        };

        ReleaseOrchestrator::new(&repo, &files, settings)
            .run()
            .unwrap();

        assert_eq!(files.content("version.py.in").unwrap(), "VERSION = '0.0.0'\n");
        assert_eq!(files.content("version.py").unwrap(), "VERSION = '1.1.0'\n");
    }

    #[test]
    fn test_version_overflow_fails_at_compute() {
        let repo = MockRepository::new()
            .with_commit(commit("breaking change: new api"))
            .with_tag("18446744073709551615.0.0");
        let files = MockFileEditor::new();

        let err = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap_err();

        assert_eq!(err.step(), Some(ReleaseStep::ComputeNewVersion));
        assert!(matches!(err.root(), SemanticReleaseError::VersionParse(_)));
        assert!(repo.calls().is_empty());
    }

    #[test]
    fn test_invalid_changelog_author_fails_at_changelog_step() {
        let mut bad = commit("fix: patch");
        bad.author_email = "no-at-sign".to_string();
        let repo = MockRepository::new().with_commit(bad).with_tag("1.0.0");
        let files = MockFileEditor::new();

        let err = ReleaseOrchestrator::new(&repo, &files, settings())
            .run()
            .unwrap_err();

        assert_eq!(err.step(), Some(ReleaseStep::UpdateChangelog));
        assert!(matches!(
            err.root(),
            SemanticReleaseError::ChangelogFieldMissing(_)
        ));
    }
}
