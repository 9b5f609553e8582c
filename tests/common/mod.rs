//! Throwaway git repositories for integration tests.

#![allow(dead_code)]

use git2::{Commit, Repository as Git2Repo, Signature, Time};
use semantic_release::git::{Author, Credentials, Git2Repository, Repository};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const AUTHOR_NAME: &str = "Jane Doe";
pub const AUTHOR_EMAIL: &str = "jane.doe@example.com";

/// A working repository with a bare `origin` next to it.
pub struct Fixture {
    _dir: TempDir,
    pub work: PathBuf,
    pub remote: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("work");
        let remote = dir.path().join("remote.git");

        Git2Repo::init_bare(&remote).unwrap();
        let repo = Git2Repo::init(&work).unwrap();
        repo.remote("origin", remote.to_str().unwrap()).unwrap();

        Fixture {
            _dir: dir,
            work,
            remote,
        }
    }

    pub fn remote_url(&self) -> &str {
        self.remote.to_str().unwrap()
    }

    /// Write `files` and commit them with a fixed author time.
    pub fn commit(&self, files: &[(&str, &str)], message: &str, seconds: i64) {
        let repo = Git2Repo::open(&self.work).unwrap();
        let mut index = repo.index().unwrap();
        for (name, content) in files {
            let path = self.work.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            index.add_path(Path::new(name)).unwrap();
        }
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let signature = Signature::new(AUTHOR_NAME, AUTHOR_EMAIL, &Time::new(seconds, 0)).unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parent_refs)
            .unwrap();
    }

    pub fn tag(&self, name: &str) {
        self.client()
            .create_tag(name, &Author::new(AUTHOR_NAME, AUTHOR_EMAIL))
            .unwrap();
    }

    /// Push the branch and every tag to the bare remote.
    pub fn publish(&self) {
        let client = self.client();
        client.push().unwrap();
        client.push_tags().unwrap();
    }

    pub fn client(&self) -> Git2Repository {
        Git2Repository::open(&self.work, "origin", Credentials::default()).unwrap()
    }

    /// Content of `path` at the remote's HEAD.
    pub fn remote_file(&self, path: &str) -> Option<String> {
        let remote = Git2Repo::open_bare(&self.remote).unwrap();
        let tree = remote.head().ok()?.peel_to_commit().ok()?.tree().ok()?;
        let entry = tree.get_path(Path::new(path)).ok()?;
        let blob = remote.find_blob(entry.id()).ok()?;
        Some(String::from_utf8_lossy(blob.content()).into_owned())
    }

    pub fn remote_head_message(&self) -> String {
        let remote = Git2Repo::open_bare(&self.remote).unwrap();
        let head = remote.head().unwrap().peel_to_commit().unwrap();
        head.message().unwrap_or("").to_string()
    }

    pub fn remote_has_tag(&self, tag: &str) -> bool {
        let remote = Git2Repo::open_bare(&self.remote).unwrap();
        let found = remote.find_reference(&format!("refs/tags/{}", tag)).is_ok();
        found
    }
}
