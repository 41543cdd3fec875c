//! Throwaway git repositories for end-to-end tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in `dir` with a fixed identity, panicking on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A bare "remote", a seed clone used to publish PR refs, and an operator
/// working copy cloned from the remote.
pub struct ScratchRemote {
    _dir: TempDir,
    /// Bare repository standing in for the forge
    pub remote: PathBuf,
    /// Repository the test commits from
    pub seed: PathBuf,
    /// Operator's working copy
    pub work: PathBuf,
    /// First commit on master
    pub base_sha: String,
}

impl ScratchRemote {
    /// Remote with one commit on `master` and a `1.0.x` branch at the same commit
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let remote = dir.path().join("remote.git");
        let seed = dir.path().join("seed");
        let work = dir.path().join("work");
        std::fs::create_dir_all(&remote).unwrap();
        std::fs::create_dir_all(&seed).unwrap();

        git(&remote, &["init", "--bare", "-q"]);
        git(&remote, &["symbolic-ref", "HEAD", "refs/heads/master"]);

        git(&seed, &["init", "-q"]);
        git(&seed, &["symbolic-ref", "HEAD", "refs/heads/master"]);
        std::fs::write(seed.join("README"), "base\n").unwrap();
        git(&seed, &["add", "README"]);
        git(&seed, &["commit", "-q", "-m", "Initial commit"]);
        let base_sha = git(&seed, &["rev-parse", "HEAD"]);

        let remote_str = remote.to_string_lossy().to_string();
        git(&seed, &["push", "-q", &remote_str, "HEAD:refs/heads/master"]);
        git(&seed, &["push", "-q", &remote_str, "HEAD:refs/heads/1.0.x"]);

        git(
            dir.path(),
            &["clone", "-q", &remote_str, &work.to_string_lossy()],
        );
        git(&work, &["config", "user.name", "Test"]);
        git(&work, &["config", "user.email", "test@example.com"]);
        git(&work, &["config", "commit.gpgsign", "false"]);

        Self {
            _dir: dir,
            remote,
            seed,
            work,
            base_sha,
        }
    }

    /// Remote path as a git URL
    pub fn remote_url(&self) -> String {
        self.remote.to_string_lossy().to_string()
    }

    /// Publish PR `number` with the given `(file, contents, message)` commits
    /// on top of master, as GitHub does under `refs/pull/<n>/head`.
    pub fn open_pr(&self, number: u64, commits: &[(&str, &str, &str)]) {
        git(&self.seed, &["checkout", "-q", "-B", &format!("pr-{number}"), "master"]);
        for (file, contents, message) in commits {
            std::fs::write(self.seed.join(file), contents).unwrap();
            git(&self.seed, &["add", file]);
            git(&self.seed, &["commit", "-q", "-m", message]);
        }
        git(
            &self.seed,
            &[
                "push",
                "-q",
                &self.remote_url(),
                &format!("HEAD:refs/pull/{number}/head"),
            ],
        );
    }

    /// Full message of the tip of `branch` on the remote
    pub fn remote_message(&self, branch: &str) -> String {
        git(&self.remote, &["log", "-1", "--format=%B", branch])
    }

    /// Number of commits on `branch` on the remote
    pub fn remote_commit_count(&self, branch: &str) -> usize {
        git(&self.remote, &["rev-list", "--count", branch])
            .parse()
            .unwrap()
    }
}
