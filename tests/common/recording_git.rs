//! Recording git runner for testing

#![allow(dead_code)]

use pr_merge::error::{Error, Result};
use pr_merge::git::{GitCommand, GitRunner};
use std::collections::HashMap;
use std::mem::{Discriminant, discriminant};
use std::sync::Mutex;

/// Default `git ls-remote --heads` output
pub const DEFAULT_HEADS: &str = "\
aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\trefs/heads/master
bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\trefs/heads/1.2.x
cccccccccccccccccccccccccccccccccccccccc\trefs/heads/1.10.x
dddddddddddddddddddddddddddddddddddddddd\trefs/heads/2.0.x";

/// Git runner that records every command instead of running it
///
/// Outputs are canned per command kind; the ancestry check answers
/// non-empty (the PR is rebased) unless told otherwise.
pub struct RecordingGit {
    calls: Mutex<Vec<GitCommand>>,
    outputs: Mutex<HashMap<Discriminant<GitCommand>, String>>,
    failures: Mutex<HashMap<Discriminant<GitCommand>, String>>,
}

impl RecordingGit {
    /// Runner on branch `feature` with the default remote heads
    pub fn new() -> Self {
        let git = Self {
            calls: Mutex::new(Vec::new()),
            outputs: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
        };
        git.set_output(&GitCommand::CurrentBranch, "feature");
        git.set_output(
            &GitCommand::ListRemoteHeads {
                remote: String::new(),
            },
            DEFAULT_HEADS,
        );
        git.set_output(
            &GitCommand::BranchContains {
                branch: String::new(),
                commit: String::new(),
            },
            "  contained",
        );
        git
    }

    /// Answer every command of the same kind as `like` with `output`
    pub fn set_output(&self, like: &GitCommand, output: &str) {
        self.outputs
            .lock()
            .unwrap()
            .insert(discriminant(like), output.to_string());
    }

    /// Make the ancestry check come back empty
    pub fn not_rebased(&self) {
        self.set_output(
            &GitCommand::BranchContains {
                branch: String::new(),
                commit: String::new(),
            },
            "",
        );
    }

    /// Make every command of the same kind as `like` fail
    pub fn fail_on(&self, like: &GitCommand, stderr: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(discriminant(like), stderr.to_string());
    }

    /// All commands run so far
    pub fn calls(&self) -> Vec<GitCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Rendered commands run so far
    pub fn rendered(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Whether any command matched `pred`
    pub fn ran(&self, pred: impl Fn(&GitCommand) -> bool) -> bool {
        self.calls().iter().any(pred)
    }
}

impl Default for RecordingGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitRunner for RecordingGit {
    fn run(&self, command: &GitCommand) -> Result<String> {
        self.calls.lock().unwrap().push(command.clone());
        let key = discriminant(command);

        if let Some(stderr) = self.failures.lock().unwrap().get(&key) {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                status: Some(1),
                stderr: stderr.clone(),
            });
        }

        Ok(self
            .outputs
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }
}
