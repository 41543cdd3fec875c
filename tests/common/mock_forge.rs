//! Mock forge service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_merge::error::{Error, Result};
use pr_merge::platform::ForgeService;
use pr_merge::types::PullRequestSummary;
use std::collections::HashMap;
use std::sync::Mutex;

/// Simple mock forge service for testing
///
/// Features:
/// - Configurable responses per PR
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockForgeService {
    pulls: Mutex<HashMap<u64, PullRequestSummary>>,
    statuses: Mutex<HashMap<String, Option<String>>>,
    labels: Mutex<HashMap<u64, Vec<String>>>,
    // Call tracking
    get_pull_request_calls: Mutex<Vec<u64>>,
    get_status_calls: Mutex<Vec<String>>,
    list_labels_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_get_pull_request: Mutex<Option<String>>,
}

impl MockForgeService {
    /// Create an empty mock
    pub fn new() -> Self {
        Self {
            pulls: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            labels: Mutex::new(HashMap::new()),
            get_pull_request_calls: Mutex::new(Vec::new()),
            get_status_calls: Mutex::new(Vec::new()),
            list_labels_calls: Mutex::new(Vec::new()),
            error_on_get_pull_request: Mutex::new(None),
        }
    }

    /// Set up a PR with its commit count, status description and labels
    pub fn setup_pr(&self, pr_number: u64, commits: u64, status: Option<&str>, labels: &[&str]) {
        let statuses_href = format!("https://api.github.com/repos/test/repo/statuses/sha{pr_number}");
        self.pulls.lock().unwrap().insert(
            pr_number,
            PullRequestSummary {
                number: pr_number,
                commits,
                statuses_href: statuses_href.clone(),
                html_url: format!("https://github.com/test/repo/pull/{pr_number}"),
            },
        );
        self.statuses
            .lock()
            .unwrap()
            .insert(statuses_href, status.map(String::from));
        self.labels.lock().unwrap().insert(
            pr_number,
            labels.iter().map(|l| (*l).to_string()).collect(),
        );
    }

    /// Make `get_pull_request` return an error
    pub fn fail_get_pull_request(&self, msg: &str) {
        *self.error_on_get_pull_request.lock().unwrap() = Some(msg.to_string());
    }

    /// PR numbers passed to `get_pull_request`
    pub fn get_pull_request_calls(&self) -> Vec<u64> {
        self.get_pull_request_calls.lock().unwrap().clone()
    }

    /// Links passed to `get_status_description`
    pub fn get_status_calls(&self) -> Vec<String> {
        self.get_status_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `list_labels`
    pub fn list_labels_calls(&self) -> Vec<u64> {
        self.list_labels_calls.lock().unwrap().clone()
    }
}

impl Default for MockForgeService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForgeService for MockForgeService {
    async fn get_pull_request(&self, pr_number: u64) -> Result<PullRequestSummary> {
        self.get_pull_request_calls.lock().unwrap().push(pr_number);
        if let Some(msg) = self.error_on_get_pull_request.lock().unwrap().clone() {
            return Err(Error::GitHubApi(msg));
        }
        self.pulls
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} not found")))
    }

    async fn get_status_description(&self, statuses_href: &str) -> Result<Option<String>> {
        self.get_status_calls
            .lock()
            .unwrap()
            .push(statuses_href.to_string());
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(statuses_href)
            .cloned()
            .flatten())
    }

    async fn list_labels(&self, pr_number: u64) -> Result<Vec<String>> {
        self.list_labels_calls.lock().unwrap().push(pr_number);
        Ok(self
            .labels
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }
}
