//! Core types for pr-merge

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static ACTION_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^PR action:").unwrap());
static TARGET_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^PR target:").unwrap());
static CLA_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^cla").unwrap());

/// Pull request fields read from `GET /repos/{owner}/{repo}/pulls/{n}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestSummary {
    /// PR number
    pub number: u64,
    /// Number of commits on the PR branch
    pub commits: u64,
    /// Link to the statuses of the PR head commit
    pub statuses_href: String,
    /// Web URL for the PR
    pub html_url: String,
}

/// The gate-relevant labels of a PR
///
/// Each field holds the first label whose name matches the prefix, or
/// `None` when no label matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrLabels {
    /// First label matching `^PR action:`
    pub action: Option<String>,
    /// First label matching `^PR target:`
    pub target: Option<String>,
    /// First label matching `^cla`
    pub cla: Option<String>,
}

impl PrLabels {
    /// Pick the gate labels out of a PR's label names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels = Self::default();
        for name in names {
            let name = name.as_ref();
            for (pattern, slot) in [
                (&*ACTION_LABEL, &mut labels.action),
                (&*TARGET_LABEL, &mut labels.target),
                (&*CLA_LABEL, &mut labels.cla),
            ] {
                if slot.is_none() && pattern.is_match(name) {
                    *slot = Some(name.to_string());
                }
            }
        }
        labels
    }
}

/// Everything the gates and the planner need to know about a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrMetadata {
    /// PR number
    pub number: u64,
    /// Number of commits on the PR branch
    pub commit_count: u64,
    /// Statuses link the description was read from
    pub status_url: String,
    /// Latest status description, already normalized
    pub status_description: Option<String>,
    /// Gate labels
    pub labels: PrLabels,
    /// Web URL for the PR
    pub html_url: String,
}

/// Keep the part of a status description before the first `|`.
///
/// Some CI integrations append details after a pipe; only the leading
/// verdict is compared against the expected text.
pub fn normalize_status_description(description: &str) -> String {
    description
        .split('|')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// A branch a PR can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeTarget {
    /// The main development branch
    Master,
    /// The newest `<major>.<minor>.x` maintenance branch
    Patch,
}

impl std::fmt::Display for MergeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Master => write!(f, "master"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// Which branches the PR's target label selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeTargets {
    /// Merge onto master
    pub merge_master: bool,
    /// Merge onto the patch branch
    pub merge_patch: bool,
}

impl MergeTargets {
    /// Active targets, master first
    pub fn active(&self) -> Vec<MergeTarget> {
        let mut targets = Vec::with_capacity(2);
        if self.merge_master {
            targets.push(MergeTarget::Master);
        }
        if self.merge_patch {
            targets.push(MergeTarget::Patch);
        }
        targets
    }
}
