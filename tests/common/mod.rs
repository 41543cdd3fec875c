//! Shared test fixtures

#![allow(dead_code, unused_imports)]

mod mock_forge;
mod recording_git;
mod scratch_repo;

pub use mock_forge::MockForgeService;
pub use recording_git::{DEFAULT_HEADS, RecordingGit};
pub use scratch_repo::{ScratchRemote, git};

use pr_merge::config::MergeConfig;
use pr_merge::gate::{CLA_SIGNED, MERGE_ACTION, STATUS_GREEN};
use pr_merge::invocation::Invocation;
use pr_merge::types::{PrLabels, PrMetadata};

/// Config for `test/repo` with short, recognisable required commits
pub fn test_config() -> MergeConfig {
    MergeConfig {
        required_master_base: "masterbase".to_string(),
        required_patch_base: "patchbase".to_string(),
        ..MergeConfig::for_repo("test", "repo")
    }
}

/// Invocation for `pr_number`
pub const fn invocation(pr_number: u64, dry_run: bool, force: bool) -> Invocation {
    Invocation {
        pr_number,
        dry_run,
        force,
    }
}

/// Metadata of a green, signed PR marked for merging into `target`
pub fn green_pr(number: u64, commits: u64, target: &str) -> PrMetadata {
    PrMetadata {
        number,
        commit_count: commits,
        status_url: String::new(),
        status_description: Some(STATUS_GREEN.to_string()),
        labels: PrLabels::from_names([MERGE_ACTION, CLA_SIGNED, target]),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
    }
}

/// Message filter command used in tests
pub const MSG_FILTER: &str = "pr-merge --msg-filter";
