//! Commit message rewriting

use crate::git::shell_quote;
use std::path::Path;

/// Rewrites a single commit message
pub trait MessageFormatter {
    /// Return the rewritten message
    fn format(&self, message: &str) -> String;
}

/// Appends `Closes #<pr>` so the forge links the commit to its PR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosingReference {
    /// PR the commits came from
    pub pr_number: u64,
}

impl ClosingReference {
    /// Footer line written by this formatter
    pub fn footer(&self) -> String {
        format!("Closes #{}", self.pr_number)
    }
}

impl MessageFormatter for ClosingReference {
    fn format(&self, message: &str) -> String {
        let footer = self.footer();
        let body = message.trim_end();

        if body.lines().any(|line| line.trim() == footer) {
            return format!("{body}\n");
        }
        if body.is_empty() {
            return format!("{footer}\n");
        }
        format!("{body}\n\n{footer}\n")
    }
}

/// Shell command `git filter-branch` runs for every message.
///
/// It calls back into this binary's hidden `--msg-filter` mode.
pub fn msg_filter_command(exe: &Path, pr_number: u64) -> String {
    format!(
        "{} --msg-filter {pr_number}",
        shell_quote(&exe.to_string_lossy())
    )
}
