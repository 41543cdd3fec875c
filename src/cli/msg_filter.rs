//! Hidden `--msg-filter` mode, called by `git filter-branch` once per commit

use anyhow::Context;
use pr_merge::merge::{ClosingReference, MessageFormatter};
use std::io::{Read, Write};

/// Read a commit message on stdin and write it back with the closing footer
pub fn run_msg_filter(pr_number: u64) -> anyhow::Result<()> {
    let mut message = String::new();
    std::io::stdin()
        .read_to_string(&mut message)
        .context("failed to read commit message from stdin")?;

    let rewritten = ClosingReference { pr_number }.format(&message);

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rewritten.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write commit message")?;
    Ok(())
}
