//! Command line interface

mod context;
mod merge;
mod msg_filter;
pub mod style;

pub use merge::run_merge;
pub use msg_filter::run_msg_filter;

use anstream::{eprintln, println};
use async_trait::async_trait;
use clap::Parser;
use indicatif::ProgressBar;
use pr_merge::git::GitCommand;
use pr_merge::progress::ProgressCallback;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use style::{Stylize, arrow, spinner_style};

/// Merge a labelled, green pull request onto master and/or the newest patch branch.
/// Pass the PR number; without one this help is printed.
#[derive(Parser, Debug)]
#[command(name = "pr-merge", version)]
pub struct Cli {
    /// Pull request number; when given more than once the last one wins
    #[arg(value_name = "PR_NUMBER")]
    pub pr: Vec<String>,

    /// Do everything except pushing the merged branches
    #[arg(long)]
    pub dryrun: bool,

    /// Merge even if the status check has not passed
    #[arg(long)]
    pub force: bool,

    /// Path to the working copy
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Repository to merge in, as OWNER/REPO
    #[arg(long, value_name = "OWNER/REPO")]
    pub repo: Option<String>,

    /// Rewrite a commit message read from stdin (used by git filter-branch)
    #[arg(long, value_name = "PR_NUMBER", hide = true)]
    pub msg_filter: Option<u64>,
}

/// Flags that stand alone
const SWITCHES: [&str; 6] = ["--dryrun", "--force", "--help", "-h", "--version", "-V"];

/// Flags that take the next token (or `=value`) as their value
const VALUE_FLAGS: [&str; 3] = ["--path", "--repo", "--msg-filter"];

/// Reorder raw arguments so every token that is not one of our flags
/// reaches [`Cli::pr`], even when it starts with `-`.
///
/// Those tokens are moved behind a `--` separator; the invocation then
/// picks the last of them as the PR identifier.
pub fn route_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut routed: Vec<OsString> = args.next().into_iter().collect();
    let mut tokens = Vec::new();

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some(flag) if SWITCHES.contains(&flag) => routed.push(arg),
            Some(flag) if VALUE_FLAGS.contains(&flag) => {
                routed.push(arg);
                routed.extend(args.next());
            }
            Some(flag)
                if VALUE_FLAGS.iter().any(|f| {
                    flag.strip_prefix(f)
                        .is_some_and(|rest| rest.starts_with('='))
                }) =>
            {
                routed.push(arg);
            }
            _ => tokens.push(arg),
        }
    }

    if !tokens.is_empty() {
        routed.push(OsString::from("--"));
        routed.extend(tokens);
    }
    routed
}

/// Progress reporting for the terminal
///
/// Shows a spinner until the first update arrives, then prints each step
/// and the exact git command it runs.
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Progress with a spinner showing `message`
    pub fn with_spinner(message: String) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self {
            spinner: Mutex::new(Some(spinner)),
        }
    }

    /// Stop the spinner, if still running
    pub fn settle(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(spinner) = guard.take()
        {
            spinner.finish_and_clear();
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_step(&self, step: &str) {
        self.settle();
        println!("{} {}", "▸".accent(), step.emphasis());
    }

    async fn on_command(&self, command: &GitCommand) {
        println!("    {} {}", arrow(), command.to_string().muted());
    }

    async fn on_message(&self, message: &str) {
        self.settle();
        println!("{}", message.muted());
    }

    async fn on_warning(&self, message: &str) {
        self.settle();
        eprintln!("{} {}", "⚠️ ".warn(), message.warn());
    }
}
