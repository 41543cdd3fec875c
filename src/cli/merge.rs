//! Merge command - gate, plan and merge one PR

use crate::cli::CliProgress;
use crate::cli::context::CommandContext;
use crate::cli::style::{CROSS, Stylize, check, hyperlink};
use anstream::{eprintln, println};
use pr_merge::auth::TOKEN_ENV_VAR;
use pr_merge::error::{Error, Result};
use pr_merge::invocation::Invocation;
use pr_merge::merge::{MergeOutcome, run_merge_workflow};
use std::path::Path;

/// Run the merge command
pub async fn run_merge(path: &Path, repo: Option<&str>, invocation: Invocation) -> Result<()> {
    let ctx = CommandContext::new(path, repo, invocation.pr_number)?;

    if !ctx.auth.is_authenticated() {
        eprintln!(
            "{}",
            format!(
                "⚠️  {TOKEN_ENV_VAR} is not set: GitHub requests are unauthenticated and heavily rate-limited."
            )
            .warn()
        );
    }

    let pr_url = format!(
        "https://github.com/{}/pull/{}",
        ctx.config.slug(),
        invocation.pr_number
    );
    println!(
        "{} {}{}",
        "Merging".emphasis(),
        hyperlink(&format!("PR #{}", invocation.pr_number), &pr_url).accent(),
        if invocation.dry_run {
            " (dry run)".muted()
        } else {
            String::new()
        }
    );

    let progress = CliProgress::with_spinner(format!(
        "Querying {} for PR #{}...",
        ctx.config.slug().emphasis(),
        invocation.pr_number
    ));

    let result = run_merge_workflow(
        &invocation,
        &ctx.config,
        ctx.forge.as_ref(),
        &ctx.git,
        ctx.workdir.clone(),
        &ctx.msg_filter,
        &progress,
    )
    .await;
    progress.settle();

    match result {
        Ok(outcome) => {
            print_merge_summary(&outcome);
            Ok(())
        }
        Err(e) => {
            print_failure_hint(&e);
            Err(e)
        }
    }
}

/// Print merge summary
fn print_merge_summary(outcome: &MergeOutcome) {
    let plan = &outcome.plan;
    let mut targets = Vec::new();
    if plan.targets.merge_master {
        targets.push(plan.master_branch.clone());
    }
    if plan.targets.merge_patch
        && let Some(ref patch) = plan.patch_branch
    {
        targets.push(patch.clone());
    }

    println!();
    println!(
        "{} PR #{} merged into {}",
        check(),
        plan.pr_number,
        targets.join(" and ").accent()
    );

    if outcome.execution.pushed {
        println!("   {}", "Pushed to the remote.".success());
    } else {
        println!(
            "   {}",
            "Dry run: nothing was pushed. The merged branches are:".muted()
        );
        println!("     {}", plan.branches.master.accent());
        if let Some(ref patch) = plan.branches.patch {
            println!("     {}", patch.accent());
        }
        println!("   {}", "Run without --dryrun to push.".muted());
    }
}

/// Explain what to do next for errors that have a known remedy
fn print_failure_hint(error: &Error) {
    let hint = match error {
        Error::RebaseRequired { .. } => {
            "The PR predates a required CI change. Ask the author to rebase, then retry."
        }
        Error::Gate(_) => "No changes were made to the working copy.",
        Error::CommandFailed { .. } => {
            "Temporary merge/ branches may be left behind for inspection."
        }
        _ => return,
    };
    eprintln!("{} {}", CROSS.error(), hint.muted());
}
