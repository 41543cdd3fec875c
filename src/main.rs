//! pr-merge CLI entry point

mod cli;

use anstream::eprintln;
use clap::{CommandFactory, Parser};
use cli::Cli;
use cli::style::Stylize;
use pr_merge::invocation::Invocation;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match Cli::try_parse_from(cli::route_args(std::env::args_os())) {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too
            let printed = e.print();
            return if e.use_stderr() || printed.is_err() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Some(pr_number) = args.msg_filter {
        return match cli::run_msg_filter(pr_number) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{} {e:#}", "error:".error());
                ExitCode::FAILURE
            }
        };
    }

    let invocation = match Invocation::from_tokens(&args.pr, args.dryrun, args.force) {
        Ok(Some(invocation)) => invocation,
        Ok(None) => {
            // no PR number: usage, not an error
            return match Cli::command().print_help() {
                Ok(()) => ExitCode::SUCCESS,
                Err(_) => ExitCode::FAILURE,
            };
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".error());
            return ExitCode::FAILURE;
        }
    };

    match cli::run_merge(&args.path, args.repo.as_deref(), invocation).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".error());
            ExitCode::FAILURE
        }
    }
}
