//! pr-merge - gate-checked merging of labelled pull requests
//!
//! Merges a reviewed GitHub pull request onto `master` and/or the newest
//! `<major>.<minor>.x` patch branch once its labels and status checks allow it.
//!
//! The run is split into the usual gather / plan / execute phases:
//! 1. Gather - query the PR, its status and labels ([`platform`])
//! 2. Gate + plan - pure checks and command planning ([`gate`], [`merge`])
//! 3. Execute - run the planned git commands ([`merge::execute_merge`])

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod git;
pub mod invocation;
pub mod merge;
pub mod platform;
pub mod progress;
pub mod types;

pub use error::{Error, Result};
