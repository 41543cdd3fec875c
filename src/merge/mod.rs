//! Merge engine
//!
//! Three-phase pattern:
//! 1. Gather - fetch PR state from the forge (effectful, bounded)
//! 2. Plan - gate the PR and create a `MergePlan` (pure, testable)
//! 3. Execute - run the plan's git commands (effectful)

mod execute;
mod message;
mod plan;
mod workflow;

pub use execute::{MergeExecutionResult, execute_merge};
pub use message::{ClosingReference, MessageFormatter, msg_filter_command};
pub use plan::{
    BranchNames, MergePlan, MergePlanOptions, MergeStep, StepKind, create_merge_plan,
    required_base_sha,
};
pub use workflow::{MergeOutcome, run_merge_workflow};
