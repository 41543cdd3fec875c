//! Progress reporting for merge runs

use crate::git::GitCommand;
use async_trait::async_trait;

/// Receives progress updates while a merge runs
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// A step is starting
    async fn on_step(&self, step: &str);

    /// A git command is about to run
    async fn on_command(&self, command: &GitCommand);

    /// Free-form status message
    async fn on_message(&self, message: &str);

    /// Something went wrong but the run continues
    async fn on_warning(&self, message: &str);
}

/// Progress callback that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_step(&self, _step: &str) {}
    async fn on_command(&self, _command: &GitCommand) {}
    async fn on_message(&self, _message: &str) {}
    async fn on_warning(&self, _message: &str) {}
}
