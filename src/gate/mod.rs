//! Merge gates
//!
//! Pure checks over [`PrMetadata`], run before anything touches the
//! working copy. The first failing gate stops the run.

use crate::types::{MergeTargets, PrMetadata};
use thiserror::Error;

/// Action label text that allows a merge
pub const MERGE_ACTION: &str = "PR action: merge";

/// CLA label of a PR whose authors signed the CLA
pub const CLA_SIGNED: &str = "cla: yes";

/// Status description of a green PR
pub const STATUS_GREEN: &str = "All checks passed!";

/// Target label: merge to master and the patch branch
pub const TARGET_MASTER_AND_PATCH: &str = "PR target: master & patch";

/// Target label: merge to master only
pub const TARGET_MASTER_ONLY: &str = "PR target: master-only";

/// Target label: merge to the patch branch only
pub const TARGET_PATCH_ONLY: &str = "PR target: patch-only";

/// A gate that rejected the PR
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateFailure {
    /// No `PR action: merge` label
    #[error("PR is not marked for merging (action label: {})", display_label(.0))]
    MissingActionLabel(Option<String>),

    /// CLA label is missing or not `cla: yes`
    #[error("CLA is not signed (cla label: {})", display_label(.0))]
    ClaNotSigned(Option<String>),

    /// Status check is not green and `--force` was not given
    #[error("status checks have not passed (status: {}); use --force to override", display_label(.0))]
    StatusNotGreen(Option<String>),

    /// Target label is missing or unrecognised
    #[error("Unknown PR target format: {}", display_label(.0))]
    UnknownTarget(Option<String>),
}

fn display_label(label: &Option<String>) -> String {
    label
        .as_deref()
        .map_or_else(|| "<none>".to_string(), |l| format!("'{l}'"))
}

/// Outcome of a successful gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    /// Branches the PR lands on
    pub targets: MergeTargets,
    /// Gates that failed but were overridden
    pub warnings: Vec<String>,
}

/// Map a target label onto merge targets
pub fn parse_target(label: Option<&str>) -> Result<MergeTargets, GateFailure> {
    let (merge_master, merge_patch) = match label {
        Some(TARGET_MASTER_AND_PATCH) => (true, true),
        Some(TARGET_MASTER_ONLY) => (true, false),
        Some(TARGET_PATCH_ONLY) => (false, true),
        other => return Err(GateFailure::UnknownTarget(other.map(String::from))),
    };
    Ok(MergeTargets {
        merge_master,
        merge_patch,
    })
}

/// Run every gate in order (PURE)
///
/// `force` only downgrades a failing status check to a warning; the
/// label gates always hold.
pub fn evaluate_gates(pr: &PrMetadata, force: bool) -> Result<GateReport, GateFailure> {
    let labels = &pr.labels;
    let mut warnings = Vec::new();

    if !labels
        .action
        .as_deref()
        .is_some_and(|a| a.contains(MERGE_ACTION))
    {
        return Err(GateFailure::MissingActionLabel(labels.action.clone()));
    }

    if labels.cla.as_deref() != Some(CLA_SIGNED) {
        return Err(GateFailure::ClaNotSigned(labels.cla.clone()));
    }

    if pr.status_description.as_deref() != Some(STATUS_GREEN) {
        let failure = GateFailure::StatusNotGreen(pr.status_description.clone());
        if !force {
            return Err(failure);
        }
        warnings.push(format!(
            "status checks have not passed (status: {}), continuing because of --force",
            display_label(&pr.status_description)
        ));
    }

    let targets = parse_target(labels.target.as_deref())?;

    Ok(GateReport { targets, warnings })
}
