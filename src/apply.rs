//! Executing a renumbering plan.
//!
//! ## Ordering
//!
//! Operations run deepest first. A directory is renamed only after every
//! rename inside it has happened, so no pending operation ever points into a
//! path that has already moved. Within one depth, an operation whose target
//! is still occupied by another pending operation's source waits for it:
//! `00_a → 01_a` runs after `01_a → 02_a`.
//!
//! ## Failure Model
//!
//! - A planned source that no longer exists means the plan is stale. This is
//!   checked for every operation before anything is renamed and aborts the
//!   whole transaction ([`ApplyError::StaleSnapshot`]).
//! - A rename that fails (target exists, permissions, ...) is recorded in its
//!   [`Outcome`] and the remaining operations still run.
//!
//! Nothing is journaled and nothing is rolled back: an interrupted
//! transaction leaves the tree as far as it got, and re-planning picks up
//! from there.

use crate::renumber::{RenameOperation, RenumberPlan};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApplyError {
    #[error("Planned source no longer exists (stale plan): {0}")]
    StaleSnapshot(PathBuf),
}

/// Why a single rename did not happen.
#[derive(Error, Debug)]
pub enum RenameFailure {
    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report what would happen; touch nothing.
    DryRun,
    Apply,
}

#[derive(Debug)]
pub enum Outcome {
    Renamed,
    Previewed,
    Failed(RenameFailure),
}

#[derive(Debug)]
pub struct OperationOutcome {
    pub operation: RenameOperation,
    pub outcome: Outcome,
}

/// Per-operation results, in execution order.
#[derive(Debug)]
pub struct TransactionReport {
    pub root: PathBuf,
    pub mode: Mode,
    pub outcomes: Vec<OperationOutcome>,
}

impl TransactionReport {
    pub fn failures(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Failed(_)))
    }

    pub fn renamed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, Outcome::Renamed))
            .count()
    }

    /// True when every operation was applied (or previewed, for a dry run).
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Order operations for execution: depth descending, then chains within a
/// depth so that targets are vacated before they are reused.
pub fn execution_order(mut operations: Vec<RenameOperation>) -> Vec<RenameOperation> {
    operations.sort_by(|a, b| b.depth.cmp(&a.depth));

    let mut ordered = Vec::with_capacity(operations.len());
    for same_depth in operations.chunk_by(|a, b| a.depth == b.depth) {
        ordered.extend(vacate_first(same_depth.to_vec()));
    }
    ordered
}

/// Emit an operation only once no other pending operation still holds its
/// target. A cycle cannot be untangled this way; its members keep plan order
/// and will report their collisions.
fn vacate_first(mut pending: Vec<RenameOperation>) -> Vec<RenameOperation> {
    let mut out = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let ready = pending
            .iter()
            .position(|op| !pending.iter().any(|other| other.old_path == op.new_path));
        match ready {
            Some(i) => out.push(pending.remove(i)),
            None => {
                tracing::debug!("Rename cycle among {} operations", pending.len());
                out.append(&mut pending);
            }
        }
    }
    out
}

/// Run (or preview) `plan`.
pub fn apply(plan: RenumberPlan, mode: Mode) -> Result<TransactionReport, ApplyError> {
    let RenumberPlan { root, operations } = plan;

    if let Some(stale) = operations.iter().find(|op| !op.old_path.exists()) {
        return Err(ApplyError::StaleSnapshot(stale.old_path.clone()));
    }

    let outcomes = execution_order(operations)
        .into_iter()
        .map(|operation| {
            let outcome = match mode {
                Mode::DryRun => Outcome::Previewed,
                Mode::Apply => match rename(&operation) {
                    Ok(()) => Outcome::Renamed,
                    Err(e) => {
                        tracing::warn!(
                            "Rename {} -> {} failed: {e}",
                            operation.old_path.display(),
                            operation.new_path.display()
                        );
                        Outcome::Failed(e)
                    }
                },
            };
            OperationOutcome { operation, outcome }
        })
        .collect();

    Ok(TransactionReport {
        root,
        mode,
        outcomes,
    })
}

fn rename(op: &RenameOperation) -> Result<(), RenameFailure> {
    // fs::rename silently replaces files on Unix
    if fs::symlink_metadata(&op.new_path).is_ok() {
        return Err(RenameFailure::DestinationExists(op.new_path.clone()));
    }
    fs::rename(&op.old_path, &op.new_path)?;
    tracing::info!(
        "Renamed {} -> {}",
        op.old_path.display(),
        op.new_path.display()
    );
    Ok(())
}
