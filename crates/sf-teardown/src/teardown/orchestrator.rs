//! Installation teardown orchestration
//!
//! Drives every stack of an installation through deletion in dependency
//! order, then sweeps what the stacks left behind.

use super::residual::{ResidualReport, sweep_residuals};
use super::stack::{StackOutcome, delete_stack};
use super::{CleanupAccumulator, TeardownContext, TeardownReporter};
use crate::aws::CloudApi;
use crate::config::Tuning;
use anyhow::{Context, Result};
use serde::Serialize;
use sf_teardown_common::{InstallationId, StackRole};
use tracing::info;

/// What a successful teardown did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownSummary {
    /// Stacks driven to `DELETE_COMPLETE` by this run
    pub stacks_deleted: Vec<String>,
    /// Stacks that were already gone
    pub stacks_absent: Vec<String>,
    pub residual: ResidualReport,
}

impl TeardownSummary {
    /// True when the run found nothing left to delete
    pub fn was_noop(&self) -> bool {
        self.stacks_deleted.is_empty() && self.residual.total() == 0
    }
}

/// Runs the full teardown saga for one installation.
///
/// The saga has no compensation: the first failure stops the run and
/// propagates. Every step is idempotent, so a failed run is resumed by
/// running it again.
pub struct Orchestrator<'a, C, R: ?Sized> {
    ctx: TeardownContext<'a, C, R>,
}

impl<'a, C, R> Orchestrator<'a, C, R>
where
    C: CloudApi,
    R: TeardownReporter + ?Sized,
{
    pub fn new(cloud: &'a C, tuning: &'a Tuning, reporter: &'a R) -> Self {
        Self {
            ctx: TeardownContext::new(cloud, tuning, reporter),
        }
    }

    /// Tear down every stack, then sweep the residue
    pub async fn run(&self, id: &InstallationId) -> Result<TeardownSummary> {
        info!(installation_id = %id, "Starting teardown");

        let mut summary = TeardownSummary::default();
        let mut residue = CleanupAccumulator::default();

        for role in StackRole::TEARDOWN_ORDER {
            let stack_name = role.stack_name(id);
            let outcome = delete_stack(self.ctx, &stack_name)
                .await
                .with_context(|| format!("Teardown of {role} stack {stack_name} failed"))?;

            match &outcome {
                StackOutcome::AlreadyAbsent => summary.stacks_absent.push(stack_name),
                StackOutcome::Deleted(_) => summary.stacks_deleted.push(stack_name),
            }
            residue = residue.merge(outcome.into_residue());
        }

        summary.residual = sweep_residuals(self.ctx, id, &residue)
            .await
            .context("Residual sweep failed")?;

        info!(
            installation_id = %id,
            stacks_deleted = summary.stacks_deleted.len(),
            stacks_absent = summary.stacks_absent.len(),
            residual = summary.residual.total(),
            "Teardown complete"
        );
        Ok(summary)
    }
}
