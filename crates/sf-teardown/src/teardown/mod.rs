//! The teardown engine
//!
//! Stacks are torn down one at a time in dependency order. Within a stack
//! the stages run strictly in sequence (purge buckets, drop workgroups,
//! lift protections, delete, poll) and each stage fans out over its members
//! and joins before the next begins. Nothing is spawned: all concurrency is
//! futures joined on the caller's task.

pub mod accumulator;
pub mod orchestrator;
pub mod purge;
pub mod report;
pub mod residual;
pub mod scan;
pub mod stack;
pub mod workgroup;

pub use accumulator::CleanupAccumulator;
pub use orchestrator::{Orchestrator, TeardownSummary};
pub use purge::{PurgeOutcome, purge_bucket};
pub use report::{LogReporter, ResidualKind, TeardownEvent, TeardownReporter};
pub use residual::{ResidualReport, sweep_residuals};
pub use scan::{ScanReport, StackScan, scan_installation};
pub use stack::{StackOutcome, delete_stack};
pub use workgroup::destroy_workgroup;

use crate::aws::CloudApi;
use crate::config::Tuning;
use std::time::Duration;
use thiserror::Error;

/// Fatal teardown failures that are not AWS call errors
#[derive(Debug, Error)]
pub enum TeardownError {
    #[error("Stack {stack} ended in {status}: {}", reason.as_deref().unwrap_or("no reason given"))]
    StackDeletionFailed {
        stack: String,
        status: String,
        reason: Option<String>,
    },

    #[error("Bucket {bucket} still holds {} object version(s) after purge", failed_keys.len())]
    PurgeIncomplete {
        bucket: String,
        failed_keys: Vec<String>,
    },
}

/// Everything one teardown stage needs: the clients, the tuning and the
/// progress sink.
pub struct TeardownContext<'a, C, R: ?Sized> {
    pub cloud: &'a C,
    pub tuning: &'a Tuning,
    pub reporter: &'a R,
}

impl<C, R: ?Sized> Clone for TeardownContext<'_, C, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, R: ?Sized> Copy for TeardownContext<'_, C, R> {}

impl<'a, C, R> TeardownContext<'a, C, R>
where
    C: CloudApi,
    R: TeardownReporter + ?Sized,
{
    pub fn new(cloud: &'a C, tuning: &'a Tuning, reporter: &'a R) -> Self {
        Self {
            cloud,
            tuning,
            reporter,
        }
    }

    /// Sleep through a grace delay, reporting it first
    pub(crate) async fn pause(&self, reason: &'static str, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        self.reporter
            .report(TeardownEvent::Pausing { reason, duration });
        tokio::time::sleep(duration).await;
    }
}
