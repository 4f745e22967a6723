//! Progress reporting for a teardown run
//!
//! The engine never logs user-facing progress directly; it emits
//! [`TeardownEvent`]s to a [`TeardownReporter`]. The CLI installs
//! [`LogReporter`], tests install a recorder.

use std::time::Duration;
use tracing::info;

/// Residual resource families removed by the final sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidualKind {
    LogGroup,
    Dashboard,
    Flow,
    Workgroup,
}

impl ResidualKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResidualKind::LogGroup => "log group",
            ResidualKind::Dashboard => "dashboard",
            ResidualKind::Flow => "flow",
            ResidualKind::Workgroup => "workgroup",
        }
    }
}

/// Event emitted by the teardown engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownEvent {
    /// Stack is absent or already deleted; nothing to do
    StackAbsent { stack: String },
    /// Stack found and its members classified
    StackDiscovered {
        stack: String,
        status: String,
        buckets: usize,
        workgroups: usize,
        clusters: usize,
    },
    /// Grace pause before the next stage
    Pausing { reason: &'static str, duration: Duration },
    /// Bucket emptied of every version and delete marker
    BucketPurged { bucket: String, deleted: usize },
    /// Bucket did not exist
    BucketMissing { bucket: String },
    /// Workgroup force-deleted as part of a stack
    WorkgroupDestroyed { workgroup: String },
    /// Cluster deletion protection lifted
    ClusterUnprotected { cluster: String },
    /// Stack delete requested
    StackDeleteRequested { stack: String },
    /// Stack status changed while polling
    StackStatus { stack: String, status: String },
    /// Stack reached DELETE_COMPLETE
    StackDeleted { stack: String },
    /// Residual resource deleted
    ResidualDeleted { kind: ResidualKind, name: String },
}

/// Sink for teardown progress
pub trait TeardownReporter: Send + Sync {
    fn report(&self, event: TeardownEvent);
}

/// Reporter that writes progress as structured log lines
pub struct LogReporter;

impl TeardownReporter for LogReporter {
    fn report(&self, event: TeardownEvent) {
        match event {
            TeardownEvent::StackAbsent { stack } => {
                info!(stack = %stack, "Stack not present, skipping");
            }
            TeardownEvent::StackDiscovered {
                stack,
                status,
                buckets,
                workgroups,
                clusters,
            } => {
                info!(stack = %stack, status = %status, buckets, workgroups, clusters, "Tearing down stack");
            }
            TeardownEvent::Pausing { reason, duration } => {
                info!(reason, secs = duration.as_secs(), "Waiting");
            }
            TeardownEvent::BucketPurged { bucket, deleted } => {
                info!(bucket = %bucket, deleted, "Bucket emptied");
            }
            TeardownEvent::BucketMissing { bucket } => {
                info!(bucket = %bucket, "Bucket already gone");
            }
            TeardownEvent::WorkgroupDestroyed { workgroup } => {
                info!(workgroup = %workgroup, "Workgroup deleted");
            }
            TeardownEvent::ClusterUnprotected { cluster } => {
                info!(cluster = %cluster, "Cluster deletion protection disabled");
            }
            TeardownEvent::StackDeleteRequested { stack } => {
                info!(stack = %stack, "Stack deletion requested");
            }
            TeardownEvent::StackStatus { stack, status } => {
                info!(stack = %stack, status = %status, "Stack status");
            }
            TeardownEvent::StackDeleted { stack } => {
                info!(stack = %stack, "Stack deleted");
            }
            TeardownEvent::ResidualDeleted { kind, name } => {
                info!(kind = kind.as_str(), name = %name, "Residual resource deleted");
            }
        }
    }
}
