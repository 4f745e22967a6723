//! Stack deletion driver
//!
//! Takes one named stack from "exists" to `DELETE_COMPLETE`: empties its
//! buckets, drops its workgroups, lifts protections, triggers the delete
//! and polls until CloudFormation reports a terminal status.

use super::purge::{PurgeOutcome, purge_bucket};
use super::workgroup::destroy_workgroup;
use super::{CleanupAccumulator, TeardownContext, TeardownError, TeardownEvent, TeardownReporter};
use crate::aws::{
    CloudApi, ClusterOperations, StackDescriptor, StackMemberResource, StackOperations,
};
use crate::wait::poll_until;
use anyhow::{Context, Result};
use futures::future::try_join_all;
use sf_teardown_common::naming::is_logging_bucket;
use sf_teardown_common::stack_status::DELETE_COMPLETE;
use sf_teardown_common::{MemberKind, StackStatusClass};
use std::sync::Mutex;
use tracing::debug;

/// How a stack left the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackOutcome {
    /// Stack was never created or is already `DELETE_COMPLETE`
    AlreadyAbsent,
    /// Stack reached `DELETE_COMPLETE`; carries the residue it left behind
    Deleted(CleanupAccumulator),
}

impl StackOutcome {
    /// Residue to hand to the residual sweep (empty for absent stacks)
    pub fn into_residue(self) -> CleanupAccumulator {
        match self {
            StackOutcome::AlreadyAbsent => CleanupAccumulator::default(),
            StackOutcome::Deleted(residue) => residue,
        }
    }
}

/// Stack members grouped by what has to happen to them
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct StackMembers {
    /// Regular buckets, purged together first
    pub buckets: Vec<String>,
    /// Buckets receiving access logs, purged after everything else stops writing
    pub logging_buckets: Vec<String>,
    pub workgroups: Vec<String>,
    pub residue: CleanupAccumulator,
}

impl StackMembers {
    pub(crate) fn classify(resources: &[StackMemberResource]) -> Self {
        let mut members = StackMembers::default();

        for resource in resources {
            let (Some(kind), Some(physical_id)) = (resource.kind(), resource.physical_id.clone())
            else {
                continue;
            };
            debug!(kind = kind.as_str(), id = %physical_id, "Stack member");
            match kind {
                MemberKind::Bucket if is_logging_bucket(&physical_id) => {
                    members.logging_buckets.push(physical_id)
                }
                MemberKind::Bucket => members.buckets.push(physical_id),
                MemberKind::Workgroup => members.workgroups.push(physical_id),
                MemberKind::Function => members.residue.function_names.push(physical_id),
                MemberKind::Cluster => members.residue.cluster_ids.push(physical_id),
            }
        }

        members
    }

    fn bucket_count(&self) -> usize {
        self.buckets.len() + self.logging_buckets.len()
    }
}

/// Find the live stack named `stack_name`, skipping deleted incarnations
pub(crate) fn locate<'s>(stacks: &'s [StackDescriptor], stack_name: &str) -> Option<&'s StackDescriptor> {
    stacks
        .iter()
        .find(|s| s.name == stack_name && s.status != DELETE_COMPLETE)
}

/// Tear down one stack.
///
/// Returns [`StackOutcome::AlreadyAbsent`] without any further calls if the
/// stack does not exist. Every failure is fatal and aborts the driver; a
/// stack that ends in a failed terminal status yields
/// [`TeardownError::StackDeletionFailed`].
pub async fn delete_stack<C, R>(
    ctx: TeardownContext<'_, C, R>,
    stack_name: &str,
) -> Result<StackOutcome>
where
    C: CloudApi,
    R: TeardownReporter + ?Sized,
{
    let stacks = ctx.cloud.stacks();

    let listed = stacks.list_stacks().await?;
    let Some(stack) = locate(&listed, stack_name).cloned() else {
        ctx.reporter.report(TeardownEvent::StackAbsent {
            stack: stack_name.to_string(),
        });
        return Ok(StackOutcome::AlreadyAbsent);
    };

    let resources = stacks
        .list_stack_resources(stack_name)
        .await
        .with_context(|| format!("Failed to list members of {stack_name}"))?;
    let members = StackMembers::classify(&resources);
    debug!(stack = %stack_name, ?members, "Classified stack members");

    ctx.reporter.report(TeardownEvent::StackDiscovered {
        stack: stack_name.to_string(),
        status: stack.status.clone(),
        buckets: members.bucket_count(),
        workgroups: members.workgroups.len(),
        clusters: members.residue.cluster_ids.len(),
    });

    empty_buckets(ctx, &members).await?;
    drop_workgroups(ctx, &members.workgroups).await?;

    for cluster in &members.residue.cluster_ids {
        ctx.cloud.clusters().disable_deletion_protection(cluster).await?;
        ctx.reporter.report(TeardownEvent::ClusterUnprotected {
            cluster: cluster.clone(),
        });
    }

    stacks.disable_termination_protection(stack_name).await?;
    stacks.delete_stack(stack_name).await?;
    ctx.reporter.report(TeardownEvent::StackDeleteRequested {
        stack: stack_name.to_string(),
    });

    await_deletion(ctx, &stack).await?;
    ctx.reporter.report(TeardownEvent::StackDeleted {
        stack: stack_name.to_string(),
    });

    Ok(StackOutcome::Deleted(members.residue))
}

async fn empty_buckets<C, R>(ctx: TeardownContext<'_, C, R>, members: &StackMembers) -> Result<()>
where
    C: CloudApi,
    R: TeardownReporter + ?Sized,
{
    if members.bucket_count() == 0 {
        return Ok(());
    }

    let timing = &ctx.tuning.timing;
    ctx.pause("bucket settle", timing.bucket_settle()).await;

    let purges = members
        .buckets
        .iter()
        .map(|bucket| purge_bucket(ctx.cloud.buckets(), bucket, &ctx.tuning.purge));
    for outcome in try_join_all(purges).await? {
        report_purge(ctx.reporter, outcome);
    }

    if members.logging_buckets.is_empty() {
        return Ok(());
    }

    ctx.pause("log delivery", timing.log_delivery()).await;
    for bucket in &members.logging_buckets {
        let outcome = purge_bucket(ctx.cloud.buckets(), bucket, &ctx.tuning.purge).await?;
        report_purge(ctx.reporter, outcome);
    }

    Ok(())
}

fn report_purge<R: TeardownReporter + ?Sized>(reporter: &R, outcome: PurgeOutcome) {
    let event = if outcome.missing {
        TeardownEvent::BucketMissing {
            bucket: outcome.bucket,
        }
    } else {
        TeardownEvent::BucketPurged {
            bucket: outcome.bucket,
            deleted: outcome.deleted,
        }
    };
    reporter.report(event);
}

async fn drop_workgroups<C, R>(ctx: TeardownContext<'_, C, R>, workgroups: &[String]) -> Result<()>
where
    C: CloudApi,
    R: TeardownReporter + ?Sized,
{
    if workgroups.is_empty() {
        return Ok(());
    }

    let settle = ctx.tuning.timing.workgroup_settle();
    ctx.pause("workgroup settle", settle).await;

    try_join_all(
        workgroups
            .iter()
            .map(|name| destroy_workgroup(ctx.cloud.workgroups(), name)),
    )
    .await?;
    for name in workgroups {
        ctx.reporter.report(TeardownEvent::WorkgroupDestroyed {
            workgroup: name.clone(),
        });
    }

    ctx.pause("workgroup settle", settle).await;
    Ok(())
}

/// Poll by stack id until a terminal status. The id keeps resolving after
/// the delete completes, where the name would not.
async fn await_deletion<C, R>(ctx: TeardownContext<'_, C, R>, stack: &StackDescriptor) -> Result<()>
where
    C: CloudApi,
    R: TeardownReporter + ?Sized,
{
    let last_status = Mutex::new(stack.status.clone());
    let last_status = &last_status;
    let stacks = ctx.cloud.stacks();

    poll_until(ctx.tuning.timing.poll_interval(), &stack.name, || async move {
        let Some(current) = stacks.describe_stack(&stack.id).await? else {
            debug!(stack = %stack.name, "Stack no longer describable, treating as deleted");
            return Ok(Some(()));
        };

        let changed = {
            let mut last = last_status.lock().unwrap_or_else(|e| e.into_inner());
            let changed = *last != current.status;
            if changed {
                last.clone_from(&current.status);
            }
            changed
        };
        if changed {
            ctx.reporter.report(TeardownEvent::StackStatus {
                stack: stack.name.clone(),
                status: current.status.clone(),
            });
        }

        match StackStatusClass::of(&current.status) {
            StackStatusClass::InProgress => Ok(None),
            StackStatusClass::Deleted => Ok(Some(())),
            StackStatusClass::Failed => Err(TeardownError::StackDeletionFailed {
                stack: stack.name.clone(),
                status: current.status,
                reason: current.status_reason,
            }
            .into()),
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(resource_type: &str, physical_id: Option<&str>) -> StackMemberResource {
        StackMemberResource {
            logical_id: "Logical".to_string(),
            physical_id: physical_id.map(str::to_string),
            resource_type: resource_type.to_string(),
        }
    }

    fn stack(name: &str, status: &str) -> StackDescriptor {
        StackDescriptor {
            id: format!("arn:aws:cloudformation:us-east-1:123456789012:stack/{name}/{status}"),
            name: name.to_string(),
            status: status.to_string(),
            status_reason: None,
        }
    }

    #[test]
    fn test_logging_bucket_sorted_last() {
        let members = StackMembers::classify(&[
            member("AWS::S3::Bucket", Some("logs-sf-logging-abc123")),
            member("AWS::S3::Bucket", Some("data-bucket")),
        ]);

        assert_eq!(members.buckets, vec!["data-bucket"]);
        assert_eq!(members.logging_buckets, vec!["logs-sf-logging-abc123"]);
    }

    #[test]
    fn test_classify_accumulates_functions_and_clusters() {
        let members = StackMembers::classify(&[
            member("AWS::Lambda::Function", Some("sf-sync-abc123")),
            member("AWS::RDS::DBCluster", Some("sf-cluster-abc123")),
            member("AWS::Athena::WorkGroup", Some("sf-wg-abc123")),
            member("AWS::IAM::Role", Some("sf-role-abc123")),
            member("AWS::S3::Bucket", None),
        ]);

        assert_eq!(members.residue.function_names, vec!["sf-sync-abc123"]);
        assert_eq!(members.residue.cluster_ids, vec!["sf-cluster-abc123"]);
        assert_eq!(members.workgroups, vec!["sf-wg-abc123"]);
        assert_eq!(members.bucket_count(), 0);
    }

    #[test]
    fn test_locate_skips_deleted_incarnations() {
        let listed = vec![
            stack("sf-flow-abc123", "DELETE_COMPLETE"),
            stack("sf-flow-abc123", "CREATE_COMPLETE"),
            stack("sf-query-abc123", "CREATE_COMPLETE"),
        ];

        let found = locate(&listed, "sf-flow-abc123").unwrap();
        assert_eq!(found.status, "CREATE_COMPLETE");
        assert!(locate(&listed[..1], "sf-flow-abc123").is_none());
        assert!(locate(&listed, "sf-network-abc123").is_none());
    }

    #[test]
    fn test_absent_outcome_has_empty_residue() {
        assert!(StackOutcome::AlreadyAbsent.into_residue().is_empty());
    }
}
