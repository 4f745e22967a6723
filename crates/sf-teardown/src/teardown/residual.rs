//! Residual sweep
//!
//! Some resources outlive every stack: log groups created lazily by
//! functions and clusters, the dashboard, connector flows, and workgroups
//! created outside CloudFormation. They are found by naming convention and
//! deleted once every stack is gone. Every delete tolerates not-found, so
//! the sweep can be rerun safely.

use super::{CleanupAccumulator, ResidualKind, TeardownContext, TeardownEvent, TeardownReporter};
use crate::aws::{
    CloudApi, DashboardOperations, FlowOperations, LogGroupOperations, WorkgroupOperations,
    ignore_not_found,
};
use anyhow::Result;
use serde::Serialize;
use sf_teardown_common::InstallationId;
use sf_teardown_common::naming::{cluster_log_group, dashboard_id, function_log_group};
use std::collections::HashSet;
use tracing::{debug, info};

/// Residual resources actually deleted, per family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResidualReport {
    pub log_groups: usize,
    pub dashboards: usize,
    pub flows: usize,
    pub workgroups: usize,
}

impl ResidualReport {
    pub fn total(&self) -> usize {
        self.log_groups + self.dashboards + self.flows + self.workgroups
    }

    fn record(&mut self, kind: ResidualKind) {
        match kind {
            ResidualKind::LogGroup => self.log_groups += 1,
            ResidualKind::Dashboard => self.dashboards += 1,
            ResidualKind::Flow => self.flows += 1,
            ResidualKind::Workgroup => self.workgroups += 1,
        }
    }
}

struct Sweep<'a, 'c, C, R: ?Sized> {
    ctx: TeardownContext<'c, C, R>,
    report: &'a mut ResidualReport,
}

impl<C, R> Sweep<'_, '_, C, R>
where
    C: CloudApi,
    R: TeardownReporter + ?Sized,
{
    /// Count and report a delete that found its target
    fn deleted(&mut self, kind: ResidualKind, name: &str, existed: bool) {
        if !existed {
            debug!(kind = kind.as_str(), name = %name, "Already gone");
            return;
        }
        self.report.record(kind);
        self.ctx.reporter.report(TeardownEvent::ResidualDeleted {
            kind,
            name: name.to_string(),
        });
    }

    async fn delete_log_group(&mut self, name: &str) -> Result<()> {
        let existed = ignore_not_found(self.ctx.cloud.log_groups().delete_log_group(name).await)?;
        self.deleted(ResidualKind::LogGroup, name, existed.is_some());
        Ok(())
    }
}

/// Delete everything named after `id` that outlived its stacks.
///
/// Runs, in order: the log groups of accumulated functions and clusters,
/// any other log group under the sweep prefixes carrying the id as a
/// delimited token, the dashboard, flows whose name ends in `-<id>`, and
/// workgroups carrying the id as a delimited token.
pub async fn sweep_residuals<C, R>(
    ctx: TeardownContext<'_, C, R>,
    id: &InstallationId,
    residue: &CleanupAccumulator,
) -> Result<ResidualReport>
where
    C: CloudApi,
    R: TeardownReporter + ?Sized,
{
    let mut report = ResidualReport::default();
    let mut sweep = Sweep {
        ctx,
        report: &mut report,
    };

    let mut handled: HashSet<String> = HashSet::new();
    let owned_groups = residue
        .function_names
        .iter()
        .map(|name| function_log_group(name))
        .chain(residue.cluster_ids.iter().map(|cluster| cluster_log_group(cluster)));
    for group in owned_groups {
        if handled.insert(group.clone()) {
            sweep.delete_log_group(&group).await?;
        }
    }

    for prefix in &ctx.tuning.sweep.log_group_prefixes {
        let groups = ctx.cloud.log_groups().list_log_groups(prefix).await?;
        for group in groups {
            if id.is_token_of(&group) && handled.insert(group.clone()) {
                sweep.delete_log_group(&group).await?;
            }
        }
    }

    let dashboard = dashboard_id(id);
    let existed = ignore_not_found(ctx.cloud.dashboards().delete_dashboard(&dashboard).await)?;
    sweep.deleted(ResidualKind::Dashboard, &dashboard, existed.is_some());

    let flows = ctx.cloud.flows().list_flows().await?;
    for flow in flows.iter().filter(|name| id.is_dash_suffix_of(name)) {
        let existed = ignore_not_found(ctx.cloud.flows().delete_flow(flow).await)?;
        sweep.deleted(ResidualKind::Flow, flow, existed.is_some());
    }

    let workgroups = ctx.cloud.workgroups().list_workgroups().await?;
    for workgroup in workgroups.iter().filter(|name| id.is_token_of(name)) {
        let existed = ignore_not_found(ctx.cloud.workgroups().delete_workgroup(workgroup).await)?;
        sweep.deleted(ResidualKind::Workgroup, workgroup, existed.is_some());
    }

    info!(
        installation_id = %id,
        log_groups = report.log_groups,
        dashboards = report.dashboards,
        flows = report.flows,
        workgroups = report.workgroups,
        "Residual sweep complete"
    );
    Ok(report)
}
