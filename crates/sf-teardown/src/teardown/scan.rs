//! Read-only inventory of an installation
//!
//! Lists what a teardown would act on without changing anything.

use super::stack::locate;
use crate::aws::{CloudApi, FlowOperations, LogGroupOperations, StackOperations, WorkgroupOperations};
use crate::config::SweepConfig;
use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use sf_teardown_common::{InstallationId, StackRole};
use std::collections::BTreeSet;

/// One of the installation's stacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackScan {
    pub role: StackRole,
    pub name: String,
    /// Current status, `None` if the stack does not exist
    pub status: Option<String>,
}

/// Everything a teardown of the installation would touch
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub installation_id: InstallationId,
    pub stacks: Vec<StackScan>,
    pub log_groups: Vec<String>,
    pub flows: Vec<String>,
    pub workgroups: Vec<String>,
}

impl ScanReport {
    /// True when nothing of the installation remains
    pub fn is_empty(&self) -> bool {
        self.stacks.iter().all(|s| s.status.is_none())
            && self.log_groups.is_empty()
            && self.flows.is_empty()
            && self.workgroups.is_empty()
    }

    /// Render as a table, one row per resource
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![Cell::new("Type"), Cell::new("Name"), Cell::new("Status")]);

        for stack in &self.stacks {
            table.add_row(vec![
                Cell::new(format!("{} stack", stack.role)),
                Cell::new(&stack.name),
                Cell::new(stack.status.as_deref().unwrap_or("absent")),
            ]);
        }
        let residual = [
            ("log group", &self.log_groups),
            ("flow", &self.flows),
            ("workgroup", &self.workgroups),
        ];
        for (kind, names) in residual {
            for name in names {
                table.add_row(vec![Cell::new(kind), Cell::new(name), Cell::new("present")]);
            }
        }

        table
    }
}

/// Inventory the installation's stacks and convention-named residue.
///
/// Issues list and describe calls only.
pub async fn scan_installation<C: CloudApi>(
    cloud: &C,
    sweep: &SweepConfig,
    id: &InstallationId,
) -> Result<ScanReport> {
    let listed = cloud.stacks().list_stacks().await?;
    let stacks = StackRole::TEARDOWN_ORDER
        .into_iter()
        .map(|role| {
            let name = role.stack_name(id);
            let status = locate(&listed, &name).map(|s| s.status.clone());
            StackScan { role, name, status }
        })
        .collect();

    let mut log_groups = BTreeSet::new();
    for prefix in &sweep.log_group_prefixes {
        let groups = cloud.log_groups().list_log_groups(prefix).await?;
        log_groups.extend(groups.into_iter().filter(|g| id.is_token_of(g)));
    }

    let flows = cloud
        .flows()
        .list_flows()
        .await?
        .into_iter()
        .filter(|f| id.is_dash_suffix_of(f))
        .collect();
    let workgroups = cloud
        .workgroups()
        .list_workgroups()
        .await?
        .into_iter()
        .filter(|w| id.is_token_of(w))
        .collect();

    Ok(ScanReport {
        installation_id: id.clone(),
        stacks,
        log_groups: log_groups.into_iter().collect(),
        flows,
        workgroups,
    })
}
