//! Workgroup destruction

use crate::aws::WorkgroupOperations;
use anyhow::Result;
use tracing::debug;

/// Force-delete a workgroup together with its saved queries and history.
///
/// No retry, and a missing workgroup is an error here: the name came from
/// the stack's own member list, so it should exist.
pub async fn destroy_workgroup<W: WorkgroupOperations>(workgroups: &W, name: &str) -> Result<()> {
    debug!(workgroup = %name, "Destroying workgroup");
    workgroups.delete_workgroup(name).await
}
