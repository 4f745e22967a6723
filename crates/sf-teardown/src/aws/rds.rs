//! RDS cluster protection

use super::context::{AwsContext, FromAwsContext};
use anyhow::{Context, Result};
use aws_sdk_rds::Client;
use tracing::info;

/// RDS client for the installation's Aurora cluster
pub struct RdsClient {
    client: Client,
}

impl FromAwsContext for RdsClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.rds_client(),
        }
    }
}

impl RdsClient {
    /// Turn off deletion protection, applied immediately so the stack
    /// delete that follows is not rejected
    pub async fn disable_deletion_protection(&self, cluster_id: &str) -> Result<()> {
        info!(cluster = %cluster_id, "Disabling cluster deletion protection");

        self.client
            .modify_db_cluster()
            .db_cluster_identifier(cluster_id)
            .deletion_protection(false)
            .apply_immediately(true)
            .send()
            .await
            .with_context(|| format!("Failed to disable deletion protection on {cluster_id}"))?;

        Ok(())
    }
}
