//! QuickSight dashboard deletion

use super::account::AccountId;
use super::context::AwsContext;
use anyhow::{Context, Result};
use aws_sdk_quicksight::Client;
use tracing::info;

/// QuickSight client scoped to one account
pub struct QuickSightClient {
    client: Client,
    account_id: AccountId,
}

impl QuickSightClient {
    /// QuickSight addresses every resource by account id, so unlike the
    /// other clients this one needs the caller identity up front.
    pub fn from_context(ctx: &AwsContext, account_id: AccountId) -> Self {
        Self {
            client: ctx.quicksight_client(),
            account_id,
        }
    }

    /// Delete a dashboard and all of its versions
    pub async fn delete_dashboard(&self, dashboard_id: &str) -> Result<()> {
        info!(dashboard = %dashboard_id, account_id = %self.account_id, "Deleting dashboard");

        self.client
            .delete_dashboard()
            .aws_account_id(self.account_id.as_str())
            .dashboard_id(dashboard_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete dashboard {dashboard_id}"))?;

        Ok(())
    }
}
