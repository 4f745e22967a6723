//! AppFlow flow listing and deletion

use super::context::{AwsContext, FromAwsContext};
use super::fields::opt_string;
use anyhow::{Context, Result};
use aws_sdk_appflow::Client;
use tracing::{debug, info};

/// AppFlow client for the installation's connector flows
pub struct AppFlowClient {
    client: Client,
}

impl FromAwsContext for AppFlowClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.appflow_client(),
        }
    }
}

impl AppFlowClient {
    /// List every flow name in the region
    pub async fn list_flows(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_flows()
                .set_next_token(next_token.take())
                .send()
                .await
                .context("Failed to list flows")?;

            names.extend(
                response
                    .flows()
                    .iter()
                    .filter_map(|flow| opt_string(flow.flow_name())),
            );

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(count = names.len(), "Listed flows");
        Ok(names)
    }

    /// Delete a flow; `forceDelete` stops an active or running flow first
    pub async fn delete_flow(&self, name: &str) -> Result<()> {
        info!(flow = %name, "Deleting flow");

        self.client
            .delete_flow()
            .flow_name(name)
            .force_delete(true)
            .send()
            .await
            .with_context(|| format!("Failed to delete flow {name}"))?;

        Ok(())
    }
}
