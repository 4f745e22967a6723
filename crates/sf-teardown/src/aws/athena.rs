//! Athena workgroup listing and deletion

use super::context::{AwsContext, FromAwsContext};
use super::fields::opt_string;
use anyhow::{Context, Result};
use aws_sdk_athena::Client;
use tracing::{debug, info};

/// Athena client for installation workgroups
pub struct AthenaClient {
    client: Client,
}

impl FromAwsContext for AthenaClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.athena_client(),
        }
    }
}

impl AthenaClient {
    /// List every workgroup name in the region
    pub async fn list_workgroups(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_work_groups()
                .set_next_token(next_token.take())
                .send()
                .await
                .context("Failed to list workgroups")?;

            names.extend(
                response
                    .work_groups()
                    .iter()
                    .filter_map(|wg| opt_string(wg.name())),
            );

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(count = names.len(), "Listed workgroups");
        Ok(names)
    }

    /// Delete a workgroup recursively, dropping its named queries and
    /// query history along with it
    pub async fn delete_workgroup(&self, name: &str) -> Result<()> {
        info!(workgroup = %name, "Deleting workgroup");

        self.client
            .delete_work_group()
            .work_group(name)
            .recursive_delete_option(true)
            .send()
            .await
            .with_context(|| format!("Failed to delete workgroup {name}"))?;

        Ok(())
    }
}
