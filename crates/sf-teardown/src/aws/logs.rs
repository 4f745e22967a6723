//! CloudWatch Logs group listing and deletion

use super::context::{AwsContext, FromAwsContext};
use super::fields::opt_string;
use anyhow::{Context, Result};
use aws_sdk_cloudwatchlogs::Client;
use tracing::{debug, info};

/// CloudWatch Logs client for installation log groups
pub struct LogsClient {
    client: Client,
}

impl FromAwsContext for LogsClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.logs_client(),
        }
    }
}

impl LogsClient {
    /// List every log group whose name starts with `prefix`
    pub async fn list_log_groups(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .describe_log_groups()
                .log_group_name_prefix(prefix)
                .set_next_token(next_token.take())
                .send()
                .await
                .with_context(|| format!("Failed to list log groups under {prefix}"))?;

            names.extend(
                response
                    .log_groups()
                    .iter()
                    .filter_map(|group| opt_string(group.log_group_name())),
            );

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(prefix = %prefix, count = names.len(), "Listed log groups");
        Ok(names)
    }

    /// Delete a log group
    pub async fn delete_log_group(&self, name: &str) -> Result<()> {
        info!(log_group = %name, "Deleting log group");

        self.client
            .delete_log_group()
            .log_group_name(name)
            .send()
            .await
            .with_context(|| format!("Failed to delete log group {name}"))?;

        Ok(())
    }
}
