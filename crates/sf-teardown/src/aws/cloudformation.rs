//! CloudFormation stack listing, protection and deletion

use super::context::{AwsContext, FromAwsContext};
use super::error::ignore_not_found;
use super::fields::{SdkField, opt_string, string};
use super::types::{StackDescriptor, StackMemberResource};
use anyhow::{Context, Result};
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::types::StackStatus;
use tracing::{debug, info};

/// CloudFormation client for the installation's stacks
pub struct CloudFormationClient {
    client: Client,
}

impl FromAwsContext for CloudFormationClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.cloudformation_client(),
        }
    }
}

fn status_str<'a>(field: impl SdkField<'a, StackStatus>) -> String {
    field
        .into_option()
        .map(|s| s.as_str().to_string())
        .unwrap_or_default()
}

impl CloudFormationClient {
    /// List all stack summaries, following `NextToken` until exhausted
    pub async fn list_stacks(&self) -> Result<Vec<StackDescriptor>> {
        let mut stacks = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_stacks()
                .set_next_token(next_token.take())
                .send()
                .await
                .context("Failed to list stacks")?;

            for summary in response.stack_summaries() {
                stacks.push(StackDescriptor {
                    id: string(summary.stack_id()),
                    name: string(summary.stack_name()),
                    status: status_str(summary.stack_status()),
                    status_reason: opt_string(summary.stack_status_reason()),
                });
            }

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(count = stacks.len(), "Listed stacks");
        Ok(stacks)
    }

    /// List all member resources of a stack
    pub async fn list_stack_resources(&self, stack_name: &str) -> Result<Vec<StackMemberResource>> {
        let mut resources = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_stack_resources()
                .stack_name(stack_name)
                .set_next_token(next_token.take())
                .send()
                .await
                .with_context(|| format!("Failed to list resources of stack {stack_name}"))?;

            for summary in response.stack_resource_summaries() {
                resources.push(StackMemberResource {
                    logical_id: string(summary.logical_resource_id()),
                    physical_id: opt_string(summary.physical_resource_id()),
                    resource_type: string(summary.resource_type()),
                });
            }

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(stack = %stack_name, count = resources.len(), "Listed stack resources");
        Ok(resources)
    }

    /// Describe one stack by id or name.
    ///
    /// Returns `None` when CloudFormation reports that the stack does not
    /// exist (only possible when describing by name).
    pub async fn describe_stack(&self, stack_id: &str) -> Result<Option<StackDescriptor>> {
        let result = self
            .client
            .describe_stacks()
            .stack_name(stack_id)
            .send()
            .await
            .with_context(|| format!("Failed to describe stack {stack_id}"));

        let Some(response) = ignore_not_found(result)? else {
            return Ok(None);
        };

        Ok(response.stacks().first().map(|stack| StackDescriptor {
            id: string(stack.stack_id()),
            name: string(stack.stack_name()),
            status: status_str(stack.stack_status()),
            status_reason: opt_string(stack.stack_status_reason()),
        }))
    }

    /// Disable termination protection so the stack can be deleted
    pub async fn disable_termination_protection(&self, stack_name: &str) -> Result<()> {
        debug!(stack = %stack_name, "Disabling termination protection");

        self.client
            .update_termination_protection()
            .stack_name(stack_name)
            .enable_termination_protection(false)
            .send()
            .await
            .with_context(|| format!("Failed to disable termination protection on {stack_name}"))?;

        Ok(())
    }

    /// Trigger stack deletion
    pub async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        info!(stack = %stack_name, "Deleting stack");

        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .with_context(|| format!("Failed to delete stack {stack_name}"))?;

        Ok(())
    }
}
