//! Operation traits for testing
//!
//! Each trait covers one resource family and abstracts the client wrapper so
//! the teardown engine can run against an in-memory fake. Listing methods
//! return complete sets: pagination is exhausted inside the implementation,
//! except for object versions, whose dual-cursor loop is owned by the purger.

use super::types::{ObjectVersionPage, StackDescriptor, StackMemberResource, VersionCursor};
use super::{
    AccountId, AppFlowClient, AthenaClient, AwsContext, CloudFormationClient, FromAwsContext,
    LogsClient, QuickSightClient, RdsClient, S3Client,
};
use anyhow::Result;
use std::future::Future;

/// CloudFormation stack operations
pub trait StackOperations: Send + Sync {
    /// List every stack summary in the region, including deleted ones
    fn list_stacks(&self) -> impl Future<Output = Result<Vec<StackDescriptor>>> + Send;

    /// List every member resource of a stack
    fn list_stack_resources(
        &self,
        stack_name: &str,
    ) -> impl Future<Output = Result<Vec<StackMemberResource>>> + Send;

    /// Describe a stack by id; `None` if the control plane no longer knows it
    fn describe_stack(
        &self,
        stack_id: &str,
    ) -> impl Future<Output = Result<Option<StackDescriptor>>> + Send;

    /// Turn off stack termination protection
    fn disable_termination_protection(
        &self,
        stack_name: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Request stack deletion (returns before deletion finishes)
    fn delete_stack(&self, stack_name: &str) -> impl Future<Output = Result<()>> + Send;
}

/// S3 object version operations
pub trait BucketOperations: Send + Sync {
    /// Fetch one page of versions and delete markers starting at `cursor`
    fn list_object_versions(
        &self,
        bucket: &str,
        cursor: &VersionCursor,
    ) -> impl Future<Output = Result<ObjectVersionPage>> + Send;

    /// Permanently delete one object version or delete marker
    fn delete_object_version(
        &self,
        bucket: &str,
        key: &str,
        version_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Athena workgroup operations
pub trait WorkgroupOperations: Send + Sync {
    /// List every workgroup name
    fn list_workgroups(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Delete a workgroup together with its saved queries and history
    fn delete_workgroup(&self, name: &str) -> impl Future<Output = Result<()>> + Send;
}

/// RDS cluster operations
pub trait ClusterOperations: Send + Sync {
    /// Turn off deletion protection on a DB cluster
    fn disable_deletion_protection(
        &self,
        cluster_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// CloudWatch Logs operations
pub trait LogGroupOperations: Send + Sync {
    /// List every log group name starting with `prefix`
    fn list_log_groups(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Delete a log group and all of its streams
    fn delete_log_group(&self, name: &str) -> impl Future<Output = Result<()>> + Send;
}

/// QuickSight dashboard operations
pub trait DashboardOperations: Send + Sync {
    fn delete_dashboard(&self, dashboard_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// AppFlow flow operations
pub trait FlowOperations: Send + Sync {
    /// List every flow name
    fn list_flows(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Delete a flow, even if it is active or running
    fn delete_flow(&self, name: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Every client the teardown engine talks to.
///
/// Real runs use [`AwsClients`]; tests hand in one fake that implements all
/// families.
pub trait CloudApi: Send + Sync {
    type Stacks: StackOperations;
    type Buckets: BucketOperations;
    type Workgroups: WorkgroupOperations;
    type Clusters: ClusterOperations;
    type LogGroups: LogGroupOperations;
    type Dashboards: DashboardOperations;
    type Flows: FlowOperations;

    fn stacks(&self) -> &Self::Stacks;
    fn buckets(&self) -> &Self::Buckets;
    fn workgroups(&self) -> &Self::Workgroups;
    fn clusters(&self) -> &Self::Clusters;
    fn log_groups(&self) -> &Self::LogGroups;
    fn dashboards(&self) -> &Self::Dashboards;
    fn flows(&self) -> &Self::Flows;
}

/// The production client set, built from one [`super::AwsContext`]
pub struct AwsClients {
    pub cloudformation: CloudFormationClient,
    pub s3: S3Client,
    pub athena: AthenaClient,
    pub rds: RdsClient,
    pub logs: LogsClient,
    pub quicksight: QuickSightClient,
    pub appflow: AppFlowClient,
}

impl AwsClients {
    /// Build every client from one context. QuickSight needs the caller's
    /// account id, which the caller resolves through STS beforehand.
    pub fn new(ctx: &AwsContext, account_id: AccountId) -> Self {
        Self {
            cloudformation: CloudFormationClient::from_context(ctx),
            s3: S3Client::from_context(ctx),
            athena: AthenaClient::from_context(ctx),
            rds: RdsClient::from_context(ctx),
            logs: LogsClient::from_context(ctx),
            quicksight: QuickSightClient::from_context(ctx, account_id),
            appflow: AppFlowClient::from_context(ctx),
        }
    }
}

impl CloudApi for AwsClients {
    type Stacks = CloudFormationClient;
    type Buckets = S3Client;
    type Workgroups = AthenaClient;
    type Clusters = RdsClient;
    type LogGroups = LogsClient;
    type Dashboards = QuickSightClient;
    type Flows = AppFlowClient;

    fn stacks(&self) -> &CloudFormationClient {
        &self.cloudformation
    }
    fn buckets(&self) -> &S3Client {
        &self.s3
    }
    fn workgroups(&self) -> &AthenaClient {
        &self.athena
    }
    fn clusters(&self) -> &RdsClient {
        &self.rds
    }
    fn log_groups(&self) -> &LogsClient {
        &self.logs
    }
    fn dashboards(&self) -> &QuickSightClient {
        &self.quicksight
    }
    fn flows(&self) -> &AppFlowClient {
        &self.appflow
    }
}

impl StackOperations for CloudFormationClient {
    async fn list_stacks(&self) -> Result<Vec<StackDescriptor>> {
        CloudFormationClient::list_stacks(self).await
    }

    async fn list_stack_resources(&self, stack_name: &str) -> Result<Vec<StackMemberResource>> {
        CloudFormationClient::list_stack_resources(self, stack_name).await
    }

    async fn describe_stack(&self, stack_id: &str) -> Result<Option<StackDescriptor>> {
        CloudFormationClient::describe_stack(self, stack_id).await
    }

    async fn disable_termination_protection(&self, stack_name: &str) -> Result<()> {
        CloudFormationClient::disable_termination_protection(self, stack_name).await
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        CloudFormationClient::delete_stack(self, stack_name).await
    }
}

impl BucketOperations for S3Client {
    async fn list_object_versions(
        &self,
        bucket: &str,
        cursor: &VersionCursor,
    ) -> Result<ObjectVersionPage> {
        S3Client::list_object_versions(self, bucket, cursor).await
    }

    async fn delete_object_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<()> {
        S3Client::delete_object_version(self, bucket, key, version_id).await
    }
}

impl WorkgroupOperations for AthenaClient {
    async fn list_workgroups(&self) -> Result<Vec<String>> {
        AthenaClient::list_workgroups(self).await
    }

    async fn delete_workgroup(&self, name: &str) -> Result<()> {
        AthenaClient::delete_workgroup(self, name).await
    }
}

impl ClusterOperations for RdsClient {
    async fn disable_deletion_protection(&self, cluster_id: &str) -> Result<()> {
        RdsClient::disable_deletion_protection(self, cluster_id).await
    }
}

impl LogGroupOperations for LogsClient {
    async fn list_log_groups(&self, prefix: &str) -> Result<Vec<String>> {
        LogsClient::list_log_groups(self, prefix).await
    }

    async fn delete_log_group(&self, name: &str) -> Result<()> {
        LogsClient::delete_log_group(self, name).await
    }
}

impl DashboardOperations for QuickSightClient {
    async fn delete_dashboard(&self, dashboard_id: &str) -> Result<()> {
        QuickSightClient::delete_dashboard(self, dashboard_id).await
    }
}

impl FlowOperations for AppFlowClient {
    async fn list_flows(&self) -> Result<Vec<String>> {
        AppFlowClient::list_flows(self).await
    }

    async fn delete_flow(&self, name: &str) -> Result<()> {
        AppFlowClient::delete_flow(self, name).await
    }
}
