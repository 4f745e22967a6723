//! AWS client modules for teardown
//!
//! Thin wrappers around the SDK clients, one per service:
//! - CloudFormation: stack discovery, protection and deletion
//! - S3: object version purge
//! - Athena: workgroup deletion
//! - RDS: cluster deletion protection
//! - CloudWatch Logs: log group sweep
//! - QuickSight: dashboard deletion
//! - AppFlow: flow sweep
//! - STS: account ID lookup

pub mod account;
pub mod appflow;
pub mod athena;
pub mod cloudformation;
pub mod context;
pub mod error;
mod fields;
pub mod logs;
pub mod operations;
pub mod quicksight;
pub mod rds;
pub mod s3;
pub mod types;

// Core clients
pub use account::{AccountId, get_current_account_id};
pub use appflow::AppFlowClient;
pub use athena::AthenaClient;
pub use cloudformation::CloudFormationClient;
pub use context::{AwsContext, FromAwsContext};
pub use logs::LogsClient;
pub use quicksight::QuickSightClient;
pub use rds::RdsClient;
pub use s3::S3Client;

// Error handling
pub use error::{AwsError, classify_anyhow_error, classify_aws_error, ignore_not_found};

// Seams for the teardown engine
pub use operations::{
    AwsClients, BucketOperations, CloudApi, ClusterOperations, DashboardOperations,
    FlowOperations, LogGroupOperations, StackOperations, WorkgroupOperations,
};
pub use types::{
    ObjectVersionPage, ObjectVersionRecord, StackDescriptor, StackMemberResource, VersionCursor,
};
