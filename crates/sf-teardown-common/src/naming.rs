//! Resource naming conventions for an installation
//!
//! The provisioning wizard names every stack, dashboard and log group from a
//! fixed template. Teardown relies on the same templates to find resources
//! that are not reachable through stack membership.
//!
//! | Resource | Template |
//! |----------|----------|
//! | Flow stack | `sf-flow-<id>` |
//! | Query stack | `sf-query-<id>` |
//! | Data-store stack | `sf-datastore-<id>` |
//! | Network stack | `sf-network-<id>` |
//! | Storage stack | `sf-storage-<id>` |
//! | Dashboard | `sf-dashboard-<id>` |
//! | Function log group | `/aws/lambda/<function>` |
//! | Cluster log group | `/aws/rds/cluster/<cluster>/postgresql` |

use crate::installation::InstallationId;
use std::fmt;

/// Prefix shared by every stack and dashboard the wizard creates
pub const NAME_PREFIX: &str = "sf";

/// Marker identifying a container that receives access/audit logs
pub const LOGGING_BUCKET_MARKER: &str = "logging";

/// The stacks that make up one installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StackRole {
    /// AppFlow flows and their connector profiles
    Flow,
    /// Athena workgroups and Glue catalog
    Query,
    /// Aurora cluster and its functions
    DataStore,
    /// VPC, subnets and flow logs
    Network,
    /// Landing and logging buckets
    Storage,
}

impl StackRole {
    /// Teardown order, most-dependent stack first.
    ///
    /// Flows read from the query layer, the query layer and the data store
    /// live inside the network, and everything writes to storage.
    pub const TEARDOWN_ORDER: [StackRole; 5] = [
        StackRole::Flow,
        StackRole::Query,
        StackRole::DataStore,
        StackRole::Network,
        StackRole::Storage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StackRole::Flow => "flow",
            StackRole::Query => "query",
            StackRole::DataStore => "datastore",
            StackRole::Network => "network",
            StackRole::Storage => "storage",
        }
    }

    /// Stack name for this role within an installation
    pub fn stack_name(self, id: &InstallationId) -> String {
        format!("{NAME_PREFIX}-{}-{id}", self.as_str())
    }
}

impl fmt::Display for StackRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log group written by a Lambda function
pub fn function_log_group(function_name: &str) -> String {
    format!("/aws/lambda/{function_name}")
}

/// Log group written by an Aurora PostgreSQL cluster
pub fn cluster_log_group(cluster_id: &str) -> String {
    format!("/aws/rds/cluster/{cluster_id}/postgresql")
}

/// QuickSight dashboard id for an installation
pub fn dashboard_id(id: &InstallationId) -> String {
    format!("{NAME_PREFIX}-dashboard-{id}")
}

/// True if the bucket receives log writes from other resources and must be
/// emptied after everything else in its stack.
pub fn is_logging_bucket(bucket: &str) -> bool {
    bucket.contains(LOGGING_BUCKET_MARKER)
}
