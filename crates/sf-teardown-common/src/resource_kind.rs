//! Stack member resource kinds
//!
//! Only a handful of member types need attention before a stack can be
//! deleted. Everything else is left to CloudFormation.

/// Stack member resource types that teardown acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// S3 bucket (must be emptied, CloudFormation refuses non-empty buckets)
    Bucket,
    /// Athena workgroup (query history blocks a non-recursive delete)
    Workgroup,
    /// Lambda function (its log group outlives the stack)
    Function,
    /// Aurora cluster (deletion protection blocks the stack delete)
    Cluster,
}

impl MemberKind {
    /// Map a CloudFormation resource type to a kind teardown acts on
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        match resource_type {
            "AWS::S3::Bucket" => Some(MemberKind::Bucket),
            "AWS::Athena::WorkGroup" => Some(MemberKind::Workgroup),
            "AWS::Lambda::Function" => Some(MemberKind::Function),
            "AWS::RDS::DBCluster" => Some(MemberKind::Cluster),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MemberKind::Bucket => "bucket",
            MemberKind::Workgroup => "workgroup",
            MemberKind::Function => "function",
            MemberKind::Cluster => "cluster",
        }
    }
}
