//! Plain data returned by the listing operations

use sf_teardown_common::MemberKind;

/// A CloudFormation stack as seen by `ListStacks` / `DescribeStacks`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDescriptor {
    /// Stack ARN; stays describable after the stack is deleted
    pub id: String,
    pub name: String,
    pub status: String,
    pub status_reason: Option<String>,
}

/// A member resource of a stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackMemberResource {
    pub logical_id: String,
    /// Absent while the resource is still being created
    pub physical_id: Option<String>,
    pub resource_type: String,
}

impl StackMemberResource {
    /// The kind teardown acts on, if any
    pub fn kind(&self) -> Option<MemberKind> {
        MemberKind::from_resource_type(&self.resource_type)
    }
}

/// One object version or delete marker in a versioned bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectVersionRecord {
    pub key: String,
    pub version_id: String,
}

/// Position in a `ListObjectVersions` enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCursor {
    pub key_marker: Option<String>,
    pub version_id_marker: Option<String>,
}

impl VersionCursor {
    /// True when neither marker is set, i.e. the listing is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.key_marker.is_none() && self.version_id_marker.is_none()
    }
}

/// One page of object versions and delete markers
#[derive(Debug, Clone, Default)]
pub struct ObjectVersionPage {
    pub records: Vec<ObjectVersionRecord>,
    /// Markers for the next request; both `None` on the last page
    pub next: VersionCursor,
}
