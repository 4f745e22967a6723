//! S3 object version listing and deletion

use super::context::{AwsContext, FromAwsContext};
use super::types::{ObjectVersionPage, ObjectVersionRecord, VersionCursor};
use anyhow::{Context, Result};
use aws_sdk_s3::Client;
use tracing::debug;

/// S3 client for emptying installation buckets
pub struct S3Client {
    client: Client,
}

impl FromAwsContext for S3Client {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.s3_client(),
        }
    }
}

impl S3Client {
    /// Fetch one page of object versions and delete markers
    pub async fn list_object_versions(
        &self,
        bucket: &str,
        cursor: &VersionCursor,
    ) -> Result<ObjectVersionPage> {
        let response = self
            .client
            .list_object_versions()
            .bucket(bucket)
            .set_key_marker(cursor.key_marker.clone())
            .set_version_id_marker(cursor.version_id_marker.clone())
            .send()
            .await
            .with_context(|| format!("Failed to list object versions in {bucket}"))?;

        let versions = response
            .versions()
            .iter()
            .filter_map(|v| record(v.key(), v.version_id()));
        let markers = response
            .delete_markers()
            .iter()
            .filter_map(|m| record(m.key(), m.version_id()));
        let records: Vec<_> = versions.chain(markers).collect();

        debug!(bucket = %bucket, count = records.len(), "Listed object versions page");

        Ok(ObjectVersionPage {
            records,
            next: VersionCursor {
                key_marker: response.next_key_marker().map(str::to_string),
                version_id_marker: response.next_version_id_marker().map(str::to_string),
            },
        })
    }

    /// Permanently delete one object version
    pub async fn delete_object_version(&self, bucket: &str, key: &str, version_id: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .version_id(version_id)
            .send()
            .await
            .with_context(|| format!("Failed to delete s3://{bucket}/{key} ({version_id})"))?;

        Ok(())
    }
}

/// Unversioned objects report the literal version id `null`
fn record(key: Option<&str>, version_id: Option<&str>) -> Option<ObjectVersionRecord> {
    Some(ObjectVersionRecord {
        key: key?.to_string(),
        version_id: version_id.unwrap_or("null").to_string(),
    })
}
