//! Bucket purge
//!
//! Empties a versioned bucket by deleting every object version and delete
//! marker. The whole listing is collected before the first delete so that
//! deletions cannot shift the pagination markers underneath the listing.

use super::TeardownError;
use crate::aws::{
    BucketOperations, ObjectVersionRecord, VersionCursor, classify_anyhow_error, ignore_not_found,
};
use crate::config::{BatchPolicy, PurgeConfig};
use anyhow::Result;
use backon::{ConstantBuilder, Retryable};
use futures::future::{join_all, try_join_all};
use tracing::{debug, info, warn};

/// Result of emptying one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub bucket: String,
    /// Versions and delete markers removed
    pub deleted: usize,
    /// The bucket did not exist
    pub missing: bool,
}

/// Delete every object version and delete marker in `bucket`.
///
/// Deletions run in batches of `config.batch_size`: records within a batch
/// are deleted concurrently, batches run one after another. A delete that
/// fails name resolution is retried `config.max_retries` more times; any
/// other failure is handled according to `config.policy`. A missing bucket
/// is not an error.
pub async fn purge_bucket<B: BucketOperations>(
    buckets: &B,
    bucket: &str,
    config: &PurgeConfig,
) -> Result<PurgeOutcome> {
    let Some(records) = collect_versions(buckets, bucket).await? else {
        info!(bucket = %bucket, "Bucket does not exist, nothing to purge");
        return Ok(PurgeOutcome {
            bucket: bucket.to_string(),
            deleted: 0,
            missing: true,
        });
    };

    let batch_size = config.batch_size.max(1);
    let mut failed_keys = Vec::new();

    for (index, batch) in records.chunks(batch_size).enumerate() {
        debug!(bucket = %bucket, batch = index, size = batch.len(), "Deleting batch");
        let deletes = batch
            .iter()
            .map(|record| delete_version(buckets, bucket, record, config));

        match config.policy {
            BatchPolicy::FailFast => {
                try_join_all(deletes).await?;
            }
            BatchPolicy::Complete => {
                let results = join_all(deletes).await;
                for (record, result) in batch.iter().zip(results) {
                    if let Err(e) = result {
                        warn!(
                            bucket = %bucket,
                            key = %record.key,
                            version_id = %record.version_id,
                            error = %e,
                            "Object version not deleted"
                        );
                        failed_keys.push(record.key.clone());
                    }
                }
            }
        }
    }

    if !failed_keys.is_empty() {
        return Err(TeardownError::PurgeIncomplete {
            bucket: bucket.to_string(),
            failed_keys,
        }
        .into());
    }

    info!(bucket = %bucket, deleted = records.len(), "Bucket purged");
    Ok(PurgeOutcome {
        bucket: bucket.to_string(),
        deleted: records.len(),
        missing: false,
    })
}

/// Walk the version listing to the end. `None` if the bucket is gone.
async fn collect_versions<B: BucketOperations>(
    buckets: &B,
    bucket: &str,
) -> Result<Option<Vec<ObjectVersionRecord>>> {
    let mut records = Vec::new();
    let mut cursor = VersionCursor::default();
    let mut pages = 0usize;

    loop {
        let Some(page) = ignore_not_found(buckets.list_object_versions(bucket, &cursor).await)?
        else {
            return Ok(None);
        };
        pages += 1;
        records.extend(page.records);

        if page.next.is_exhausted() {
            break;
        }
        cursor = page.next;
    }

    debug!(bucket = %bucket, pages, versions = records.len(), "Collected object versions");
    Ok(Some(records))
}

async fn delete_version<B: BucketOperations>(
    buckets: &B,
    bucket: &str,
    record: &ObjectVersionRecord,
    config: &PurgeConfig,
) -> Result<()> {
    let result = (|| async {
        buckets
            .delete_object_version(bucket, &record.key, &record.version_id)
            .await
    })
    .retry(
        ConstantBuilder::default()
            .with_delay(config.retry_delay())
            .with_max_times(config.max_retries),
    )
    .when(|e| classify_anyhow_error(e).is_name_resolution())
    .notify(|e, dur| {
        warn!(
            bucket = %bucket,
            key = %record.key,
            delay = ?dur,
            error = %e,
            "Object delete could not reach S3, retrying..."
        );
    })
    .await;

    // Already gone counts as deleted
    ignore_not_found(result)?;
    Ok(())
}
