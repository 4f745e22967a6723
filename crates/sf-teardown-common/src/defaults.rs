//! Default teardown tuning values
//!
//! The grace delays compensate for eventual consistency in the control
//! plane (in-flight writes to buckets, trailing log delivery). They are
//! configurable but these values are the ones observed to work.

/// Region live tests fall back to when none is configured
pub const DEFAULT_REGION: &str = "us-east-1";

/// Concurrent object deletions per purge batch
pub const DEFAULT_PURGE_BATCH_SIZE: usize = 20;

/// Extra attempts for an object delete that hit a name-resolution failure
pub const DEFAULT_PURGE_MAX_RETRIES: usize = 3;

/// Pause between object delete attempts, in seconds
pub const DEFAULT_PURGE_RETRY_DELAY_SECS: u64 = 5;

/// Pause before emptying a stack's buckets, in seconds
pub const DEFAULT_BUCKET_SETTLE_SECS: u64 = 5;

/// Pause before emptying the logging bucket, in seconds
pub const DEFAULT_LOG_DELIVERY_SECS: u64 = 15;

/// Pause before and after dropping a stack's workgroups, in seconds
pub const DEFAULT_WORKGROUP_SETTLE_SECS: u64 = 5;

/// Interval between stack status polls, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Log group prefixes covered by the residual sweep
pub const DEFAULT_LOG_GROUP_PREFIXES: &[&str] = &["/aws/", "sf-"];

// Serde default functions for struct field defaults

pub fn default_purge_batch_size() -> usize {
    DEFAULT_PURGE_BATCH_SIZE
}

pub fn default_purge_max_retries() -> usize {
    DEFAULT_PURGE_MAX_RETRIES
}

pub fn default_purge_retry_delay_secs() -> u64 {
    DEFAULT_PURGE_RETRY_DELAY_SECS
}

pub fn default_bucket_settle_secs() -> u64 {
    DEFAULT_BUCKET_SETTLE_SECS
}

pub fn default_log_delivery_secs() -> u64 {
    DEFAULT_LOG_DELIVERY_SECS
}

pub fn default_workgroup_settle_secs() -> u64 {
    DEFAULT_WORKGROUP_SETTLE_SECS
}

pub fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

pub fn default_log_group_prefixes() -> Vec<String> {
    DEFAULT_LOG_GROUP_PREFIXES
        .iter()
        .map(|p| (*p).to_string())
        .collect()
}
