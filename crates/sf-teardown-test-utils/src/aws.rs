//! AWS test utilities
//!
//! Provides region detection and unique installation ids for AWS
//! integration tests.

use chrono::Utc;
use sf_teardown_common::InstallationId;
use sf_teardown_common::defaults::DEFAULT_REGION;

/// Get the AWS region for tests.
///
/// Checks environment variables in order:
/// 1. AWS_REGION
/// 2. AWS_DEFAULT_REGION
/// 3. Falls back to us-east-1
pub fn get_test_region() -> String {
    std::env::var("AWS_REGION")
        .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
        .unwrap_or_else(|_| DEFAULT_REGION.to_string())
}

/// Generate a unique installation id for test resources.
///
/// Format: `t{timestamp_ms}x{counter}`. No delimiters inside the token, so
/// it never partially matches another test's id.
///
/// # Example
///
/// ```
/// use sf_teardown_test_utils::aws::test_installation_id;
///
/// let id = test_installation_id();
/// assert!(id.as_str().starts_with('t'));
/// ```
pub fn test_installation_id() -> InstallationId {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let ts = Utc::now().timestamp_millis();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    InstallationId::new(format!("t{ts}x{counter}")).expect("generated id has no whitespace")
}
