//! Fixed-interval polling for control-plane state.
//!
//! Stack deletion has no upper bound on duration, so the poller never
//! times out on its own; it ends when the check reports a final value or
//! fails.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Poll `check` every `interval` until it yields a value.
///
/// # Arguments
/// * `interval` - Pause between checks
/// * `resource_name` - Name for logging
/// * `check` - Returns `Ok(Some(value))` when done, `Ok(None)` to keep polling
///
/// # Example
/// ```ignore
/// let status = poll_until(Duration::from_secs(10), "sf-flow-abc123", || async {
///     let stack = describe().await?;
///     Ok((stack.status != "DELETE_IN_PROGRESS").then_some(stack.status))
/// })
/// .await?;
/// ```
pub async fn poll_until<T, F, Fut>(interval: Duration, resource_name: &str, mut check: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        match check().await {
            Ok(Some(value)) => {
                debug!(resource = %resource_name, attempts, "Poll finished");
                return Ok(value);
            }
            Ok(None) => {
                debug!(
                    resource = %resource_name,
                    attempt = attempts,
                    delay_ms = interval.as_millis(),
                    "Not settled, polling again"
                );
                tokio::time::sleep(interval).await;
            }
            Err(e) => {
                warn!(resource = %resource_name, error = ?e, "Poll check failed");
                return Err(e);
            }
        }
    }
}
