//! Configuration types for a teardown run

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sf_teardown_common::InstallationId;
use sf_teardown_common::defaults::{
    default_bucket_settle_secs, default_log_delivery_secs, default_log_group_prefixes,
    default_poll_interval_secs, default_purge_batch_size, default_purge_max_retries,
    default_purge_retry_delay_secs, default_workgroup_settle_secs,
};
use std::path::Path;
use std::time::Duration;

/// AWS connection settings
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// AWS region
    pub region: String,
    /// AWS profile name (overrides default credential resolution)
    pub aws_profile: Option<String>,
}

/// Grace delays and poll cadence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause before emptying a stack's buckets
    pub bucket_settle_secs: u64,
    /// Pause before emptying the logging bucket
    pub log_delivery_secs: u64,
    /// Pause before and after dropping workgroups
    pub workgroup_settle_secs: u64,
    /// Interval between stack status polls
    pub poll_interval_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            bucket_settle_secs: default_bucket_settle_secs(),
            log_delivery_secs: default_log_delivery_secs(),
            workgroup_settle_secs: default_workgroup_settle_secs(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl TimingConfig {
    pub fn bucket_settle(&self) -> Duration {
        Duration::from_secs(self.bucket_settle_secs)
    }
    pub fn log_delivery(&self) -> Duration {
        Duration::from_secs(self.log_delivery_secs)
    }
    pub fn workgroup_settle(&self) -> Duration {
        Duration::from_secs(self.workgroup_settle_secs)
    }
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// What a purge batch does after one of its deletions fails permanently
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchPolicy {
    /// Abort the batch and the purge on the first permanent failure
    #[default]
    FailFast,
    /// Attempt every record, then fail listing the keys left behind
    Complete,
}

/// Bucket purge tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeConfig {
    #[serde(default = "default_purge_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_purge_max_retries")]
    pub max_retries: usize,
    #[serde(default = "default_purge_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default)]
    pub policy: BatchPolicy,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            batch_size: default_purge_batch_size(),
            max_retries: default_purge_max_retries(),
            retry_delay_secs: default_purge_retry_delay_secs(),
            policy: BatchPolicy::default(),
        }
    }
}

impl PurgeConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Residual sweep settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Log group name prefixes listed during the sweep
    #[serde(default = "default_log_group_prefixes")]
    pub log_group_prefixes: Vec<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            log_group_prefixes: default_log_group_prefixes(),
        }
    }
}

/// Tuning read from the optional `--config` JSON file.
///
/// Every field is optional; anything left out keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub timing: TimingConfig,
    pub purge: PurgeConfig,
    pub sweep: SweepConfig,
}

impl Tuning {
    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let tuning: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.purge.batch_size > 0, "purge.batch_size must be at least 1");
        anyhow::ensure!(
            self.timing.poll_interval_secs > 0,
            "timing.poll_interval_secs must be at least 1"
        );
        Ok(())
    }
}

/// Configuration for a teardown run
///
/// Composed of focused sub-configs; the engine only ever sees the tuning.
#[derive(Debug, Clone)]
pub struct TeardownConfig {
    pub installation_id: InstallationId,
    pub aws: AwsConfig,
    pub tuning: Tuning,
}

impl TeardownConfig {
    pub fn region(&self) -> &str {
        &self.aws.region
    }
    pub fn aws_profile(&self) -> Option<&str> {
        self.aws.aws_profile.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let tuning = Tuning::default();
        assert_eq!(tuning.purge.batch_size, 20);
        assert_eq!(tuning.purge.max_retries, 3);
        assert_eq!(tuning.purge.retry_delay(), Duration::from_secs(5));
        assert_eq!(tuning.purge.policy, BatchPolicy::FailFast);
        assert_eq!(tuning.timing.bucket_settle(), Duration::from_secs(5));
        assert_eq!(tuning.timing.log_delivery(), Duration::from_secs(15));
        assert_eq!(tuning.timing.workgroup_settle(), Duration::from_secs(5));
        assert_eq!(tuning.timing.poll_interval(), Duration::from_secs(10));
        assert_eq!(tuning.sweep.log_group_prefixes, vec!["/aws/", "sf-"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(r#"{"purge": {"policy": "complete"}, "timing": {"poll_interval_secs": 30}}"#);
        let tuning = Tuning::load(file.path()).unwrap();

        assert_eq!(tuning.purge.policy, BatchPolicy::Complete);
        assert_eq!(tuning.purge.batch_size, 20);
        assert_eq!(tuning.timing.poll_interval_secs, 30);
        assert_eq!(tuning.timing.log_delivery_secs, 15);
        assert_eq!(tuning.sweep, SweepConfig::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        let file = write_config("{}");
        assert_eq!(Tuning::load(file.path()).unwrap(), Tuning::default());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let file = write_config(r#"{"timeouts": {}}"#);
        assert!(Tuning::load(file.path()).is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let file = write_config(r#"{"purge": {"batch_size": 0}}"#);
        let err = Tuning::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = Tuning::load(Path::new("/nonexistent/sf-teardown.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sf-teardown.json"));
    }
}
