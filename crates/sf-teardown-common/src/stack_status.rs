//! CloudFormation stack status classification
//!
//! The control plane owns stack status. Teardown only needs to know whether
//! an observed status means "keep waiting", "gone" or "the delete did not
//! happen".

/// Status of a stack that has been fully deleted
pub const DELETE_COMPLETE: &str = "DELETE_COMPLETE";

/// Terminal statuses that mean the delete request failed or was rolled back
const FAILED_TERMINAL: &[&str] = &[
    "DELETE_FAILED",
    "UPDATE_COMPLETE",
    "UPDATE_FAILED",
    "UPDATE_ROLLBACK_COMPLETE",
    "UPDATE_ROLLBACK_FAILED",
    "ROLLBACK_COMPLETE",
    "ROLLBACK_FAILED",
];

/// Outcome class of an observed stack status while waiting for deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackStatusClass {
    /// Not terminal yet, keep polling
    InProgress,
    /// Stack is gone
    Deleted,
    /// Terminal, but not deleted
    Failed,
}

impl StackStatusClass {
    /// Classify a raw status string
    pub fn of(status: &str) -> Self {
        if status == DELETE_COMPLETE {
            StackStatusClass::Deleted
        } else if FAILED_TERMINAL.contains(&status) {
            StackStatusClass::Failed
        } else {
            StackStatusClass::InProgress
        }
    }
}
