//! sf-teardown-common - Shared types and naming conventions
//!
//! This crate holds the pieces of teardown that need no AWS SDK: the
//! installation id and how resource names are matched against it, the
//! naming templates the provisioning wizard uses, and stack status
//! classification.
//!
//! ## Modules
//!
//! - [`defaults`]: Default tuning values
//! - [`installation`]: Installation id and delimited token matching
//! - [`naming`]: Stack, dashboard and log group name templates
//! - [`resource_kind`]: Stack member kinds teardown acts on
//! - [`stack_status`]: Terminal status classification

pub mod defaults;
pub mod installation;
pub mod naming;
pub mod resource_kind;
pub mod stack_status;

// Re-export commonly used types
pub use installation::{InstallationId, InvalidInstallationId};
pub use naming::StackRole;
pub use resource_kind::MemberKind;
pub use stack_status::StackStatusClass;
