//! Shared test utilities for sf-teardown
//!
//! Helpers for the live integration tests, kept in their own crate so the
//! main crate can depend on them from dev-dependencies only.
//!
//! ## Modules
//!
//! - [`aws`]: AWS region detection and unique installation ids

pub mod aws;

pub use aws::{get_test_region, test_installation_id};
