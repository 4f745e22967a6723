//! sf-teardown - installation teardown for the analytics environment
//!
//! This crate deletes every AWS resource belonging to one installation:
//! its CloudFormation stacks, in dependency order, and the residue they
//! leave behind.

pub mod aws;
pub mod config;
pub mod teardown;
pub mod wait;
