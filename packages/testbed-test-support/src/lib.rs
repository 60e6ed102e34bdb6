//! Test support utilities for the testbed workspace
//!
//! This crate provides the pieces the provisioning suites share: scoped
//! environment-variable manipulation and tracing initialization.

pub mod env;
pub mod test_logging;
