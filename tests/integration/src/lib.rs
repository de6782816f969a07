//! Integration test utilities for the chatwire client
//!
//! This crate provides mock transports and frame builders for running
//! end-to-end tests against a full session without a real server.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
