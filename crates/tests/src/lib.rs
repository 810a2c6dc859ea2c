//! Integration Tests for the Beacon Lookup Dispatcher
//!
//! This crate contains various test modules:
//!
//! - `broker_tests`: Selection and outcome recording driven through the public broker API
//! - `rate_limit_tests`: Admission-window behavior, rejection, and recovery
//! - `http_dispatch_tests`: Dispatch through the real HTTP transport against a local mock server
//! - `concurrency_tests`: Shared-broker dispatch under concurrent load
//! - `mock_infrastructure`: Reusable mock types for testing (scripted transport, HTTP lookups)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --package tests
//! ```
//!
//! All tests run against in-process infrastructure: scripted transports for
//! deterministic selection scenarios, and mockito HTTP servers where the real
//! transport needs a wire to talk over. Tests that exercise window expiry use
//! providers built with compressed tracker windows so they complete in
//! milliseconds rather than minutes.

#[cfg(test)]
mod broker_tests;


#[cfg(test)]
mod http_dispatch_tests;


/// Mock infrastructure for testing
pub mod mock_infrastructure;
