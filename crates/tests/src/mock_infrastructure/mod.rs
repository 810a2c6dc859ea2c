//! Mock Infrastructure for Testing the Beacon Lookup Dispatcher
//!
//! This module provides reusable mock types for testing provider interactions
//! without requiring real network connections.
//!
//! ## Components
//!
//! - `ScriptedTransport`: In-process transport that replays planned results
//! - `LookupMockBuilder`: Wraps mockito to provide lookup-specific HTTP mocking
//!
//! ## Usage
//!
//! ```ignore
//! use tests::mock_infrastructure::{LookupMockBuilder, ScriptedTransport};
//!
//! let transport = ScriptedTransport::new();
//! transport.plan_success(r#"{"status":"success"}"#);
//!
//! // Or, for tests that need a real HTTP hop:
//! let mut mock = LookupMockBuilder::new().await;
//! mock.mock_lookup_success("8.8.8.8", &body);
//! // Point a provider's url_template at mock.url_template()
//! ```

pub mod lookup_mock;

pub use lookup_mock::LookupMockBuilder;
pub use transport_mock::ScriptedTransport;
