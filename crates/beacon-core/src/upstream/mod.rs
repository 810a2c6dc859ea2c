//! Upstream lookup provider management and health-aware routing.
//!
//! This module handles communication with the interchangeable lookup
//! providers, including:
//! - Per-provider health tracking (rolling error counts, mean response time)
//! - Admission control against each provider's per-minute request cap
//! - Health-ranked provider selection with deterministic tie-breaking
//! - Request dispatch through a pluggable transport
//!
//! # Selection Order
//!
//! For every dispatch the [`Broker`] considers only providers whose
//! admission window still has headroom, then ranks them:
//!
//! 1. **Error count** - fewest errors recorded over the last five minutes
//!    wins.
//! 2. **Mean response time** - among providers with equal error counts, the
//!    lower 5-minute mean wins. Providers with no recent traffic report
//!    [`EMPTY_WINDOW_AVG_MS`] and therefore rank behind any provider with
//!    real measurements.
//! 3. **Configuration order** - exact ties keep the order providers were
//!    configured in.
//!
//! The outcome of every attempted call is recorded on the provider that
//! served it, so the ranking converges on live behavior without a separate
//! probing mechanism.

pub mod broker;
pub mod errors;
pub mod provider;
pub mod stats;
pub mod transport;

pub use broker::Broker;
pub use errors::{BrokerError, TransportError};
pub use provider::Provider;
pub use stats::{
    ProviderStats, StatsSnapshot, ADMISSION_WINDOW, EMPTY_WINDOW_AVG_MS, OUTCOME_RETENTION,
};
pub use transport::{HttpTransport, HttpTransportConfig, Transport};
