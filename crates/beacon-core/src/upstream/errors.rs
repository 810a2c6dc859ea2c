//! Error types for dispatch and transport failures.

use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by [`Broker::dispatch`](crate::upstream::Broker::dispatch).
///
/// A dispatch fails in exactly one of two ways: selection found no provider
/// with admission headroom (nothing was attempted, nothing was recorded), or
/// the chosen provider's call failed (the failure was recorded against that
/// provider before being surfaced). The broker never retries; callers own any
/// retry policy.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BrokerError {
    /// Every configured provider is currently at its per-minute rate limit.
    /// No outbound call was attempted and no outcome was recorded.
    #[error("No provider available: all providers are at their rate limit")]
    NoProviderAvailable,

    /// The selected provider's call completed with a failure indication or
    /// the transport itself failed. An error outcome was recorded against the
    /// provider before this was surfaced.
    #[error("Provider '{provider}' failed: {source}")]
    ProviderError {
        /// Name of the provider the request was dispatched to.
        provider: Arc<str>,
        /// Transport-level cause of the failure.
        #[source]
        source: TransportError,
    },
}

/// Transport-level failures reported by a [`Transport`](crate::upstream::Transport)
/// implementation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// Request exceeded the transport's configured timeout.
    #[error("Request timeout")]
    Timeout,

    /// Failed to establish a connection to the target.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP-level error occurred (non-2xx status code).
    ///
    /// First field is the HTTP status code, second is a truncated body
    /// snippet.
    #[error("HTTP error: {0}")]
    HttpError(u16, String),

    /// Network-level error from the underlying HTTP client.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
