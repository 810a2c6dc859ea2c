//! Outbound transport seam and its production HTTP implementation.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::upstream::errors::TransportError;

/// Maximum length of the response-body snippet carried inside
/// [`TransportError::HttpError`].
const ERROR_SNIPPET_MAX_CHARS: usize = 256;

/// Abstraction over the outbound network call.
///
/// Given a fully resolved target URL, an implementation performs one request
/// and returns the response body on a success-indicating response, or a
/// [`TransportError`] for a failure-indicating response or a transport-level
/// fault. Implementations own their timeout policy; the broker measures
/// elapsed time around the call and never imposes a deadline of its own.
///
/// The trait exists so tests can substitute scripted implementations for the
/// real HTTP client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one request against `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the response indicates failure or
    /// the request could not be completed.
    async fn fetch(&self, target: &str) -> Result<String, TransportError>;
}

/// Configuration for the production HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// End-to-end timeout for one request, response body included.
    pub request_timeout: Duration,
    /// How long idle pooled connections are kept alive.
    pub pool_idle_timeout: Duration,
    /// Maximum idle pooled connections per host.
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 32,
        }
    }
}

/// Production [`Transport`] backed by a pooled reqwest client.
///
/// Performs a single GET per call. There is no retry at this layer: a failed
/// request is reported once so the broker can record exactly one error
/// outcome for it.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates an HTTP transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(&HttpTransportConfig::default())
    }

    /// Creates an HTTP transport with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(config: &HttpTransportConfig) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("beacon/", env!("CARGO_PKG_VERSION")))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http transport");
                TransportError::ConnectionFailed(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self { client })
    }

    /// Sanitizes network errors to prevent target details leaking into logs
    /// and error chains.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            "network error".to_string()
        }
    }

    /// Truncates a response body to a bounded snippet, respecting character
    /// boundaries.
    fn truncate_snippet(raw: String) -> String {
        if raw.chars().count() <= ERROR_SNIPPET_MAX_CHARS {
            return raw;
        }
        let truncated: String = raw.chars().take(ERROR_SNIPPET_MAX_CHARS).collect();
        format!("{truncated}... (truncated)")
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Performs one GET against `target`.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Timeout`] if the request exceeds the configured timeout
    /// - [`TransportError::ConnectionFailed`] for connection-level failures
    /// - [`TransportError::HttpError`] for non-success HTTP status codes
    /// - [`TransportError::Network`] if reading the response body fails
    async fn fetch(&self, target: &str) -> Result<String, TransportError> {
        let response = self.client.get(target).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::ConnectionFailed(Self::sanitize_network_error(&e))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(TransportError::Network);
        }

        let raw_text = response.text().await.unwrap_or_default();
        tracing::trace!(status = status.as_u16(), "http request failed");
        Err(TransportError::HttpError(status.as_u16(), Self::truncate_snippet(raw_text)))
    }
}
