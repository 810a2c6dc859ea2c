//! HTTP Lookup Mock Builder
//!
//! Wraps mockito to provide lookup-specific response builders for provider
//! endpoints of the `/json/{key}` shape.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::Value;

/// Builder for creating mock lookup provider responses.
///
/// Uses mockito internally but provides lookup-specific helpers.
pub struct LookupMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl LookupMockBuilder {
    /// Creates a new lookup mock builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    /// Returns the URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Returns a provider URL template pointing at this server.
    ///
    /// The template uses the standard `/json/{key}` path shape, so lookups
    /// mocked with [`mock_lookup_success`](Self::mock_lookup_success) are
    /// reachable through a provider configured with this template.
    #[must_use]
    pub fn url_template(&self) -> String {
        format!("{}/json/{{key}}", self.server.url())
    }

    /// Mocks a successful lookup for `key`.
    pub fn mock_lookup_success(&mut self, key: &str, response: &Value) -> &mut Self {
        let mock = self
            .server
            .mock("GET", format!("/json/{key}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response.to_string())
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a failing lookup for `key` with the given HTTP status.
    pub fn mock_lookup_failure(&mut self, key: &str, status: usize, body: &str) -> &mut Self {
        let mock = self
            .server
            .mock("GET", format!("/json/{key}").as_str())
            .with_status(status)
            .with_body(body)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a successful response for every lookup regardless of key.
    pub fn mock_any_lookup_success(&mut self, response: &Value) -> &mut Self {
        let mock = self
            .server
            .mock("GET", Matcher::Regex("^/json/.+$".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response.to_string())
            .create();

        self.mocks.push(mock);
        self
    }

    /// Mocks a failure status for every lookup regardless of key.
    pub fn mock_any_lookup_failure(&mut self, status: usize, body: &str) -> &mut Self {
        let mock = self
            .server
            .mock("GET", Matcher::Regex("^/json/.+$".to_string()))
            .with_status(status)
            .with_body(body)
            .create();

        self.mocks.push(mock);
        self
    }

    /// Returns a reference to the underlying mockito server for advanced mocking.
    pub fn get_server(&mut self) -> &mut ServerGuard {
        &mut self.server
    }

    /// Verifies all mocks were called.
    #[must_use]
    pub fn verify_all_called(&self) -> bool {
        self.mocks.iter().all(Mock::matched)
    }

    /// Gets the number of mocks that were called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.mocks.iter().filter(|m| m.matched()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::upstream::{HttpTransport, Transport};
    use serde_json::json;

    #[tokio::test]
    async fn test_lookup_mock_builder_creation() {
        let mock = LookupMockBuilder::new().await;
        assert!(!mock.url().is_empty());
    }

    #[tokio::test]
    async fn test_url_template_contains_placeholder() {
        let mock = LookupMockBuilder::new().await;
        let template = mock.url_template();
        assert!(template.starts_with("http"));
        assert!(template.ends_with("/json/{key}"));
    }

    #[tokio::test]
    async fn test_mock_lookup_success_serves_body() {
        let mut mock = LookupMockBuilder::new().await;
        mock.mock_lookup_success("8.8.8.8", &json!({"status": "success"}));

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/json/8.8.8.8", mock.url());
        let body = transport.fetch(&url).await.unwrap();

        assert_eq!(body, r#"{"status":"success"}"#);
        assert!(mock.verify_all_called());
    }
}
