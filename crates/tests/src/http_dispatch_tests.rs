//! End-to-end dispatch through the real HTTP transport.
//!
//! These tests stand up local mockito servers and point providers at them,
//! covering the full path: selection, key substitution into the URL
//! template, the wire call, error mapping, and outcome recording.

use crate::mock_infrastructure::LookupMockBuilder;
use beacon_core::types::ProviderConfig;
use beacon_core::upstream::{Broker, BrokerError, HttpTransport, TransportError};
use serde_json::json;
use std::sync::Arc;

/// Provider pointed at a mock server's `/json/{key}` template.
fn provider_for(mock: &LookupMockBuilder, name: &str, max_requests_per_minute: u32) -> ProviderConfig {
    ProviderConfig {
        name: Arc::from(name),
        url_template: mock.url_template(),
        max_requests_per_minute,
    }
}

fn http_broker(providers: Vec<ProviderConfig>) -> Broker {
    let transport = HttpTransport::new().expect("transport should build");
    Broker::new(providers, Arc::new(transport))
}

#[tokio::test]
async fn test_lookup_round_trip() {
    let mut mock = LookupMockBuilder::new().await;
    let body = json!({"status": "success", "country": "Australia", "query": "1.1.1.1"});
    mock.mock_lookup_success("1.1.1.1", &body);

    let broker = http_broker(vec![provider_for(&mock, "primary", 60)]);
    let result = broker.dispatch("1.1.1.1").await.unwrap();

    assert_eq!(result, body.to_string());
    assert!(mock.verify_all_called());

    let stats = broker.provider("primary").unwrap().stats();
    assert_eq!(stats.error_count_5min(), 0);
    assert_eq!(stats.requests_in_current_minute(), 1);
    assert!(stats.avg_response_time_5min() < f64::MAX);
}

#[tokio::test]
async fn test_key_substitution_reaches_the_wire() {
    let mut mock = LookupMockBuilder::new().await;
    mock.mock_lookup_success("203.0.113.9", &json!({"query": "203.0.113.9"}));

    let broker = http_broker(vec![provider_for(&mock, "primary", 60)]);
    broker.dispatch("203.0.113.9").await.unwrap();

    // The mock only matches the exact substituted path, so a hit proves the
    // key replaced the placeholder end to end.
    assert!(mock.verify_all_called());
}

#[tokio::test]
async fn test_http_error_surfaces_status_and_records_error() {
    let mut mock = LookupMockBuilder::new().await;
    mock.mock_lookup_failure("9.9.9.9", 503, "upstream saturated");

    let broker = http_broker(vec![provider_for(&mock, "primary", 60)]);
    let err = broker.dispatch("9.9.9.9").await.unwrap_err();

    match err {
        BrokerError::ProviderError { provider, source } => {
            assert_eq!(provider.as_ref(), "primary");
            match source {
                TransportError::HttpError(503, snippet) => {
                    assert!(snippet.contains("upstream saturated"));
                }
                other => panic!("expected HttpError(503, _), got: {other:?}"),
            }
        }
        other => panic!("expected ProviderError, got: {other:?}"),
    }

    let stats = broker.provider("primary").unwrap().stats();
    assert_eq!(stats.error_count_5min(), 1);
    assert_eq!(stats.requests_in_current_minute(), 1);
}

#[tokio::test]
async fn test_failover_to_clean_provider_after_http_error() {
    let mut failing = LookupMockBuilder::new().await;
    failing.mock_any_lookup_failure(500, "Internal Server Error");

    let mut healthy = LookupMockBuilder::new().await;
    let body = json!({"status": "success"});
    healthy.mock_any_lookup_success(&body);

    let broker = http_broker(vec![
        provider_for(&failing, "flaky", 60),
        provider_for(&healthy, "steady", 60),
    ]);

    // First dispatch lands on flaky (configuration order) and fails.
    assert!(broker.dispatch("1.1.1.1").await.is_err());

    // The recorded error demotes flaky; steady serves the retry.
    let second = broker.dispatch("1.1.1.1").await.unwrap();
    assert_eq!(second, body.to_string());

    assert_eq!(broker.provider("flaky").unwrap().stats().error_count_5min(), 1);
    assert_eq!(broker.provider("steady").unwrap().stats().error_count_5min(), 0);
    assert!(failing.verify_all_called());
    assert!(healthy.verify_all_called());
}
