//! Integration tests for health-ranked provider selection.
//!
//! These tests drive the broker through its public API with a scripted
//! transport and verify:
//! - Recorded failures shift traffic to the healthier provider
//! - Mean response time orders providers with equal error counts
//! - Providers without recent traffic rank behind traffic-bearing peers
//! - Response bodies pass through untouched
//! - An exhausted pool is reported without any call being made

use crate::mock_infrastructure::ScriptedTransport;
use beacon_core::types::ProviderConfig;
use beacon_core::upstream::{Broker, BrokerError, TransportError, EMPTY_WINDOW_AVG_MS};
use std::sync::Arc;
use std::time::Duration;

/// Helper to build a provider aimed at a per-name fake host.
fn provider(name: &str, max_requests_per_minute: u32) -> ProviderConfig {
    ProviderConfig {
        name: Arc::from(name),
        url_template: format!("http://{name}.test/json/{{key}}"),
        max_requests_per_minute,
    }
}

#[tokio::test]
async fn test_selection_shifts_to_healthy_provider_after_failure() {
    let transport = ScriptedTransport::new();
    transport.plan_failure(TransportError::Timeout);
    transport.plan_success(r#"{"ok":true}"#);

    let broker = Broker::new(vec![provider("alpha", 60), provider("beta", 60)], transport.clone());

    // Fresh pool: configuration order sends the first dispatch to alpha.
    let first = broker.dispatch("1.1.1.1").await;
    assert!(matches!(first, Err(BrokerError::ProviderError { .. })));

    // alpha now carries an error, so beta takes the next dispatch.
    let second = broker.dispatch("1.1.1.1").await.unwrap();
    assert_eq!(second, r#"{"ok":true}"#);

    assert_eq!(
        transport.calls(),
        vec!["http://alpha.test/json/1.1.1.1", "http://beta.test/json/1.1.1.1"]
    );
}

#[tokio::test]
#[allow(clippy::float_cmp)]
async fn test_idle_provider_ranks_behind_traffic_bearing_peer() {
    let transport = ScriptedTransport::new();
    let broker = Broker::new(vec![provider("alpha", 60), provider("beta", 60)], transport.clone());

    for _ in 0..5 {
        broker.dispatch("1.1.1.1").await.unwrap();
    }

    // All traffic stays on alpha: beta has no samples yet, so its mean
    // reports the empty-window sentinel and ranks last.
    assert!(transport.calls().iter().all(|target| target.contains("alpha")));
    assert_eq!(
        broker.provider("beta").unwrap().stats().avg_response_time_5min(),
        EMPTY_WINDOW_AVG_MS
    );
}

#[tokio::test]
async fn test_mean_latency_tracks_observed_failures() {
    let transport = ScriptedTransport::new();
    transport.plan_delayed_failure(TransportError::Timeout, Duration::from_millis(100));
    transport.plan_delayed_failure(TransportError::Timeout, Duration::from_millis(200));
    transport.plan_delayed_failure(TransportError::Timeout, Duration::from_millis(300));

    let broker = Broker::new(vec![provider("alpha", 60)], transport);

    for _ in 0..3 {
        let result = broker.dispatch("1.1.1.1").await;
        assert!(result.is_err());
    }

    let stats = broker.provider("alpha").unwrap().stats();
    assert_eq!(stats.error_count_5min(), 3);

    // Failure latencies count toward the mean. The broker measures wall
    // time, so each sample carries a little scheduling overhead on top of
    // the planned 100/200/300ms delays.
    let avg = stats.avg_response_time_5min();
    assert!(avg >= 200.0, "mean should reflect the planned delays, got {avg}");
    assert!(avg < 260.0, "mean should stay close to 200ms, got {avg}");
}

#[tokio::test]
async fn test_exhausted_pool_is_reported_without_calls() {
    let transport = ScriptedTransport::new();
    let broker = Broker::new(vec![provider("alpha", 1), provider("beta", 1)], transport.clone());

    broker.dispatch("1.1.1.1").await.unwrap();
    broker.dispatch("2.2.2.2").await.unwrap();
    let third = broker.dispatch("3.3.3.3").await;

    assert!(matches!(third, Err(BrokerError::NoProviderAvailable)));
    assert_eq!(transport.call_count(), 2, "rejected dispatch must not reach the transport");
}

#[tokio::test]
async fn test_response_bodies_pass_through_untouched() {
    // A body reporting a logical failure is still a transport success; the
    // broker hands payloads back without interpreting them.
    let payload = r#"{"status":"fail","message":"reserved range","query":"10.0.0.1"}"#;

    let transport = ScriptedTransport::new();
    transport.plan_success(payload);

    let broker = Broker::new(vec![provider("alpha", 60)], transport);
    let body = broker.dispatch("10.0.0.1").await.unwrap();

    assert_eq!(body, payload);
    assert_eq!(broker.provider("alpha").unwrap().stats().error_count_5min(), 0);
}

#[tokio::test]
async fn test_latency_orders_equally_healthy_providers() {
    let transport = ScriptedTransport::new();
    let broker = Broker::new(vec![provider("alpha", 60), provider("beta", 60)], transport.clone());

    // Seed both trackers directly so each provider has one clean sample.
    broker.provider("alpha").unwrap().stats().record_outcome(false, 250);
    broker.provider("beta").unwrap().stats().record_outcome(false, 40);

    broker.dispatch("1.1.1.1").await.unwrap();

    assert_eq!(transport.calls(), vec!["http://beta.test/json/1.1.1.1"]);
}
