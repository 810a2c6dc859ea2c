//! Health-aware provider selection and request dispatch.
//!
//! The broker owns the provider pool and routes each lookup to the healthiest
//! provider that still has admission-window headroom. Selection ranks eligible
//! providers by recent error count, then by mean response time, and falls back
//! to configuration order on exact ties. Every attempted dispatch feeds one
//! outcome back into the chosen provider's tracker, so ranking reflects live
//! traffic without any separate bookkeeping step.
//!
//! There is no pool-wide lock: each provider guards its own tracker, and a
//! slow request against one provider never blocks selection involving the
//! others.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::types::ProviderConfig;
use crate::upstream::errors::BrokerError;
use crate::upstream::provider::Provider;
use crate::upstream::transport::Transport;

/// Routes lookups across a fixed pool of interchangeable providers.
///
/// The pool is established at construction time and is immutable afterwards.
/// All interior mutability lives inside the per-provider trackers, so the
/// broker itself is freely shareable across tasks behind an [`Arc`].
pub struct Broker {
    providers: Vec<Arc<Provider>>,
    transport: Arc<dyn Transport>,
}

impl Broker {
    /// Creates a broker over the given provider configurations.
    ///
    /// Providers keep the order in which they are supplied; that order is the
    /// final tie-breaker during selection.
    pub fn new(configs: Vec<ProviderConfig>, transport: Arc<dyn Transport>) -> Self {
        let providers = configs
            .into_iter()
            .map(|config| {
                info!(
                    provider = %config.name,
                    max_requests_per_minute = config.max_requests_per_minute,
                    "registering provider"
                );
                Arc::new(Provider::new(config))
            })
            .collect();

        Self { providers, transport }
    }

    /// Creates a broker over pre-built providers.
    ///
    /// Used where providers need non-default tracker windows, such as
    /// simulations that compress the admission window to milliseconds.
    pub fn with_providers(providers: Vec<Arc<Provider>>, transport: Arc<dyn Transport>) -> Self {
        Self { providers, transport }
    }

    /// All providers in configuration order.
    pub fn providers(&self) -> &[Arc<Provider>] {
        &self.providers
    }

    /// Looks up a provider by name.
    pub fn provider(&self, name: &str) -> Option<&Arc<Provider>> {
        self.providers.iter().find(|p| p.name().as_ref() == name)
    }

    /// Picks the healthiest provider with admission headroom.
    ///
    /// Each provider is snapshotted once, so its admission verdict and the
    /// two ranking metrics come from a single tracker read. Ranking is by
    /// 5-minute error count ascending, then mean response time ascending;
    /// `min_by` keeps the first of equal minima, which preserves
    /// configuration order on exact ties.
    fn select_provider(&self) -> Option<Arc<Provider>> {
        self.providers
            .iter()
            .filter_map(|provider| {
                let snapshot = provider.stats().snapshot();
                snapshot.accepting.then(|| (Arc::clone(provider), snapshot))
            })
            .min_by(|(_, a), (_, b)| {
                a.error_count.cmp(&b.error_count).then_with(|| {
                    a.avg_response_time_ms
                        .partial_cmp(&b.avg_response_time_ms)
                        .unwrap_or(Ordering::Equal)
                })
            })
            .map(|(provider, _)| provider)
    }

    /// Dispatches one lookup for `request_key`.
    ///
    /// Selects a provider, substitutes the key into its URL template, and
    /// performs the call through the transport, measuring elapsed wall time
    /// around it. Exactly one outcome is recorded on the chosen provider's
    /// tracker whether the call succeeds or fails; when no provider is
    /// eligible, nothing is called and nothing is recorded.
    ///
    /// # Errors
    ///
    /// - [`BrokerError::NoProviderAvailable`] if every provider is at its
    ///   admission limit
    /// - [`BrokerError::ProviderError`] if the selected provider's call
    ///   fails, wrapping the transport failure and naming the provider
    pub async fn dispatch(&self, request_key: &str) -> Result<String, BrokerError> {
        let Some(provider) = self.select_provider() else {
            warn!(request_key, "no provider has admission headroom");
            return Err(BrokerError::NoProviderAvailable);
        };

        let target = provider.resolve_target(request_key);
        debug!(provider = %provider.name(), request_key, "dispatching lookup");

        let start = Instant::now();
        let result = self.transport.fetch(&target).await;
        let response_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(body) => {
                provider.stats().record_outcome(false, response_time_ms);
                debug!(
                    provider = %provider.name(),
                    response_time_ms,
                    "lookup succeeded"
                );
                Ok(body)
            }
            Err(source) => {
                provider.stats().record_outcome(true, response_time_ms);
                warn!(
                    provider = %provider.name(),
                    response_time_ms,
                    error = %source,
                    "lookup failed"
                );
                Err(BrokerError::ProviderError {
                    provider: provider.name().clone(),
                    source,
                })
            }
        }
    }
}

impl std::fmt::Debug for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("providers", &self.providers.len())
            .finish_non_exhaustive()
    }
}
