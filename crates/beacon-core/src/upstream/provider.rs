//! A configured provider paired with its live statistics.

use crate::{types::ProviderConfig, upstream::stats::ProviderStats};

/// One upstream lookup provider: immutable configuration plus the mutable
/// rolling-window tracker that records how it has been behaving.
///
/// Created once at broker construction and never replaced; the tracker decays
/// naturally as outcomes age out of its windows.
#[derive(Debug)]
pub struct Provider {
    config: ProviderConfig,
    stats: ProviderStats,
}

impl Provider {
    /// Creates a provider with a fresh tracker sized to the configured
    /// per-minute cap.
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let stats = ProviderStats::new(config.max_requests_per_minute);
        Self { config, stats }
    }

    /// Creates a provider with an explicitly constructed tracker. Used where
    /// non-default window durations are needed, e.g. short-horizon
    /// simulations.
    #[must_use]
    pub fn with_stats(config: ProviderConfig, stats: ProviderStats) -> Self {
        Self { config, stats }
    }

    /// Provider name.
    #[must_use]
    pub fn name(&self) -> &std::sync::Arc<str> {
        &self.config.name
    }

    /// Static configuration for this provider.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Rolling-window statistics tracker for this provider.
    #[must_use]
    pub fn stats(&self) -> &ProviderStats {
        &self.stats
    }

    /// Resolves the target URL for a request key using this provider's
    /// template.
    #[must_use]
    pub fn resolve_target(&self, request_key: &str) -> String {
        self.config.resolve_target(request_key)
    }
}
