//! Shared provider definitions.

use std::sync::Arc;

/// Placeholder substituted with the request key when resolving a provider's
/// target URL. Must appear exactly once in every configured template.
pub const KEY_PLACEHOLDER: &str = "{key}";

/// Configuration for a single upstream lookup provider.
///
/// Defines the static identity and admission policy of one provider. Instances
/// are immutable after creation; runtime health lives in the provider's stats
/// tracker, not here.
///
/// # Fields
///
/// - `name`: Human-readable identifier for selection logs and error messages
/// - `url_template`: Request target with a single [`KEY_PLACEHOLDER`] to be
///   replaced by the request key
/// - `max_requests_per_minute`: Admission cap for the rolling 60-second window
///
/// # Example
///
/// ```
/// use beacon_core::types::ProviderConfig;
/// use std::sync::Arc;
///
/// let config = ProviderConfig {
///     name: Arc::from("ip-api"),
///     url_template: "http://ip-api.com/json/{key}".to_string(),
///     max_requests_per_minute: 45,
/// };
///
/// assert_eq!(config.resolve_target("8.8.8.8"), "http://ip-api.com/json/8.8.8.8");
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: Arc<str>,
    pub url_template: String,
    pub max_requests_per_minute: u32,
}

impl ProviderConfig {
    /// Resolves the target URL for a request key by substituting it into the
    /// template. Only the first occurrence of the placeholder is replaced;
    /// configuration validation guarantees there is exactly one.
    #[must_use]
    pub fn resolve_target(&self, request_key: &str) -> String {
        self.url_template.replacen(KEY_PLACEHOLDER, request_key, 1)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: Arc::from(""),
            url_template: String::new(),
            max_requests_per_minute: 60,
        }
    }
}
