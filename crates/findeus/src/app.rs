// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the gateway state from configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use findeus_anthropic::AnthropicProvider;
use findeus_cache::TtlCache;
use findeus_config::FinDeusConfig;
use findeus_core::error::FinDeusError;
use findeus_core::traits::ProviderAdapter;
use findeus_core::types::{ProviderKind, Quote, ResponseEnvelope};
use findeus_gateway::{Credential, GatewayState, ServiceStatus};
use findeus_market::{CachedQuoteSource, YahooQuoteSource};
use findeus_openai::OpenAiProvider;
use findeus_prometheus::PrometheusAdapter;
use findeus_router::QueryRouter;

/// Everything the server needs, plus handles to the caches for sweeping.
pub struct App {
    pub state: GatewayState,
    pub query_cache: Option<Arc<TtlCache<String, ResponseEnvelope>>>,
    pub quote_cache: Arc<TtlCache<String, Quote>>,
}

fn has_key(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.trim().is_empty())
}

/// A keyed provider the router does not use (absent from `router.order`, or
/// failed to build) is reported as disabled rather than configured.
fn provider_credential(
    key: &Option<String>,
    kind: ProviderKind,
    router: &QueryRouter,
) -> Credential {
    if !has_key(key) {
        Credential::Missing
    } else if router.configured().iter().any(|(k, _)| *k == kind) {
        Credential::Configured
    } else {
        warn!(provider = %kind, "api key set but provider is not routed; add it to router.order");
        Credential::Disabled
    }
}

fn plain_credential(key: &Option<String>) -> Credential {
    if has_key(key) {
        Credential::Configured
    } else {
        Credential::Missing
    }
}

/// Constructs an adapter for every provider that has a credential.
///
/// A missing key disables that branch silently; a provider that fails to
/// build is logged and skipped.
pub fn build_providers(config: &FinDeusConfig) -> Vec<Arc<dyn ProviderAdapter>> {
    let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

    if has_key(&config.openai.api_key) {
        match OpenAiProvider::new(config) {
            Ok(p) => providers.push(Arc::new(p)),
            Err(e) => warn!(error = %e, "openai provider disabled"),
        }
    } else {
        info!("openai api key not set, provider disabled");
    }

    if has_key(&config.anthropic.api_key) {
        match AnthropicProvider::new(config) {
            Ok(p) => providers.push(Arc::new(p)),
            Err(e) => warn!(error = %e, "anthropic provider disabled"),
        }
    } else {
        info!("anthropic api key not set, provider disabled");
    }

    providers
}

/// Assembles the router, quote source and gateway state.
pub fn build_app(
    config: &FinDeusConfig,
    metrics: Option<PrometheusAdapter>,
) -> Result<App, FinDeusError> {
    let router = QueryRouter::from_config(config, build_providers(config));
    for (kind, role) in router.configured() {
        info!(provider = %kind, role = %role, "provider slot configured");
    }
    let query_cache = router.cache().cloned();

    let quote_cache = Arc::new(TtlCache::new(
        config.market.capacity,
        Duration::from_secs(config.market.ttl_secs),
    ));
    let quotes = CachedQuoteSource::with_cache(
        YahooQuoteSource::from_config(config)?,
        quote_cache.clone(),
    );

    let services = ServiceStatus {
        openai: provider_credential(&config.openai.api_key, ProviderKind::OpenAi, &router),
        anthropic: provider_credential(&config.anthropic.api_key, ProviderKind::Anthropic, &router),
        pinecone: plain_credential(&config.pinecone.api_key),
    };

    let state = GatewayState {
        router: Arc::new(router),
        quotes: Arc::new(quotes),
        metrics,
        services,
        known_secrets: Arc::new(config.secret_values()),
    };

    Ok(App {
        state,
        query_cache,
        quote_cache,
    })
}

#[cfg(test)]
mod tests {
    use findeus_core::types::ProviderRole;

    use super::*;

    #[test]
    fn no_keys_means_no_providers() {
        let config = FinDeusConfig::default();
        assert!(build_providers(&config).is_empty());
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let mut config = FinDeusConfig::default();
        config.openai.api_key = Some("   ".into());
        assert!(build_providers(&config).is_empty());
    }

    #[test]
    fn app_reports_configured_services() {
        let mut config = FinDeusConfig::default();
        config.anthropic.api_key = Some("sk-ant-test-key".into());
        config.pinecone.api_key = Some("pcsk_test".into());

        let app = build_app(&config, None).unwrap();
        assert_eq!(app.state.services.openai, Credential::Missing);
        assert_eq!(app.state.services.anthropic, Credential::Configured);
        assert_eq!(app.state.services.pinecone, Credential::Configured);
        assert_eq!(
            app.state.router.configured(),
            vec![(ProviderKind::Anthropic, ProviderRole::Secondary)]
        );
        assert_eq!(app.state.known_secrets.len(), 2);
    }

    #[test]
    fn keyed_provider_outside_router_order_is_disabled() {
        let mut config = FinDeusConfig::default();
        config.openai.api_key = Some("sk-openai-test-key".into());
        config.anthropic.api_key = Some("sk-ant-test-key".into());
        config.router.order = vec![ProviderKind::Anthropic];

        let app = build_app(&config, None).unwrap();
        assert_eq!(app.state.services.openai, Credential::Disabled);
        assert_eq!(app.state.services.anthropic, Credential::Configured);
        assert_eq!(
            app.state.router.configured(),
            vec![(ProviderKind::Anthropic, ProviderRole::Primary)]
        );
    }

    #[test]
    fn caches_follow_config() {
        let mut config = FinDeusConfig::default();
        config.market.capacity = 5;
        config.cache.enabled = false;

        let app = build_app(&config, None).unwrap();
        assert!(app.query_cache.is_none());
        assert_eq!(app.quote_cache.capacity(), 5);
    }
}
