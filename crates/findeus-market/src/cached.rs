// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TTL caching decorator for quote sources.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use findeus_cache::{Clock, SystemClock, TtlCache};
use findeus_config::FinDeusConfig;
use findeus_core::traits::{PluginAdapter, QuoteSource};
use findeus_core::types::{AdapterType, HealthStatus, Quote};
use findeus_core::FinDeusError;
use findeus_prometheus::recording;

use crate::symbol::normalize_symbol;

/// Wraps a [`QuoteSource`] so repeated lookups within the TTL reuse one upstream call.
///
/// Failures are never cached.
pub struct CachedQuoteSource<S, C: Clock = SystemClock> {
    inner: S,
    cache: Arc<TtlCache<String, Quote, C>>,
}

impl<S: QuoteSource> CachedQuoteSource<S, SystemClock> {
    pub fn new(inner: S, capacity: usize, ttl: Duration) -> Self {
        Self::with_cache(inner, Arc::new(TtlCache::new(capacity, ttl)))
    }

    /// Uses `market.capacity` and `market.ttl_secs`.
    pub fn from_config(inner: S, config: &FinDeusConfig) -> Self {
        Self::new(
            inner,
            config.market.capacity,
            Duration::from_secs(config.market.ttl_secs),
        )
    }
}

impl<S: QuoteSource, C: Clock> CachedQuoteSource<S, C> {
    pub fn with_cache(inner: S, cache: Arc<TtlCache<String, Quote, C>>) -> Self {
        Self { inner, cache }
    }

    /// The underlying cache, shared with the sweep task.
    pub fn cache(&self) -> &Arc<TtlCache<String, Quote, C>> {
        &self.cache
    }
}

#[async_trait]
impl<S: QuoteSource, C: Clock> PluginAdapter for CachedQuoteSource<S, C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn version(&self) -> semver::Version {
        self.inner.version()
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MarketData
    }

    async fn health_check(&self) -> Result<HealthStatus, FinDeusError> {
        self.inner.health_check().await
    }
}

#[async_trait]
impl<S: QuoteSource, C: Clock> QuoteSource for CachedQuoteSource<S, C> {
    async fn quote(&self, symbol: &str) -> Result<Quote, FinDeusError> {
        let symbol = normalize_symbol(symbol)?;

        let mut missed = false;
        let quote = self
            .cache
            .get_or_insert_with(symbol.clone(), || {
                missed = true;
                self.inner.quote(&symbol)
            })
            .await;
        recording::record_cache_lookup("quote", !missed);
        quote
    }
}

#[cfg(test)]
mod tests {
    use findeus_cache::ManualClock;
    use findeus_test_utils::{quote_fixture, MockQuoteSource};

    use super::*;

    fn cached(clock: &ManualClock) -> CachedQuoteSource<MockQuoteSource, ManualClock> {
        let inner = MockQuoteSource::new().with_quote(quote_fixture("AAPL", 190.0));
        let cache = Arc::new(TtlCache::with_clock(8, Duration::from_secs(60), clock.clone()));
        CachedQuoteSource::with_cache(inner, cache)
    }

    #[tokio::test]
    async fn second_lookup_within_ttl_is_served_from_cache() {
        let clock = ManualClock::new();
        let source = cached(&clock);

        let first = source.quote("aapl").await.unwrap();
        let second = source.quote("AAPL").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(source.inner.calls(), 1);
    }

    #[tokio::test]
    async fn expired_quote_is_refetched_once() {
        let clock = ManualClock::new();
        let source = cached(&clock);

        source.quote("AAPL").await.unwrap();
        clock.advance(Duration::from_secs(61));
        source.quote("AAPL").await.unwrap();
        source.quote("AAPL").await.unwrap();
        assert_eq!(source.inner.calls(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let clock = ManualClock::new();
        let source = cached(&clock);

        assert!(source.quote("MSFT").await.is_err());
        assert!(source.quote("MSFT").await.is_err());
        assert_eq!(source.inner.calls(), 2);
        assert!(source.cache().get(&"MSFT".to_string()).is_none());
    }

    #[tokio::test]
    async fn invalid_symbol_skips_cache_and_upstream() {
        let clock = ManualClock::new();
        let source = cached(&clock);

        assert!(source.quote("").await.unwrap_err().is_client_error());
        assert_eq!(source.inner.calls(), 0);
    }
}
