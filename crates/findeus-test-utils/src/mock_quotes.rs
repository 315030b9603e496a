// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock market data source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use findeus_core::traits::{PluginAdapter, QuoteSource};
use findeus_core::types::{AdapterType, HealthStatus, Quote};
use findeus_core::FinDeusError;

/// Build a plausible quote for `symbol` at `price`.
pub fn quote_fixture(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        name: format!("{symbol} Inc."),
        price,
        change: 1.25,
        change_percent: 1.25 / (price - 1.25) * 100.0,
        volume: 1_000_000,
        currency: Some("USD".to_string()),
        timestamp: chrono::Utc::now(),
    }
}

/// A quote source answering from a fixed table.
///
/// Unknown symbols fail with [`FinDeusError::MarketData`], which is how an
/// upstream outage looks to callers.
#[derive(Default)]
pub struct MockQuoteSource {
    quotes: HashMap<String, Quote>,
    calls: AtomicUsize,
}

impl MockQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the quote served for `quote.symbol`.
    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quotes.insert(quote.symbol.clone(), quote);
        self
    }

    /// Number of `quote` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockQuoteSource {
    fn name(&self) -> &str {
        "mock-quotes"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MarketData
    }

    async fn health_check(&self) -> Result<HealthStatus, FinDeusError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl QuoteSource for MockQuoteSource {
    async fn quote(&self, symbol: &str) -> Result<Quote, FinDeusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.quotes
            .get(symbol)
            .cloned()
            .ok_or_else(|| FinDeusError::MarketData {
                message: format!("no quote for {symbol}"),
                source: None,
            })
    }
}
