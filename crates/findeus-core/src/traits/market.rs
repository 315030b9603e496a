// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Market data adapter trait.

use async_trait::async_trait;

use crate::error::FinDeusError;
use crate::traits::adapter::PluginAdapter;
use crate::types::Quote;

/// Opaque source of market quotes.
#[async_trait]
pub trait QuoteSource: PluginAdapter {
    /// Fetches the latest quote for an already-normalized ticker symbol.
    async fn quote(&self, symbol: &str) -> Result<Quote, FinDeusError>;
}
