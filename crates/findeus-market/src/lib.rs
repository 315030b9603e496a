// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Market data for FinDeus.
//!
//! [`YahooQuoteSource`] fetches quotes from the Yahoo Finance chart API and
//! [`CachedQuoteSource`] puts a bounded TTL cache in front of any
//! [`QuoteSource`](findeus_core::QuoteSource).

pub mod cached;
pub mod symbol;
pub mod yahoo;

pub use cached::CachedQuoteSource;
pub use symbol::normalize_symbol;
pub use yahoo::YahooQuoteSource;
