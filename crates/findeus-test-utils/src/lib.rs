// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for FinDeus.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! external services.
//!
//! # Components
//!
//! - [`MockProvider`] - LLM provider with scripted replies, failures, and delays
//! - [`MockQuoteSource`] - Market data source backed by a fixed quote table

pub mod mock_provider;
pub mod mock_quotes;

pub use mock_provider::{MockProvider, MockReply};
pub use mock_quotes::{quote_fixture, MockQuoteSource};
