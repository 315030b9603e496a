// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for FinDeus.
//!
//! This crate provides the trait definitions, error types, and common types
//! shared by the query router, the provider adapters, the market data
//! source, and the HTTP gateway.

pub mod error;
pub mod traits;
pub mod types;

pub use error::FinDeusError;
pub use types::{
    AdapterType, HealthStatus, ModelHint, ProviderKind, ProviderRequest, ProviderResponse,
    ProviderRole, Query, Quote, ResponseEnvelope, TokenUsage, UsageReport,
};

pub use traits::{PluginAdapter, ProviderAdapter, QuoteSource};
