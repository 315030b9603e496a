// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the router, provider adapters, and the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::FinDeusError;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    MarketData,
    Observability,
}

/// A concrete LLM provider family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderKind {
    /// OpenAI Chat Completions API.
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

/// Caller-supplied provider family selector.
///
/// Routing always follows the configured order; the hint only keys cached
/// answers separately.
///
/// Parsed from an explicit list of accepted spellings; there is no prefix
/// matching on model names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ModelHint {
    #[strum(to_string = "openai-class", serialize = "openai", serialize = "gpt")]
    OpenAi,
    #[strum(
        to_string = "anthropic-class",
        serialize = "anthropic",
        serialize = "claude"
    )]
    Anthropic,
    #[default]
    #[strum(to_string = "unspecified", serialize = "auto")]
    Unspecified,
}

impl ModelHint {
    /// Parses an optional selector, treating unknown values as [`ModelHint::Unspecified`].
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Unspecified;
        };
        raw.parse().unwrap_or_else(|_| {
            tracing::debug!(hint = raw, "unrecognized model hint, using static order");
            Self::Unspecified
        })
    }
}

/// A validated user query. The text is guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    text: String,
    hint: ModelHint,
}

impl Query {
    /// Creates a query, rejecting blank text.
    pub fn new(text: impl Into<String>, hint: ModelHint) -> Result<Self, FinDeusError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(FinDeusError::Validation("query is required".to_string()));
        }
        Ok(Self { text, hint })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn hint(&self) -> ModelHint {
        self.hint
    }
}

/// Which configured branch produced an envelope's text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProviderRole {
    Primary,
    Secondary,
    LocalFallback,
}

/// A single completion request handed to a provider adapter.
///
/// Model, token limits, and sampling parameters belong to the adapter's own
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// System instructions for the model.
    pub system_prompt: Option<String>,
    /// The user's prompt text.
    pub prompt: String,
}

/// Token counts reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// A completed response from an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Provider family that produced the response.
    pub provider: ProviderKind,
    /// Model identifier reported by the provider.
    pub model: String,
    /// Generated text.
    pub content: String,
    /// Token usage, when the provider reports it.
    pub usage: Option<TokenUsage>,
}

/// Usage metadata attached to a response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_usd: f64,
}

/// The normalized value returned to callers of the AI query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Answer text. Never empty.
    pub response: String,
    /// Which configured branch produced `response`.
    pub provider_used: ProviderRole,
    /// Provider name (`openai`, `anthropic`, or `local`).
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// When the envelope was produced.
    pub timestamp: DateTime<Utc>,
    /// Confidence in `[0, 1]`; zero for local fallback text.
    pub confidence: f64,
    /// Token usage, present only for live provider answers that report it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageReport>,
}

/// A market quote returned by the market-data collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub timestamp: DateTime<Utc>,
}
