// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM provider integrations (OpenAI, Anthropic).

use async_trait::async_trait;

use crate::error::FinDeusError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderKind, ProviderRequest, ProviderResponse};

/// Adapter for LLM provider integrations.
///
/// Implementations perform exactly one upstream call per `complete` and do
/// not retry; fallback between providers is the router's job.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// The provider family this adapter talks to.
    fn kind(&self) -> ProviderKind;

    /// Base confidence attached to answers from this provider.
    fn confidence(&self) -> f64;

    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, FinDeusError>;
}
