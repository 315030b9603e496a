// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic provider adapter for FinDeus.
//!
//! This crate implements [`ProviderAdapter`] for the Anthropic Messages API
//! with single-shot, non-streaming completions.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use findeus_config::FinDeusConfig;
use findeus_core::error::FinDeusError;
use findeus_core::traits::{PluginAdapter, ProviderAdapter};
use findeus_core::types::{
    AdapterType, HealthStatus, ProviderKind, ProviderRequest, ProviderResponse, TokenUsage,
};
use tracing::info;

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest};

/// Base confidence reported for Anthropic answers.
pub const ANTHROPIC_CONFIDENCE: f64 = 0.85;

/// Anthropic provider implementing [`ProviderAdapter`].
pub struct AnthropicProvider {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider from the given configuration.
    ///
    /// Fails with [`FinDeusError::Config`] when `anthropic.api_key` is unset;
    /// callers check for a key first and skip the provider when absent.
    pub fn new(config: &FinDeusConfig) -> Result<Self, FinDeusError> {
        let api_key = config
            .anthropic
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                FinDeusError::Config(
                    "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
                )
            })?;

        let client = AnthropicClient::new(
            api_key,
            &config.anthropic.api_version,
            config.anthropic.base_url.clone(),
            Duration::from_secs(config.router.timeout_secs),
        )?;

        info!(model = %config.anthropic.model, "Anthropic provider initialized");

        Ok(Self {
            client,
            model: config.anthropic.model.clone(),
            max_tokens: config.anthropic.max_tokens,
        })
    }

    fn to_message_request(&self, request: ProviderRequest) -> MessageRequest {
        MessageRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: request.system_prompt,
            messages: vec![ApiMessage::user(request.prompt)],
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, FinDeusError> {
        // Configured means healthy; probing would spend tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn confidence(&self) -> f64 {
        ANTHROPIC_CONFIDENCE
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, FinDeusError> {
        let api_request = self.to_message_request(request);
        let response = self.client.complete_message(&api_request).await?;

        let content = response.text();
        if content.trim().is_empty() {
            return Err(FinDeusError::provider("Anthropic returned an empty completion"));
        }

        Ok(ProviderResponse {
            provider: ProviderKind::Anthropic,
            model: response.model,
            content,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        })
    }
}
