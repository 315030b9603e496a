// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for FinDeus.
//!
//! Implements [`ProviderAdapter`] over the Chat Completions API. The answer is
//! the first choice's message content; an empty or missing answer is an error
//! so the router moves on to the next provider.

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

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest};

/// Base confidence reported for OpenAI answers.
pub const OPENAI_CONFIDENCE: f64 = 0.9;

/// OpenAI provider implementing [`ProviderAdapter`].
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiProvider {
    /// Creates a new OpenAI provider from the given configuration.
    ///
    /// Fails with [`FinDeusError::Config`] when `openai.api_key` is unset.
    pub fn new(config: &FinDeusConfig) -> Result<Self, FinDeusError> {
        let api_key = config
            .openai
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                FinDeusError::Config(
                    "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY environment variable.".into(),
                )
            })?;

        let client = OpenAiClient::new(
            api_key,
            &config.openai.base_url,
            Duration::from_secs(config.router.timeout_secs),
        )?;

        info!(model = %config.openai.model, "OpenAI provider initialized");

        Ok(Self {
            client,
            model: config.openai.model.clone(),
            max_tokens: config.openai.max_tokens,
            temperature: config.openai.temperature,
        })
    }

    fn to_chat_request(&self, request: ProviderRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(request.prompt));

        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, FinDeusError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn confidence(&self) -> f64 {
        OPENAI_CONFIDENCE
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, FinDeusError> {
        let chat_request = self.to_chat_request(request);
        let response = self.client.chat(&chat_request).await?;

        let content = response
            .first_content()
            .map(str::to_string)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| FinDeusError::provider("OpenAI returned an empty completion"))?;

        Ok(ProviderResponse {
            provider: ProviderKind::OpenAi,
            model: response.model,
            content,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}
