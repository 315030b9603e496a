// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling router and gateway tests without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use findeus_core::traits::{PluginAdapter, ProviderAdapter};
use findeus_core::types::{
    AdapterType, HealthStatus, ProviderKind, ProviderRequest, ProviderResponse, TokenUsage,
};
use findeus_core::FinDeusError;

/// One scripted outcome of a `complete` call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Succeed with this text.
    Text(String),
    /// Fail with a provider error carrying this message.
    Error(String),
}

impl MockReply {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }
}

/// A mock LLM provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty the
/// provider's default reply is used.
pub struct MockProvider {
    kind: ProviderKind,
    confidence: f64,
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    default_reply: MockReply,
    delay: Option<Duration>,
    health: HealthStatus,
    calls: AtomicUsize,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    /// Create a mock that always answers `"mock response from {kind}"`.
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            confidence: default_confidence(kind),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            default_reply: MockReply::Text(format!("mock response from {kind}")),
            delay: None,
            health: HealthStatus::Healthy,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock whose every call fails with `message`.
    pub fn failing(kind: ProviderKind, message: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Error(message.into()),
            ..Self::new(kind)
        }
    }

    /// Create a mock pre-loaded with the given replies.
    pub fn with_replies(kind: ProviderKind, replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Self::new(kind)
        }
    }

    /// Sleep for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Report `health` from `health_check` instead of healthy.
    pub fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = health;
        self
    }

    /// Number of `complete` calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

fn default_confidence(kind: ProviderKind) -> f64 {
    match kind {
        ProviderKind::OpenAi => 0.9,
        ProviderKind::Anthropic => 0.85,
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, FinDeusError> {
        Ok(self.health.clone())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, FinDeusError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_reply().await {
            MockReply::Text(content) => Ok(ProviderResponse {
                provider: self.kind,
                model: format!("mock-{}", self.kind),
                content,
                usage: Some(TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                }),
            }),
            MockReply::Error(message) => Err(FinDeusError::provider(message)),
        }
    }
}
