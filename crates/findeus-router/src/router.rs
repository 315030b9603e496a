// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static-priority query routing.
//!
//! Providers are tried in configured order, each bounded by the router's
//! timeout. The first success wins; when none succeeds the local fallback
//! template answers instead. Failures are logged with secrets redacted and
//! never surface to the caller.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};

use findeus_cache::{Clock, SystemClock, TtlCache};
use findeus_config::model::FinDeusConfig;
use findeus_core::traits::{PluginAdapter, ProviderAdapter};
use findeus_core::types::{
    HealthStatus, ProviderKind, ProviderRequest, ProviderResponse, ProviderRole, Query,
    ResponseEnvelope,
};
use findeus_prometheus::recording;
use findeus_security::redact;

use crate::fallback::{fallback_text, FALLBACK_MODEL, LOCAL_PROVIDER};
use crate::pricing::usage_report;

/// Confidence multiplier applied when the secondary slot answers.
pub const SECONDARY_CONFIDENCE_FACTOR: f64 = 0.8;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Every configured provider failed; the caller answers locally.
struct NoAnswer;

struct ProviderSlot {
    role: ProviderRole,
    provider: Arc<dyn ProviderAdapter>,
    /// Failed attempts since the last success.
    failures: AtomicU32,
}

/// Builds the cache key for `query`: hint plus whitespace-normalized, lowercased text.
pub fn cache_key(query: &Query) -> String {
    let normalized = query
        .text()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    format!("{}:{normalized}", query.hint())
}

/// Routes queries across at most two configured providers plus the local fallback.
pub struct QueryRouter<C: Clock = SystemClock> {
    slots: Vec<ProviderSlot>,
    timeout: Duration,
    system_prompt: String,
    cache: Option<Arc<TtlCache<String, ResponseEnvelope, C>>>,
    known_secrets: Vec<String>,
}

impl QueryRouter<SystemClock> {
    /// Create a router over `providers`, assigning roles by position in `order`.
    ///
    /// The provider whose kind is `order[0]` is primary, `order[1]` secondary.
    /// Providers whose kind does not appear in `order` are ignored.
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>, order: &[ProviderKind]) -> Self {
        let mut slots: Vec<(usize, ProviderSlot)> = Vec::new();
        for provider in providers {
            let kind = provider.kind();
            let Some(index) = order.iter().position(|k| *k == kind) else {
                warn!(provider = %kind, "provider not listed in router.order, skipping");
                continue;
            };
            let role = match index {
                0 => ProviderRole::Primary,
                1 => ProviderRole::Secondary,
                _ => {
                    warn!(provider = %kind, index, "only two provider slots are supported, skipping");
                    continue;
                }
            };
            if slots.iter().any(|(i, _)| *i == index) {
                warn!(provider = %kind, "provider configured twice, keeping the first");
                continue;
            }
            slots.push((
                index,
                ProviderSlot {
                    role,
                    provider,
                    failures: AtomicU32::new(0),
                },
            ));
        }
        slots.sort_by_key(|(i, _)| *i);

        Self {
            slots: slots.into_iter().map(|(_, s)| s).collect(),
            timeout: DEFAULT_TIMEOUT,
            system_prompt: findeus_config::model::DEFAULT_SYSTEM_PROMPT.to_string(),
            cache: None,
            known_secrets: Vec::new(),
        }
    }

    /// Create a router from loaded configuration.
    ///
    /// Attaches a system-clock response cache when `cache.enabled` is set.
    pub fn from_config(config: &FinDeusConfig, providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        let router = Self::new(providers, &config.router.order)
            .with_timeout(Duration::from_secs(config.router.timeout_secs))
            .with_system_prompt(config.router.system_prompt.clone())
            .with_known_secrets(config.secret_values());

        if config.cache.enabled {
            let cache = TtlCache::new(
                config.cache.capacity,
                Duration::from_secs(config.cache.ttl_secs),
            );
            router.with_cache(Arc::new(cache))
        } else {
            router
        }
    }
}

impl<C: Clock> QueryRouter<C> {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Values scrubbed from logged provider errors in addition to pattern matches.
    pub fn with_known_secrets(mut self, secrets: Vec<String>) -> Self {
        self.known_secrets = secrets;
        self
    }

    /// Attach a response cache, possibly driven by a different clock.
    pub fn with_cache<C2: Clock>(
        self,
        cache: Arc<TtlCache<String, ResponseEnvelope, C2>>,
    ) -> QueryRouter<C2> {
        QueryRouter {
            slots: self.slots,
            timeout: self.timeout,
            system_prompt: self.system_prompt,
            cache: Some(cache),
            known_secrets: self.known_secrets,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cache(&self) -> Option<&Arc<TtlCache<String, ResponseEnvelope, C>>> {
        self.cache.as_ref()
    }

    /// Configured providers and their roles, primary first.
    pub fn configured(&self) -> Vec<(ProviderKind, ProviderRole)> {
        self.slots
            .iter()
            .map(|s| (s.provider.kind(), s.role))
            .collect()
    }

    /// Answer `query`. Never fails.
    pub async fn route(&self, query: &Query) -> ResponseEnvelope {
        let started = Instant::now();

        let live = match &self.cache {
            Some(cache) => {
                let mut missed = false;
                let answer = cache
                    .get_or_insert_with(cache_key(query), || {
                        missed = true;
                        async { self.try_providers(query).await.ok_or(NoAnswer) }
                    })
                    .await;
                recording::record_cache_lookup("query", !missed);
                if !missed {
                    debug!("serving cached answer");
                }
                answer.ok()
            }
            None => self.try_providers(query).await,
        };
        let envelope = live.unwrap_or_else(|| self.fallback(query));

        recording::record_query(&envelope.provider_used.to_string());
        recording::record_route_latency(started.elapsed().as_secs_f64());
        envelope
    }

    async fn try_providers(&self, query: &Query) -> Option<ResponseEnvelope> {
        debug!(hint = %query.hint(), "routing in configured order");
        for slot in &self.slots {
            let kind = slot.provider.kind();
            let request = ProviderRequest {
                system_prompt: Some(self.system_prompt.clone()),
                prompt: query.text().to_string(),
            };

            match tokio::time::timeout(self.timeout, slot.provider.complete(request)).await {
                Ok(Ok(response)) if !response.content.trim().is_empty() => {
                    info!(provider = %kind, role = %slot.role, model = %response.model, "provider answered");
                    slot.failures.store(0, Ordering::Relaxed);
                    return Some(self.envelope(slot, response));
                }
                Ok(Ok(_)) => {
                    warn!(provider = %kind, role = %slot.role, "provider returned empty text");
                    recording::record_provider_failure(&kind.to_string(), "empty");
                }
                Ok(Err(e)) => {
                    let message = redact(&e.to_string(), &self.known_secrets);
                    warn!(provider = %kind, role = %slot.role, error = %message, "provider failed");
                    recording::record_provider_failure(&kind.to_string(), "error");
                }
                Err(_elapsed) => {
                    warn!(
                        provider = %kind,
                        role = %slot.role,
                        timeout_secs = self.timeout.as_secs(),
                        "provider timed out"
                    );
                    recording::record_provider_failure(&kind.to_string(), "timeout");
                }
            }
            slot.failures.fetch_add(1, Ordering::Relaxed);
        }
        None
    }

    fn envelope(&self, slot: &ProviderSlot, response: ProviderResponse) -> ResponseEnvelope {
        let base = slot.provider.confidence().clamp(0.0, 1.0);
        let confidence = match slot.role {
            ProviderRole::Secondary => base * SECONDARY_CONFIDENCE_FACTOR,
            _ => base,
        };

        let usage = response.usage.map(|u| {
            recording::record_tokens(&response.model, u.input_tokens, u.output_tokens);
            usage_report(&response.model, &u)
        });

        ResponseEnvelope {
            response: response.content,
            provider_used: slot.role,
            provider: response.provider.to_string(),
            model: response.model,
            timestamp: Utc::now(),
            confidence,
            usage,
        }
    }

    /// Provider health, combining each adapter's own check with recent call outcomes.
    ///
    /// A slot whose adapter reports trouble, or whose latest attempt failed,
    /// degrades the router. When every slot is in that state only the local
    /// fallback is answering and the router is unhealthy.
    pub async fn health(&self) -> HealthStatus {
        if self.slots.is_empty() {
            return HealthStatus::Degraded(
                "no AI providers configured, answering from local fallback".to_string(),
            );
        }

        let mut reasons = Vec::new();
        for slot in &self.slots {
            let reported = match slot.provider.health_check().await {
                Ok(HealthStatus::Healthy) => None,
                Ok(HealthStatus::Degraded(r) | HealthStatus::Unhealthy(r)) => Some(r),
                Err(e) => Some(redact(&e.to_string(), &self.known_secrets)),
            };
            let failures = slot.failures.load(Ordering::Relaxed);
            let reason = reported
                .or_else(|| (failures > 0).then(|| format!("{failures} consecutive failed calls")));
            if let Some(reason) = reason {
                reasons.push(format!("{}: {reason}", slot.provider.kind()));
            }
        }

        if reasons.is_empty() {
            HealthStatus::Healthy
        } else if reasons.len() == self.slots.len() {
            HealthStatus::Unhealthy(reasons.join("; "))
        } else {
            HealthStatus::Degraded(reasons.join("; "))
        }
    }

    fn fallback(&self, query: &Query) -> ResponseEnvelope {
        if self.slots.is_empty() {
            debug!("no providers configured, answering locally");
        } else {
            warn!(attempted = self.slots.len(), "all providers failed, answering locally");
        }
        ResponseEnvelope {
            response: fallback_text(query.text()),
            provider_used: ProviderRole::LocalFallback,
            provider: LOCAL_PROVIDER.to_string(),
            model: FALLBACK_MODEL.to_string(),
            timestamp: Utc::now(),
            confidence: 0.0,
            usage: None,
        }
    }
}
