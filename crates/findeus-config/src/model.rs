// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for FinDeus.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use findeus_core::ProviderKind;
use serde::{Deserialize, Serialize};

/// System prompt sent to every provider unless overridden in `[router]`.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a financial AI assistant. Provide helpful, accurate financial advice and analysis.";

/// Top-level FinDeus configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FinDeusConfig {
    /// HTTP listener and logging settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenAI Chat Completions settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Anthropic Messages API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Pinecone credentials. Only reported by the health endpoint.
    #[serde(default)]
    pub pinecone: PineconeConfig,

    /// Provider chain settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Response cache settings for the query router.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Market data source settings.
    #[serde(default)]
    pub market: MarketConfig,

    /// Prometheus metrics exporter settings.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` falls back to `OPENAI_API_KEY`; absent disables the provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat model identifier.
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// API root; `/chat/completions` is appended.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` falls back to `ANTHROPIC_API_KEY`; absent disables the provider.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    /// Full Messages API endpoint.
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_anthropic_model(),
            base_url: default_anthropic_base_url(),
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// Pinecone configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PineconeConfig {
    /// Pinecone API key. `None` falls back to `PINECONE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Provider chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Static provider order. The first entry is the primary slot, the second the secondary.
    #[serde(default = "default_order")]
    pub order: Vec<ProviderKind>,

    /// Per-attempt timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// System prompt sent to every provider.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            order: default_order(),
            timeout_secs: default_timeout_secs(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_order() -> Vec<ProviderKind> {
    vec![ProviderKind::OpenAi, ProviderKind::Anthropic]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

/// Query response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether live provider answers are cached at all.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Time-to-live of a cached answer, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached answers.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Interval of the background expiry sweep, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl_secs(),
            capacity: default_cache_capacity(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_capacity() -> usize {
    1024
}

fn default_sweep_interval_secs() -> u64 {
    60
}

/// Market data source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    /// Yahoo Finance API root; `/v8/finance/chart/{symbol}` is appended.
    #[serde(default = "default_market_base_url")]
    pub base_url: String,

    /// Quote cache time-to-live, in seconds.
    #[serde(default = "default_market_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached quotes.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: default_market_base_url(),
            ttl_secs: default_market_ttl_secs(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_market_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_market_ttl_secs() -> u64 {
    60
}

/// Prometheus exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    /// Serve `/metrics` when true.
    #[serde(default = "default_prometheus_enabled")]
    pub enabled: bool,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            enabled: default_prometheus_enabled(),
        }
    }
}

fn default_prometheus_enabled() -> bool {
    true
}

impl FinDeusConfig {
    /// Every configured secret value, for log redaction.
    pub fn secret_values(&self) -> Vec<String> {
        [
            &self.openai.api_key,
            &self.anthropic.api_key,
            &self.pinecone.api_key,
        ]
        .into_iter()
        .flatten()
        .filter(|k| !k.trim().is_empty())
        .cloned()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = FinDeusConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.openai.max_tokens, 500);
        assert!((config.openai.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(
            config.router.order,
            vec![ProviderKind::OpenAi, ProviderKind::Anthropic]
        );
        assert_eq!(config.router.timeout_secs, 30);
        assert_eq!(config.market.ttl_secs, 60);
        assert!(config.openai.api_key.is_none());
    }

    #[test]
    fn secret_values_skips_absent_and_blank_keys() {
        let mut config = FinDeusConfig::default();
        config.openai.api_key = Some("sk-test".into());
        config.anthropic.api_key = Some("  ".into());
        assert_eq!(config.secret_values(), vec!["sk-test".to_string()]);
    }
}
