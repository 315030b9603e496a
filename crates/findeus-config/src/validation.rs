// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a usable bind address, non-zero timeouts, and a duplicate-free
//! provider order.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::FinDeusConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FinDeusConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.port == 0 {
        fail("server.port must be greater than 0".to_string());
    }

    if !LOG_LEVELS.contains(&config.server.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "server.log_level `{}` must be one of: {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.router.order.len() > 2 {
        fail(format!(
            "router.order supports at most 2 providers (primary, secondary), got {}",
            config.router.order.len()
        ));
    }

    let mut seen = HashSet::new();
    for kind in &config.router.order {
        if !seen.insert(kind) {
            fail(format!("duplicate provider `{kind}` in router.order"));
        }
    }

    if config.router.timeout_secs == 0 {
        fail("router.timeout_secs must be greater than 0".to_string());
    }

    if config.openai.max_tokens == 0 {
        fail("openai.max_tokens must be greater than 0".to_string());
    }

    if !(0.0..=2.0).contains(&config.openai.temperature) {
        fail(format!(
            "openai.temperature must be between 0.0 and 2.0, got {}",
            config.openai.temperature
        ));
    }

    if config.anthropic.max_tokens == 0 {
        fail("anthropic.max_tokens must be greater than 0".to_string());
    }

    for (key, url) in [
        ("openai.base_url", &config.openai.base_url),
        ("anthropic.base_url", &config.anthropic.base_url),
        ("market.base_url", &config.market.base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            fail(format!("{key} `{url}` must be an http(s) URL"));
        }
    }

    if config.cache.enabled {
        if config.cache.capacity == 0 {
            fail("cache.capacity must be greater than 0".to_string());
        }
        if config.cache.ttl_secs == 0 {
            fail("cache.ttl_secs must be greater than 0".to_string());
        }
        if config.cache.sweep_interval_secs == 0 {
            fail("cache.sweep_interval_secs must be greater than 0".to_string());
        }
    }

    if config.market.capacity == 0 {
        fail("market.capacity must be greater than 0".to_string());
    }
    if config.market.ttl_secs == 0 {
        fail("market.ttl_secs must be greater than 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use findeus_core::ProviderKind;

    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = FinDeusConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_host_fails_validation() {
        let mut config = FinDeusConfig::default();
        config.server.host = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "server.host"));
    }

    #[test]
    fn duplicate_provider_in_order_fails_validation() {
        let mut config = FinDeusConfig::default();
        config.router.order = vec![ProviderKind::Anthropic, ProviderKind::Anthropic];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "duplicate provider `anthropic`"));
    }

    #[test]
    fn single_provider_order_is_valid() {
        let mut config = FinDeusConfig::default();
        config.router.order = vec![ProviderKind::Anthropic];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let mut config = FinDeusConfig::default();
        config.router.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "router.timeout_secs"));
    }

    #[test]
    fn disabled_cache_skips_cache_checks() {
        let mut config = FinDeusConfig::default();
        config.cache.enabled = false;
        config.cache.capacity = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = FinDeusConfig::default();
        config.server.port = 0;
        config.server.log_level = "loud".to_string();
        config.openai.temperature = 3.5;
        config.market.base_url = "ftp://quotes".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(has_error(&errors, "server.log_level `loud`"));
        assert!(has_error(&errors, "market.base_url"));
    }
}
