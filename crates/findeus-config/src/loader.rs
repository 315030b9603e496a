// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./findeus.toml` > `~/.config/findeus/findeus.toml` > `/etc/findeus/findeus.toml`
//! with environment variable overrides via `FINDEUS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FinDeusConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/findeus/findeus.toml";

/// Local config file name, resolved against the working directory.
pub const LOCAL_CONFIG_FILE: &str = "findeus.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/findeus/findeus.toml` (system-wide)
/// 3. `~/.config/findeus/findeus.toml` (user XDG config)
/// 4. `./findeus.toml` (local directory)
/// 5. `FINDEUS_*` environment variables
///
/// Conventional provider variables (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`,
/// `PINECONE_API_KEY`, `PORT`) fill in whatever the layers above left unset.
pub fn load_config() -> Result<FinDeusConfig, figment::Error> {
    let mut config: FinDeusConfig = build_figment().extract()?;
    apply_conventional_env(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<FinDeusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FinDeusConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FinDeusConfig, figment::Error> {
    let mut config: FinDeusConfig = Figment::new()
        .merge(Serialized::defaults(FinDeusConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()?;
    apply_conventional_env(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FinDeusConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `$XDG_CONFIG_HOME/findeus/findeus.toml`, when a config dir exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("findeus").join(LOCAL_CONFIG_FILE))
}

/// Fill unset credentials and the port from the conventional variable names.
///
/// Values already present in config always win. Blank variables are ignored.
pub fn apply_conventional_env<F>(config: &mut FinDeusConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if config.openai.api_key.is_none() {
        config.openai.api_key = non_blank("OPENAI_API_KEY");
    }
    if config.anthropic.api_key.is_none() {
        config.anthropic.api_key = non_blank("ANTHROPIC_API_KEY");
    }
    if config.pinecone.api_key.is_none() {
        config.pinecone.api_key = non_blank("PINECONE_API_KEY");
    }
    if lookup("FINDEUS_SERVER_PORT").is_none()
        && let Some(port) = non_blank("PORT").and_then(|p| p.trim().parse().ok())
    {
        config.server.port = port;
    }
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `FINDEUS_OPENAI_API_KEY` must map to `openai.api_key`, not
/// `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("FINDEUS_").map(|key| {
        // `key` keeps the variable's original case with the prefix stripped.
        // Example: FINDEUS_ROUTER_TIMEOUT_SECS -> "router_timeout_secs"
        let lowered = key.as_str().to_ascii_lowercase();
        let key_str = lowered.as_str();
        const SECTIONS: [&str; 8] = [
            "server",
            "openai",
            "anthropic",
            "pinecone",
            "router",
            "cache",
            "market",
            "prometheus",
        ];
        for section in SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}
