// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `findeus serve` command implementation.
//!
//! Builds the providers, router, quote source and metrics recorder from
//! configuration, starts the cache sweepers, and serves the gateway until
//! SIGINT or SIGTERM.

use std::time::Duration;

use tracing::info;

use findeus_config::FinDeusConfig;
use findeus_core::error::FinDeusError;
use findeus_gateway::{start_server, ServerConfig};
use findeus_prometheus::PrometheusAdapter;
use findeus_security::{RedactingWriter, SecretList};

use crate::app::build_app;
use crate::shutdown;

/// Run the HTTP service until a shutdown signal arrives.
pub async fn run_serve(config: FinDeusConfig) -> Result<(), FinDeusError> {
    let secrets: SecretList = config.secret_values().into();
    init_tracing(&config.server.log_level, secrets);

    info!(version = env!("CARGO_PKG_VERSION"), "starting findeus serve");

    let metrics = if config.prometheus.enabled {
        Some(PrometheusAdapter::new()?)
    } else {
        info!("prometheus metrics disabled");
        None
    };

    let app = build_app(&config, metrics)?;

    let cancel = shutdown::install_signal_handler();
    let sweep_every = Duration::from_secs(config.cache.sweep_interval_secs.max(1));

    if let Some(cache) = app.query_cache.clone() {
        tokio::spawn(shutdown::run_periodic(
            "query",
            sweep_every,
            cancel.clone(),
            move || cache.purge_expired(),
        ));
    }
    {
        let cache = app.quote_cache.clone();
        tokio::spawn(shutdown::run_periodic(
            "quote",
            sweep_every,
            cancel.clone(),
            move || cache.purge_expired(),
        ));
    }

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let server_cancel = cancel.clone();
    let result = start_server(&server_config, app.state, async move {
        server_cancel.cancelled().await;
    })
    .await;

    // Stop the sweepers whether the server exited cleanly or not.
    cancel.cancel();
    result?;

    info!("findeus serve shutdown complete");
    Ok(())
}

const FINDEUS_CRATES: &[&str] = &[
    "findeus",
    "findeus_anthropic",
    "findeus_cache",
    "findeus_config",
    "findeus_core",
    "findeus_gateway",
    "findeus_market",
    "findeus_openai",
    "findeus_prometheus",
    "findeus_router",
];

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` overrides the configured level. Every line passes through
/// [`RedactingWriter`] so configured API keys never reach the log.
fn init_tracing(log_level: &str, secrets: SecretList) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let crates = FINDEUS_CRATES
            .iter()
            .map(|c| format!("{c}={log_level}"))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(format!("{crates},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stdout(), secrets.clone()))
        .init();
}
