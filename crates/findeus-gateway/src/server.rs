// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use findeus_core::traits::QuoteSource;
use findeus_core::FinDeusError;
use findeus_prometheus::PrometheusAdapter;
use findeus_router::QueryRouter;

use crate::handlers;

/// Credential state of one external service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Credential {
    /// No key, or a blank one.
    #[default]
    Missing,
    /// Key present and the service is in use.
    Configured,
    /// Key present but the router does not use the provider.
    Disabled,
}

/// Credential state per collaborator, as reported by `/api/health`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub openai: Credential,
    pub anthropic: Credential,
    pub pinecone: Credential,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub router: Arc<QueryRouter>,
    pub quotes: Arc<dyn QuoteSource>,
    /// Present when `prometheus.enabled`; `/metrics` answers 404 otherwise.
    pub metrics: Option<PrometheusAdapter>,
    pub services: ServiceStatus,
    /// Values redacted from logged errors.
    pub known_secrets: Arc<Vec<String>>,
}

/// Gateway listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        .route("/api/ai/query", post(handlers::ai_query))
        .route("/api/market/data/{symbol}", get(handlers::market_quote))
        .route("/api/portfolio/analyze", post(handlers::portfolio_analyze))
        .route("/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until `shutdown` resolves,
/// letting in-flight requests finish.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), FinDeusError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FinDeusError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| FinDeusError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use findeus_test_utils::MockQuoteSource;

    use super::*;

    #[test]
    fn gateway_state_is_clone() {
        let state = GatewayState {
            router: Arc::new(QueryRouter::new(Vec::new(), &[])),
            quotes: Arc::new(MockQuoteSource::new()),
            metrics: None,
            services: ServiceStatus::default(),
            known_secrets: Arc::new(Vec::new()),
        };
        let cloned = state.clone();
        assert!(cloned.metrics.is_none());
    }

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
    }
}
