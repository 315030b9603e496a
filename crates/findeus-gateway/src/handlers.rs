// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use findeus_core::traits::{PluginAdapter, QuoteSource};
use findeus_core::types::{HealthStatus, ModelHint, Query, Quote, ResponseEnvelope};
use findeus_core::FinDeusError;
use findeus_prometheus::recording;
use findeus_security::redact;

use crate::error::ApiError;
use crate::portfolio::{summarize, PortfolioRequest, PortfolioSummary};
use crate::server::{GatewayState, ServiceStatus};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const ENDPOINTS: &[&str] = &[
    "GET /api/health",
    "POST /api/ai/query",
    "GET /api/market/data/{symbol}",
    "POST /api/portfolio/analyze",
    "GET /metrics",
];

/// Request body for POST /api/ai/query.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: Option<String>,
    /// Optional provider preference (`openai`, `anthropic`, ...).
    #[serde(default)]
    pub model: Option<String>,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub available_endpoints: Vec<String>,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, `degraded` or `unhealthy`: the worst component status.
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub services: ServicesReport,
    /// One `component: reason` line per component that is not healthy.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ServicesReport {
    #[serde(flatten)]
    pub credentials: ServiceStatus,
    pub market_data: &'static str,
}

fn adapter_health(result: Result<HealthStatus, FinDeusError>, secrets: &[String]) -> HealthStatus {
    result.unwrap_or_else(|e| HealthStatus::Unhealthy(redact(&e.to_string(), secrets)))
}

/// Folds component checks into an overall label and issue lines.
fn summarize_health(checks: Vec<(&str, HealthStatus)>) -> (&'static str, Vec<String>) {
    let mut status = "healthy";
    let mut issues = Vec::new();
    for (component, health) in checks {
        match health {
            HealthStatus::Healthy => {}
            HealthStatus::Degraded(reason) => {
                if status == "healthy" {
                    status = "degraded";
                }
                issues.push(format!("{component}: {reason}"));
            }
            HealthStatus::Unhealthy(reason) => {
                status = "unhealthy";
                issues.push(format!("{component}: {reason}"));
            }
        }
    }
    (status, issues)
}

/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "FinDeus AI Query Router".to_string(),
        version: VERSION.to_string(),
        timestamp: Utc::now(),
        available_endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// GET /api/health
///
/// Reports credential state, never the credentials themselves, plus the
/// router's provider health and each adapter's own check.
pub async fn health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let mut checks = vec![
        ("router", state.router.health().await),
        (
            "market_data",
            adapter_health(state.quotes.health_check().await, &state.known_secrets),
        ),
    ];
    if let Some(metrics) = &state.metrics {
        checks.push((
            "metrics",
            adapter_health(metrics.health_check().await, &state.known_secrets),
        ));
    }
    let (status, issues) = summarize_health(checks);

    Json(HealthResponse {
        status,
        timestamp: Utc::now(),
        version: VERSION.to_string(),
        services: ServicesReport {
            credentials: state.services,
            market_data: "configured",
        },
        issues,
    })
}

/// POST /api/ai/query
///
/// Always answers 200 for a non-empty query; provider failures surface only
/// through `provider_used`.
pub async fn ai_query(
    State(state): State<GatewayState>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let Json(body) = body?;
    let hint = ModelHint::parse_lenient(body.model.as_deref());
    let query = Query::new(body.query.unwrap_or_default(), hint)
        .map_err(|e| ApiError::from_core(e, &state.known_secrets))?;

    Ok(Json(state.router.route(&query).await))
}

/// GET /api/market/data/{symbol}
pub async fn market_quote(
    State(state): State<GatewayState>,
    Path(symbol): Path<String>,
) -> Result<Json<Quote>, ApiError> {
    match state.quotes.quote(&symbol).await {
        Ok(quote) => {
            recording::record_quote_request("ok");
            Ok(Json(quote))
        }
        Err(e) => {
            let outcome = if e.is_client_error() { "invalid" } else { "error" };
            recording::record_quote_request(outcome);
            Err(ApiError::from_core(e, &state.known_secrets))
        }
    }
}

/// POST /api/portfolio/analyze
pub async fn portfolio_analyze(
    State(state): State<GatewayState>,
    body: Result<Json<PortfolioRequest>, JsonRejection>,
) -> Result<Json<PortfolioSummary>, ApiError> {
    let Json(body) = body?;
    summarize(&body.holdings)
        .map(Json)
        .map_err(|e| ApiError::from_core(e, &state.known_secrets))
}

/// GET /metrics
pub async fn metrics(State(state): State<GatewayState>) -> Response {
    match &state.metrics {
        Some(adapter) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            adapter.render(),
        )
            .into_response(),
        None => ApiError::NotFound.into_response(),
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use crate::server::Credential;

    use super::*;

    #[test]
    fn query_request_ignores_unknown_fields() {
        let json = r#"{"query": "What is a bond?", "model": "claude", "session": 4}"#;
        let req: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.query.as_deref(), Some("What is a bond?"));
        assert_eq!(req.model.as_deref(), Some("claude"));
    }

    #[test]
    fn query_request_allows_missing_query() {
        let req: QueryRequest = serde_json::from_str("{}").unwrap();
        assert!(req.query.is_none());
    }

    #[test]
    fn worst_component_sets_status() {
        let (status, issues) = summarize_health(vec![
            ("router", HealthStatus::Healthy),
            ("market_data", HealthStatus::Healthy),
        ]);
        assert_eq!(status, "healthy");
        assert!(issues.is_empty());

        let (status, issues) = summarize_health(vec![
            ("router", HealthStatus::Unhealthy("openai: down".into())),
            ("market_data", HealthStatus::Degraded("slow".into())),
        ]);
        assert_eq!(status, "unhealthy");
        assert_eq!(issues, vec!["router: openai: down", "market_data: slow"]);
    }

    #[test]
    fn adapter_errors_are_unhealthy_and_redacted() {
        let err = FinDeusError::provider("auth failed for sk-ant-REDACTED");
        match adapter_health(Err(err), &[]) {
            HealthStatus::Unhealthy(reason) => assert!(!reason.contains("sk-ant-api03")),
            other => panic!("expected unhealthy, got {other:?}"),
        }
    }

    #[test]
    fn health_response_flattens_credentials() {
        let resp = HealthResponse {
            status: "healthy",
            timestamp: Utc::now(),
            version: "0.1.0".to_string(),
            services: ServicesReport {
                credentials: ServiceStatus {
                    openai: Credential::Configured,
                    anthropic: Credential::Disabled,
                    pinecone: Credential::Missing,
                },
                market_data: "configured",
            },
            issues: Vec::new(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["services"]["openai"], "configured");
        assert_eq!(json["services"]["anthropic"], "disabled");
        assert_eq!(json["services"]["pinecone"], "missing");
        assert!(json.get("issues").is_none());
    }
}
