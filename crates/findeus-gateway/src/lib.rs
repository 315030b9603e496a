// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for FinDeus.
//!
//! Exposes the query router, market quotes, portfolio summaries, health and
//! Prometheus metrics over a JSON REST API. Error bodies are always
//! `{"error": "..."}` and never carry internal error text.

pub mod error;
pub mod handlers;
pub mod portfolio;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use portfolio::{summarize, Holding, PortfolioSummary};
pub use server::{
    build_router, start_server, Credential, GatewayState, ServerConfig, ServiceStatus,
};
