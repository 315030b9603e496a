// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AI query routing for FinDeus.
//!
//! This crate provides:
//! - [`QueryRouter`]: static-priority primary -> secondary -> local-fallback chain
//! - [`fallback`]: deterministic templated answers used when no provider answers
//! - [`pricing`]: per-model token pricing for the envelope's usage report
//!
//! [`QueryRouter::route`] never fails: every non-empty query produces a
//! [`ResponseEnvelope`](findeus_core::ResponseEnvelope) whose `provider_used`
//! names the branch that actually produced the text.

pub mod fallback;
pub mod pricing;
pub mod router;

pub use fallback::{fallback_text, FallbackTopic, FALLBACK_MODEL, LOCAL_PROVIDER};
pub use pricing::{calculate_cost, get_pricing, usage_report, ModelPricing};
pub use router::{cache_key, QueryRouter, SECONDARY_CONFIDENCE_FACTOR};
