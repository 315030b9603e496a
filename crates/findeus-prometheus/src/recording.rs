// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder can collect these metrics.
//! Without an installed recorder every call is a no-op.

use metrics::{describe_counter, describe_histogram};

pub const QUERIES_TOTAL: &str = "findeus_queries_total";
pub const PROVIDER_FAILURES_TOTAL: &str = "findeus_provider_failures_total";
pub const CACHE_LOOKUPS_TOTAL: &str = "findeus_cache_lookups_total";
pub const TOKENS_TOTAL: &str = "findeus_tokens_total";
pub const ROUTE_LATENCY_SECONDS: &str = "findeus_route_latency_seconds";
pub const QUOTE_REQUESTS_TOTAL: &str = "findeus_quote_requests_total";

/// Register all FinDeus metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(QUERIES_TOTAL, "AI queries answered, by provider_used");
    describe_counter!(
        PROVIDER_FAILURES_TOTAL,
        "Failed provider attempts, by provider and reason"
    );
    describe_counter!(CACHE_LOOKUPS_TOTAL, "Cache lookups, by cache and result");
    describe_counter!(TOKENS_TOTAL, "Tokens reported by providers");
    describe_counter!(QUOTE_REQUESTS_TOTAL, "Market quote lookups, by outcome");
    describe_histogram!(
        ROUTE_LATENCY_SECONDS,
        "End-to-end query routing latency in seconds"
    );
}

/// Record an answered query under the branch that produced it.
pub fn record_query(provider_used: &str) {
    metrics::counter!(QUERIES_TOTAL, "provider_used" => provider_used.to_string()).increment(1);
}

/// Record a failed provider attempt. `reason` is `error` or `timeout`.
pub fn record_provider_failure(provider: &str, reason: &'static str) {
    metrics::counter!(
        PROVIDER_FAILURES_TOTAL,
        "provider" => provider.to_string(),
        "reason" => reason
    )
    .increment(1);
}

/// Record a cache hit or miss for the named cache.
pub fn record_cache_lookup(cache: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!(CACHE_LOOKUPS_TOTAL, "cache" => cache, "result" => result).increment(1);
}

/// Record token consumption.
pub fn record_tokens(model: &str, input: u32, output: u32) {
    metrics::counter!(TOKENS_TOTAL, "model" => model.to_string(), "type" => "input")
        .increment(u64::from(input));
    metrics::counter!(TOKENS_TOTAL, "model" => model.to_string(), "type" => "output")
        .increment(u64::from(output));
}

/// Record a market quote lookup. `outcome` is `ok`, `invalid`, or `error`.
pub fn record_quote_request(outcome: &'static str) {
    metrics::counter!(QUOTE_REQUESTS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record routing latency.
pub fn record_route_latency(seconds: f64) {
    metrics::histogram!(ROUTE_LATENCY_SECONDS).record(seconds);
}
