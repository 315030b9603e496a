// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing tables and cost estimation.
//!
//! Prices in USD per million tokens, list prices as published by OpenAI and
//! Anthropic. The estimate is informational only.

use findeus_core::{TokenUsage, UsageReport};

/// Per-model pricing in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

impl ModelPricing {
    const fn new(input_per_mtok: f64, output_per_mtok: f64) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
        }
    }
}

/// Substring table, most specific first.
const PRICING_TABLE: &[(&str, ModelPricing)] = &[
    ("gpt-4o-mini", ModelPricing::new(0.15, 0.60)),
    ("gpt-4o", ModelPricing::new(2.50, 10.0)),
    ("gpt-4-turbo", ModelPricing::new(10.0, 30.0)),
    ("gpt-4", ModelPricing::new(30.0, 60.0)),
    ("gpt-3.5", ModelPricing::new(0.50, 1.50)),
    ("opus", ModelPricing::new(15.0, 75.0)),
    ("haiku", ModelPricing::new(0.80, 4.0)),
    ("sonnet", ModelPricing::new(3.0, 15.0)),
];

/// Used for models not in the table so cost is never silently zero.
const DEFAULT_PRICING: ModelPricing = ModelPricing::new(3.0, 15.0);

/// Look up pricing for a given model identifier by case-insensitive substring.
pub fn get_pricing(model: &str) -> ModelPricing {
    let lower = model.to_lowercase();
    PRICING_TABLE
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, pricing)| *pricing)
        .unwrap_or(DEFAULT_PRICING)
}

/// Calculate cost in USD for a given token usage and pricing.
pub fn calculate_cost(usage: &TokenUsage, pricing: &ModelPricing) -> f64 {
    let input = (f64::from(usage.input_tokens) / 1_000_000.0) * pricing.input_per_mtok;
    let output = (f64::from(usage.output_tokens) / 1_000_000.0) * pricing.output_per_mtok;
    input + output
}

/// Build the envelope's usage block for `model`.
pub fn usage_report(model: &str, usage: &TokenUsage) -> UsageReport {
    UsageReport {
        input_tokens: usage.input_tokens,
        output_tokens: usage.output_tokens,
        total_tokens: usage.total(),
        estimated_cost_usd: calculate_cost(usage, &get_pricing(model)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpt4o_mini_is_not_priced_as_gpt4o() {
        let p = get_pricing("gpt-4o-mini-2024-07-18");
        assert!((p.input_per_mtok - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn gpt4_snapshot_matches_gpt4() {
        let p = get_pricing("gpt-4-0613");
        assert!((p.output_per_mtok - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn claude_families() {
        assert!((get_pricing("claude-3-5-haiku-20241022").input_per_mtok - 0.80).abs() < f64::EPSILON);
        assert!((get_pricing("claude-3-opus-20240229").output_per_mtok - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_model_uses_default() {
        assert_eq!(get_pricing("mystery-model"), DEFAULT_PRICING);
    }

    #[test]
    fn usage_report_sums_tokens_and_cost() {
        let usage = TokenUsage {
            input_tokens: 1000,
            output_tokens: 500,
        };
        let report = usage_report("gpt-4", &usage);
        assert_eq!(report.total_tokens, 1500);
        // 1000/1M * 30 + 500/1M * 60
        let expected = 0.03 + 0.03;
        assert!((report.estimated_cost_usd - expected).abs() < 1e-12);
    }
}
