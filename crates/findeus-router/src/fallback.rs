// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic answers for when no provider is configured or all fail.
//!
//! Classification is a zero-cost keyword match on the lowercased query.
//! Every template quotes the caller's query verbatim.

use strum::{Display, EnumString};

/// Provider name reported on fallback envelopes.
pub const LOCAL_PROVIDER: &str = "local";

/// Model name reported on fallback envelopes.
pub const FALLBACK_MODEL: &str = "findeus-fallback";

/// Topic chosen for a fallback answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FallbackTopic {
    Market,
    Portfolio,
    Risk,
    General,
}

/// Keywords checked in order; the first matching group wins.
const TOPIC_KEYWORDS: &[(FallbackTopic, &[&str])] = &[
    (FallbackTopic::Market, &["market", "stock"]),
    (FallbackTopic::Portfolio, &["portfolio", "investment"]),
    (FallbackTopic::Risk, &["risk"]),
];

impl FallbackTopic {
    /// Picks a topic from keywords in `query`.
    pub fn classify(query: &str) -> Self {
        let lower = query.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(topic, _)| *topic)
            .unwrap_or(FallbackTopic::General)
    }
}

/// Builds the templated answer for `query`.
pub fn fallback_text(query: &str) -> String {
    match FallbackTopic::classify(query) {
        FallbackTopic::Market => format!(
            "Market overview for '{query}': live AI analysis is unavailable right now. \
             Markets can move quickly, so check current quotes, recent earnings and \
             broader economic indicators before acting."
        ),
        FallbackTopic::Portfolio => format!(
            "Portfolio guidance for '{query}': live AI analysis is unavailable right now. \
             Diversification across asset classes, a time horizon that matches your goals \
             and periodic rebalancing remain the core principles to apply."
        ),
        FallbackTopic::Risk => format!(
            "Risk assessment for '{query}': live AI analysis is unavailable right now. \
             Review position concentration and downside scenarios, and consider whether \
             hedging fits your risk tolerance."
        ),
        FallbackTopic::General => format!(
            "Financial analysis for '{query}': live AI analysis is unavailable right now. \
             Market conditions, economic indicators and your own risk profile all matter \
             here; gather more information before making decisions."
        ),
    }
}
