// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic portfolio aggregation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use findeus_core::FinDeusError;
use findeus_market::normalize_symbol;

/// One position supplied by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Holding {
    pub symbol: String,
    /// Market value of the position.
    pub value: f64,
    #[serde(default)]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioRequest {
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

/// Aggregated weight of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionWeight {
    pub symbol: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    pub weight_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub position_count: usize,
    /// Positions ordered by value, largest first.
    pub positions: Vec<PositionWeight>,
    pub largest_position: Option<String>,
    /// Weight of the largest position.
    pub concentration_percent: f64,
    pub timestamp: DateTime<Utc>,
}

/// Summarizes `holdings`, merging repeated symbols.
pub fn summarize(holdings: &[Holding]) -> Result<PortfolioSummary, FinDeusError> {
    if holdings.is_empty() {
        return Err(FinDeusError::Validation("holdings are required".to_string()));
    }

    let mut merged: BTreeMap<String, (f64, Option<f64>)> = BTreeMap::new();
    for holding in holdings {
        let symbol = normalize_symbol(&holding.symbol)?;
        if !holding.value.is_finite() || holding.value < 0.0 {
            return Err(FinDeusError::Validation(format!(
                "value for {symbol} must be a non-negative number"
            )));
        }
        if let Some(q) = holding.quantity
            && (!q.is_finite() || q < 0.0)
        {
            return Err(FinDeusError::Validation(format!(
                "quantity for {symbol} must be a non-negative number"
            )));
        }

        let entry = merged.entry(symbol).or_insert((0.0, None));
        entry.0 += holding.value;
        entry.1 = match (entry.1, holding.quantity) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
    }

    let total_value: f64 = merged.values().map(|(v, _)| v).sum();
    let mut positions: Vec<PositionWeight> = merged
        .into_iter()
        .map(|(symbol, (value, quantity))| PositionWeight {
            weight_percent: if total_value > 0.0 {
                value / total_value * 100.0
            } else {
                0.0
            },
            symbol,
            value,
            quantity,
        })
        .collect();
    // BTreeMap order breaks ties by symbol.
    positions.sort_by(|a, b| b.value.total_cmp(&a.value));

    let largest = positions.first();
    Ok(PortfolioSummary {
        total_value,
        position_count: positions.len(),
        largest_position: largest.map(|p| p.symbol.clone()),
        concentration_percent: largest.map(|p| p.weight_percent).unwrap_or(0.0),
        positions,
        timestamp: Utc::now(),
    })
}
