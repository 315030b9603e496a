// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticker symbol validation.

use findeus_core::FinDeusError;

const MAX_SYMBOL_LEN: usize = 12;

/// Trim, validate and uppercase a ticker symbol.
///
/// Accepts 1 to 12 characters of ASCII letters, digits, and `.^=-`, which
/// covers equities (`BRK-B`), indices (`^GSPC`), FX (`EURUSD=X`) and
/// exchange suffixes (`SHOP.TO`).
pub fn normalize_symbol(raw: &str) -> Result<String, FinDeusError> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(FinDeusError::Validation("symbol is required".to_string()));
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        return Err(FinDeusError::Validation(format!(
            "symbol must be at most {MAX_SYMBOL_LEN} characters"
        )));
    }
    if let Some(bad) = symbol
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-')))
    {
        return Err(FinDeusError::Validation(format!(
            "invalid character `{bad}` in symbol"
        )));
    }
    Ok(symbol.to_ascii_uppercase())
}
