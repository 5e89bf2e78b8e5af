//! Symbol parsing and normalization.
//!
//! User input arrives as a free-text, comma-separated list of tickers.
//! Entries are trimmed and upper-cased to the convention the downstream
//! provider expects; empty entries (consecutive delimiters, trailing commas)
//! are dropped instead of turning into spurious lookups.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::AssetKind;

/// A normalized identifier for a tradable instrument.
///
/// Equality is plain string equality; duplicates in an input list are kept
/// and processed redundantly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Normalize an equity ticker: trim and upper-case (Yahoo convention).
    pub fn equity(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Normalize a crypto symbol: trim, upper-case, and strip pair
    /// separators. Binance REST symbols carry no separator, so both
    /// `BTC/USDT` (ccxt style) and `BTC-USDT` normalize to `BTCUSDT`.
    pub fn crypto(raw: &str) -> Self {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '/' && *c != '-')
            .collect();
        Self(cleaned.to_uppercase())
    }

    /// Normalize a raw entry for the given asset kind.
    pub fn normalize(raw: &str, kind: AssetKind) -> Self {
        match kind {
            AssetKind::Equity => Self::equity(raw),
            AssetKind::Crypto => Self::crypto(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a comma-separated symbol list into normalized symbols.
///
/// Entries are trimmed, empty entries are dropped, and duplicates are kept.
/// The output preserves input order.
pub fn parse_symbol_list(input: &str, kind: AssetKind) -> Vec<Symbol> {
    input
        .split(',')
        .map(|entry| Symbol::normalize(entry, kind))
        .filter(|symbol| !symbol.is_empty())
        .collect()
}
