//! Domain models for market data.

mod period;
mod quote;
mod series;

pub use period::{DateRange, Period};
pub use quote::Quote;
pub use series::PriceSeries;

use serde::{Deserialize, Serialize};

/// Classification of asset types handled by the pipeline.
///
/// The kind selects both the provider used for lookups and the symbol
/// normalization convention applied before the lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Equities/ETFs with historical OHLCV series (e.g. AAPL).
    Equity,
    /// Crypto assets quoted point-in-time (e.g. BTCUSDT).
    Crypto,
}
