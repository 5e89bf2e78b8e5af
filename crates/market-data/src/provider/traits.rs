//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::symbol::Symbol;

use super::capabilities::ProviderCapabilities;

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source. The
/// report pipeline only ever calls one provider per asset kind and processes
/// symbols strictly sequentially, so implementations do not need to be
/// re-entrant beyond `Send + Sync`.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO" or "BINANCE". Used for
    /// logging and error attribution.
    fn id(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Fetch the latest quote for a symbol.
    ///
    /// # Returns
    ///
    /// The latest quote on success, or a `MarketDataError` on failure.
    async fn get_latest_quote(&self, symbol: &Symbol) -> Result<Quote, MarketDataError>;

    /// Fetch historical quotes for a symbol over an inclusive date range.
    ///
    /// # Returns
    ///
    /// Quotes for the range ordered by timestamp ascending, or a
    /// `MarketDataError` on failure. An empty range with a known symbol is
    /// `MarketDataError::NoDataForRange`.
    async fn get_historical_quotes(
        &self,
        symbol: &Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError>;
}
