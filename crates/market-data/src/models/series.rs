use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::symbol::Symbol;

use super::Quote;

/// A date-ordered OHLCV series for one symbol.
///
/// Invariant: quotes are strictly increasing by timestamp. Construction
/// sorts and deduplicates, keeping the last quote seen for a timestamp.
///
/// A series may be empty: a provider can legitimately report no rows for a
/// range. That is a valid state and distinct from a fetch failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: Symbol,
    quotes: Vec<Quote>,
}

impl PriceSeries {
    /// Build a series from unordered quotes, restoring the ordering
    /// invariant.
    pub fn from_quotes(symbol: Symbol, mut quotes: Vec<Quote>) -> Self {
        quotes.sort_by_key(|q| q.timestamp);
        quotes.reverse();
        // After the reverse the first occurrence of a timestamp is the
        // last one received, which dedup_by keeps.
        quotes.dedup_by(|a, b| a.timestamp == b.timestamp);
        quotes.reverse();
        Self { symbol, quotes }
    }

    /// An empty series for a symbol the provider had no rows for.
    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            quotes: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn first(&self) -> Option<&Quote> {
        self.quotes.first()
    }

    pub fn last(&self) -> Option<&Quote> {
        self.quotes.last()
    }

    /// Highest high over the series, falling back to close where a row has
    /// no high.
    pub fn period_high(&self) -> Option<Decimal> {
        self.quotes
            .iter()
            .map(|q| q.high.unwrap_or(q.close))
            .max()
    }

    /// Lowest low over the series, falling back to close where a row has
    /// no low.
    pub fn period_low(&self) -> Option<Decimal> {
        self.quotes.iter().map(|q| q.low.unwrap_or(q.close)).min()
    }

    /// Timestamps of the series rows, ascending.
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.quotes.iter().map(|q| q.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn quote_at(day: u32, close: Decimal) -> Quote {
        Quote::new(
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            close,
            "USD".to_string(),
            "TEST".to_string(),
        )
    }

    #[test]
    fn test_from_quotes_sorts_ascending() {
        let series = PriceSeries::from_quotes(
            Symbol::equity("AAPL"),
            vec![quote_at(3, dec!(103)), quote_at(1, dec!(101)), quote_at(2, dec!(102))],
        );
        let closes: Vec<_> = series.quotes().iter().map(|q| q.close).collect();
        assert_eq!(closes, vec![dec!(101), dec!(102), dec!(103)]);
    }

    #[test]
    fn test_from_quotes_dedups_keeping_last() {
        let series = PriceSeries::from_quotes(
            Symbol::equity("AAPL"),
            vec![quote_at(1, dec!(100)), quote_at(1, dec!(105))],
        );
        assert_eq!(series.len(), 1);
        assert_eq!(series.first().unwrap().close, dec!(105));
    }

    #[test]
    fn test_empty_series_is_valid() {
        let series = PriceSeries::empty(Symbol::equity("AAPL"));
        assert!(series.is_empty());
        assert!(series.period_high().is_none());
        assert!(series.last().is_none());
    }

    #[test]
    fn test_period_high_low() {
        let mut high = quote_at(1, dec!(100));
        high.high = Some(dec!(110));
        high.low = Some(dec!(95));
        let series = PriceSeries::from_quotes(
            Symbol::equity("AAPL"),
            vec![high, quote_at(2, dec!(108))],
        );
        assert_eq!(series.period_high(), Some(dec!(110)));
        assert_eq!(series.period_low(), Some(dec!(95)));
    }
}
