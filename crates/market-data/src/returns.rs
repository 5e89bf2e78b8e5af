//! Return-metric arithmetic.
//!
//! All metrics are `(current - baseline) / baseline`. For a series the
//! baseline is the first close; for a point-in-time quote the baseline is
//! whatever reference price the caller supplies (for crypto, the 24h open —
//! an approximation of a year-to-date figure, not a verified financial
//! calculation, and deliberately isolated here so it stays swappable).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::PriceSeries;

/// Return over the whole series: `(close[-1] - close[0]) / close[0]`.
///
/// `None` for an empty series or a zero first close.
pub fn period_return(series: &PriceSeries) -> Option<Decimal> {
    let first = series.first()?.close;
    let last = series.last()?.close;
    point_return(last, first)
}

/// Cumulative return per row relative to the first close.
///
/// Empty for an empty series; rows keep series order.
pub fn series_returns(series: &PriceSeries) -> Vec<(DateTime<Utc>, Decimal)> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    let baseline = first.close;
    if baseline.is_zero() {
        return Vec::new();
    }
    series
        .quotes()
        .iter()
        .map(|q| (q.timestamp, (q.close - baseline) / baseline))
        .collect()
}

/// Point-in-time return: `(current - baseline) / baseline`.
///
/// `None` when the baseline is zero.
pub fn point_return(current: Decimal, baseline: Decimal) -> Option<Decimal> {
    if baseline.is_zero() {
        return None;
    }
    Some((current - baseline) / baseline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quote;
    use crate::symbol::Symbol;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn series_of(closes: &[Decimal]) -> PriceSeries {
        let quotes = closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                Quote::new(
                    Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 0, 0, 0).unwrap(),
                    *close,
                    "USD".to_string(),
                    "TEST".to_string(),
                )
            })
            .collect();
        PriceSeries::from_quotes(Symbol::equity("TEST"), quotes)
    }

    #[test]
    fn test_period_return_last_over_first() {
        let series = series_of(&[dec!(100), dec!(90), dec!(120)]);
        assert_eq!(period_return(&series), Some(dec!(0.2)));
    }

    #[test]
    fn test_period_return_empty_series() {
        let series = PriceSeries::empty(Symbol::equity("TEST"));
        assert_eq!(period_return(&series), None);
    }

    #[test]
    fn test_series_returns_per_row() {
        let series = series_of(&[dec!(100), dec!(110), dec!(95)]);
        let returns = series_returns(&series);
        assert_eq!(returns.len(), 3);
        assert_eq!(returns[0].1, dec!(0));
        assert_eq!(returns[1].1, dec!(0.1));
        assert_eq!(returns[2].1, dec!(-0.05));
    }

    #[test]
    fn test_point_return_assumed_baseline() {
        // Current 100 against an assumed baseline of 90 -> 11.11%.
        let metric = point_return(dec!(100), dec!(90)).unwrap();
        assert_eq!(metric.round_dp(4), dec!(0.1111));
    }

    #[test]
    fn test_point_return_zero_baseline() {
        assert_eq!(point_return(dec!(100), dec!(0)), None);
    }
}
