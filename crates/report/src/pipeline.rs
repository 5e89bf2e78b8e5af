//! Report assembly pipeline.
//!
//! One call, [`ReportService::generate`], runs the full chain: parse the
//! symbol lists, fetch market data, render charts, assemble the deck, and
//! export it as PPTX bytes. Symbols are processed strictly in input order,
//! one at a time. A fetch failure for one symbol records a notice and moves
//! on; only an empty request, a fully failed batch, or an export failure
//! aborts the report.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use marketdeck_market_data::returns::point_return;
use marketdeck_market_data::{
    parse_symbol_list, AssetKind, DateRange, MarketDataProvider, Period, PriceSeries,
};

use crate::chart::{placeholder_chart, render_chart, ChartKind};
use crate::deck::exporter::export_pptx;
use crate::deck::ReportDeck;
use crate::errors::{ReportError, SymbolError};

const DEFAULT_TITLE: &str = "Financial Performance Report";
const CRYPTO_TABLE_TITLE: &str = "Cryptocurrency Performance";

/// A report request as submitted by the caller.
///
/// Both symbol lists are free-text comma-separated input; either may be
/// empty, but not both. An explicit `date_range` wins over `period`; with
/// neither set the window defaults to year-to-date.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Comma-separated equity tickers, e.g. "AAPL, MSFT".
    #[serde(default)]
    pub equities: String,
    /// Comma-separated crypto symbols, e.g. "BTC/USDT, ETHUSDT".
    #[serde(default)]
    pub cryptos: String,
    /// Explicit fetch window. Takes precedence over `period`.
    #[serde(default)]
    pub date_range: Option<DateRange>,
    /// Named duration resolved against "now" when no explicit range is set.
    #[serde(default)]
    pub period: Option<Period>,
    /// Chart kinds rendered per equity, in order. Empty means line only.
    #[serde(default)]
    pub charts: Vec<ChartKind>,
    /// Deck title override.
    #[serde(default)]
    pub title: Option<String>,
}

impl ReportRequest {
    fn chart_kinds(&self) -> Vec<ChartKind> {
        if self.charts.is_empty() {
            vec![ChartKind::Line]
        } else {
            self.charts.clone()
        }
    }

    fn resolve_range(&self) -> DateRange {
        match (self.date_range, self.period) {
            (Some(range), _) => range,
            (None, period) => DateRange::from_period(period.unwrap_or_default(), Utc::now()),
        }
    }
}

/// The finished report: deck bytes plus the per-symbol notices collected
/// along the way.
#[derive(Clone, Debug)]
pub struct ReportOutput {
    /// The exported PPTX container.
    pub deck: Vec<u8>,
    /// Total slide count including the title slide.
    pub slide_count: usize,
    /// Per-symbol failures, in processing order. Non-fatal by construction.
    pub errors: Vec<SymbolError>,
}

/// Generates report decks from market data providers.
///
/// One provider serves equities (historical series), one serves crypto
/// (latest quotes). Both are trait objects so tests can script them.
pub struct ReportService {
    equities: Arc<dyn MarketDataProvider>,
    cryptos: Arc<dyn MarketDataProvider>,
}

impl ReportService {
    pub fn new(equities: Arc<dyn MarketDataProvider>, cryptos: Arc<dyn MarketDataProvider>) -> Self {
        Self { equities, cryptos }
    }

    /// Run the full pipeline for one request.
    pub async fn generate(&self, request: &ReportRequest) -> Result<ReportOutput, ReportError> {
        let equity_symbols = parse_symbol_list(&request.equities, AssetKind::Equity);
        let crypto_symbols = parse_symbol_list(&request.cryptos, AssetKind::Crypto);
        if equity_symbols.is_empty() && crypto_symbols.is_empty() {
            return Err(ReportError::EmptyRequest);
        }

        let range = request.resolve_range();
        let kinds = request.chart_kinds();
        debug!(
            "Generating report: {} equities, {} cryptos, {} .. {}",
            equity_symbols.len(),
            crypto_symbols.len(),
            range.start,
            range.end
        );

        let mut errors = Vec::new();

        // Fetch equities sequentially, in input order.
        let mut series_list: Vec<PriceSeries> = Vec::new();
        for symbol in &equity_symbols {
            match self
                .equities
                .get_historical_quotes(symbol, range.start, range.end)
                .await
            {
                Ok(quotes) => {
                    series_list.push(PriceSeries::from_quotes(symbol.clone(), quotes));
                }
                Err(e) => {
                    warn!("Fetch failed for {}: {}", symbol, e);
                    errors.push(SymbolError::new(
                        symbol.clone(),
                        AssetKind::Equity,
                        e.to_string(),
                    ));
                }
            }
        }

        // Fetch crypto point quotes sequentially, in input order.
        let mut crypto_rows: Vec<Vec<String>> = Vec::new();
        for symbol in &crypto_symbols {
            match self.cryptos.get_latest_quote(symbol).await {
                Ok(quote) => {
                    crypto_rows.push(vec![
                        symbol.to_string(),
                        format_return(point_return(quote.close, quote.open.unwrap_or_default())),
                    ]);
                }
                Err(e) => {
                    warn!("Fetch failed for {}: {}", symbol, e);
                    errors.push(SymbolError::new(
                        symbol.clone(),
                        AssetKind::Crypto,
                        e.to_string(),
                    ));
                }
            }
        }

        if series_list.is_empty() && crypto_rows.is_empty() {
            return Err(ReportError::AllSymbolsFailed(errors));
        }

        // Assemble. Chart slides per equity in fetch order, then the crypto
        // summary table.
        let title = request.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let subtitle = format!(
            "{} to {}",
            range.start.format("%Y-%m-%d"),
            range.end.format("%Y-%m-%d")
        );
        let mut deck = ReportDeck::new(title, subtitle);

        for series in &series_list {
            for kind in &kinds {
                let artifact = match render_chart(series, *kind) {
                    Ok(artifact) => artifact,
                    Err(e) => {
                        // Degrade to a placeholder so the deck keeps one
                        // slide per symbol and kind.
                        warn!("Render failed for {}: {}", series.symbol(), e);
                        errors.push(SymbolError::new(
                            series.symbol().clone(),
                            AssetKind::Equity,
                            e.to_string(),
                        ));
                        match placeholder_chart(series.symbol(), *kind) {
                            Ok(artifact) => artifact,
                            Err(e) => {
                                warn!(
                                    "Placeholder render failed for {}: {}",
                                    series.symbol(),
                                    e
                                );
                                continue;
                            }
                        }
                    }
                };
                deck.add_chart_slide(artifact);
            }
        }

        if !crypto_rows.is_empty() {
            deck.add_table_slide(
                CRYPTO_TABLE_TITLE,
                vec!["Symbol".to_string(), "Return".to_string()],
                crypto_rows,
            );
        }

        let slide_count = deck.slide_count();
        let bytes = export_pptx(&deck)?;
        Ok(ReportOutput {
            deck: bytes,
            slide_count,
            errors,
        })
    }
}

/// Format a fractional return as a signed percentage cell with two fixed
/// decimals, "n/a" when the baseline made the metric undefined.
fn format_return(metric: Option<Decimal>) -> String {
    match metric {
        Some(value) => {
            let percent = (value * Decimal::from(100)).round_dp(2);
            if percent.is_sign_negative() {
                format!("{percent:.2}%")
            } else {
                format!("+{percent:.2}%")
            }
        }
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_return_signs() {
        assert_eq!(format_return(Some(dec!(0.1111))), "+11.11%");
        assert_eq!(format_return(Some(dec!(-0.05))), "-5.00%");
        assert_eq!(format_return(Some(Decimal::ZERO)), "+0.00%");
        assert_eq!(format_return(None), "n/a");
    }

    #[test]
    fn test_format_return_pads_to_two_decimals() {
        // Short-scale values must still fill both decimal places.
        assert_eq!(format_return(Some(dec!(0.1))), "+10.00%");
        assert_eq!(format_return(Some(dec!(-0.2))), "-20.00%");
        assert_eq!(format_return(Some(dec!(0.005))), "+0.50%");
    }

    #[test]
    fn test_default_chart_kinds_is_line_only() {
        let request = ReportRequest {
            equities: "AAPL".to_string(),
            cryptos: String::new(),
            date_range: None,
            period: None,
            charts: Vec::new(),
            title: None,
        };
        assert_eq!(request.chart_kinds(), vec![ChartKind::Line]);
    }

    #[test]
    fn test_explicit_range_wins_over_period() {
        use chrono::TimeZone;
        let range = DateRange::new(
            chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            chrono::Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        );
        let request = ReportRequest {
            equities: "AAPL".to_string(),
            cryptos: String::new(),
            date_range: Some(range),
            period: Some(Period::FiveYears),
            charts: Vec::new(),
            title: None,
        };
        assert_eq!(request.resolve_range(), range);
    }
}
