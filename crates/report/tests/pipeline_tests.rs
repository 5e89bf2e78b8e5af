//! End-to-end pipeline tests against scripted providers.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use zip::ZipArchive;

use marketdeck_market_data::provider::{MarketDataProvider, ProviderCapabilities};
use marketdeck_market_data::{AssetKind, MarketDataError, Quote, Symbol};
use marketdeck_report::{ChartKind, ReportError, ReportRequest, ReportService};

/// A provider scripted per symbol: listed symbols succeed with canned data,
/// everything else fails as unknown.
struct ScriptedProvider {
    known: Vec<&'static str>,
}

impl ScriptedProvider {
    fn new(known: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self { known })
    }

    fn knows(&self, symbol: &Symbol) -> bool {
        self.known.contains(&symbol.as_str())
    }
}

fn daily_quote(day: u32, close: Decimal) -> Quote {
    Quote::ohlcv(
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        close - dec!(1),
        close + dec!(2),
        close - dec!(2),
        close,
        dec!(1000),
        "USD".to_string(),
        "SCRIPTED".to_string(),
    )
}

#[async_trait]
impl MarketDataProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        "SCRIPTED"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            asset_kinds: &[AssetKind::Equity, AssetKind::Crypto],
            supports_latest: true,
            supports_historical: true,
        }
    }

    async fn get_latest_quote(&self, symbol: &Symbol) -> Result<Quote, MarketDataError> {
        if !self.knows(symbol) {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }
        // 24h open 90, last 100: an 11.11% point return.
        Ok(Quote::ohlcv(
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
            dec!(90),
            dec!(101),
            dec!(89),
            dec!(100),
            dec!(5000),
            "USDT".to_string(),
            "SCRIPTED".to_string(),
        ))
    }

    async fn get_historical_quotes(
        &self,
        symbol: &Symbol,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError> {
        if !self.knows(symbol) {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }
        Ok(vec![
            daily_quote(1, dec!(100)),
            daily_quote(2, dec!(104)),
            daily_quote(3, dec!(102)),
            daily_quote(4, dec!(110)),
        ])
    }
}

fn request(equities: &str, cryptos: &str) -> ReportRequest {
    ReportRequest {
        equities: equities.to_string(),
        cryptos: cryptos.to_string(),
        date_range: None,
        period: None,
        charts: Vec::new(),
        title: None,
    }
}

fn service(equities: Vec<&'static str>, cryptos: Vec<&'static str>) -> ReportService {
    ReportService::new(ScriptedProvider::new(equities), ScriptedProvider::new(cryptos))
}

fn count_slide_parts(deck: &[u8]) -> usize {
    let mut archive = ZipArchive::new(Cursor::new(deck.to_vec())).unwrap();
    (0..archive.len())
        .filter(|&i| {
            let name = archive.by_index(i).map(|f| f.name().to_string()).unwrap();
            name.starts_with("ppt/slides/slide") && name.ends_with(".xml")
        })
        .count()
}

#[tokio::test]
async fn test_partial_failure_keeps_batch_alive() {
    let service = service(vec!["AAPL", "MSFT"], vec![]);
    let output = service
        .generate(&request("AAPL, MSFT, BADTICKER", ""))
        .await
        .unwrap();

    // Title slide plus one line chart per successful equity.
    assert_eq!(output.slide_count, 3);
    assert_eq!(count_slide_parts(&output.deck), 3);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].symbol.as_str(), "BADTICKER");
}

#[tokio::test]
async fn test_empty_request_produces_no_deck() {
    let service = service(vec![], vec![]);
    let err = service.generate(&request("", " , ,")).await.unwrap_err();
    assert!(matches!(err, ReportError::EmptyRequest));
}

#[tokio::test]
async fn test_all_symbols_failed() {
    let service = service(vec![], vec![]);
    let err = service
        .generate(&request("BAD1, BAD2", "BADCOIN"))
        .await
        .unwrap_err();
    match err {
        ReportError::AllSymbolsFailed(errors) => assert_eq!(errors.len(), 3),
        other => panic!("expected AllSymbolsFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_crypto_table_slide_with_formatted_return() {
    let service = service(vec!["AAPL"], vec!["BTCUSDT", "ETHUSDT"]);
    let output = service
        .generate(&request("AAPL", "BTC/USDT, ETHUSDT, FAKECOIN"))
        .await
        .unwrap();

    // Title, one chart, one crypto table.
    assert_eq!(output.slide_count, 3);
    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors[0].symbol.as_str(), "FAKECOIN");

    // The table slide carries the scripted 11.11% return for both coins.
    let mut archive = ZipArchive::new(Cursor::new(output.deck)).unwrap();
    let mut xml = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("ppt/slides/slide3.xml").unwrap(),
        &mut xml,
    )
    .unwrap();
    assert!(xml.contains("BTCUSDT"));
    assert!(xml.contains("+11.11%"));
}

#[tokio::test]
async fn test_multiple_chart_kinds_per_symbol() {
    let service = service(vec!["AAPL"], vec![]);
    let mut req = request("AAPL", "");
    req.charts = vec![ChartKind::Line, ChartKind::Bar, ChartKind::Candlestick];
    let output = service.generate(&req).await.unwrap();

    // Title plus three chart slides.
    assert_eq!(output.slide_count, 4);
    assert!(output.errors.is_empty());
}

#[tokio::test]
async fn test_symbols_processed_in_input_order() {
    let service = service(vec!["AAPL", "MSFT", "GOOGL"], vec![]);
    let output = service
        .generate(&request("MSFT, GOOGL, AAPL", ""))
        .await
        .unwrap();
    assert_eq!(output.slide_count, 4);

    // Slide 2 is the first input symbol.
    let mut archive = ZipArchive::new(Cursor::new(output.deck)).unwrap();
    let mut xml = String::new();
    std::io::Read::read_to_string(
        &mut archive.by_name("ppt/slides/slide2.xml").unwrap(),
        &mut xml,
    )
    .unwrap();
    assert!(xml.contains("MSFT Closing Prices"));
}

#[tokio::test]
async fn test_exported_bytes_are_a_pptx_container() {
    let service = service(vec!["AAPL"], vec![]);
    let output = service.generate(&request("AAPL", "")).await.unwrap();
    assert_eq!(&output.deck[..4], b"PK\x03\x04");
    assert!(ZipArchive::new(Cursor::new(output.deck)).is_ok());
}
