//! Binance market data provider implementation.
//!
//! This module provides crypto quotes from the Binance public API:
//! - Point-in-time quotes via the /ticker/24hr endpoint
//!
//! The 24h ticker carries both the last traded price and the 24h open,
//! which the pipeline uses as the assumed baseline for the return metric.
//! No authentication is required for this endpoint.
//! API documentation: https://binance-docs.github.io/apidocs/spot/en/

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::{AssetKind, Quote};
use crate::provider::{MarketDataProvider, ProviderCapabilities};
use crate::symbol::Symbol;

const BASE_URL: &str = "https://api.binance.com/api/v3";
const PROVIDER_ID: &str = "BINANCE";

// ============================================================================
// API Response Structures
// ============================================================================

/// Response from /ticker/24hr endpoint. Binance encodes prices as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24hrResponse {
    /// Trading pair symbol (e.g. BTCUSDT)
    symbol: String,
    /// Last traded price
    last_price: String,
    /// Price 24 hours ago
    open_price: String,
    /// Highest price in the window
    high_price: String,
    /// Lowest price in the window
    low_price: String,
    /// Base asset volume in the window
    volume: String,
    /// Close time of the window (Unix millis)
    close_time: i64,
}

/// Error response from Binance
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<i64>,
    msg: Option<String>,
}

// Binance error code for an unknown trading pair.
const CODE_INVALID_SYMBOL: i64 = -1121;

// ============================================================================
// BinanceProvider
// ============================================================================

/// Binance market data provider.
///
/// Quote-only: Binance is consumed here purely for point-in-time crypto
/// quotes, so historical fetches are unsupported by design.
pub struct BinanceProvider {
    client: Client,
}

impl Default for BinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BinanceProvider {
    /// Create a new Binance provider.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// Make a GET request to the Binance API.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, MarketDataError> {
        let url = format!("{}{}", BASE_URL, endpoint);

        let mut request = self.client.get(&url);
        for (key, value) in params {
            request = request.query(&[(key, value)]);
        }

        debug!("Binance request: {} with {} params", endpoint, params.len());

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("Request failed: {}", e),
                }
            }
        })?;

        let status = response.status();

        // 429 is the documented rate limit; 418 is the auto-ban follow-up.
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::IM_A_TEAPOT
        {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                if error_resp.code == Some(CODE_INVALID_SYMBOL) {
                    return Err(MarketDataError::SymbolNotFound(
                        error_resp.msg.unwrap_or_else(|| "invalid symbol".to_string()),
                    ));
                }
                if let Some(msg) = error_resp.msg {
                    return Err(MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: msg,
                    });
                }
            }

            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        response
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read response: {}", e),
            })
    }

    /// Parse one of Binance's stringly-typed decimal fields.
    fn parse_price(field: &'static str, value: &str) -> Result<Decimal, MarketDataError> {
        Decimal::from_str(value).map_err(|_| MarketDataError::ValidationFailed {
            message: format!("Invalid {} value: {}", field, value),
        })
    }

    fn ticker_to_quote(ticker: Ticker24hrResponse) -> Result<Quote, MarketDataError> {
        let close = Self::parse_price("lastPrice", &ticker.last_price)?;
        let open = Self::parse_price("openPrice", &ticker.open_price)?;

        // Binance reports all-zero tickers for pairs that exist but never
        // traded; treat those like an unknown symbol.
        if close.is_zero() && open.is_zero() {
            return Err(MarketDataError::SymbolNotFound(ticker.symbol));
        }

        let timestamp = Utc
            .timestamp_millis_opt(ticker.close_time)
            .single()
            .unwrap_or_else(Utc::now);

        Ok(Quote {
            timestamp,
            open: Some(open),
            high: Self::parse_price("highPrice", &ticker.high_price).ok(),
            low: Self::parse_price("lowPrice", &ticker.low_price).ok(),
            close,
            volume: Self::parse_price("volume", &ticker.volume).ok(),
            currency: "USD".to_string(),
            source: PROVIDER_ID.to_string(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            asset_kinds: &[AssetKind::Crypto],
            supports_latest: true,
            supports_historical: false,
        }
    }

    async fn get_latest_quote(&self, symbol: &Symbol) -> Result<Quote, MarketDataError> {
        debug!("Fetching 24h ticker for {} from Binance", symbol);

        let params = [("symbol", symbol.as_str())];
        let text = self.fetch("/ticker/24hr", &params).await?;

        let ticker: Ticker24hrResponse =
            serde_json::from_str(&text).map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse ticker response: {}", e),
            })?;

        Self::ticker_to_quote(ticker)
    }

    async fn get_historical_quotes(
        &self,
        symbol: &Symbol,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, MarketDataError> {
        Err(MarketDataError::UnsupportedOperation(format!(
            "Binance provider is quote-only, no historical series for {}",
            symbol
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_ticker() -> Ticker24hrResponse {
        Ticker24hrResponse {
            symbol: "BTCUSDT".to_string(),
            last_price: "100.00".to_string(),
            open_price: "90.00".to_string(),
            high_price: "101.50".to_string(),
            low_price: "89.00".to_string(),
            volume: "1234.5".to_string(),
            close_time: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_ticker_to_quote() {
        let quote = BinanceProvider::ticker_to_quote(sample_ticker()).unwrap();
        assert_eq!(quote.close, dec!(100.00));
        assert_eq!(quote.open, Some(dec!(90.00)));
        assert_eq!(quote.high, Some(dec!(101.50)));
        assert_eq!(quote.source, "BINANCE");
        assert_eq!(quote.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_ticker_with_invalid_price_fails_validation() {
        let mut ticker = sample_ticker();
        ticker.last_price = "not-a-number".to_string();
        let err = BinanceProvider::ticker_to_quote(ticker).unwrap_err();
        assert!(matches!(err, MarketDataError::ValidationFailed { .. }));
    }

    #[test]
    fn test_all_zero_ticker_is_symbol_not_found() {
        let mut ticker = sample_ticker();
        ticker.last_price = "0".to_string();
        ticker.open_price = "0".to_string();
        let err = BinanceProvider::ticker_to_quote(ticker).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
    }

    #[test]
    fn test_ticker_response_parsing() {
        let json = r#"{
            "symbol": "BTCUSDT",
            "lastPrice": "43250.10",
            "openPrice": "42000.00",
            "highPrice": "43500.00",
            "lowPrice": "41800.00",
            "volume": "28456.3",
            "closeTime": 1700000000000
        }"#;
        let ticker: Ticker24hrResponse = serde_json::from_str(json).unwrap();
        assert_eq!(ticker.symbol, "BTCUSDT");
        let quote = BinanceProvider::ticker_to_quote(ticker).unwrap();
        assert_eq!(quote.close, dec!(43250.10));
    }

    #[test]
    fn test_unsupported_historical() {
        let provider = BinanceProvider::new();
        assert!(!provider.capabilities().supports_historical);
    }
}
