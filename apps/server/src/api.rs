use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use marketdeck_market_data::{DateRange, Period};
use marketdeck_report::{ChartKind, ReportRequest, PPTX_MIME_TYPE};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn readyz() -> &'static str {
    "ok"
}

/// Report generation request body.
///
/// Dates are calendar days; the end date is inclusive.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateReportBody {
    #[serde(default)]
    symbols: String,
    #[serde(default)]
    crypto_symbols: String,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    period: Option<Period>,
    #[serde(default)]
    charts: Vec<ChartKind>,
    #[serde(default)]
    title: Option<String>,
}

impl GenerateReportBody {
    fn date_range(&self) -> ApiResult<Option<DateRange>> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                if start > end {
                    return Err(ApiError::BadRequest(
                        "startDate must not be after endDate".to_string(),
                    ));
                }
                let start = Utc
                    .from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default());
                let end = Utc
                    .from_utc_datetime(&end.and_hms_opt(23, 59, 59).unwrap_or_default());
                Ok(Some(DateRange::new(start, end)))
            }
            (None, None) => Ok(None),
            _ => Err(ApiError::BadRequest(
                "startDate and endDate must be provided together".to_string(),
            )),
        }
    }
}

async fn generate_report(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateReportBody>,
) -> ApiResult<Response> {
    let request = ReportRequest {
        equities: body.symbols.clone(),
        cryptos: body.crypto_symbols.clone(),
        date_range: body.date_range()?,
        period: body.period,
        charts: body.charts.clone(),
        title: body.title.clone(),
    };

    let output = state.report_service.generate(&request).await?;
    tracing::info!(
        "Report generated: {} slides, {} symbol errors",
        output.slide_count,
        output.errors.len()
    );

    // Per-symbol notices ride along as a header so the deck download stays
    // the response body.
    let warnings = serde_json::to_string(&output.errors)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let mut response = (StatusCode::OK, output.deck).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(PPTX_MIME_TYPE),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"report.pptx\""),
    );
    if let Ok(value) = HeaderValue::from_str(&warnings) {
        headers.insert("x-symbol-errors", value);
    }
    Ok(response)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any).allow_headers(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/reports", post(generate_report));

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_defaults_are_empty() {
        let body: GenerateReportBody = serde_json::from_str("{}").unwrap();
        assert!(body.symbols.is_empty());
        assert!(body.crypto_symbols.is_empty());
        assert!(body.date_range().unwrap().is_none());
    }

    #[test]
    fn test_body_parses_camel_case() {
        let body: GenerateReportBody = serde_json::from_str(
            r#"{
                "symbols": "AAPL, MSFT",
                "cryptoSymbols": "BTC/USDT",
                "startDate": "2024-01-01",
                "endDate": "2024-03-01",
                "charts": ["line", "candlestick"]
            }"#,
        )
        .unwrap();
        assert_eq!(body.symbols, "AAPL, MSFT");
        let range = body.date_range().unwrap().unwrap();
        assert!(range.start < range.end);
        assert_eq!(body.charts.len(), 2);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let body: GenerateReportBody = serde_json::from_str(
            r#"{"startDate": "2024-03-01", "endDate": "2024-01-01"}"#,
        )
        .unwrap();
        assert!(body.date_range().is_err());
    }

    #[test]
    fn test_half_open_range_rejected() {
        let body: GenerateReportBody =
            serde_json::from_str(r#"{"startDate": "2024-01-01"}"#).unwrap();
        assert!(body.date_range().is_err());
    }
}
