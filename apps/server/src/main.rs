mod api;
mod config;
mod error;

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use marketdeck_market_data::{BinanceProvider, YahooProvider};
use marketdeck_report::ReportService;

use api::app_router;
use config::Config;

pub struct AppState {
    pub report_service: ReportService,
}

fn init_tracing() {
    let log_format = std::env::var("MD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn build_state() -> anyhow::Result<Arc<AppState>> {
    let equities = Arc::new(YahooProvider::new()?);
    let cryptos = Arc::new(BinanceProvider::new());
    Ok(Arc::new(AppState {
        report_service: ReportService::new(equities, cryptos),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let state = build_state()?;

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
