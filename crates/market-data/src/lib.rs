//! MarketDeck Market Data Crate
//!
//! Provider-agnostic market data fetching for the MarketDeck report
//! generator.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Equities: historical OHLCV series over a date range (Yahoo Finance)
//! - Crypto assets: point-in-time 24h ticker quotes (Binance)
//! - Symbol list parsing and normalization
//! - Period-return arithmetic on fetched data
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Symbol parsing  | --> |     Symbol       |  (normalized identity)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (Yahoo, Binance)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          | Quote / Series   |  (market data)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Symbol`] - Normalized instrument identifier
//! - [`Quote`] - Market data quote with OHLCV data
//! - [`PriceSeries`] - Date-ordered quote series for one symbol
//! - [`Period`] / [`DateRange`] - Requested time window
//! - [`MarketDataProvider`] - Trait implemented by provider adapters

pub mod errors;
pub mod models;
pub mod provider;
pub mod returns;
pub mod symbol;

// Re-export all public types from models
pub use models::{AssetKind, DateRange, Period, PriceSeries, Quote};

// Re-export symbol types
pub use symbol::{parse_symbol_list, Symbol};

// Re-export provider types
pub use provider::binance::BinanceProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities};

// Re-export error types
pub use errors::MarketDataError;
