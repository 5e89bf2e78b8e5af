//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities
//! - Concrete provider implementations (Yahoo for equities, Binance for
//!   crypto)
//!
//! Providers are consumed as black-box request/response services: their rate
//! limits, auth schemes, and full schemas are not reimplemented here. There
//! are no retries and no circuit breaking anywhere in this pipeline; a
//! provider failure for one symbol is reported and the batch moves on.

mod capabilities;
mod traits;

pub mod binance;
pub mod yahoo;

// Re-exports
pub use capabilities::ProviderCapabilities;
pub use traits::MarketDataProvider;
