//! Error types for report generation.
//!
//! Stage-local errors (fetch, render) are converted into per-symbol notices
//! or placeholders and keep the batch alive. Export errors fail the whole
//! request: a partially serialized deck container is not usable.

use serde::Serialize;
use thiserror::Error;

use marketdeck_market_data::{AssetKind, Symbol};

/// Chart rendering failure. Degrades to a placeholder at the pipeline level
/// rather than propagating.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart drawing failed: {0}")]
    Drawing(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Deck serialization failure. Fatal to the current request; no partial
/// file is offered.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Deck container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A per-symbol error notice surfaced to the caller alongside the deck.
#[derive(Clone, Debug, Serialize)]
pub struct SymbolError {
    /// The symbol that failed
    pub symbol: Symbol,
    /// Which provider family the symbol belongs to
    pub kind: AssetKind,
    /// Human-readable failure description
    pub message: String,
}

impl SymbolError {
    pub fn new(symbol: Symbol, kind: AssetKind, message: impl Into<String>) -> Self {
        Self {
            symbol,
            kind,
            message: message.into(),
        }
    }
}

/// Request-level report generation errors.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The parsed request contained no symbols; no deck is generated.
    #[error("No symbols to process")]
    EmptyRequest,

    /// Every requested symbol failed to fetch; no deck is generated.
    #[error("All requested symbols failed to fetch")]
    AllSymbolsFailed(Vec<SymbolError>),

    /// Deck serialization failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}
