//! MarketDeck Report Crate
//!
//! Turns fetched market data into a downloadable slide deck:
//!
//! 1. render charts per symbol ([`chart`])
//! 2. assemble a deck: title slide, chart slides, one crypto summary table
//!    ([`deck`])
//! 3. export the deck as an in-memory PPTX byte stream ([`deck::exporter`])
//!
//! The [`pipeline`] module ties the stages together behind a single
//! `ReportService::generate` call: an immutable request in, deck bytes plus
//! per-symbol error notices out. A fetch or render failure for one symbol
//! never aborts the batch; only export failures fail the whole request.

pub mod chart;
pub mod deck;
pub mod errors;
pub mod pipeline;

pub use chart::{render_chart, ChartArtifact, ChartKind};
pub use deck::exporter::{export_pptx, PPTX_MIME_TYPE};
pub use deck::{ReportDeck, Slide};
pub use errors::{ExportError, RenderError, ReportError, SymbolError};
pub use pipeline::{ReportOutput, ReportRequest, ReportService};
