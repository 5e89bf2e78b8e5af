//! Chart rendering.
//!
//! Renders a fetched price series into an encoded PNG artifact, one chart
//! kind at a time. Pure visualization: no numerical transformation happens
//! here beyond what the series already carries. An empty series produces an
//! explicit "no data" placeholder frame instead of an error; the caption on
//! the slide tells the reader why the frame is blank.
//!
//! Charts are drawn as plain geometry (no axis labels) so rendering never
//! depends on system fonts; captions and titles are carried as slide text by
//! the deck assembler instead.

use num_traits::ToPrimitive;
use plotters::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use marketdeck_market_data::returns::period_return;
use marketdeck_market_data::{PriceSeries, Symbol};

use crate::errors::RenderError;

/// Raster size of every chart artifact, 16:9 at a deck-friendly resolution.
pub const CHART_WIDTH: u32 = 960;
pub const CHART_HEIGHT: u32 = 540;

const MARGIN: i32 = 20;

/// The chart kinds offered by the report request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Closing price over time.
    Line,
    /// Trading volume per bucket.
    Bar,
    /// Open/high/low/close per bucket.
    Candlestick,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Candlestick => "candlestick",
        }
    }

    /// Slide title for a chart of this kind.
    fn title_for(&self, symbol: &Symbol) -> String {
        match self {
            Self::Line => format!("{} Closing Prices", symbol),
            Self::Bar => format!("{} Trading Volume", symbol),
            Self::Candlestick => format!("{} Candlestick", symbol),
        }
    }
}

/// An in-memory encoded chart image tied to one symbol and one chart kind.
#[derive(Clone, Debug)]
pub struct ChartArtifact {
    pub symbol: Symbol,
    pub kind: ChartKind,
    /// Slide title text.
    pub title: String,
    /// Slide caption text (key statistics, or the no-data notice).
    pub caption: String,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

/// Render a chart for the series.
///
/// An empty series degrades to [`placeholder_chart`] rather than failing.
pub fn render_chart(series: &PriceSeries, kind: ChartKind) -> Result<ChartArtifact, RenderError> {
    if series.is_empty() {
        debug!("Empty series for {}, rendering placeholder", series.symbol());
        return placeholder_chart(series.symbol(), kind);
    }

    let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;
        draw_frame(&root)?;

        match kind {
            ChartKind::Line => draw_line(&root, series)?,
            ChartKind::Bar => draw_bars(&root, series)?,
            ChartKind::Candlestick => draw_candles(&root, series)?,
        }

        root.present().map_err(drawing_error)?;
    }

    Ok(ChartArtifact {
        symbol: series.symbol().clone(),
        kind,
        title: kind.title_for(series.symbol()),
        caption: stats_caption(series),
        png: encode_png(buf)?,
    })
}

/// An explicit "no data" placeholder artifact: an empty crossed frame with
/// an explanatory caption.
pub fn placeholder_chart(symbol: &Symbol, kind: ChartKind) -> Result<ChartArtifact, RenderError> {
    let mut buf = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&RGBColor(245, 245, 245)).map_err(drawing_error)?;
        draw_frame(&root)?;

        let grey = RGBColor(200, 200, 200);
        let (w, h) = (CHART_WIDTH as i32, CHART_HEIGHT as i32);
        root.draw(&PathElement::new(vec![(0, 0), (w - 1, h - 1)], grey))
            .map_err(drawing_error)?;
        root.draw(&PathElement::new(vec![(0, h - 1), (w - 1, 0)], grey))
            .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
    }

    Ok(ChartArtifact {
        symbol: symbol.clone(),
        kind,
        title: kind.title_for(symbol),
        caption: "No data for the requested period".to_string(),
        png: encode_png(buf)?,
    })
}

// ============================================================================
// Drawing
// ============================================================================

type Area<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn draw_frame(root: &Area<'_>) -> Result<(), RenderError> {
    let (w, h) = (CHART_WIDTH as i32, CHART_HEIGHT as i32);
    root.draw(&Rectangle::new(
        [(0, 0), (w - 1, h - 1)],
        RGBColor(120, 120, 120),
    ))
    .map_err(drawing_error)
}

fn draw_line(root: &Area<'_>, series: &PriceSeries) -> Result<(), RenderError> {
    let points: Vec<(f64, f64)> = series
        .quotes()
        .iter()
        .enumerate()
        .filter_map(|(i, q)| q.close.to_f64().map(|c| (i as f64, c)))
        .collect();
    let (y_min, y_max) = padded_range(points.iter().map(|(_, y)| *y));

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN)
        .build_cartesian_2d(x_range(points.len()), y_min..y_max)
        .map_err(drawing_error)?;

    chart
        .draw_series(LineSeries::new(points, BLUE.stroke_width(2)))
        .map_err(drawing_error)?;
    Ok(())
}

fn draw_bars(root: &Area<'_>, series: &PriceSeries) -> Result<(), RenderError> {
    let bars: Vec<(f64, f64)> = series
        .quotes()
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let volume = q.volume.and_then(|v| v.to_f64()).unwrap_or(0.0);
            (i as f64, volume.max(0.0))
        })
        .collect();
    let y_max = bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
    let half_width = BAR_HALF_WIDTH;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN)
        .build_cartesian_2d(x_range(bars.len()), 0.0..y_max)
        .map_err(drawing_error)?;

    chart
        .draw_series(bars.iter().map(|(x, v)| {
            Rectangle::new(
                [(x - half_width, 0.0), (x + half_width, *v)],
                RGBColor(255, 165, 0).filled(),
            )
        }))
        .map_err(drawing_error)?;
    Ok(())
}

fn draw_candles(root: &Area<'_>, series: &PriceSeries) -> Result<(), RenderError> {
    let candles: Vec<(f64, f64, f64, f64, f64)> = series
        .quotes()
        .iter()
        .enumerate()
        .filter_map(|(i, q)| {
            let close = q.close.to_f64()?;
            let open = q.open.unwrap_or(q.close).to_f64()?;
            let high = q.high.unwrap_or(q.close).to_f64()?;
            let low = q.low.unwrap_or(q.close).to_f64()?;
            Some((i as f64, open, high, low, close))
        })
        .collect();
    let (y_min, y_max) = padded_range(
        candles
            .iter()
            .flat_map(|(_, o, h, l, c)| [*o, *h, *l, *c]),
    );

    let n = candles.len();
    let candle_width = ((CHART_WIDTH as f64 - 2.0 * MARGIN as f64) * 0.6 / n.max(1) as f64)
        .clamp(1.0, 20.0) as u32;

    let mut chart = ChartBuilder::on(root)
        .margin(MARGIN)
        .build_cartesian_2d(x_range(n), y_min..y_max)
        .map_err(drawing_error)?;

    chart
        .draw_series(candles.iter().map(|(x, open, high, low, close)| {
            CandleStick::new(
                *x,
                *open,
                *high,
                *low,
                *close,
                GREEN.filled(),
                RED.filled(),
                candle_width,
            )
        }))
        .map_err(drawing_error)?;
    Ok(())
}

// Bars sit at unit spacing, so 0.4 either side leaves a 20% gap.
const BAR_HALF_WIDTH: f64 = 0.4;

/// X range over row indices; widened for single-row series so the
/// coordinate span never collapses to zero.
fn x_range(len: usize) -> std::ops::Range<f64> {
    let max = (len.saturating_sub(1)).max(1) as f64;
    -0.5..(max + 0.5)
}

/// Y range padded by 5%, widened for constant series.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span <= f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min - span * 0.05, max + span * 0.05)
    }
}

// ============================================================================
// Caption and encoding
// ============================================================================

/// The key-statistics caption shown under every chart: latest close, period
/// high/low, and the period return.
fn stats_caption(series: &PriceSeries) -> String {
    let mut parts = Vec::new();
    if let Some(last) = series.last() {
        parts.push(format!("Last close {}", last.close.round_dp(2)));
    }
    if let Some(high) = series.period_high() {
        parts.push(format!("High {}", high.round_dp(2)));
    }
    if let Some(low) = series.period_low() {
        parts.push(format!("Low {}", low.round_dp(2)));
    }
    if let Some(metric) = period_return(series) {
        parts.push(format!("Period return {}%", percent(metric)));
    }
    parts.join("  |  ")
}

fn percent(metric: Decimal) -> Decimal {
    (metric * Decimal::from(100)).round_dp(2)
}

fn encode_png(buf: Vec<u8>) -> Result<Vec<u8>, RenderError> {
    let img = image::RgbImage::from_raw(CHART_WIDTH, CHART_HEIGHT, buf)
        .ok_or_else(|| RenderError::Encode("pixel buffer size mismatch".to_string()))?;
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use marketdeck_market_data::Quote;
    use rust_decimal_macros::dec;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    fn sample_series() -> PriceSeries {
        let quotes = (1..=5u32)
            .map(|day| {
                Quote::ohlcv(
                    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
                    Decimal::from(100 + day),
                    Decimal::from(102 + day),
                    Decimal::from(98 + day),
                    Decimal::from(101 + day),
                    Decimal::from(1000 * day),
                    "USD".to_string(),
                    "TEST".to_string(),
                )
            })
            .collect();
        PriceSeries::from_quotes(Symbol::equity("AAPL"), quotes)
    }

    #[test]
    fn test_render_all_kinds_produce_png() {
        let series = sample_series();
        for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Candlestick] {
            let artifact = render_chart(&series, kind).unwrap();
            assert_eq!(&artifact.png[..8], &PNG_MAGIC);
            assert_eq!(artifact.kind, kind);
            assert!(artifact.title.starts_with("AAPL"));
        }
    }

    #[test]
    fn test_empty_series_renders_placeholder() {
        let series = PriceSeries::empty(Symbol::equity("AAPL"));
        let artifact = render_chart(&series, ChartKind::Line).unwrap();
        assert_eq!(&artifact.png[..8], &PNG_MAGIC);
        assert_eq!(artifact.caption, "No data for the requested period");
    }

    #[test]
    fn test_single_row_series_renders() {
        let quote = Quote::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            dec!(100),
            "USD".to_string(),
            "TEST".to_string(),
        );
        let series = PriceSeries::from_quotes(Symbol::equity("AAPL"), vec![quote]);
        for kind in [ChartKind::Line, ChartKind::Bar, ChartKind::Candlestick] {
            render_chart(&series, kind).unwrap();
        }
    }

    #[test]
    fn test_caption_carries_key_statistics() {
        let artifact = render_chart(&sample_series(), ChartKind::Line).unwrap();
        assert!(artifact.caption.contains("Last close 106"));
        assert!(artifact.caption.contains("High 107"));
        assert!(artifact.caption.contains("Low 99"));
        assert!(artifact.caption.contains("Period return"));
    }
}
