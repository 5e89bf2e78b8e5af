//! Slide deck assembly.
//!
//! A [`ReportDeck`] is an ordered sequence of slides: slide 1 is always the
//! title slide, every further slide holds exactly one chart or one summary
//! table. Slides keep insertion order, so identical input produces an
//! identical deck.

pub mod exporter;
mod xml;

use crate::chart::ChartArtifact;

/// A content slide. The title slide is implicit and built from the deck's
/// own title/subtitle.
#[derive(Clone, Debug)]
pub enum Slide {
    /// One chart image with a title and a caption.
    Chart(ChartArtifact),
    /// One table: a header row plus data rows.
    Table {
        title: String,
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// An ordered slide deck for one report.
#[derive(Clone, Debug)]
pub struct ReportDeck {
    title: String,
    subtitle: String,
    slides: Vec<Slide>,
}

impl ReportDeck {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            slides: Vec::new(),
        }
    }

    /// Append one chart slide.
    pub fn add_chart_slide(&mut self, artifact: ChartArtifact) {
        self.slides.push(Slide::Chart(artifact));
    }

    /// Append one table slide summarizing several assets together.
    pub fn add_table_slide(
        &mut self,
        title: impl Into<String>,
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    ) {
        self.slides.push(Slide::Table {
            title: title.into(),
            header,
            rows,
        });
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// Content slides in insertion order (excludes the title slide).
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Total slide count including the title slide.
    pub fn slide_count(&self) -> usize {
        1 + self.slides.len()
    }
}
