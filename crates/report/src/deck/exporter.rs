//! PPTX serialization.
//!
//! Writes a [`ReportDeck`] into its native container format: an OOXML zip
//! package, fully buffered in memory. The returned byte vector starts at the
//! beginning of the container, ready to be handed to a caller for download.
//! Any failure here fails the whole request; a partially serialized
//! container is never returned.

use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::deck::xml;
use crate::deck::{ReportDeck, Slide};
use crate::errors::ExportError;

/// MIME type of the exported container.
pub const PPTX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Serialize the deck into PPTX bytes.
pub fn export_pptx(deck: &ReportDeck) -> Result<Vec<u8>, ExportError> {
    let slide_count = deck.slide_count();
    debug!("Exporting deck '{}' with {} slides", deck.title(), slide_count);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let write_part = |zip: &mut ZipWriter<Cursor<Vec<u8>>>,
                          name: &str,
                          data: &[u8]|
     -> Result<(), ExportError> {
        zip.start_file(name, options)?;
        zip.write_all(data)?;
        Ok(())
    };

    // Package scaffolding
    write_part(
        &mut zip,
        "[Content_Types].xml",
        xml::content_types(slide_count).as_bytes(),
    )?;
    write_part(&mut zip, "_rels/.rels", xml::ROOT_RELS.as_bytes())?;
    write_part(
        &mut zip,
        "ppt/presentation.xml",
        xml::presentation(slide_count).as_bytes(),
    )?;
    write_part(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        xml::presentation_rels(slide_count).as_bytes(),
    )?;
    write_part(
        &mut zip,
        "ppt/slideMasters/slideMaster1.xml",
        xml::slide_master().as_bytes(),
    )?;
    write_part(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        xml::SLIDE_MASTER_RELS.as_bytes(),
    )?;
    write_part(
        &mut zip,
        "ppt/slideLayouts/slideLayout1.xml",
        xml::slide_layout().as_bytes(),
    )?;
    write_part(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        xml::SLIDE_LAYOUT_RELS.as_bytes(),
    )?;
    write_part(&mut zip, "ppt/theme/theme1.xml", xml::theme().as_bytes())?;

    // Slide 1: title slide
    let title_shapes = format!(
        "{}{}",
        xml::text_shape(
            2,
            xml::inches(0.75),
            xml::inches(2.4),
            xml::inches(8.5),
            xml::inches(1.2),
            deck.title(),
            4000,
            true,
            true,
        ),
        xml::text_shape(
            3,
            xml::inches(0.75),
            xml::inches(3.8),
            xml::inches(8.5),
            xml::inches(0.8),
            deck.subtitle(),
            2000,
            false,
            true,
        )
    );
    write_part(
        &mut zip,
        "ppt/slides/slide1.xml",
        xml::slide(&title_shapes).as_bytes(),
    )?;
    write_part(
        &mut zip,
        "ppt/slides/_rels/slide1.xml.rels",
        xml::slide_rels(None).as_bytes(),
    )?;

    // Content slides
    let mut image_index = 0usize;
    for (i, slide) in deck.slides().iter().enumerate() {
        let slide_number = i + 2;
        let (shapes, image) = match slide {
            Slide::Chart(artifact) => {
                image_index += 1;
                write_part(
                    &mut zip,
                    &format!("ppt/media/image{image_index}.png"),
                    &artifact.png,
                )?;
                (chart_shapes(&artifact.title, &artifact.caption), Some(image_index))
            }
            Slide::Table {
                title,
                header,
                rows,
            } => (table_shapes(title, header, rows), None),
        };
        write_part(
            &mut zip,
            &format!("ppt/slides/slide{slide_number}.xml"),
            xml::slide(&shapes).as_bytes(),
        )?;
        write_part(
            &mut zip,
            &format!("ppt/slides/_rels/slide{slide_number}.xml.rels"),
            xml::slide_rels(image).as_bytes(),
        )?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

/// Title text, the chart picture at 8x4.5 inches, and the caption beneath.
fn chart_shapes(title: &str, caption: &str) -> String {
    format!(
        "{}{}{}",
        xml::text_shape(
            2,
            xml::inches(0.5),
            xml::inches(0.35),
            xml::inches(9.0),
            xml::inches(0.8),
            title,
            2800,
            true,
            false,
        ),
        xml::picture_shape(
            3,
            title,
            xml::inches(1.0),
            xml::inches(1.4),
            xml::inches(8.0),
            xml::inches(4.5),
        ),
        xml::text_shape(
            4,
            xml::inches(1.0),
            xml::inches(6.1),
            xml::inches(8.0),
            xml::inches(0.6),
            caption,
            1400,
            false,
            false,
        )
    )
}

fn table_shapes(title: &str, header: &[String], rows: &[Vec<String>]) -> String {
    format!(
        "{}{}",
        xml::text_shape(
            2,
            xml::inches(0.5),
            xml::inches(0.35),
            xml::inches(9.0),
            xml::inches(0.8),
            title,
            2800,
            true,
            false,
        ),
        xml::table_frame(
            3,
            xml::inches(1.0),
            xml::inches(1.5),
            xml::inches(8.0),
            header,
            rows,
        )
    )
}
