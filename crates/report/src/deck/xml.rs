//! OOXML part templates for the PPTX container.
//!
//! The deck is written as a minimal PresentationML package: one presentation
//! part, one slide master with a single blank layout and theme, one slide
//! part per deck slide, and one PNG media part per chart. Part XML is built
//! from string templates; everything user-supplied goes through [`escape`].

pub(crate) const EMU_PER_INCH: i64 = 914_400;

/// Convert inches to EMU, the coordinate unit of the container format.
pub(crate) fn inches(v: f64) -> i64 {
    (v * EMU_PER_INCH as f64) as i64
}

/// Escape text for embedding into an XML text node or attribute.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

// ============================================================================
// Package-level parts
// ============================================================================

pub(crate) fn content_types(slide_count: usize) -> String {
    let mut overrides = String::new();
    for i in 1..=slide_count {
        overrides.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{i}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>"
        ));
    }
    format!(
        "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Default Extension=\"png\" ContentType=\"image/png\"/>\
         <Override PartName=\"/ppt/presentation.xml\" \
          ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
         <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" \
          ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
         <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" \
          ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>\
         <Override PartName=\"/ppt/theme/theme1.xml\" \
          ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>\
         {overrides}</Types>"
    )
}

pub(crate) const ROOT_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" ",
    "Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" ",
    "Target=\"ppt/presentation.xml\"/>",
    "</Relationships>"
);

pub(crate) fn presentation(slide_count: usize) -> String {
    let mut slide_ids = String::new();
    for i in 1..=slide_count {
        slide_ids.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            255 + i,
            1 + i
        ));
    }
    format!(
        "{XML_DECL}<p:presentation \
         xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{slide_ids}</p:sldIdLst>\
         <p:sldSz cx=\"9144000\" cy=\"6858000\" type=\"screen4x3\"/>\
         <p:notesSz cx=\"6858000\" cy=\"9144000\"/>\
         </p:presentation>"
    )
}

pub(crate) fn presentation_rels(slide_count: usize) -> String {
    let mut rels = String::from(
        "<Relationship Id=\"rId1\" \
         Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" \
         Target=\"slideMasters/slideMaster1.xml\"/>",
    );
    for i in 1..=slide_count {
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" \
             Target=\"slides/slide{i}.xml\"/>",
            1 + i
        ));
    }
    format!(
        "{XML_DECL}<Relationships \
         xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{rels}</Relationships>"
    )
}

// ============================================================================
// Master / layout / theme
// ============================================================================

const EMPTY_SP_TREE: &str = "<p:spTree>\
    <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
    <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
    <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
    </p:spTree>";

pub(crate) fn slide_master() -> String {
    format!(
        "{XML_DECL}<p:sldMaster \
         xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"FFFFFF\"/></a:solidFill>\
         <a:effectLst/></p:bgPr></p:bg>{EMPTY_SP_TREE}</p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" \
         accent1=\"accent1\" accent2=\"accent2\" accent3=\"accent3\" accent4=\"accent4\" \
         accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
         </p:sldMaster>"
    )
}

pub(crate) const SLIDE_MASTER_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" ",
    "Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout\" ",
    "Target=\"../slideLayouts/slideLayout1.xml\"/>",
    "<Relationship Id=\"rId2\" ",
    "Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme\" ",
    "Target=\"../theme/theme1.xml\"/>",
    "</Relationships>"
);

pub(crate) fn slide_layout() -> String {
    format!(
        "{XML_DECL}<p:sldLayout \
         xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" \
         type=\"blank\" preserve=\"1\">\
         <p:cSld name=\"Blank\">{EMPTY_SP_TREE}</p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sldLayout>"
    )
}

pub(crate) const SLIDE_LAYOUT_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" ",
    "Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" ",
    "Target=\"../slideMasters/slideMaster1.xml\"/>",
    "</Relationships>"
);

/// Minimal but complete theme part: color scheme, font scheme, and the three
/// mandatory entries of each format scheme list.
pub(crate) fn theme() -> String {
    let fill = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    let line = "<a:ln w=\"9525\" cap=\"flat\" cmpd=\"sng\" algn=\"ctr\">\
                <a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
                <a:prstDash val=\"solid\"/></a:ln>";
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    format!(
        "{XML_DECL}<a:theme \
         xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"MarketDeck\">\
         <a:themeElements>\
         <a:clrScheme name=\"MarketDeck\">\
         <a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>\
         <a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>\
         <a:dk2><a:srgbClr val=\"44546A\"/></a:dk2>\
         <a:lt2><a:srgbClr val=\"E7E6E6\"/></a:lt2>\
         <a:accent1><a:srgbClr val=\"4472C4\"/></a:accent1>\
         <a:accent2><a:srgbClr val=\"ED7D31\"/></a:accent2>\
         <a:accent3><a:srgbClr val=\"A5A5A5\"/></a:accent3>\
         <a:accent4><a:srgbClr val=\"FFC000\"/></a:accent4>\
         <a:accent5><a:srgbClr val=\"5B9BD5\"/></a:accent5>\
         <a:accent6><a:srgbClr val=\"70AD47\"/></a:accent6>\
         <a:hlink><a:srgbClr val=\"0563C1\"/></a:hlink>\
         <a:folHlink><a:srgbClr val=\"954F72\"/></a:folHlink>\
         </a:clrScheme>\
         <a:fontScheme name=\"MarketDeck\">\
         <a:majorFont><a:latin typeface=\"Calibri Light\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
         <a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
         </a:fontScheme>\
         <a:fmtScheme name=\"MarketDeck\">\
         <a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>\
         <a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>\
         <a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>\
         <a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst>\
         </a:fmtScheme>\
         </a:themeElements>\
         </a:theme>"
    )
}

// ============================================================================
// Slides
// ============================================================================

pub(crate) fn slide(shapes: &str) -> String {
    format!(
        "{XML_DECL}<p:sld \
         xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr/>\
         {shapes}\
         </p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sld>"
    )
}

/// Relationships for one slide: the layout, plus the slide's image when it
/// carries a chart.
pub(crate) fn slide_rels(image_index: Option<usize>) -> String {
    let mut rels = String::from(
        "<Relationship Id=\"rId1\" \
         Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout\" \
         Target=\"../slideLayouts/slideLayout1.xml\"/>",
    );
    if let Some(index) = image_index {
        rels.push_str(&format!(
            "<Relationship Id=\"rId2\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" \
             Target=\"../media/image{index}.png\"/>"
        ));
    }
    format!(
        "{XML_DECL}<Relationships \
         xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{rels}</Relationships>"
    )
}

/// A plain text box shape.
#[allow(clippy::too_many_arguments)]
pub(crate) fn text_shape(
    id: u32,
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
    text: &str,
    size_hundredths_pt: u32,
    bold: bool,
    centered: bool,
) -> String {
    let bold_attr = if bold { " b=\"1\"" } else { "" };
    let align = if centered { "<a:pPr algn=\"ctr\"/>" } else { "" };
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"TextBox {id}\"/>\
         <p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         <p:txBody><a:bodyPr wrap=\"square\"/><a:lstStyle/>\
         <a:p>{align}<a:r><a:rPr lang=\"en-US\" sz=\"{size_hundredths_pt}\"{bold_attr}/>\
         <a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>",
        escape(text)
    )
}

/// A picture shape referencing the slide's rId2 image relationship.
pub(crate) fn picture_shape(id: u32, name: &str, x: i64, y: i64, cx: i64, cy: i64) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"{}\"/>\
         <p:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"rId2\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
         <p:spPr><a:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>",
        escape(name)
    )
}

/// A table shape: one header row plus data rows, columns sized evenly.
pub(crate) fn table_frame(
    id: u32,
    x: i64,
    y: i64,
    cx: i64,
    header: &[String],
    rows: &[Vec<String>],
) -> String {
    let cols = header.len().max(1);
    let col_width = cx / cols as i64;
    let grid: String = (0..cols)
        .map(|_| format!("<a:gridCol w=\"{col_width}\"/>"))
        .collect();

    let mut body = table_row(header, true);
    for row in rows {
        body.push_str(&table_row(row, false));
    }

    let row_height: i64 = 365_760; // 0.4 inch
    let cy = row_height * (1 + rows.len()) as i64;
    format!(
        "<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id=\"{id}\" name=\"Table {id}\"/>\
         <p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>\
         <p:xfrm><a:off x=\"{x}\" y=\"{y}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></p:xfrm>\
         <a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/table\">\
         <a:tbl><a:tblPr firstRow=\"1\" bandRow=\"1\"/><a:tblGrid>{grid}</a:tblGrid>{body}</a:tbl>\
         </a:graphicData></a:graphic></p:graphicFrame>"
    )
}

fn table_row(cells: &[String], bold: bool) -> String {
    let bold_attr = if bold { " b=\"1\"" } else { "" };
    let cells_xml: String = cells
        .iter()
        .map(|cell| {
            format!(
                "<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>\
                 <a:p><a:r><a:rPr lang=\"en-US\"{bold_attr}/><a:t>{}</a:t></a:r></a:p>\
                 </a:txBody><a:tcPr/></a:tc>",
                escape(cell)
            )
        })
        .collect();
    format!("<a:tr h=\"365760\">{cells_xml}</a:tr>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("AT&T <\"x\">"), "AT&amp;T &lt;&quot;x&quot;&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_content_types_lists_every_slide() {
        let xml = content_types(3);
        assert!(xml.contains("/ppt/slides/slide1.xml"));
        assert!(xml.contains("/ppt/slides/slide3.xml"));
        assert!(!xml.contains("/ppt/slides/slide4.xml"));
    }

    #[test]
    fn test_presentation_rels_offsets_slide_ids() {
        let xml = presentation_rels(2);
        // rId1 is the master; slides start at rId2
        assert!(xml.contains("Id=\"rId2\""));
        assert!(xml.contains("Target=\"slides/slide1.xml\""));
        assert!(xml.contains("Id=\"rId3\""));
        assert!(xml.contains("Target=\"slides/slide2.xml\""));
    }

    #[test]
    fn test_slide_rels_with_image() {
        let with = slide_rels(Some(2));
        assert!(with.contains("../media/image2.png"));
        let without = slide_rels(None);
        assert!(!without.contains("image"));
    }

    #[test]
    fn test_text_shape_escapes_content() {
        let xml = text_shape(2, 0, 0, 100, 100, "R&D", 1800, false, false);
        assert!(xml.contains("<a:t>R&amp;D</a:t>"));
    }

    #[test]
    fn test_inches() {
        assert_eq!(inches(1.0), 914_400);
        assert_eq!(inches(0.5), 457_200);
    }
}
