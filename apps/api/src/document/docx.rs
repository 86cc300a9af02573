//! WordprocessingML (DOCX) writer for [`ScoreDocument`].
//!
//! The package is the minimal set of parts Word and LibreOffice both accept:
//! content types, package relationships, core/app properties, the main
//! document, styles (carrying the document run defaults) and settings.
//!
//! Every [`Section`] maps to one `w:sectPr` with a next-page break. For all but
//! the final section the `sectPr` goes into the last paragraph's `w:pPr`, which
//! is how Word itself encodes section boundaries.

use std::io::{Cursor, Seek, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::model::{
    Alignment, Block, Borders, CellMargins, Orientation, PageSetup, Paragraph, Run, ScoreDocument,
    TabKind, Table, TableCell, TableLayout, Width,
};

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializes the document into an in-memory DOCX package.
pub fn to_bytes(doc: &ScoreDocument, created: DateTime<Utc>) -> Result<Vec<u8>, DocxError> {
    let cursor = write_to(doc, created, Cursor::new(Vec::new()))?;
    Ok(cursor.into_inner())
}

/// Serializes the document into `writer` and hands the writer back once the
/// ZIP central directory has been written.
pub fn write_to<W: Write + Seek>(
    doc: &ScoreDocument,
    created: DateTime<Utc>,
    writer: W,
) -> Result<W, DocxError> {
    let mut zip = ZipWriter::new(writer);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, String); 8] = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", package_rels_xml()),
        ("docProps/core.xml", core_xml(created)),
        ("docProps/app.xml", app_xml(doc.sections.len())),
        ("word/_rels/document.xml.rels", document_rels_xml()),
        ("word/document.xml", document_xml(doc)),
        ("word/styles.xml", styles_xml(doc)),
        ("word/settings.xml", settings_xml()),
    ];

    for (name, body) in &parts {
        zip.start_file(*name, opts)?;
        zip.write_all(body.as_bytes())?;
    }

    Ok(zip.finish()?)
}

// ────────────────────────────────────────────────────────────────────────────
// Main document part
// ────────────────────────────────────────────────────────────────────────────

fn document_xml(doc: &ScoreDocument) -> String {
    let mut out = String::with_capacity(64 * 1024);
    out.push_str(XML_DECL);
    out.push_str(&format!(
        r#"<w:document xmlns:w="{WML_NS}" xmlns:r="{REL_NS}"><w:body>"#
    ));

    let count = doc.sections.len();
    for (i, section) in doc.sections.iter().enumerate() {
        let available = section.page.text_width();
        let is_last = i + 1 == count;
        if is_last {
            write_blocks(&mut out, &section.blocks, available);
            write_sect_pr(&mut out, &section.page);
            continue;
        }

        // The section boundary rides on the final paragraph of the section.
        match section.blocks.split_last() {
            Some((Block::Paragraph(last), rest)) => {
                write_blocks(&mut out, rest, available);
                write_paragraph(&mut out, last, Some(&section.page));
            }
            _ => {
                write_blocks(&mut out, &section.blocks, available);
                write_paragraph(&mut out, &Paragraph::blank(), Some(&section.page));
            }
        }
    }

    if count == 0 {
        out.push_str("<w:p/>");
        write_sect_pr(&mut out, &PageSetup::default());
    }

    out.push_str("</w:body></w:document>");
    out
}

fn write_blocks(out: &mut String, blocks: &[Block], available: u32) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => write_paragraph(out, p, None),
            Block::Table(t) => write_table(out, t, available),
        }
    }
}

fn write_sect_pr(out: &mut String, page: &PageSetup) {
    let orient = match page.orientation {
        Orientation::Portrait => "portrait",
        Orientation::Landscape => "landscape",
    };
    let m = &page.margins;
    out.push_str(&format!(
        concat!(
            r#"<w:sectPr><w:type w:val="nextPage"/>"#,
            r#"<w:pgSz w:w="{}" w:h="{}" w:orient="{}"/>"#,
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="708" w:footer="708" w:gutter="0"/>"#,
            "</w:sectPr>"
        ),
        page.width, page.height, orient, m.top, m.right, m.bottom, m.left
    ));
}

fn write_paragraph(out: &mut String, p: &Paragraph, sect: Option<&PageSetup>) {
    out.push_str("<w:p>");

    let has_ppr = !p.tab_stops.is_empty() || p.alignment.is_some() || sect.is_some();
    if has_ppr {
        out.push_str("<w:pPr>");
        if !p.tab_stops.is_empty() {
            out.push_str("<w:tabs>");
            for stop in &p.tab_stops {
                let kind = match stop.kind {
                    TabKind::Left => "left",
                    TabKind::Center => "center",
                    TabKind::Right => "right",
                };
                out.push_str(&format!(
                    r#"<w:tab w:val="{kind}" w:pos="{}"/>"#,
                    stop.position
                ));
            }
            out.push_str("</w:tabs>");
        }
        if let Some(alignment) = p.alignment {
            let jc = match alignment {
                Alignment::Left => "left",
                Alignment::Center => "center",
                Alignment::Right => "right",
            };
            out.push_str(&format!(r#"<w:jc w:val="{jc}"/>"#));
        }
        if let Some(page) = sect {
            write_sect_pr(out, page);
        }
        out.push_str("</w:pPr>");
    }

    for run in &p.runs {
        write_run(out, run);
    }

    out.push_str("</w:p>");
}

fn write_run(out: &mut String, run: &Run) {
    out.push_str("<w:r>");

    let has_rpr =
        run.font.is_some() || run.bold || run.all_caps || run.size.is_some() || run.underline;
    if has_rpr {
        out.push_str("<w:rPr>");
        if let Some(font) = run.font {
            let font = escape(font);
            out.push_str(&format!(
                r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
            ));
        }
        if run.bold {
            out.push_str("<w:b/><w:bCs/>");
        }
        if run.all_caps {
            out.push_str("<w:caps/>");
        }
        if let Some(size) = run.size {
            out.push_str(&format!(r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#));
        }
        if run.underline {
            out.push_str(r#"<w:u w:val="single"/>"#);
        }
        out.push_str("</w:rPr>");
    }

    // Tabs and line breaks are their own run content elements in WML.
    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<w:br/>");
        }
        for (j, segment) in line.split('\t').enumerate() {
            if j > 0 {
                out.push_str("<w:tab/>");
            }
            if !segment.is_empty() {
                out.push_str(r#"<w:t xml:space="preserve">"#);
                out.push_str(&escape(segment));
                out.push_str("</w:t>");
            }
        }
    }

    out.push_str("</w:r>");
}

fn write_width(out: &mut String, tag: &str, width: Width) {
    match width {
        Width::Dxa(w) => out.push_str(&format!(r#"<w:{tag} w:w="{w}" w:type="dxa"/>"#)),
        // pct widths are expressed in fiftieths of a percent.
        Width::Percent(p) => out.push_str(&format!(
            r#"<w:{tag} w:w="{}" w:type="pct"/>"#,
            p * 50
        )),
    }
}

fn write_margins(out: &mut String, tag: &str, m: &CellMargins) {
    out.push_str(&format!(
        concat!(
            "<w:{tag}>",
            r#"<w:top w:w="{}" w:type="dxa"/>"#,
            r#"<w:left w:w="{}" w:type="dxa"/>"#,
            r#"<w:bottom w:w="{}" w:type="dxa"/>"#,
            r#"<w:right w:w="{}" w:type="dxa"/>"#,
            "</w:{tag}>"
        ),
        m.top,
        m.left,
        m.bottom,
        m.right,
        tag = tag
    ));
}

fn write_table(out: &mut String, table: &Table, available: u32) {
    let table_width = table.width.resolve(available);

    out.push_str("<w:tbl><w:tblPr>");
    write_width(out, "tblW", table.width);

    let (val, size, color) = match table.borders {
        Borders::Single => ("single", 4, "auto"),
        Borders::Hidden => ("none", 0, "FFFFFF"),
    };
    out.push_str("<w:tblBorders>");
    for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        out.push_str(&format!(
            r#"<w:{side} w:val="{val}" w:sz="{size}" w:space="0" w:color="{color}"/>"#
        ));
    }
    out.push_str("</w:tblBorders>");

    if table.layout == TableLayout::Fixed {
        out.push_str(r#"<w:tblLayout w:type="fixed"/>"#);
    }
    if let Some(margins) = &table.cell_margins {
        write_margins(out, "tblCellMar", margins);
    }
    out.push_str(r#"<w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/>"#);
    out.push_str("</w:tblPr>");

    out.push_str("<w:tblGrid>");
    for col in grid_columns(table, table_width) {
        out.push_str(&format!(r#"<w:gridCol w:w="{col}"/>"#));
    }
    out.push_str("</w:tblGrid>");

    for row in &table.rows {
        out.push_str("<w:tr>");
        for cell in &row.cells {
            write_cell(out, cell, table_width);
        }
        out.push_str("</w:tr>");
    }

    out.push_str("</w:tbl>");
}

fn write_cell(out: &mut String, cell: &TableCell, table_width: u32) {
    out.push_str("<w:tc><w:tcPr>");
    write_width(out, "tcW", cell.width);
    if let Some(margins) = &cell.margins {
        write_margins(out, "tcMar", margins);
    }
    out.push_str("</w:tcPr>");

    write_blocks(out, &cell.blocks, cell.width.resolve(table_width));

    // A cell must end with a paragraph.
    if !matches!(cell.blocks.last(), Some(Block::Paragraph(_))) {
        out.push_str("<w:p/>");
    }
    out.push_str("</w:tc>");
}

/// Grid column widths from the row with the most cells.
fn grid_columns(table: &Table, table_width: u32) -> Vec<u32> {
    table
        .rows
        .iter()
        .max_by_key(|r| r.cells.len())
        .map(|row| {
            row.cells
                .iter()
                .map(|c| c.width.resolve(table_width))
                .collect()
        })
        .unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────────────
// Package parts
// ────────────────────────────────────────────────────────────────────────────

fn content_types_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
            r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
            r#"<Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>"#,
            r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
            r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
            "</Types>"
        ),
        decl = XML_DECL
    )
}

fn package_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL
    )
}

fn document_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL
    )
}

fn core_xml(created: DateTime<Utc>) -> String {
    let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    format!(
        concat!(
            "{decl}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>Examination Raw Score Sheet</dc:title>",
            "<dc:creator>{creator}</dc:creator>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#,
            "</cp:coreProperties>"
        ),
        decl = XML_DECL,
        creator = env!("CARGO_PKG_NAME"),
        stamp = stamp
    )
}

fn app_xml(pages: usize) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
            "<Application>{app}</Application>",
            "<Pages>{pages}</Pages>",
            "</Properties>"
        ),
        decl = XML_DECL,
        app = env!("CARGO_PKG_NAME"),
        pages = pages
    )
}

fn styles_xml(doc: &ScoreDocument) -> String {
    let font = escape(doc.defaults.font);
    let size = doc.defaults.size;
    format!(
        concat!(
            "{decl}",
            r#"<w:styles xmlns:w="{ns}">"#,
            "<w:docDefaults><w:rPrDefault><w:rPr>",
            r#"<w:rFonts w:ascii="{font}" w:eastAsia="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#,
            r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/><w:lang w:val="en-US"/>"#,
            "</w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>",
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#,
            r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/>"#,
            r#"<w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar>"#,
            r#"<w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/>"#,
            r#"<w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/>"#,
            "</w:tblCellMar></w:tblPr></w:style>",
            "</w:styles>"
        ),
        decl = XML_DECL,
        ns = WML_NS,
        font = font,
        size = size
    )
}

fn settings_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<w:settings xmlns:w="{ns}">"#,
            r#"<w:defaultTabStop w:val="720"/>"#,
            r#"<w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat>"#,
            "</w:settings>"
        ),
        decl = XML_DECL,
        ns = WML_NS
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Control characters other than tab/newline are not legal in XML 1.0.
            c if (c as u32) < 0x20 && c != '\t' && c != '\n' && c != '\r' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::{
        CellMargins, PageMargins, RunDefaults, Section, TableCell, TableRow,
    };
    use chrono::TimeZone;
    use std::io::Read;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    fn page() -> PageSetup {
        PageSetup {
            margins: PageMargins {
                top: 1000,
                bottom: 1000,
                left: 900,
                right: 860,
            },
            ..PageSetup::default()
        }
    }

    fn section(text: &str) -> Section {
        let table = Table::new(Width::Dxa(2000)).fixed().row(TableRow::new(vec![
            TableCell::new(
                Width::Dxa(1000),
                vec![Paragraph::new().run(Run::new("cell")).into()],
            )
            .margins(CellMargins::uniform(100)),
            TableCell::new(Width::Dxa(1000), vec![]),
        ]));
        Section {
            page: page(),
            blocks: vec![
                Paragraph::new().run(Run::new(text).bold()).into(),
                table.into(),
                Paragraph::new().run(Run::new("end")).into(),
            ],
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        let mut content = String::new();
        zip.by_name(name)
            .expect("part present")
            .read_to_string(&mut content)
            .expect("utf-8 part");
        content
    }

    fn doc(sections: Vec<Section>) -> ScoreDocument {
        ScoreDocument {
            defaults: RunDefaults::default(),
            sections,
        }
    }

    #[test]
    fn test_package_contains_required_parts() {
        let bytes = to_bytes(&doc(vec![section("one")]), created()).unwrap();
        let zip = zip::ZipArchive::new(Cursor::new(&bytes[..])).unwrap();
        let names: Vec<&str> = zip.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "docProps/core.xml",
        ] {
            assert!(names.contains(&part), "missing {part}");
        }
    }

    #[test]
    fn test_one_sect_pr_per_section() {
        let bytes = to_bytes(
            &doc(vec![section("one"), section("two"), section("three")]),
            created(),
        )
        .unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        let parsed = roxmltree::Document::parse(&xml).expect("well-formed document.xml");
        let sect_count = parsed
            .descendants()
            .filter(|n| n.has_tag_name((WML_NS, "sectPr")))
            .count();
        assert_eq!(sect_count, 3);
        let page_sizes: Vec<_> = parsed
            .descendants()
            .filter(|n| n.has_tag_name((WML_NS, "pgSz")))
            .map(|n| n.attribute((WML_NS, "w")).unwrap_or_default().to_string())
            .collect();
        assert_eq!(page_sizes, vec!["11908", "11908", "11908"]);
    }

    #[test]
    fn test_empty_document_is_still_valid() {
        let bytes = to_bytes(&doc(vec![]), created()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        let parsed = roxmltree::Document::parse(&xml).unwrap();
        assert!(parsed
            .descendants()
            .any(|n| n.has_tag_name((WML_NS, "sectPr"))));
    }

    #[test]
    fn test_text_is_escaped_and_tabs_become_elements() {
        let mut s = section("A & B <c>");
        s.blocks.push(Paragraph::new().run(Run::new("left\tright")).into());
        let bytes = to_bytes(&doc(vec![s]), created()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        assert!(xml.contains("A &amp; B &lt;c&gt;"));
        assert!(xml.contains("left</w:t><w:tab/>"));
        roxmltree::Document::parse(&xml).expect("escaped output stays well-formed");
    }

    #[test]
    fn test_empty_cells_get_a_paragraph() {
        let bytes = to_bytes(&doc(vec![section("x")]), created()).unwrap();
        let xml = read_part(&bytes, "word/document.xml");
        let parsed = roxmltree::Document::parse(&xml).unwrap();
        for tc in parsed
            .descendants()
            .filter(|n| n.has_tag_name((WML_NS, "tc")))
        {
            let last = tc.children().filter(|n| n.is_element()).last().unwrap();
            assert!(last.has_tag_name((WML_NS, "p")));
        }
    }

    #[test]
    fn test_percent_widths_are_fiftieths() {
        let mut out = String::new();
        write_width(&mut out, "tblW", Width::Percent(60));
        assert_eq!(out, r#"<w:tblW w:w="3000" w:type="pct"/>"#);
    }

    #[test]
    fn test_styles_carry_document_defaults() {
        let bytes = to_bytes(&doc(vec![section("x")]), created()).unwrap();
        let styles = read_part(&bytes, "word/styles.xml");
        assert!(styles.contains(r#"w:ascii="Arial""#));
        assert!(styles.contains(r#"<w:sz w:val="22"/>"#));
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("2026-10-16T09:30:00Z"));
    }

    #[test]
    fn test_escape_drops_illegal_control_chars() {
        assert_eq!(escape("a\u{0001}b\"'"), "ab&quot;&apos;");
    }
}
