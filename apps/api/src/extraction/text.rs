//! Uploaded file → plain text for the extraction prompt.
//!
//! DOCX: every `w:p` in `word/document.xml`, in document order (table cells
//! included), one paragraph per block separated by a blank line.
//! PDF: whatever `pdf-extract` recovers from the content streams.

use std::io::{Cursor, Read};

use crate::extraction::{DocumentKind, ExtractionError};

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Converts raw file bytes to text. Fails if nothing readable comes out.
pub fn to_plain_text(kind: DocumentKind, bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = match kind {
        DocumentKind::Docx => docx_text(bytes)?,
        DocumentKind::Pdf => pdf_text(bytes)?,
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }
    Ok(text)
}

fn pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::Unreadable(format!("PDF text extraction failed: {e}")))
}

fn docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|_| ExtractionError::Unreadable("file is not a ZIP archive".into()))?;

    let mut xml = String::new();
    zip.by_name("word/document.xml")
        .map_err(|_| ExtractionError::Unreadable("missing word/document.xml".into()))?
        .read_to_string(&mut xml)?;

    let doc = roxmltree::Document::parse(&xml)
        .map_err(|e| ExtractionError::Unreadable(format!("malformed document.xml: {e}")))?;

    let paragraphs: Vec<String> = doc
        .descendants()
        .filter(|n| n.has_tag_name((WML_NS, "p")))
        .map(paragraph_text)
        .filter(|t| !t.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n\n"))
}

fn paragraph_text(p: roxmltree::Node) -> String {
    let mut out = String::new();
    for node in p.descendants() {
        // Only run content counts; w:tab also appears in w:pPr/w:tabs as a stop.
        let in_run = node
            .parent()
            .is_some_and(|parent| parent.has_tag_name((WML_NS, "r")));
        if !in_run {
            continue;
        }
        match node.tag_name().name() {
            "t" => out.push_str(node.text().unwrap_or_default()),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="{WML_NS}"><w:body>{body}</w:body></w:document>"#
        );
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_are_separated_by_blank_lines() {
        let bytes = docx_with_body(
            r#"<w:p><w:r><w:t>Scores</w:t></w:r></w:p><w:p/><w:p><w:r><w:t xml:space="preserve">AB01 </w:t></w:r><w:r><w:t>20</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            to_plain_text(DocumentKind::Docx, &bytes).unwrap(),
            "Scores\n\nAB01 20"
        );
    }

    #[test]
    fn test_tab_stops_are_not_text_but_run_tabs_are() {
        let bytes = docx_with_body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>AB01</w:t><w:tab/><w:t>70</w:t><w:br/><w:t>next</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            to_plain_text(DocumentKind::Docx, &bytes).unwrap(),
            "AB01\t70\nnext"
        );
    }

    #[test]
    fn test_table_cells_are_read_in_order() {
        let bytes = docx_with_body(concat!(
            "<w:tbl><w:tr>",
            "<w:tc><w:p><w:r><w:t>1</w:t></w:r></w:p></w:tc>",
            "<w:tc><w:p><w:r><w:t>AB01</w:t></w:r></w:p></w:tc>",
            "</w:tr></w:tbl>"
        ));
        assert_eq!(
            to_plain_text(DocumentKind::Docx, &bytes).unwrap(),
            "1\n\nAB01"
        );
    }

    #[test]
    fn test_not_a_zip_is_unreadable() {
        let err = to_plain_text(DocumentKind::Docx, b"plain text, not a docx").unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }

    #[test]
    fn test_zip_without_document_part_is_unreadable() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("hello.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hi").unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        let err = to_plain_text(DocumentKind::Docx, &bytes).unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(msg) if msg.contains("document.xml")));
    }

    #[test]
    fn test_empty_docx_is_empty_document() {
        let bytes = docx_with_body("<w:p/><w:p><w:r><w:t>  </w:t></w:r></w:p>");
        assert!(matches!(
            to_plain_text(DocumentKind::Docx, &bytes),
            Err(ExtractionError::EmptyDocument)
        ));
    }
}
