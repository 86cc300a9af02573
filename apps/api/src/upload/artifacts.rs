//! Scratch files for one upload request.
//!
//! The uploaded bytes and the generated DOCX both live in `NamedTempFile`s
//! owned by a single [`ScratchFiles`] value. Dropping it removes both files,
//! whichever way the request ends.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::document::docx::write_to;
use crate::document::DocxError;
use crate::extraction::DocumentKind;
use crate::layout::assemble;
use crate::models::record::Record;

pub struct ScratchFiles {
    input: NamedTempFile,
    output: NamedTempFile,
}

impl ScratchFiles {
    /// Writes the uploaded bytes to a fresh temp file with the kind's extension.
    pub fn create(kind: DocumentKind, bytes: &[u8]) -> std::io::Result<Self> {
        let suffix = match kind {
            DocumentKind::Docx => ".docx",
            DocumentKind::Pdf => ".pdf",
        };
        let mut input = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(suffix)
            .tempfile()?;
        input.write_all(bytes)?;
        input.flush()?;

        let output = tempfile::Builder::new()
            .prefix("processed-")
            .suffix(".docx")
            .tempfile()?;

        debug!(
            "Scratch files: input={} output={}",
            input.path().display(),
            output.path().display()
        );
        Ok(Self { input, output })
    }

    pub fn input_path(&self) -> &Path {
        self.input.path()
    }

    pub fn output_path(&self) -> &Path {
        self.output.path()
    }

    /// Lays out `records`, writes the DOCX to the output file and reads it back.
    pub fn render(
        &mut self,
        records: &[Record],
        created: DateTime<Utc>,
    ) -> Result<Vec<u8>, DocxError> {
        let doc = assemble(records);

        let file = self.output.as_file_mut();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        let file = write_to(&doc, created, file)?;
        file.flush()?;

        file.seek(SeekFrom::Start(0))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Score;
    use std::io::Cursor;

    fn record(reg_no: &str) -> Record {
        Record {
            reg_no: Some(reg_no.to_string()),
            total: Some(Score::Integer(61)),
            ..Record::default()
        }
    }

    #[test]
    fn test_input_file_holds_upload() {
        let scratch = ScratchFiles::create(DocumentKind::Pdf, b"%PDF-1.4 fake").unwrap();
        assert_eq!(std::fs::read(scratch.input_path()).unwrap(), b"%PDF-1.4 fake");
        assert!(scratch.input_path().to_string_lossy().ends_with(".pdf"));
    }

    #[test]
    fn test_render_writes_docx_to_output() {
        let mut scratch = ScratchFiles::create(DocumentKind::Docx, b"ignored").unwrap();
        let bytes = scratch.render(&[record("AB01")], Utc::now()).unwrap();

        assert_eq!(&bytes[..2], b"PK");
        assert_eq!(std::fs::read(scratch.output_path()).unwrap(), bytes);

        let zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert!(zip.file_names().any(|n| n == "word/document.xml"));
    }

    #[test]
    fn test_render_twice_replaces_output() {
        let mut scratch = ScratchFiles::create(DocumentKind::Docx, b"").unwrap();
        let many: Vec<Record> = (0..90).map(|i| record(&format!("R{i}"))).collect();
        scratch.render(&many, Utc::now()).unwrap();
        let small = scratch.render(&[], Utc::now()).unwrap();
        assert_eq!(std::fs::read(scratch.output_path()).unwrap(), small);
    }

    #[test]
    fn test_drop_removes_both_files() {
        let scratch = ScratchFiles::create(DocumentKind::Docx, b"x").unwrap();
        let input = scratch.input_path().to_path_buf();
        let output = scratch.output_path().to_path_buf();
        assert!(input.exists() && output.exists());

        drop(scratch);
        assert!(!input.exists());
        assert!(!output.exists());
    }
}
