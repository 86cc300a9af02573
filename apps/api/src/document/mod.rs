//! Document model and its DOCX serialization.

pub mod docx;
pub mod model;

pub use docx::{DocxError, DOCX_MIME};
