//! Document Assembler: paginate, render each page, collect the sections.

use tracing::debug;

use crate::document::model::{RunDefaults, ScoreDocument};
use crate::layout::page::{render_page, PageSection};
use crate::layout::paginator::paginate;
use crate::models::record::Record;

/// Renders every page of `records`, numbering pages from 1.
///
/// An empty record list yields no pages.
pub fn render_pages(records: &[Record]) -> Vec<PageSection> {
    paginate(records)
        .iter()
        .enumerate()
        .map(|(i, page)| render_page(page, i + 1))
        .collect()
}

/// Builds the full document model for `records`.
pub fn assemble(records: &[Record]) -> ScoreDocument {
    let pages = render_pages(records);
    debug!(
        "Assembled {} record(s) into {} page(s)",
        records.len(),
        pages.len()
    );

    ScoreDocument {
        defaults: RunDefaults::default(),
        sections: pages.into_iter().map(|p| p.section).collect(),
    }
}
