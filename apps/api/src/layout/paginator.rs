//! Paginator: splits the record list into fixed-capacity two-column pages.
//!
//! Record `i` lands on page `i / 40`, column `(i % 40) / 20`, row `(i % 40) % 20`.
//! Every page but the last is full; the last page fills its first column before
//! the second. An empty input produces no pages.

use crate::models::record::Record;

/// Records per page (two columns).
pub const PAGE_CAPACITY: usize = 40;
/// Records per column.
pub const COLUMN_CAPACITY: usize = 20;

/// One page worth of records, borrowed from the caller's list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a> {
    pub left: &'a [Record],
    pub right: &'a [Record],
}

impl<'a> Page<'a> {
    /// Number of real records on the page.
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in reading order: left column, then right column.
    pub fn records(&self) -> impl Iterator<Item = &'a Record> {
        self.left.iter().chain(self.right.iter())
    }
}

/// Paginates with the standard 40-per-page / 20-per-column geometry.
pub fn paginate(records: &[Record]) -> Vec<Page<'_>> {
    paginate_with(records, PAGE_CAPACITY, COLUMN_CAPACITY)
}

/// Paginates with explicit capacities.
///
/// A zero capacity is treated as 1, and `column_capacity` is capped at
/// `page_capacity` (in which case the right column is always empty).
pub fn paginate_with(
    records: &[Record],
    page_capacity: usize,
    column_capacity: usize,
) -> Vec<Page<'_>> {
    let page_capacity = page_capacity.max(1);
    let column_capacity = column_capacity.clamp(1, page_capacity);

    records
        .chunks(page_capacity)
        .map(|chunk| {
            let (left, right) = chunk.split_at(column_capacity.min(chunk.len()));
            Page { left, right }
        })
        .collect()
}

/// Number of pages `paginate` yields for `record_count` records.
pub fn page_count(record_count: usize) -> usize {
    record_count.div_ceil(PAGE_CAPACITY)
}
