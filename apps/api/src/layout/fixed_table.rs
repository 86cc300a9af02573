//! Fixed-Table Builder: renders one column of records as a 21-row grid.
//!
//! The table always has one header row and exactly [`BODY_ROWS`] body rows.
//! Rows past the end of the column are blank, so every column on every page
//! has the same geometry.

use crate::document::model::{
    Block, CellMargins, Paragraph, Run, Table, TableCell, TableRow, Width,
};
use crate::layout::paginator::COLUMN_CAPACITY;
use crate::models::record::Record;

pub const BODY_ROWS: usize = COLUMN_CAPACITY;
pub const HEADERS: [&str; 5] = ["S/N", "REG. NO.", "C/A", "EXAM", "TOTAL"];
/// Per-column widths in twips, shared by header and body cells.
pub const COLUMN_WIDTHS: [u32; 5] = [800, 1900, 600, 900, 1000];
pub const TABLE_WIDTH: u32 = 5058;

const FONT: &str = "Arial";
const FONT_SIZE: u16 = 22;
const BODY_MARGINS: CellMargins = CellMargins::uniform(100);
const HEADER_MARGINS: CellMargins = CellMargins {
    top: 100,
    bottom: 200,
    left: 100,
    right: 100,
};

/// A rendered column: the header row followed by [`BODY_ROWS`] body rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTable {
    rows: Vec<[String; 5]>,
    column_widths: [u32; 5],
}

impl FixedTable {
    /// All rows, header first. Always `BODY_ROWS + 1` long.
    pub fn rows(&self) -> &[[String; 5]] {
        &self.rows
    }

    pub fn header(&self) -> &[String; 5] {
        &self.rows[0]
    }

    pub fn body(&self) -> &[[String; 5]] {
        &self.rows[1..]
    }

    pub fn column_widths(&self) -> [u32; 5] {
        self.column_widths
    }

    /// Converts the grid into a fixed-layout document table.
    pub fn to_table(&self) -> Table {
        self.rows
            .iter()
            .enumerate()
            .fold(Table::new(Width::Dxa(TABLE_WIDTH)).fixed(), |table, (i, row)| {
                table.row(grid_row(row, i == 0, &self.column_widths))
            })
    }
}

/// Builds the fixed table for one column.
///
/// A record without its own serial number is numbered by its 1-based position
/// within this column, so the right-hand column restarts at 1. Records past
/// [`BODY_ROWS`] are ignored.
pub fn build_table(column: &[Record]) -> FixedTable {
    let header = HEADERS.map(String::from);
    let body = (0..BODY_ROWS).map(|r| match column.get(r) {
        Some(record) => record.cells(r),
        None => blank_row(),
    });

    FixedTable {
        rows: std::iter::once(header).chain(body).collect(),
        column_widths: COLUMN_WIDTHS,
    }
}

fn blank_row() -> [String; 5] {
    Default::default()
}

fn grid_row(cells: &[String; 5], is_header: bool, widths: &[u32; 5]) -> TableRow {
    let margins = if is_header { HEADER_MARGINS } else { BODY_MARGINS };
    TableRow::new(
        cells
            .iter()
            .zip(widths)
            .map(|(text, &width)| {
                let run = Run::new(text.as_str())
                    .bold_if(is_header)
                    .font(FONT)
                    .size(FONT_SIZE);
                TableCell::new(
                    Width::Dxa(width),
                    vec![Block::Paragraph(Paragraph::new().run(run))],
                )
                .margins(margins)
            })
            .collect(),
    )
}
