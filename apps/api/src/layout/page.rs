//! Page Renderer: one [`Page`] in, one self-contained document section out.
//!
//! Layout, top to bottom:
//! 1. banner ("CONFIDENTIAL - Page N" + department), institution and sheet title
//! 2. semester/course-code and session/course-title fill-in lines
//! 3. both columns as fixed tables in a borderless two-cell table
//! 4. "Result Summary" caption, summary grid, grade legend
//! 5. two blank lines and the signature rules
//!
//! Only the page number varies between pages; everything else is static.

use crate::document::model::{
    Alignment, Block, Orientation, PageMargins, PageSetup, Paragraph, Run, Section, TabKind, Table,
    TableCell, TableRow, Width, A4_HEIGHT_TWIPS, A4_WIDTH_TWIPS,
};
use crate::layout::blocks::{
    fill_in_line, grade_legend, signature_line, summary_table, SEMESTER_LINE, SESSION_LINE,
};
use crate::layout::fixed_table::{build_table, FixedTable};
use crate::layout::paginator::Page;

pub const DEPARTMENT: &str = "DEPARTMENT OF ARCHITECTURE";
pub const INSTITUTION: &str = "OBAFEMI AWOLOWO UNIVERSITY, ILE-IFE";
pub const SHEET_TITLE: &str = "EXAMINATION RAW SCORE SHEET";
pub const SUMMARY_CAPTION: &str = "Result Summary";

const FONT: &str = "Arial";
/// Centre of the banner line, where the department name sits.
const BANNER_CENTER_TAB: u32 = 5050;

/// A rendered page: the section handed to the serializer plus the two fixed
/// tables it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSection {
    pub page_index: usize,
    pub left: FixedTable,
    pub right: FixedTable,
    pub section: Section,
}

/// A4 portrait with the scoresheet's asymmetric margins.
pub fn page_setup() -> PageSetup {
    PageSetup {
        width: A4_WIDTH_TWIPS,
        height: A4_HEIGHT_TWIPS,
        orientation: Orientation::Portrait,
        margins: PageMargins {
            top: 1000,
            bottom: 1000,
            left: 900,
            right: 860,
        },
    }
}

/// Renders one page. `page_index` is 1-based and only feeds the banner label.
pub fn render_page(page: &Page<'_>, page_index: usize) -> PageSection {
    let left = build_table(page.left);
    let right = build_table(page.right);

    let mut blocks: Vec<Block> = Vec::with_capacity(24);
    blocks.extend(heading(page_index));
    blocks.push(Paragraph::blank().into());
    blocks.push(side_by_side(&left, &right).into());
    blocks.extend(summary());
    blocks.extend(signature());

    PageSection {
        page_index,
        left,
        right,
        section: Section {
            page: page_setup(),
            blocks,
        },
    }
}

/// Text of the page banner, e.g. `CONFIDENTIAL - Page 3`.
pub fn banner_label(page_index: usize) -> String {
    format!("CONFIDENTIAL - Page {page_index}")
}

fn heading(page_index: usize) -> Vec<Block> {
    let banner = Paragraph::new()
        .run(Run::new(banner_label(page_index)).underline().font(FONT).size(18))
        .run(
            Run::new(format!("\t{DEPARTMENT}"))
                .bold()
                .caps()
                .font(FONT)
                .size(22),
        )
        .tab(TabKind::Center, BANNER_CENTER_TAB);

    let institution = Paragraph::new()
        .run(Run::new(INSTITUTION).bold().caps().font(FONT).size(24))
        .align(Alignment::Center);

    let title = Paragraph::new()
        .run(Run::new(SHEET_TITLE).caps().font(FONT).size(20))
        .align(Alignment::Center);

    vec![
        banner.into(),
        Paragraph::blank().into(),
        institution.into(),
        Paragraph::blank().into(),
        title.into(),
        Paragraph::blank().into(),
        fill_in_line(&SEMESTER_LINE).into(),
        Paragraph::blank().into(),
        fill_in_line(&SESSION_LINE).into(),
    ]
}

/// Both columns in one borderless row, each cell taking half the width.
fn side_by_side(left: &FixedTable, right: &FixedTable) -> Table {
    let cell = |table: &FixedTable| {
        TableCell::new(Width::Percent(50), vec![table.to_table().into()])
    };
    Table::new(Width::Percent(100))
        .fixed()
        .borderless()
        .row(TableRow::new(vec![cell(left), cell(right)]))
}

fn summary() -> Vec<Block> {
    vec![
        Paragraph::blank().into(),
        Paragraph::new()
            .run(Run::new(SUMMARY_CAPTION).caps().font(FONT).size(22))
            .into(),
        Paragraph::blank().into(),
        summary_table().into(),
        Paragraph::blank().into(),
        grade_legend().into(),
    ]
}

fn signature() -> Vec<Block> {
    vec![
        Paragraph::blank().into(),
        Paragraph::blank().into(),
        signature_line().into(),
    ]
}
