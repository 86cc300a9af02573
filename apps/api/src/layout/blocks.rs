//! Static page furniture: fill-in lines, grade legend, summary grid, signature
//! rules. Each block is described as a small data table and rendered by one of
//! two generic builders ([`tabbed_line`] and [`label_grid`]).

use crate::document::model::{
    CellMargins, Paragraph, Run, TabKind, TabStop, Table, TableCell, TableRow, Width,
};

const FONT: &str = "Arial";

/// Right edge of the text area, used by the right-aligned tab stops.
pub const RIGHT_TAB: u32 = 10_500;

// ────────────────────────────────────────────────────────────────────────────
// Data tables
// ────────────────────────────────────────────────────────────────────────────

/// One tab-separated item on a line: an optional label followed by a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub label: &'static str,
    pub value: &'static str,
}

const fn item(label: &'static str, value: &'static str) -> LineItem {
    LineItem { label, value }
}

pub const SEMESTER_LINE: [LineItem; 2] = [
    item("SEMESTER: ", "..................................."),
    item("COURSE CODE: ", ".........................................................."),
];

pub const SESSION_LINE: [LineItem; 2] = [
    item("SESSION: ", "......................................."),
    item("COURSE TITLE: ", ".........................................................."),
];

pub const SIGNATURE_LINE: [LineItem; 2] = [
    item("", "......................................."),
    item("", "......................................"),
];

/// Cosmetic grade bands printed under the summary grid. Never computed.
pub const GRADE_LEGEND: [LineItem; 6] = [
    item("A", ": 70–100"),
    item("B", ": 60–69"),
    item("C", ": 50–59"),
    item("D", ": 40–49"),
    item("E", ": 30–39"),
    item("F", ": 0–29"),
];

pub const LEGEND_STOPS: [u32; 6] = [0, 1800, 3600, 5600, 7600, 9300];

pub const SUMMARY_COLUMNS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "Total"];

// ────────────────────────────────────────────────────────────────────────────
// Generic builders
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub bold_labels: bool,
    /// Half-points; `None` inherits the document default.
    pub size: Option<u16>,
}

/// Renders `items` on one line, separated by tabs, against `stops`.
pub fn tabbed_line(items: &[LineItem], stops: &[TabStop], style: LineStyle) -> Paragraph {
    let styled = |text: &str, bold: bool| {
        let run = Run::new(text).bold_if(bold).font(FONT);
        match style.size {
            Some(size) => run.size(size),
            None => run,
        }
    };

    let mut paragraph = Paragraph {
        tab_stops: stops.to_vec(),
        ..Paragraph::default()
    };
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            paragraph = paragraph.run(styled("\t", false));
        }
        if !item.label.is_empty() {
            paragraph = paragraph.run(styled(item.label, style.bold_labels));
        }
        paragraph = paragraph.run(styled(item.value, false));
    }
    paragraph
}

/// A grid with a bold label row followed by `blank_rows` empty rows.
pub fn label_grid(labels: &[&str], width: Width, cell_width: Width, blank_rows: usize) -> Table {
    let cell = |text: &str, bold: bool| {
        TableCell::new(
            cell_width,
            vec![Paragraph::new().run(Run::new(text).bold_if(bold)).into()],
        )
    };

    let header = TableRow::new(labels.iter().map(|&l| cell(l, true)).collect());
    let blank = TableRow::new(labels.iter().map(|_| cell("", false)).collect());

    (0..blank_rows).fold(
        Table::new(width)
            .cell_margins(CellMargins::uniform(100))
            .row(header),
        |table, _| table.row(blank.clone()),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Concrete blocks
// ────────────────────────────────────────────────────────────────────────────

fn right_tab() -> [TabStop; 1] {
    [TabStop {
        kind: TabKind::Right,
        position: RIGHT_TAB,
    }]
}

/// A SEMESTER/SESSION style fill-in line, second field flush right.
pub fn fill_in_line(items: &[LineItem]) -> Paragraph {
    tabbed_line(
        items,
        &right_tab(),
        LineStyle {
            bold_labels: false,
            size: Some(19),
        },
    )
}

pub fn signature_line() -> Paragraph {
    fill_in_line(&SIGNATURE_LINE)
}

pub fn grade_legend() -> Paragraph {
    let stops: Vec<TabStop> = LEGEND_STOPS
        .iter()
        .map(|&position| TabStop {
            kind: TabKind::Left,
            position,
        })
        .collect();
    tabbed_line(
        &GRADE_LEGEND,
        &stops,
        LineStyle {
            bold_labels: true,
            size: None,
        },
    )
}

/// The A–F/Total result summary grid: header plus one empty row.
pub fn summary_table() -> Table {
    label_grid(&SUMMARY_COLUMNS, Width::Percent(60), Width::Percent(10), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_table_shape() {
        let table = summary_table();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.column_count(), 7);
        let headers: Vec<String> = table.rows[0].cells.iter().map(TableCell::text).collect();
        assert_eq!(headers, SUMMARY_COLUMNS.to_vec());
        assert!(table.rows[1].cells.iter().all(|c| c.text().is_empty()));
    }

    #[test]
    fn test_legend_text_and_bold_labels() {
        let legend = grade_legend();
        assert_eq!(
            legend.text(),
            "A: 70–100\tB: 60–69\tC: 50–59\tD: 40–49\tE: 30–39\tF: 0–29"
        );
        let bold: Vec<&str> = legend
            .runs
            .iter()
            .filter(|r| r.bold)
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(bold, vec!["A", "B", "C", "D", "E", "F"]);
        assert_eq!(legend.tab_stops.len(), 6);
    }

    #[test]
    fn test_fill_in_line_uses_right_tab() {
        let line = fill_in_line(&SEMESTER_LINE);
        assert!(line.text().starts_with("SEMESTER: "));
        assert!(line.text().contains("\tCOURSE CODE: "));
        assert_eq!(line.tab_stops, right_tab().to_vec());
        assert!(line.runs.iter().all(|r| r.size == Some(19)));
    }

    #[test]
    fn test_signature_line_is_two_rules() {
        let text = signature_line().text();
        let parts: Vec<&str> = text.split('\t').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c == '.')));
    }

    #[test]
    fn test_label_grid_blank_rows() {
        let grid = label_grid(&["X", "Y"], Width::Dxa(2000), Width::Dxa(1000), 3);
        assert_eq!(grid.rows.len(), 4);
        assert_eq!(grid.cell_margins, Some(CellMargins::uniform(100)));
    }
}
