//! Abstract document tree produced by the layout engine and consumed by the
//! DOCX writer.
//!
//! Units follow WordprocessingML: lengths are twips (1/20 pt, 1440 per inch)
//! and font sizes are half-points.

use serde::Serialize;

/// A4 portrait in twips (8.27" × 11.69").
pub const A4_WIDTH_TWIPS: u32 = 11_908;
pub const A4_HEIGHT_TWIPS: u32 = 16_833;

// ────────────────────────────────────────────────────────────────────────────
// Document / section
// ────────────────────────────────────────────────────────────────────────────

/// A complete document: default run properties plus an ordered list of
/// sections, each starting on a new page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDocument {
    pub defaults: RunDefaults,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunDefaults {
    pub font: &'static str,
    pub size: u16,
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            font: "Arial",
            size: 22,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub page: PageSetup,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub margins: PageMargins,
}

impl PageSetup {
    /// Width available to body content between the left and right margins.
    pub fn text_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margins.left)
            .saturating_sub(self.margins.right)
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            width: A4_WIDTH_TWIPS,
            height: A4_HEIGHT_TWIPS,
            orientation: Orientation::Portrait,
            margins: PageMargins {
                top: 1440,
                bottom: 1440,
                left: 1440,
                right: 1440,
            },
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blocks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

impl From<Paragraph> for Block {
    fn from(p: Paragraph) -> Self {
        Block::Paragraph(p)
    }
}

impl From<Table> for Block {
    fn from(t: Table) -> Self {
        Block::Table(t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TabKind {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabStop {
    pub kind: TabKind,
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Option<Alignment>,
    pub tab_stops: Vec<TabStop>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty spacer line.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn tab(mut self, kind: TabKind, position: u32) -> Self {
        self.tab_stops.push(TabStop { kind, position });
        self
    }

    /// Concatenated run text, mostly useful for assertions.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub underline: bool,
    pub all_caps: bool,
    pub font: Option<&'static str>,
    /// Half-points.
    pub size: Option<u16>,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn bold_if(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn caps(mut self) -> Self {
        self.all_caps = true;
        self
    }

    pub fn font(mut self, font: &'static str) -> Self {
        self.font = Some(font);
        self
    }

    pub fn size(mut self, half_points: u16) -> Self {
        self.size = Some(half_points);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tables
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Width {
    /// Twips.
    Dxa(u32),
    /// Whole percent of the available width.
    Percent(u32),
}

impl Width {
    /// Resolves to twips against the width available to the element.
    pub fn resolve(self, available: u32) -> u32 {
        match self {
            Width::Dxa(w) => w,
            Width::Percent(p) => available * p / 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableLayout {
    Auto,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Borders {
    Single,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CellMargins {
    pub const fn uniform(m: u32) -> Self {
        Self {
            top: m,
            bottom: m,
            left: m,
            right: m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub width: Width,
    pub layout: TableLayout,
    pub borders: Borders,
    /// Default margins for every cell that does not set its own.
    pub cell_margins: Option<CellMargins>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(width: Width) -> Self {
        Self {
            width,
            layout: TableLayout::Auto,
            borders: Borders::Single,
            cell_margins: None,
            rows: Vec::new(),
        }
    }

    pub fn fixed(mut self) -> Self {
        self.layout = TableLayout::Fixed;
        self
    }

    pub fn borderless(mut self) -> Self {
        self.borders = Borders::Hidden;
        self
    }

    pub fn cell_margins(mut self, margins: CellMargins) -> Self {
        self.cell_margins = Some(margins);
        self
    }

    pub fn row(mut self, row: TableRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Number of grid columns, taken from the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub width: Width,
    pub margins: Option<CellMargins>,
    pub blocks: Vec<Block>,
}

impl TableCell {
    pub fn new(width: Width, blocks: Vec<Block>) -> Self {
        Self {
            width,
            margins: None,
            blocks,
        }
    }

    pub fn margins(mut self, margins: CellMargins) -> Self {
        self.margins = Some(margins);
        self
    }

    /// Text of every paragraph directly inside the cell.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(p) => Some(p.text()),
                Block::Table(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
