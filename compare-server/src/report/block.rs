//! Report blocks.
//!
//! A block is one surface-agnostic unit of content with a requested
//! height in millimetres. Renderers lay blocks out top to bottom and
//! never split one.

use crate::domain::TravelMode;

use super::wrap::wrap_text;

/// Height of the header title bar.
pub const HEADER_BAR_MM: f64 = 15.0;
/// Height of a section heading line.
pub const HEADING_MM: f64 = 8.0;
/// Height of one body text line.
pub const LINE_MM: f64 = 5.0;
/// Height of one header metadata line.
pub const META_LINE_MM: f64 = 6.0;
/// Minimum height of the box holding both cost tables.
pub const TABLE_BOX_MM: f64 = 48.0;
/// Width of one half of a side-by-side block.
pub const HALF_WIDTH_MM: f64 = 90.0;
/// Maximum height of a map image.
pub const MAP_BOX_MM: f64 = 60.0;

/// Discriminant of a [`ReportBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Image,
    Table,
    TextLines,
    Footer,
    PageBreak,
}

impl BlockKind {
    /// Lowercase name, used as a CSS class by the live surface.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Header => "header",
            BlockKind::Image => "image",
            BlockKind::Table => "table",
            BlockKind::TextLines => "text-lines",
            BlockKind::Footer => "footer",
            BlockKind::PageBreak => "page-break",
        }
    }
}

/// How a text block is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Ordinary body text.
    Body,
    /// An explicit notice such as "no route available".
    Notice,
}

/// One half of the map block.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPanel {
    pub mode: TravelMode,
    pub label: String,
    /// Encoded polyline the map is drawn from.
    pub encoded_path: String,
}

/// One labelled row of a cost table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub value: String,
    /// `label: value` as printed on fixed-width surfaces.
    pub lines: Vec<String>,
}

impl TableRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        let label = label.into();
        let value = value.into();
        Self {
            lines: vec![format!("{label}: {value}")],
            label,
            value,
        }
    }

    /// Re-wrap the printed form to `width` characters.
    pub fn wrapped(mut self, width: usize) -> Self {
        self.lines = wrap_text(&format!("{}: {}", self.label, self.value), width);
        self
    }
}

/// One half of the cost table block.
#[derive(Debug, Clone, PartialEq)]
pub enum TablePanel {
    Costs {
        title: String,
        rows: Vec<TableRow>,
        total: TableRow,
    },
    Unavailable {
        title: String,
        message: String,
    },
}

impl TablePanel {
    pub fn title(&self) -> &str {
        match self {
            TablePanel::Costs { title, .. } | TablePanel::Unavailable { title, .. } => title,
        }
    }

    /// Printed lines below the title.
    pub fn line_count(&self) -> usize {
        match self {
            TablePanel::Costs { rows, total, .. } => {
                rows.iter().map(|r| r.lines.len()).sum::<usize>() + total.lines.len()
            }
            TablePanel::Unavailable { .. } => 1,
        }
    }
}

/// Height of the box holding two cost tables side by side.
///
/// Tables start 3 mm into the box with an 8 mm title; the box grows when
/// wrapped rows need more than [`TABLE_BOX_MM`].
pub fn table_box_height(left: &TablePanel, right: &TablePanel) -> f64 {
    let lines = left.line_count().max(right.line_count());
    TABLE_BOX_MM.max(3.0 + 8.0 + LINE_MM * lines as f64 + 3.0)
}

/// Kind-specific payload of a block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Header {
        title: String,
        lines: Vec<String>,
    },
    /// Side-by-side maps; an absent half is left out, not blanked.
    Images {
        heading: String,
        left: Option<MapPanel>,
        right: Option<MapPanel>,
    },
    /// Side-by-side cost tables.
    Tables {
        heading: String,
        left: TablePanel,
        right: TablePanel,
    },
    TextLines {
        heading: Option<String>,
        lines: Vec<String>,
        style: TextStyle,
    },
    Footer {
        lines: Vec<String>,
    },
    /// Start a new page before the next block.
    PageBreak,
}

/// A positioned content unit with its requested height in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportBlock {
    pub height: f64,
    pub content: BlockContent,
}

impl ReportBlock {
    pub fn header(title: impl Into<String>, lines: Vec<String>) -> Self {
        let height = HEADER_BAR_MM + 5.0 + META_LINE_MM * lines.len() as f64 + 4.0;
        Self {
            height,
            content: BlockContent::Header {
                title: title.into(),
                lines,
            },
        }
    }

    pub fn images(
        heading: impl Into<String>,
        left: Option<MapPanel>,
        right: Option<MapPanel>,
    ) -> Self {
        // heading, gap, panel label, map, gap
        let height = HEADING_MM + 5.0 + 6.0 + MAP_BOX_MM + 4.0;
        Self {
            height,
            content: BlockContent::Images {
                heading: heading.into(),
                left,
                right,
            },
        }
    }

    pub fn tables(heading: impl Into<String>, left: TablePanel, right: TablePanel) -> Self {
        let height = HEADING_MM + 1.0 + table_box_height(&left, &right) + 2.0;
        Self {
            height,
            content: BlockContent::Tables {
                heading: heading.into(),
                left,
                right,
            },
        }
    }

    pub fn text_lines(heading: Option<String>, lines: Vec<String>, style: TextStyle) -> Self {
        let heading_height = if heading.is_some() { HEADING_MM } else { 0.0 };
        let height = heading_height + LINE_MM * lines.len() as f64 + 3.0;
        Self {
            height,
            content: BlockContent::TextLines {
                heading,
                lines,
                style,
            },
        }
    }

    pub fn footer(lines: Vec<String>) -> Self {
        let height = LINE_MM * lines.len() as f64 + 5.0;
        Self {
            height,
            content: BlockContent::Footer { lines },
        }
    }

    pub fn page_break() -> Self {
        Self {
            height: 0.0,
            content: BlockContent::PageBreak,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match &self.content {
            BlockContent::Header { .. } => BlockKind::Header,
            BlockContent::Images { .. } => BlockKind::Image,
            BlockContent::Tables { .. } => BlockKind::Table,
            BlockContent::TextLines { .. } => BlockKind::TextLines,
            BlockContent::Footer { .. } => BlockKind::Footer,
            BlockContent::PageBreak => BlockKind::PageBreak,
        }
    }

    pub fn is_page_break(&self) -> bool {
        self.kind() == BlockKind::PageBreak
    }
}
