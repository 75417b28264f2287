//! Askama templates for the web frontend.

use askama::Template;
use tracing::warn;

use crate::domain::decode_polyline;
use crate::report::{BlockContent, MapPanel, ReportBlock, TablePanel, TableRow, TextStyle};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with the comparison form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub form: FormDefaults,
    /// Blocking configuration warning, if any.
    pub warning: Option<String>,
}

/// Comparison result page, the live surface of the report.
#[derive(Template)]
#[template(path = "compare.html")]
pub struct CompareTemplate {
    pub blocks: Vec<BlockView>,
    /// Link to the same comparison as a PDF.
    pub pdf_url: String,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Pre-filled values of the comparison form.
#[derive(Debug, Clone)]
pub struct FormDefaults {
    pub date: String,
    pub time: String,
    pub hourly_wage: String,
    pub per_km_rate: String,
    pub base_fare: String,
    pub per_km_fare: String,
    /// Whether the fare lookup is preselected.
    pub lookup_fares: bool,
}

/// One report block as the page shows it.
#[derive(Debug, Clone)]
pub struct BlockView {
    /// CSS class suffix, see `BlockKind::as_str`
    pub kind: &'static str,
    pub heading: Option<String>,
    pub lines: Vec<String>,
    /// Set for "no route available" notices.
    pub notice: bool,
    /// Side-by-side halves of image and table blocks.
    pub panels: Vec<PanelView>,
}

/// One half of a side-by-side block.
#[derive(Debug, Clone)]
pub struct PanelView {
    pub title: String,
    pub rows: Vec<TableRow>,
    pub total: Option<TableRow>,
    pub message: Option<String>,
    /// DOM id of the interactive map, empty for tables.
    pub map_id: String,
    /// JSON array of `[lat, lng]` pairs for the interactive map.
    pub path_json: String,
}

impl BlockView {
    /// Create from a report block. Page breaks have no view.
    pub fn from_block(block: &ReportBlock, index: usize) -> Option<Self> {
        let kind = block.kind().as_str();
        let empty = |heading: Option<String>| Self {
            kind,
            heading,
            lines: Vec::new(),
            notice: false,
            panels: Vec::new(),
        };

        let view = match &block.content {
            BlockContent::PageBreak => return None,
            BlockContent::Header { title, lines } => Self {
                lines: lines.clone(),
                ..empty(Some(title.clone()))
            },
            BlockContent::Images {
                heading,
                left,
                right,
            } => Self {
                panels: [left, right]
                    .into_iter()
                    .flatten()
                    .map(|panel| PanelView::from_map(panel, index))
                    .collect(),
                ..empty(Some(heading.clone()))
            },
            BlockContent::Tables {
                heading,
                left,
                right,
            } => Self {
                panels: vec![PanelView::from_table(left), PanelView::from_table(right)],
                ..empty(Some(heading.clone()))
            },
            BlockContent::TextLines {
                heading,
                lines,
                style,
            } => Self {
                lines: lines.clone(),
                notice: *style == TextStyle::Notice,
                ..empty(heading.clone())
            },
            BlockContent::Footer { lines } => Self {
                lines: lines.clone(),
                ..empty(None)
            },
        };
        Some(view)
    }

    /// Views of a whole block sequence.
    pub fn from_blocks(blocks: &[ReportBlock]) -> Vec<Self> {
        blocks
            .iter()
            .enumerate()
            .filter_map(|(i, block)| Self::from_block(block, i))
            .collect()
    }
}

impl PanelView {
    fn blank(title: String) -> Self {
        Self {
            title,
            rows: Vec::new(),
            total: None,
            message: None,
            map_id: String::new(),
            path_json: "[]".to_string(),
        }
    }

    /// Create from a cost table half.
    pub fn from_table(panel: &TablePanel) -> Self {
        match panel {
            TablePanel::Costs { title, rows, total } => Self {
                rows: rows.clone(),
                total: Some(total.clone()),
                ..Self::blank(title.clone())
            },
            TablePanel::Unavailable { title, message } => Self {
                message: Some(message.clone()),
                ..Self::blank(title.clone())
            },
        }
    }

    /// Create from a map half; the path is decoded for the map widget.
    pub fn from_map(panel: &MapPanel, block_index: usize) -> Self {
        let points = match decode_polyline(&panel.encoded_path) {
            Ok(points) => points,
            Err(e) => {
                warn!(mode = %panel.mode, error = %e, "cannot draw route on map");
                Vec::new()
            }
        };
        let pairs: Vec<[f64; 2]> = points.iter().map(|p| [p.lat, p.lng]).collect();

        Self {
            map_id: format!("map-{block_index}-{}", panel.mode.provider_name()),
            path_json: serde_json::to_string(&pairs).unwrap_or_else(|_| "[]".to_string()),
            ..Self::blank(panel.label.clone())
        }
    }
}
