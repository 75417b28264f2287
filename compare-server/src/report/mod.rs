//! Report layout.
//!
//! Turns a comparison into an ordered, surface-agnostic sequence of
//! blocks. The live page and the printable document both render this
//! sequence; only the pagination differs.

mod block;
mod layout;
mod paginate;
mod wrap;

pub use block::{
    BlockContent, BlockKind, HALF_WIDTH_MM, HEADER_BAR_MM, HEADING_MM, LINE_MM, MAP_BOX_MM,
    META_LINE_MM, MapPanel, ReportBlock, TABLE_BOX_MM, TablePanel, TableRow, TextStyle,
    table_box_height,
};
pub use layout::{
    HEADER_WIDTH, ITINERARY_WIDTH, REPORT_TITLE, TABLE_WIDTH, ReportInput, RequestMeta, TicketSource, build_report,
    format_chf, format_km,
};
pub use paginate::{A4, PageGeometry, Pagination};
pub use wrap::wrap_text;
