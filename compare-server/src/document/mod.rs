//! Printable document surface.
//!
//! Renders the report block sequence, paginated for A4, into a PDF.
//! Blocks become draw calls one-to-one; the writer only knows about
//! text, filled rectangles and JPEG images.

mod draw;
mod jpeg;
mod pdf;

pub use draw::{DrawCall, DrawnDocument, EmbeddedMaps, Font, Page, Rgb, draw_blocks};
pub use jpeg::{JpegError, JpegImage, parse_jpeg};
pub use pdf::write_pdf;

use tracing::debug;

use crate::compare::{Comparison, MapImages};
use crate::report::{A4, Pagination, ReportBlock, ReportInput, build_report};

/// MIME type of the document payload.
pub const PDF_MIME: &str = "application/pdf";

/// File name the document is offered under.
pub const PDF_FILE_NAME: &str = "Reisevergleich.pdf";

/// Render already built blocks.
pub fn render_blocks(blocks: &[ReportBlock], maps: &EmbeddedMaps) -> Vec<u8> {
    let drawn = draw_blocks(blocks, maps, &A4);
    debug!(
        pages = drawn.pages.len(),
        images = drawn.images.len(),
        "rendering document"
    );
    write_pdf(&drawn)
}

/// Render the printable document of a comparison.
///
/// Maps that failed to download or aren't baseline JPEGs are left out.
pub fn render_pdf(comparison: &Comparison, maps: &MapImages) -> Vec<u8> {
    let embedded = EmbeddedMaps::decode(maps);
    let input = ReportInput::from_comparison(comparison)
        .with_maps(embedded.auto.is_some(), embedded.transit.is_some());
    let blocks = build_report(&input, Pagination::paged(&A4));
    render_blocks(&blocks, &embedded)
}
