//! Page geometry and the pagination rule shared by both surfaces.

use super::block::ReportBlock;

/// Physical page layout in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

/// Portrait A4 with the document surface's margins.
pub const A4: PageGeometry = PageGeometry {
    width: 210.0,
    height: 297.0,
    margin_left: 10.0,
    margin_top: 10.0,
    margin_bottom: 15.0,
};

impl PageGeometry {
    /// Width available to content between the side margins.
    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin_left
    }

    /// Height available to blocks on one page.
    pub fn usable_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }
}

/// Whether blocks flow onto pages of a fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pagination {
    /// One endless page; never emits a page break.
    Unbounded,
    /// Break before any block that would end below `page_height`.
    Paged { page_height: f64 },
}

impl Pagination {
    /// Pages of the given geometry.
    pub fn paged(geometry: &PageGeometry) -> Self {
        Pagination::Paged {
            page_height: geometry.usable_height(),
        }
    }
}

/// Appends blocks while tracking the vertical cursor.
#[derive(Debug)]
pub(crate) struct Paginator {
    pagination: Pagination,
    cursor: f64,
    blocks: Vec<ReportBlock>,
}

impl Paginator {
    pub(crate) fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            cursor: 0.0,
            blocks: Vec::new(),
        }
    }

    /// Append a block, preceded by a page break if it would overflow.
    ///
    /// A block taller than a whole page is placed at the top of its own
    /// page and allowed to overflow; it is never split.
    pub(crate) fn push(&mut self, block: ReportBlock) {
        if let Pagination::Paged { page_height } = self.pagination {
            if self.cursor > 0.0 && self.cursor + block.height > page_height {
                self.blocks.push(ReportBlock::page_break());
                self.cursor = 0.0;
            }
        }
        self.cursor += block.height;
        self.blocks.push(block);
    }

    pub(crate) fn finish(self) -> Vec<ReportBlock> {
        self.blocks
    }
}
