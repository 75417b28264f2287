//! Expands report blocks into positioned draw calls.
//!
//! Coordinates are millimetres from the top-left corner of the page;
//! text `y` is the baseline. Every block becomes one contiguous group
//! of calls and a page break starts a new page.

use tracing::warn;

use crate::compare::MapImages;
use crate::domain::TravelMode;
use crate::report::{
    BlockContent, HALF_WIDTH_MM, HEADER_BAR_MM, HEADING_MM, LINE_MM, MAP_BOX_MM, META_LINE_MM,
    MapPanel, PageGeometry, ReportBlock, TablePanel, TextStyle, table_box_height,
};

use super::jpeg::{JpegImage, parse_jpeg};

/// Millimetres per typographic point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// One of the three embedded fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

const BLACK: Rgb = Rgb(0, 0, 0);
const WHITE: Rgb = Rgb(255, 255, 255);
const HEADER_BLUE: Rgb = Rgb(40, 80, 160);
const TABLE_FILL: Rgb = Rgb(230, 240, 255);
const FOOTER_GREY: Rgb = Rgb(120, 120, 120);

/// A primitive the document writer understands.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Text {
        x: f64,
        y: f64,
        size: f64,
        font: Font,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgb,
    },
    /// `image` indexes [`DrawnDocument::images`].
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        image: usize,
    },
}

/// Draw calls of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub calls: Vec<DrawCall>,
}

/// A fully positioned document.
#[derive(Debug, Clone)]
pub struct DrawnDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub images: Vec<JpegImage>,
}

/// Map images that can be embedded.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedMaps {
    pub auto: Option<JpegImage>,
    pub transit: Option<JpegImage>,
}

impl EmbeddedMaps {
    /// Keep the fetched maps that are baseline JPEGs.
    pub fn decode(maps: &MapImages) -> Self {
        let decode = |mode: TravelMode, bytes: &Option<Vec<u8>>| {
            let bytes = bytes.as_ref()?;
            match parse_jpeg(bytes.clone()) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!(%mode, error = %e, "omitting map image");
                    None
                }
            }
        };
        Self {
            auto: decode(TravelMode::Auto, &maps.auto),
            transit: decode(TravelMode::Transit, &maps.transit),
        }
    }

    fn get(&self, mode: TravelMode) -> Option<&JpegImage> {
        match mode {
            TravelMode::Auto => self.auto.as_ref(),
            TravelMode::Transit => self.transit.as_ref(),
        }
    }
}

/// Baseline of text of `size` points vertically centred in a cell.
fn baseline(top: f64, cell_height: f64, size: f64) -> f64 {
    top + cell_height / 2.0 + size * MM_PER_PT * 0.35
}

struct Drawer<'a> {
    geometry: &'a PageGeometry,
    maps: &'a EmbeddedMaps,
    pages: Vec<Page>,
    images: Vec<JpegImage>,
    /// Index into `images` per mode, once embedded.
    embedded: [Option<usize>; 2],
    cursor: f64,
}

impl<'a> Drawer<'a> {
    fn new(geometry: &'a PageGeometry, maps: &'a EmbeddedMaps) -> Self {
        Self {
            geometry,
            maps,
            pages: vec![Page::default()],
            images: Vec::new(),
            embedded: [None, None],
            cursor: geometry.margin_top,
        }
    }

    fn emit(&mut self, call: DrawCall) {
        if let Some(page) = self.pages.last_mut() {
            page.calls.push(call);
        }
    }

    fn text(&mut self, x: f64, y: f64, size: f64, font: Font, color: Rgb, text: &str) {
        self.emit(DrawCall::Text {
            x,
            y,
            size,
            font,
            color,
            text: text.to_string(),
        });
    }

    fn heading(&mut self, top: f64, text: &str) {
        let x = self.geometry.margin_left;
        self.text(x, baseline(top, HEADING_MM, 13.0), 13.0, Font::Bold, BLACK, text);
    }

    fn image_index(&mut self, mode: TravelMode) -> Option<usize> {
        let slot = match mode {
            TravelMode::Auto => 0,
            TravelMode::Transit => 1,
        };
        if self.embedded[slot].is_none() {
            let image = self.maps.get(mode)?.clone();
            self.images.push(image);
            self.embedded[slot] = Some(self.images.len() - 1);
        }
        self.embedded[slot]
    }

    fn block(&mut self, block: &ReportBlock) {
        let top = self.cursor;
        let left = self.geometry.margin_left;
        let width = self.geometry.content_width();

        match &block.content {
            BlockContent::PageBreak => {
                self.pages.push(Page::default());
                self.cursor = self.geometry.margin_top;
                return;
            }
            BlockContent::Header { title, lines } => {
                self.emit(DrawCall::Rect {
                    x: left,
                    y: top,
                    width,
                    height: HEADER_BAR_MM,
                    fill: HEADER_BLUE,
                });
                let y = baseline(top, HEADER_BAR_MM, 18.0);
                self.text(left + 2.0, y, 18.0, Font::Bold, WHITE, title);
                for (i, line) in lines.iter().enumerate() {
                    let line_top = top + HEADER_BAR_MM + 5.0 + META_LINE_MM * i as f64;
                    let y = baseline(line_top, META_LINE_MM, 12.0);
                    self.text(left, y, 12.0, Font::Regular, BLACK, line);
                }
            }
            BlockContent::Images {
                heading,
                left: left_panel,
                right: right_panel,
            } => {
                self.heading(top, heading);
                let right_x = left + width - HALF_WIDTH_MM;
                for (panel, x) in [(left_panel, left), (right_panel, right_x)] {
                    if let Some(panel) = panel {
                        self.map(panel, x, top + HEADING_MM + 5.0);
                    }
                }
            }
            BlockContent::Tables {
                heading,
                left: left_panel,
                right: right_panel,
            } => {
                self.heading(top, heading);
                let box_top = top + HEADING_MM + 1.0;
                self.emit(DrawCall::Rect {
                    x: left,
                    y: box_top,
                    width,
                    height: table_box_height(left_panel, right_panel),
                    fill: TABLE_FILL,
                });
                let right_x = left + width - HALF_WIDTH_MM;
                self.table(left_panel, left + 2.0, box_top + 3.0);
                self.table(right_panel, right_x, box_top + 3.0);
            }
            BlockContent::TextLines {
                heading,
                lines,
                style,
            } => {
                let mut line_top = top;
                if let Some(heading) = heading {
                    self.heading(top, heading);
                    line_top += HEADING_MM;
                }
                let font = match style {
                    TextStyle::Body => Font::Regular,
                    TextStyle::Notice => Font::Italic,
                };
                for line in lines {
                    let y = baseline(line_top, LINE_MM, 11.0);
                    self.text(left, y, 11.0, font, BLACK, line);
                    line_top += LINE_MM;
                }
            }
            BlockContent::Footer { lines } => {
                for (i, line) in lines.iter().enumerate() {
                    let line_top = top + 5.0 + LINE_MM * i as f64;
                    let y = baseline(line_top, LINE_MM, 9.0);
                    self.text(left, y, 9.0, Font::Italic, FOOTER_GREY, line);
                }
            }
        }

        self.cursor += block.height;
    }

    fn map(&mut self, panel: &MapPanel, x: f64, top: f64) {
        let Some(index) = self.image_index(panel.mode) else {
            return;
        };
        let label_y = baseline(top, 6.0, 11.0);
        self.text(x, label_y, 11.0, Font::Regular, BLACK, &panel.label);

        let aspect = self.images[index].aspect();
        let (mut w, mut h) = (HALF_WIDTH_MM, HALF_WIDTH_MM * aspect);
        if h > MAP_BOX_MM {
            h = MAP_BOX_MM;
            w = h / aspect;
        }
        self.emit(DrawCall::Image {
            x,
            y: top + 6.0,
            width: w,
            height: h,
            image: index,
        });
    }

    fn table(&mut self, panel: &TablePanel, x: f64, top: f64) {
        let title_y = baseline(top, 6.0, 12.0);
        self.text(x, title_y, 12.0, Font::Bold, BLACK, panel.title());

        let mut row_top = top + 8.0;
        match panel {
            TablePanel::Costs { rows, total, .. } => {
                let lines = rows
                    .iter()
                    .flat_map(|row| row.lines.iter().map(|line| (line, Font::Regular)))
                    .chain(total.lines.iter().map(|line| (line, Font::Bold)));
                for (line, font) in lines {
                    let y = baseline(row_top, LINE_MM, 11.0);
                    self.text(x, y, 11.0, font, BLACK, line);
                    row_top += LINE_MM;
                }
            }
            TablePanel::Unavailable { message, .. } => {
                let y = baseline(row_top, LINE_MM, 11.0);
                self.text(x, y, 11.0, Font::Italic, BLACK, message);
            }
        }
    }
}

/// Position every block on its page.
pub fn draw_blocks(
    blocks: &[ReportBlock],
    maps: &EmbeddedMaps,
    geometry: &PageGeometry,
) -> DrawnDocument {
    let mut drawer = Drawer::new(geometry, maps);
    for block in blocks {
        drawer.block(block);
    }
    DrawnDocument {
        geometry: *geometry,
        pages: drawer.pages,
        images: drawer.images,
    }
}
