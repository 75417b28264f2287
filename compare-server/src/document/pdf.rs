//! Minimal PDF 1.4 writer.
//!
//! Supports exactly what the draw calls need: filled rectangles, text in
//! the three standard Helvetica faces and embedded baseline JPEGs. Text
//! is encoded as WinAnsi, which covers German.

use super::draw::{DrawCall, DrawnDocument, Font, Page, Rgb};
use super::jpeg::JpegImage;

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Object ids of the fixed objects.
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FIRST_FONT_ID: usize = 3;
const FONTS: [&str; 3] = ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique"];

/// Accumulates numbered objects and their byte offsets.
struct PdfBuffer {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuffer {
    fn new() -> Self {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        // Binary marker so transfer tools treat the file as binary.
        bytes.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            bytes,
            offsets: Vec::new(),
        }
    }

    /// Object ids must be written in order, starting at 1.
    fn begin(&mut self, id: usize) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.bytes.len());
        self.bytes.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    }

    fn object(&mut self, id: usize, body: &str) {
        self.begin(id);
        self.bytes.extend_from_slice(body.as_bytes());
        self.bytes.extend_from_slice(b"\nendobj\n");
    }

    fn stream(&mut self, id: usize, dict: &str, data: &[u8]) {
        self.begin(id);
        self.bytes
            .extend_from_slice(format!("<< {dict} /Length {} >>\nstream\n", data.len()).as_bytes());
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        let xref = self.bytes.len();
        let count = self.offsets.len() + 1;
        self.bytes
            .extend_from_slice(format!("xref\n0 {count}\n0000000000 65535 f \n").as_bytes());
        for offset in &self.offsets {
            self.bytes
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.bytes.extend_from_slice(
            format!("trailer\n<< /Size {count} /Root {CATALOG_ID} 0 R >>\nstartxref\n{xref}\n%%EOF\n")
                .as_bytes(),
        );
        self.bytes
    }
}

/// Serialise a positioned document.
pub fn write_pdf(doc: &DrawnDocument) -> Vec<u8> {
    let first_image_id = FIRST_FONT_ID + FONTS.len();
    let first_page_id = first_image_id + doc.images.len();
    // Each page is a page object followed by its content stream.
    let page_ids: Vec<usize> = (0..doc.pages.len())
        .map(|i| first_page_id + 2 * i)
        .collect();

    let page_width = doc.geometry.width * PT_PER_MM;
    let page_height = doc.geometry.height * PT_PER_MM;

    let mut pdf = PdfBuffer::new();
    pdf.object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"),
    );

    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    pdf.object(
        PAGES_ID,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_ids.len()
        ),
    );

    for (i, name) in FONTS.iter().enumerate() {
        pdf.object(
            FIRST_FONT_ID + i,
            &format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{name} /Encoding /WinAnsiEncoding >>"
            ),
        );
    }

    for (i, image) in doc.images.iter().enumerate() {
        pdf.stream(first_image_id + i, &image_dict(image), &image.data);
    }

    let resources = resources(doc.images.len(), first_image_id);
    for (page, &page_id) in doc.pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        pdf.object(
            page_id,
            &format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {} {}] \
                 /Resources {resources} /Contents {content_id} 0 R >>",
                num(page_width),
                num(page_height)
            ),
        );
        pdf.stream(content_id, "", &content_stream(page, doc.geometry.height));
    }

    pdf.finish()
}

fn image_dict(image: &JpegImage) -> String {
    let color_space = match image.components {
        1 => "/DeviceGray",
        4 => "/DeviceCMYK",
        _ => "/DeviceRGB",
    };
    format!(
        "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {color_space} \
         /BitsPerComponent 8 /Filter /DCTDecode",
        image.width, image.height
    )
}

fn resources(image_count: usize, first_image_id: usize) -> String {
    let fonts: Vec<String> = (0..FONTS.len())
        .map(|i| format!("/F{} {} 0 R", i + 1, FIRST_FONT_ID + i))
        .collect();
    let images: Vec<String> = (0..image_count)
        .map(|i| format!("/Im{i} {} 0 R", first_image_id + i))
        .collect();
    format!(
        "<< /Font << {} >> /XObject << {} >> >>",
        fonts.join(" "),
        images.join(" ")
    )
}

fn font_name(font: Font) -> &'static str {
    match font {
        Font::Regular => "/F1",
        Font::Bold => "/F2",
        Font::Italic => "/F3",
    }
}

fn num(value: f64) -> String {
    format!("{value:.2}")
}

fn color(Rgb(r, g, b): Rgb) -> String {
    let c = |v: u8| format!("{:.3}", f64::from(v) / 255.0);
    format!("{} {} {}", c(r), c(g), c(b))
}

/// Page operators; converts top-left millimetres to bottom-left points.
fn content_stream(page: &Page, page_height_mm: f64) -> Vec<u8> {
    let x_pt = |x: f64| num(x * PT_PER_MM);
    let y_pt = |y: f64| num((page_height_mm - y) * PT_PER_MM);
    let len_pt = |l: f64| num(l * PT_PER_MM);

    let mut out = Vec::new();
    for call in &page.calls {
        match call {
            DrawCall::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                out.extend_from_slice(
                    format!(
                        "{} rg {} {} {} {} re f\n",
                        color(*fill),
                        x_pt(*x),
                        y_pt(y + height),
                        len_pt(*width),
                        len_pt(*height)
                    )
                    .as_bytes(),
                );
            }
            DrawCall::Text {
                x,
                y,
                size,
                font,
                color: fill,
                text,
            } => {
                out.extend_from_slice(
                    format!(
                        "BT {} {} Tf {} rg {} {} Td (",
                        font_name(*font),
                        num(*size),
                        color(*fill),
                        x_pt(*x),
                        y_pt(*y)
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(&encode_text(text));
                out.extend_from_slice(b") Tj ET\n");
            }
            DrawCall::Image {
                x,
                y,
                width,
                height,
                image,
            } => {
                out.extend_from_slice(
                    format!(
                        "q {} 0 0 {} {} {} cm /Im{image} Do Q\n",
                        len_pt(*width),
                        len_pt(*height),
                        x_pt(*x),
                        y_pt(y + height)
                    )
                    .as_bytes(),
                );
            }
        }
    }
    out
}

/// WinAnsi bytes of a string literal body, with delimiters escaped.
/// Characters outside WinAnsi become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        let byte = win_ansi(c).unwrap_or(b'?');
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

fn win_ansi(c: char) -> Option<u8> {
    let code = u32::from(c);
    if (0x20..=0x7E).contains(&code) || (0xA0..=0xFF).contains(&code) {
        return u8::try_from(code).ok();
    }
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‰' => 0x89,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        '›' => 0x9B,
        'œ' => 0x9C,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::jpeg::parse_jpeg;
    use crate::document::jpeg::tests::jpeg_bytes;
    use crate::report::A4;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn text_page(text: &str) -> Page {
        Page {
            calls: vec![DrawCall::Text {
                x: 10.0,
                y: 20.0,
                size: 11.0,
                font: Font::Regular,
                color: Rgb(0, 0, 0),
                text: text.into(),
            }],
        }
    }

    fn document(pages: Vec<Page>, images: Vec<JpegImage>) -> DrawnDocument {
        DrawnDocument {
            geometry: A4,
            pages,
            images,
        }
    }

    #[test]
    fn header_and_trailer() {
        let bytes = write_pdf(&document(vec![text_page("Hallo")], vec![]));
        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(find(&bytes, b"/Count 1").is_some());
        assert!(find(&bytes, b"/BaseFont /Helvetica-Bold").is_some());
        assert!(find(&bytes, b"(Hallo) Tj").is_some());
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pages = vec![text_page("eins"), text_page("zwei")];
        let bytes = write_pdf(&document(pages, vec![]));

        let start = find(&bytes, b"startxref\n").unwrap() + b"startxref\n".len();
        let end = start + bytes[start..].iter().position(|&b| b == b'\n').unwrap();
        let xref: usize = std::str::from_utf8(&bytes[start..end])
            .unwrap()
            .parse()
            .unwrap();
        assert!(bytes[xref..].starts_with(b"xref\n0 10\n"));

        // catalog, pages, three fonts, two page objects with two streams
        let table = std::str::from_utf8(&bytes[xref..]).unwrap();
        let offsets: Vec<usize> = table
            .lines()
            .skip(3)
            .take(9)
            .map(|l| l[..10].parse().unwrap())
            .collect();
        for (i, offset) in offsets.iter().enumerate() {
            let expected = format!("{} 0 obj\n", i + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
        assert!(find(&bytes, b"/Kids [6 0 R 8 0 R] /Count 2").is_some());
    }

    #[test]
    fn text_is_win_ansi_and_escaped() {
        assert_eq!(encode_text("a(b)\\"), b"a\\(b\\)\\\\".to_vec());
        assert_eq!(encode_text("Zürich"), b"Z\xFCrich".to_vec());
        assert_eq!(encode_text("Auto – ÖV"), b"Auto \x96 \xD6V".to_vec());
        assert_eq!(encode_text("→"), b"?".to_vec());
    }

    #[test]
    fn coordinates_flip_to_bottom_left() {
        let page = Page {
            calls: vec![DrawCall::Rect {
                x: 10.0,
                y: 10.0,
                width: 190.0,
                height: 15.0,
                fill: Rgb(255, 255, 255),
            }],
        };
        let stream = content_stream(&page, 297.0);
        let text = std::str::from_utf8(&stream).unwrap();
        // y = (297 - 25) mm = 272 mm
        assert_eq!(
            text,
            "1.000 1.000 1.000 rg 28.35 771.02 538.58 42.52 re f\n"
        );
    }

    #[test]
    fn embeds_jpeg_with_dct_filter() {
        let image = parse_jpeg(jpeg_bytes(0xC0, 600, 400)).unwrap();
        let data = image.data.clone();
        let page = Page {
            calls: vec![DrawCall::Image {
                x: 10.0,
                y: 30.0,
                width: 90.0,
                height: 60.0,
                image: 0,
            }],
        };
        let bytes = write_pdf(&document(vec![page], vec![image]));

        assert!(find(&bytes, b"/Width 600 /Height 400 /ColorSpace /DeviceRGB").is_some());
        assert!(find(&bytes, b"/Filter /DCTDecode").is_some());
        assert!(find(&bytes, &data).is_some());
        assert!(find(&bytes, b"/XObject << /Im0 6 0 R >>").is_some());
        assert!(find(&bytes, b"/Im0 Do").is_some());
    }
}
