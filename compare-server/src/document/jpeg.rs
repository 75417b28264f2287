//! Minimal JPEG header inspection.
//!
//! The document embeds JPEG data unchanged, so all it needs is the
//! frame size and component count from the SOF segment.

/// Errors from JPEG inspection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JpegError {
    #[error("not a JPEG image")]
    NotJpeg,

    #[error("JPEG data is truncated")]
    Truncated,

    /// Progressive, lossless or arithmetic-coded frames.
    #[error("unsupported JPEG frame type 0x{0:02X}")]
    Unsupported(u8),

    #[error("JPEG has no frame header")]
    NoFrame,
}

/// A baseline JPEG ready to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegImage {
    pub width: u32,
    pub height: u32,
    /// 1 = grey, 3 = YCbCr, 4 = CMYK.
    pub components: u8,
    pub data: Vec<u8>,
}

impl JpegImage {
    /// Height over width.
    pub fn aspect(&self) -> f64 {
        if self.width == 0 {
            return 1.0;
        }
        f64::from(self.height) / f64::from(self.width)
    }
}

const SOI: u8 = 0xD8;
const SOS: u8 = 0xDA;
const EOI: u8 = 0xD9;

/// Read the frame header of a sequential JPEG.
pub fn parse_jpeg(data: Vec<u8>) -> Result<JpegImage, JpegError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != SOI {
        return Err(JpegError::NotJpeg);
    }

    let mut pos = 2;
    loop {
        // Markers may be preceded by any number of fill bytes.
        while data.get(pos) == Some(&0xFF) && data.get(pos + 1) == Some(&0xFF) {
            pos += 1;
        }
        let (Some(&0xFF), Some(&marker)) = (data.get(pos), data.get(pos + 1)) else {
            return Err(JpegError::Truncated);
        };
        pos += 2;

        match marker {
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => continue,
            SOS | EOI => return Err(JpegError::NoFrame),
            _ => {}
        }

        let len = match (data.get(pos), data.get(pos + 1)) {
            (Some(&hi), Some(&lo)) => usize::from(u16::from_be_bytes([hi, lo])),
            _ => return Err(JpegError::Truncated),
        };
        if len < 2 || pos + len > data.len() {
            return Err(JpegError::Truncated);
        }

        match marker {
            0xC0 | 0xC1 => {
                if len < 8 {
                    return Err(JpegError::Truncated);
                }
                let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]);
                let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]);
                let components = data[pos + 7];
                return Ok(JpegImage {
                    width: u32::from(width),
                    height: u32::from(height),
                    components,
                    data,
                });
            }
            // Every other SOFn except DHT (C4), JPG (C8) and DAC (CC).
            0xC2 | 0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                return Err(JpegError::Unsupported(marker));
            }
            _ => pos += len,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A header-only JPEG with the given frame marker and size.
    pub(crate) fn jpeg_bytes(marker: u8, width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0xFF, SOI];
        // APP0 with two payload bytes
        bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x04, 0x4A, 0x46]);
        // Frame header, three components
        bytes.extend_from_slice(&[0xFF, marker, 0x00, 0x11, 0x08]);
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.push(3);
        bytes.extend_from_slice(&[1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
        bytes.extend_from_slice(&[0xFF, SOS, 0x00, 0x02, 0xFF, EOI]);
        bytes
    }

    #[test]
    fn reads_baseline_dimensions() {
        let image = parse_jpeg(jpeg_bytes(0xC0, 600, 400)).unwrap();
        assert_eq!(image.width, 600);
        assert_eq!(image.height, 400);
        assert_eq!(image.components, 3);
        assert!((image.aspect() - 400.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn keeps_data_unchanged() {
        let bytes = jpeg_bytes(0xC0, 10, 20);
        let image = parse_jpeg(bytes.clone()).unwrap();
        assert_eq!(image.data, bytes);
    }

    #[test]
    fn rejects_progressive() {
        assert_eq!(
            parse_jpeg(jpeg_bytes(0xC2, 600, 400)),
            Err(JpegError::Unsupported(0xC2))
        );
    }

    #[test]
    fn rejects_non_jpeg() {
        assert_eq!(
            parse_jpeg(b"\x89PNG\r\n\x1a\n".to_vec()),
            Err(JpegError::NotJpeg)
        );
    }

    #[test]
    fn rejects_truncated() {
        let mut bytes = jpeg_bytes(0xC0, 600, 400);
        bytes.truncate(10);
        assert_eq!(parse_jpeg(bytes), Err(JpegError::Truncated));
    }

    #[test]
    fn scan_before_frame_is_an_error() {
        let bytes = vec![0xFF, SOI, 0xFF, SOS, 0x00, 0x02];
        assert_eq!(parse_jpeg(bytes), Err(JpegError::NoFrame));
    }
}
