//! Image format detection for tile payloads.
//!
//! Map services return whatever the template's `format` parameter asked for,
//! and the cache keeps no metadata, so the MIME type of a tile is recovered
//! from its magic bytes.

/// Image formats a map service commonly returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// MIME type for the format.
    pub const fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// MIME type used when the payload is not a recognized image.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const GIF87_MAGIC: &[u8] = b"GIF87a";
const GIF89_MAGIC: &[u8] = b"GIF89a";

/// Detect the image format of a tile payload from its leading bytes.
pub fn detect_image_format(data: &[u8]) -> Option<ImageFormat> {
    if data.starts_with(PNG_MAGIC) {
        Some(ImageFormat::Png)
    } else if data.starts_with(JPEG_MAGIC) {
        Some(ImageFormat::Jpeg)
    } else if data.starts_with(GIF87_MAGIC) || data.starts_with(GIF89_MAGIC) {
        Some(ImageFormat::Gif)
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some(ImageFormat::Webp)
    } else {
        None
    }
}

/// MIME type for a tile payload.
pub fn content_type_for(data: &[u8]) -> &'static str {
    detect_image_format(data)
        .map(|f| f.content_type())
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}
