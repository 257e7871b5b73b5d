//! Image payload for embedded raster images.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use kurbo::{BezPath, Circle, Point, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Encoding of stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Detect format from a MIME type such as `image/png`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        if data.starts_with(b"GIF8") {
            return Some(ImageFormat::Gif);
        }
        None
    }
}

/// Pixel data handed back by an image source.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
}

impl LoadedImage {
    /// Identify encoded bytes and read their pixel size from the file header.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        let format = ImageFormat::from_magic_bytes(&bytes)?;
        let (width, height) = match format {
            ImageFormat::Png => png_size(&bytes)?,
            ImageFormat::Gif => gif_size(&bytes)?,
            ImageFormat::Jpeg => jpeg_size(&bytes)?,
            ImageFormat::WebP => webp_size(&bytes)?,
        };
        Some(Self {
            bytes,
            format,
            width,
            height,
        })
    }
}

fn be_u16(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at + 2)?;
    Some(u32::from(u16::from_be_bytes([b[0], b[1]])))
}

fn le_u16(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at + 2)?;
    Some(u32::from(u16::from_le_bytes([b[0], b[1]])))
}

fn le_u24(data: &[u8], at: usize) -> Option<u32> {
    let b = data.get(at..at + 3)?;
    Some(u32::from(b[0]) | u32::from(b[1]) << 8 | u32::from(b[2]) << 16)
}

fn png_size(data: &[u8]) -> Option<(u32, u32)> {
    if data.get(12..16)? != b"IHDR" {
        return None;
    }
    let w = data.get(16..20)?;
    let h = data.get(20..24)?;
    Some((
        u32::from_be_bytes([w[0], w[1], w[2], w[3]]),
        u32::from_be_bytes([h[0], h[1], h[2], h[3]]),
    ))
}

fn gif_size(data: &[u8]) -> Option<(u32, u32)> {
    Some((le_u16(data, 6)?, le_u16(data, 8)?))
}

fn jpeg_size(data: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        // Start-of-frame markers carry the dimensions.
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            return Some((be_u16(data, pos + 7)?, be_u16(data, pos + 5)?));
        }
        if marker == 0xD8 || marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        pos += 2 + be_u16(data, pos + 2)? as usize;
    }
    None
}

fn webp_size(data: &[u8]) -> Option<(u32, u32)> {
    match data.get(12..16)? {
        b"VP8 " => Some((le_u16(data, 26)? & 0x3fff, le_u16(data, 28)? & 0x3fff)),
        b"VP8L" => {
            let b = data.get(21..25)?;
            let [b0, b1, b2, b3] = [b[0], b[1], b[2], b[3]].map(u32::from);
            let width = 1 + (b0 | (b1 & 0x3f) << 8);
            let height = 1 + (b1 >> 6 | b2 << 2 | (b3 & 0x0f) << 10);
            Some((width, height))
        }
        b"VP8X" => Some((1 + le_u24(data, 24)?, 1 + le_u24(data, 27)?)),
        _ => None,
    }
}

/// Mask restricting the visible area of an image, centered on the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ClipRegion {
    Circle { radius: f64 },
    RoundedRect { width: f64, height: f64, radius: f64 },
}

impl ClipRegion {
    /// Default corner radius of a rounded-rectangle crop.
    pub const DEFAULT_CORNER_RADIUS: f64 = 20.0;

    /// Largest circle fitting the image.
    pub fn circle_for(width: f64, height: f64) -> Self {
        ClipRegion::Circle {
            radius: width.min(height) / 2.0,
        }
    }

    /// Full-size rounded rectangle.
    pub fn rounded_rect_for(width: f64, height: f64, radius: f64) -> Self {
        ClipRegion::RoundedRect {
            width,
            height,
            radius,
        }
    }

    /// Clip outline in image-local coordinates.
    pub fn local_path(&self, image_width: f64, image_height: f64) -> BezPath {
        let center = Point::new(image_width / 2.0, image_height / 2.0);
        match *self {
            ClipRegion::Circle { radius } => Circle::new(center, radius).to_path(0.1),
            ClipRegion::RoundedRect {
                width,
                height,
                radius,
            } => RoundedRect::from_origin_size(
                Point::new(center.x - width / 2.0, center.y - height / 2.0),
                (width, height),
                radius,
            )
            .to_path(0.1),
        }
    }
}

/// Image-specific data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub source_width: u32,
    pub source_height: u32,
    pub format: ImageFormat,
    /// Encoded image bytes, base64 so snapshots stay plain JSON.
    pub data_base64: String,
    #[serde(default)]
    pub clip: Option<ClipRegion>,
}

impl Image {
    pub fn from_loaded(loaded: &LoadedImage) -> Self {
        Self {
            source_width: loaded.width,
            source_height: loaded.height,
            format: loaded.format,
            data_base64: BASE64.encode(&loaded.bytes),
            clip: None,
        }
    }

    /// Decode the stored bytes.
    pub fn data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data_base64)
    }

    /// `data:` URL embedding the image.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.data_base64)
    }

    /// Uniform scale that makes the image `target` units wide.
    pub fn scale_to_width(&self, target: f64) -> f64 {
        target / f64::from(self.source_width.max(1))
    }

    /// Uniform scale that makes the image `target` units tall.
    pub fn scale_to_height(&self, target: f64) -> f64 {
        target / f64::from(self.source_height.max(1))
    }

    pub fn crop_to_circle(&mut self) {
        self.clip = Some(ClipRegion::circle_for(
            f64::from(self.source_width),
            f64::from(self.source_height),
        ));
    }

    pub fn crop_to_rounded_rect(&mut self, radius: f64) {
        self.clip = Some(ClipRegion::rounded_rect_for(
            f64::from(self.source_width),
            f64::from(self.source_height),
            radius,
        ));
    }

    pub fn remove_crop(&mut self) {
        self.clip = None;
    }
}

/// Split a `data:<mime>;base64,<payload>` URL into format and bytes.
///
/// Bare base64 without a prefix is treated as PNG.
pub(crate) fn parse_data_url(input: &str) -> Option<(Option<ImageFormat>, Vec<u8>)> {
    let (format, payload) = match input.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest.split_once(',')?;
            let mime = meta.strip_suffix(";base64")?;
            (ImageFormat::from_mime(mime), payload)
        }
        None => (Some(ImageFormat::Png), input),
    };
    let bytes = BASE64.decode(payload.trim()).ok()?;
    Some((format, bytes))
}
