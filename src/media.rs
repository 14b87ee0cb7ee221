//! Raster payloads and aspect-preserving placement.

use std::fmt;

use ::image::{DynamicImage, ImageFormat};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ReportError, Result};
use crate::geometry::Rect;

/// Encoding of an image payload, fixed once when the payload is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Webp,
    Png,
    Jpeg,
}

impl ImageKind {
    /// Detects the kind from a data-URI mime prefix; anything that is not
    /// WebP or PNG is assumed to be JPEG.
    pub fn sniff(payload: &str) -> Self {
        if payload.starts_with("data:image/webp") {
            ImageKind::Webp
        } else if payload.starts_with("data:image/png") {
            ImageKind::Png
        } else {
            ImageKind::Jpeg
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageKind::Webp => "image/webp",
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }

    fn format(self) -> ImageFormat {
        match self {
            ImageKind::Webp => ImageFormat::WebP,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Encoded image bytes plus their kind tag.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    kind: ImageKind,
    bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(kind: ImageKind, bytes: Vec<u8>) -> Self {
        ImageData { kind, bytes }
    }

    /// Parses a `data:image/...;base64,` URI. A bare base64 string without
    /// the `data:` header is accepted and tagged as JPEG.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        let kind = ImageKind::sniff(uri);
        let payload = if uri.starts_with("data:") {
            uri.split_once(',')
                .map(|(_, payload)| payload)
                .ok_or_else(|| ReportError::InputError("data URI has no payload".to_string()))?
        } else {
            uri
        };

        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| ReportError::InputError(format!("invalid base64 image: {}", e)))?;

        Ok(ImageData { kind, bytes })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.kind.mime(), STANDARD.encode(&self.bytes))
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decodes the payload using its kind tag.
    pub fn decode(&self) -> Result<DynamicImage> {
        Ok(::image::load_from_memory_with_format(&self.bytes, self.kind.format())?)
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("kind", &self.kind)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for ImageData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for ImageData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        ImageData::from_data_uri(&uri).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Aspect-fit placement
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Letterboxed in the middle of the frame
    Centered,
    /// Anchored at the frame's top-left corner
    TopLeft,
}

/// Largest scale at which an `iw`×`ih` image still fits a `bw`×`bh` box.
pub fn fit_scale(iw: f32, ih: f32, bw: f32, bh: f32) -> f32 {
    (bw / iw).min(bh / ih)
}

/// Where an image of the given intrinsic size ends up inside `frame`.
/// Returns `None` for degenerate (zero-sized) images.
pub fn place(intrinsic: (u32, u32), frame: Rect, placement: Placement) -> Option<Rect> {
    let (iw, ih) = (intrinsic.0 as f32, intrinsic.1 as f32);
    if iw <= 0.0 || ih <= 0.0 {
        return None;
    }

    let scale = fit_scale(iw, ih, frame.width, frame.height);
    let (width, height) = (iw * scale, ih * scale);

    let (x, y) = match placement {
        Placement::Centered => (
            frame.x + (frame.width - width) / 2.0,
            frame.y + (frame.height - height) / 2.0,
        ),
        Placement::TopLeft => (frame.x, frame.y),
    };

    Some(Rect::new(x, y, width, height))
}
