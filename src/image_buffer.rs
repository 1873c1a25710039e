use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{EditorError, EditorResult};

// Static counter so every decoded buffer gets a distinct generation
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A self-contained, embeddable image payload: a mime type plus base64 data.
///
/// This is the representation that travels to and from the inpainting
/// service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl std::fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl InlineImage {
    /// Encodes raw file bytes with the given mime type
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: BASE64.encode(bytes),
        }
    }

    /// Wraps a payload received from elsewhere. The mime type must be `image/<word>`.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> EditorResult<Self> {
        let mime_type = mime_type.into();
        let subtype = mime_type.strip_prefix("image/").unwrap_or_default();
        if subtype.is_empty() || !subtype.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(EditorError::InvalidPayload(format!(
                "unsupported mime type '{}'",
                mime_type
            )));
        }
        Ok(Self {
            mime_type,
            data: data.into(),
        })
    }

    /// Decodes the base64 payload back into file bytes
    pub fn bytes(&self) -> EditorResult<Vec<u8>> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| EditorError::InvalidPayload(format!("bad base64 data: {}", e)))
    }
}

/// The single working image of an editing session.
///
/// Holds the decoded pixels for display and masking alongside the payload it
/// was decoded from, so the original bytes can be sent without re-encoding.
/// It is never patched in place: a successful inpaint replaces it wholesale.
#[derive(Clone)]
pub struct ImageBuffer {
    generation: u64,
    pixels: RgbaImage,
    source: InlineImage,
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("generation", &self.generation)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("mime_type", &self.source.mime_type)
            .finish()
    }
}

impl ImageBuffer {
    /// Decodes an uploaded file, guessing its format from the content
    pub fn from_bytes(bytes: &[u8]) -> EditorResult<Self> {
        let format = image::guess_format(bytes).map_err(EditorError::Decode)?;
        let source = InlineImage::from_bytes(format.to_mime_type(), bytes);
        Self::decode(bytes, source)
    }

    /// Decodes an embeddable payload, e.g. the image returned by the inpainting service
    pub fn from_inline(source: InlineImage) -> EditorResult<Self> {
        let bytes = source.bytes()?;
        Self::decode(&bytes, source)
    }

    /// Wraps already-decoded pixels, encoding them as PNG for transmission
    pub fn from_rgba(pixels: RgbaImage) -> EditorResult<Self> {
        let bytes = encode_png(&pixels)?;
        let source = InlineImage::from_bytes("image/png", &bytes);
        Ok(Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::SeqCst),
            pixels,
            source,
        })
    }

    fn decode(bytes: &[u8], source: InlineImage) -> EditorResult<Self> {
        let decoded = image::load_from_memory(bytes).map_err(EditorError::Decode)?;
        log::debug!(
            "Decoded {} image: {}x{}",
            source.mime_type,
            decoded.width(),
            decoded.height()
        );
        Ok(Self {
            generation: NEXT_GENERATION.fetch_add(1, Ordering::SeqCst),
            pixels: decoded.to_rgba8(),
            source,
        })
    }

    /// Unique id of this buffer's contents, changes whenever the image is replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.width() as f32, self.height() as f32)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// The embeddable payload used when sending this image to the inpainting service
    pub fn to_inline(&self) -> InlineImage {
        self.source.clone()
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }

    /// Encodes the current pixels as a PNG file
    pub fn export_png(&self) -> EditorResult<Vec<u8>> {
        encode_png(&self.pixels)
    }
}

/// PNG-encodes any buffer the `image` crate can write
pub(crate) fn encode_png<P, C>(image: &image::ImageBuffer<P, C>) -> EditorResult<Vec<u8>>
where
    P: image::PixelWithColorType,
    [P::Subpixel]: image::EncodableLayout,
    C: std::ops::Deref<Target = [P::Subpixel]>,
{
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(EditorError::Encode)?;
    Ok(bytes)
}
