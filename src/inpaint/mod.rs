//! Mask-guided regional editing.
//!
//! The [`Inpainter`] validates the document, packages image + mask +
//! instruction into an [`InpaintRequest`], and applies the backend's answer.
//! It runs at most one request at a time and never retries.

mod gemini;

pub use gemini::GeminiBackend;

use futures::future::BoxFuture;
use log::{info, warn};

use crate::command::Command;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::image_buffer::{ImageBuffer, InlineImage};
use crate::mask;

/// Everything the generative service needs for one edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InpaintRequest {
    pub image: InlineImage,
    pub mask: InlineImage,
    pub instruction: String,
}

/// What the service sent back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InpaintResponse {
    /// The edited image
    Image(InlineImage),
    /// The model answered in text instead of producing an image
    Refusal(String),
}

/// Message used when the service returns neither an image nor an explanation
pub const MISSING_IMAGE_MESSAGE: &str = "Could not find the edited image in the response.";

/// A generative image-editing capability
pub trait InpaintBackend: Send + Sync {
    fn inpaint(&self, request: InpaintRequest) -> BoxFuture<'static, EditorResult<InpaintResponse>>;
}

/// Builds the instruction text sent alongside the image and its mask
pub fn compose_instruction(user_text: &str) -> String {
    format!(
        "Use the second image as a mask for the first image. Apply the requested change \
         only inside the white region of the mask and blend it seamlessly with the \
         surrounding image. Requested change: \"{}\"",
        user_text.trim()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InpaintState {
    #[default]
    Ready,
    Requesting,
}

#[derive(Debug, Default)]
pub struct Inpainter {
    state: InpaintState,
}

impl Inpainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InpaintState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == InpaintState::Requesting
    }

    /// Validates the document and builds the request. On success the
    /// inpainter is `Requesting` until [`Inpainter::finish`] is called.
    pub fn begin(&mut self, document: &Document, user_text: &str) -> EditorResult<InpaintRequest> {
        if self.is_busy() {
            return Err(EditorError::Busy);
        }
        let image = document.image().ok_or(EditorError::NoImage)?;
        if document.selection().is_none() {
            return Err(EditorError::NoSelection);
        }
        if user_text.trim().is_empty() {
            return Err(EditorError::EmptyInstruction);
        }

        let mask = mask::build_mask(document)?;
        let covered = mask.covered_pixels();
        let request = InpaintRequest {
            image: image.to_inline(),
            mask: mask.encoded,
            instruction: compose_instruction(user_text),
        };

        info!(
            "Inpaint request: {}x{} image, {} masked pixels",
            image.width(),
            image.height(),
            covered
        );
        self.state = InpaintState::Requesting;
        Ok(request)
    }

    /// Applies the outcome of a request started with [`Inpainter::begin`].
    ///
    /// On success the working image is replaced and the selection cleared.
    /// On any failure the document is left exactly as it was.
    pub fn finish(
        &mut self,
        document: &mut Document,
        outcome: EditorResult<InpaintResponse>,
    ) -> EditorResult<()> {
        self.state = InpaintState::Ready;

        let payload = match outcome {
            Ok(InpaintResponse::Image(payload)) => payload,
            Ok(InpaintResponse::Refusal(text)) => {
                warn!("Inpainting refused: {}", text);
                let text = if text.trim().is_empty() {
                    MISSING_IMAGE_MESSAGE.to_string()
                } else {
                    text
                };
                return Err(EditorError::Refused(text));
            }
            Err(err) => {
                warn!("Inpainting request failed: {}", err);
                return Err(err);
            }
        };

        let edited = ImageBuffer::from_inline(payload)?;
        info!("Inpaint applied: new image {}x{}", edited.width(), edited.height());
        Command::ReplaceImage(edited).execute(document);
        Command::ClearSelection.execute(document);
        Ok(())
    }

    /// Runs a full request: validate, send, await, apply
    pub async fn run<B: InpaintBackend + ?Sized>(
        &mut self,
        document: &mut Document,
        backend: &B,
        user_text: &str,
    ) -> EditorResult<()> {
        let request = self.begin(document, user_text)?;
        let outcome = backend.inpaint(request).await;
        self.finish(document, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;
    use egui::{Pos2, Rect};
    use futures::FutureExt;
    use image::{Rgba, RgbaImage};

    struct FixedBackend(EditorResult<InpaintResponse>);

    impl InpaintBackend for FixedBackend {
        fn inpaint(&self, _request: InpaintRequest) -> BoxFuture<'static, EditorResult<InpaintResponse>> {
            let outcome = match &self.0 {
                Ok(response) => Ok(response.clone()),
                Err(err) => Err(EditorError::Remote(err.to_string())),
            };
            async move { outcome }.boxed()
        }
    }

    fn document_with_selection() -> Document {
        let mut document = Document::new();
        let image = ImageBuffer::from_rgba(RgbaImage::from_pixel(8, 6, Rgba([0, 0, 255, 255]))).unwrap();
        document.set_image(image);
        document.set_selection(Selection::Rectangle {
            rect: Rect::from_min_max(Pos2::new(1.0, 1.0), Pos2::new(4.0, 4.0)),
        });
        document
    }

    fn edited_payload() -> InlineImage {
        ImageBuffer::from_rgba(RgbaImage::from_pixel(8, 6, Rgba([255, 0, 0, 255])))
            .unwrap()
            .to_inline()
    }

    #[test]
    fn test_instruction_wraps_user_text() {
        let text = compose_instruction("  add a small boat ");
        assert!(text.contains("second image as a mask"));
        assert!(text.contains("white region"));
        assert!(text.contains("seamlessly"));
        assert!(text.ends_with("\"add a small boat\""));
    }

    #[test]
    fn test_begin_validates_preconditions() {
        let mut inpainter = Inpainter::new();

        let empty = Document::new();
        assert!(matches!(inpainter.begin(&empty, "sky"), Err(EditorError::NoImage)));

        let mut no_selection = document_with_selection();
        no_selection.clear_selection();
        assert!(matches!(inpainter.begin(&no_selection, "sky"), Err(EditorError::NoSelection)));

        let document = document_with_selection();
        assert!(matches!(inpainter.begin(&document, "   "), Err(EditorError::EmptyInstruction)));
        assert_eq!(inpainter.state(), InpaintState::Ready);
    }

    #[test]
    fn test_second_begin_while_requesting_is_rejected() {
        let mut inpainter = Inpainter::new();
        let document = document_with_selection();

        let request = inpainter.begin(&document, "sky").unwrap();
        assert_eq!(request.mask.mime_type, "image/png");
        assert!(inpainter.is_busy());
        assert!(matches!(inpainter.begin(&document, "sky"), Err(EditorError::Busy)));
    }

    #[test]
    fn test_success_replaces_image_and_clears_selection() {
        let mut inpainter = Inpainter::new();
        let mut document = document_with_selection();
        let before = document.image().unwrap().generation();

        let backend = FixedBackend(Ok(InpaintResponse::Image(edited_payload())));
        futures::executor::block_on(inpainter.run(&mut document, &backend, "make it red")).unwrap();

        let image = document.image().unwrap();
        assert_ne!(image.generation(), before);
        assert_eq!(image.pixels().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert!(document.selection().is_none());
        assert_eq!(inpainter.state(), InpaintState::Ready);
    }

    #[test]
    fn test_refusal_keeps_document() {
        let mut inpainter = Inpainter::new();
        let mut document = document_with_selection();
        let before = document.image().unwrap().generation();

        let backend = FixedBackend(Ok(InpaintResponse::Refusal("I can't do that.".to_string())));
        let err = futures::executor::block_on(inpainter.run(&mut document, &backend, "x")).unwrap_err();

        assert_eq!(err.to_string(), "I can't do that.");
        assert_eq!(document.image().unwrap().generation(), before);
        assert!(document.selection().is_some());
        assert!(!inpainter.is_busy());
    }

    #[test]
    fn test_blank_refusal_uses_generic_message() {
        let mut inpainter = Inpainter::new();
        let mut document = document_with_selection();
        inpainter.begin(&document, "x").unwrap();
        let err = inpainter
            .finish(&mut document, Ok(InpaintResponse::Refusal(String::new())))
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_IMAGE_MESSAGE);
    }

    #[test]
    fn test_undecodable_result_keeps_document() {
        let mut inpainter = Inpainter::new();
        let mut document = document_with_selection();
        let before = document.image().unwrap().generation();

        inpainter.begin(&document, "x").unwrap();
        let junk = InlineImage::from_bytes("image/png", b"definitely not a png");
        let err = inpainter
            .finish(&mut document, Ok(InpaintResponse::Image(junk)))
            .unwrap_err();

        assert!(matches!(err, EditorError::Decode(_)));
        assert_eq!(document.image().unwrap().generation(), before);
        assert!(document.selection().is_some());
    }
}
