use crate::image_buffer::ImageBuffer;
use crate::selection::Selection;

/// The state an editing session works on: at most one image and at most
/// one committed selection.
#[derive(Debug, Default, Clone)]
pub struct Document {
    image: Option<ImageBuffer>,
    selection: Option<Selection>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&ImageBuffer> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Replaces the working image. Any committed selection belongs to the old
    /// image, so it is dropped as well.
    pub fn set_image(&mut self, image: ImageBuffer) {
        self.image = Some(image);
        self.selection = None;
    }

    /// Swaps in an edited version of the current image, returning the old one
    pub fn replace_image(&mut self, image: ImageBuffer) -> Option<ImageBuffer> {
        self.image.replace(image)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) -> Option<Selection> {
        self.selection.take()
    }

    /// Pixel dimensions of the working image, or zero when nothing is loaded
    pub fn dimensions(&self) -> (u32, u32) {
        self.image
            .as_ref()
            .map(|image| (image.width(), image.height()))
            .unwrap_or((0, 0))
    }
}
