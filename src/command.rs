use crate::document::Document;
use crate::image_buffer::ImageBuffer;
use crate::selection::Selection;

/// Mutations of the document produced by tools and the inpainting flow.
///
/// Tools never touch the document directly; they hand back a command and
/// the session executes it at a well-defined commit point.
#[derive(Clone)]
pub enum Command {
    /// Replaces the committed selection
    CommitSelection(Selection),
    /// Drops the committed selection
    ClearSelection,
    /// Replaces the working image wholesale (after a successful inpaint)
    ReplaceImage(ImageBuffer),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::CommitSelection(selection) => f
                .debug_tuple("CommitSelection")
                .field(&selection.kind())
                .finish(),
            Command::ClearSelection => write!(f, "ClearSelection"),
            Command::ReplaceImage(image) => f
                .debug_struct("ReplaceImage")
                .field("generation", &image.generation())
                .field("size", &(image.width(), image.height()))
                .finish(),
        }
    }
}

impl Command {
    pub fn execute(self, document: &mut Document) {
        log::debug!("Executing {:?}", self);
        match self {
            Command::CommitSelection(selection) => document.set_selection(selection),
            Command::ClearSelection => {
                document.clear_selection();
            }
            Command::ReplaceImage(image) => {
                document.replace_image(image);
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CommitSelection(_) => "Commit Selection",
            Command::ClearSelection => "Clear Selection",
            Command::ReplaceImage(_) => "Replace Image",
        }
    }
}
