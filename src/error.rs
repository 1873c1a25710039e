use thiserror::Error;

/// Broad category of an [`EditorError`], used to decide how it is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caught before any request is issued (missing image, selection, prompt)
    Validation,
    /// An image payload could not be decoded or encoded
    Format,
    /// The inpainting service refused or the call failed
    Remote,
    /// Filesystem errors while exporting
    Io,
    /// A request is already in flight
    Busy,
}

/// Errors produced by the editing core
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Please upload an image before inpainting.")]
    NoImage,

    #[error("Please make a selection on the image.")]
    NoSelection,

    #[error("Please enter a prompt describing the change.")]
    EmptyInstruction,

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Cannot build a mask for a {width}x{height} image")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("Invalid image format: {0}")]
    InvalidPayload(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("{0}")]
    Refused(String),

    #[error("Inpainting request failed: {0}")]
    Remote(String),

    #[error("An inpainting request is already in progress")]
    Busy,

    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoImage | Self::NoSelection | Self::EmptyInstruction => ErrorKind::Validation,
            Self::InvalidSelection(_)
            | Self::EmptyCanvas { .. }
            | Self::InvalidPayload(_)
            | Self::Decode(_)
            | Self::Encode(_) => ErrorKind::Format,
            Self::Refused(_) | Self::Remote(_) => ErrorKind::Remote,
            Self::Io(_) => ErrorKind::Io,
            Self::Busy => ErrorKind::Busy,
        }
    }

    /// True for errors that are caught before any request is sent
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
