use crate::error::{EditorError, ErrorKind};
use crate::selection::{Selection, ToolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

/// A user-facing message, shown by the UI as a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }

    /// Builds the message shown for a failed editor operation
    pub fn from_error(error: &EditorError) -> Self {
        let title = match error.kind() {
            ErrorKind::Validation | ErrorKind::Busy => "Error",
            ErrorKind::Format | ErrorKind::Remote => "Inpainting Failed",
            ErrorKind::Io => "Export Failed",
        };
        Self::error(title, error.to_string())
    }
}

#[derive(Debug, Clone)]
pub enum EditorEvent {
    ImageLoaded {
        width: u32,
        height: u32,
    },
    ImageReplaced {
        width: u32,
        height: u32,
    },
    ToolChanged {
        old: ToolKind,
        new: ToolKind,
    },
    SelectionCommitted(Selection),
    SelectionCleared,
    InpaintStarted,
    InpaintFinished {
        success: bool,
    },
    Notify(Notification),
}
