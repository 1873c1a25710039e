// Selection tools: pointer input in, committed selections out
mod selection_tool;

pub use selection_tool::{CLOSE_THRESHOLD_PX, SelectionPreview, SelectionState, SelectionTool};
pub use crate::selection::ToolKind;
