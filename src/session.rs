use egui::{Pos2, Vec2};
use log::{debug, info, warn};

use crate::command::Command;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::event::{EditorEvent, EventBus, EventHandler, Notification};
use crate::geometry::ViewTransform;
use crate::image_buffer::ImageBuffer;
use crate::inpaint::{InpaintBackend, InpaintRequest, InpaintResponse, Inpainter};
use crate::selection::{Selection, ToolKind};
use crate::tools::{SelectionPreview, SelectionTool};

/// One editing session: the working image, the selection tool, the view
/// transform and the inpainting state, plus the bus the UI listens on.
///
/// All pointer positions passed in are relative to the top-left corner of
/// the canvas area.
#[derive(Debug, Default)]
pub struct EditorSession {
    document: Document,
    tool: SelectionTool,
    view: ViewTransform,
    viewport: Vec2,
    inpainter: Inpainter,
    events: EventBus,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(tool: SelectionTool) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn image(&self) -> Option<&ImageBuffer> {
        self.document.image()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.document.selection()
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn is_busy(&self) -> bool {
        self.inpainter.is_busy()
    }

    /// Whether pointer input is currently routed to the selection tool
    pub fn accepts_input(&self) -> bool {
        self.document.has_image() && self.view.is_valid() && !self.is_busy()
    }

    /// Decodes an uploaded file and makes it the working image
    pub fn load_image(&mut self, bytes: &[u8]) -> EditorResult<()> {
        let image = ImageBuffer::from_bytes(bytes)?;
        self.set_image(image);
        Ok(())
    }

    fn set_image(&mut self, image: ImageBuffer) {
        let (width, height) = (image.width(), image.height());
        info!("Image loaded: {}x{}", width, height);
        self.tool.cancel();
        self.document.set_image(image);
        self.refresh_view();
        self.events.emit(EditorEvent::ImageLoaded { width, height });
    }

    /// Records the current canvas size. Call whenever the canvas is laid out.
    pub fn set_viewport(&mut self, size: Vec2) {
        if size != self.viewport {
            self.viewport = size;
            self.refresh_view();
        }
    }

    fn refresh_view(&mut self) {
        let image_size = self.document.image().map(|image| image.size()).unwrap_or(Vec2::ZERO);
        self.view = ViewTransform::fit(self.viewport, image_size);
    }

    pub fn active_tool(&self) -> ToolKind {
        self.tool.active_tool()
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        let old = self.tool.active_tool();
        if old != tool {
            self.tool.set_tool(tool);
            self.events.emit(EditorEvent::ToolChanged { old, new: tool });
        }
    }

    pub fn tool_state_name(&self) -> &'static str {
        self.tool.current_state_name()
    }

    pub fn preview(&self) -> Option<SelectionPreview> {
        self.tool.preview()
    }

    pub fn cancel_drawing(&mut self) {
        self.tool.cancel();
    }

    pub fn pointer_down(&mut self, pointer: Pos2) {
        if !self.accepts_input() {
            return;
        }
        let pos = self.view.to_image(pointer);
        let command = self.tool.on_pointer_down(pos, &self.view);
        self.apply(command);
    }

    pub fn pointer_move(&mut self, pointer: Pos2) {
        if !self.accepts_input() {
            return;
        }
        let pos = self.view.to_image(pointer);
        let command = self.tool.on_pointer_move(pos);
        self.apply(command);
    }

    pub fn pointer_up(&mut self, pointer: Pos2) {
        if !self.accepts_input() {
            return;
        }
        let pos = self.view.to_image(pointer);
        let command = self.tool.on_pointer_up(pos);
        self.apply(command);
    }

    pub fn double_click(&mut self) {
        if !self.accepts_input() {
            return;
        }
        let command = self.tool.on_double_click();
        self.apply(command);
    }

    fn apply(&mut self, command: Option<Command>) {
        let Some(command) = command else {
            return;
        };
        if let Command::CommitSelection(selection) = &command {
            if !selection.is_valid() {
                warn!("Dropping degenerate {:?} selection", selection.kind());
                return;
            }
        }
        let event = match &command {
            Command::CommitSelection(selection) => EditorEvent::SelectionCommitted(selection.clone()),
            Command::ClearSelection => EditorEvent::SelectionCleared,
            Command::ReplaceImage(image) => EditorEvent::ImageReplaced {
                width: image.width(),
                height: image.height(),
            },
        };
        debug!("Executing {}", command.name());
        command.execute(&mut self.document);
        self.events.emit(event);
    }

    pub fn clear_selection(&mut self) {
        if self.document.selection().is_some() {
            self.apply(Some(Command::ClearSelection));
        }
    }

    /// Starts an inpaint. Validation failures are reported on the bus and returned.
    pub fn begin_inpaint(&mut self, user_text: &str) -> EditorResult<InpaintRequest> {
        match self.inpainter.begin(&self.document, user_text) {
            Ok(request) => {
                self.events.emit(EditorEvent::InpaintStarted);
                Ok(request)
            }
            Err(err) => {
                // A second click while a request is in flight is ignored quietly
                if matches!(err, EditorError::Busy) {
                    return Err(err);
                }
                if err.is_validation() {
                    debug!("Inpaint not started: {}", err);
                } else {
                    warn!("Could not prepare inpaint request: {}", err);
                }
                self.notify_error(&err);
                Err(err)
            }
        }
    }

    /// Applies the result of a request started with [`EditorSession::begin_inpaint`]
    pub fn finish_inpaint(&mut self, outcome: EditorResult<InpaintResponse>) -> EditorResult<()> {
        let result = self.inpainter.finish(&mut self.document, outcome);
        match &result {
            Ok(()) => {
                self.refresh_view();
                if let Some(image) = self.document.image() {
                    self.events.emit(EditorEvent::ImageReplaced {
                        width: image.width(),
                        height: image.height(),
                    });
                }
                self.events.emit(EditorEvent::SelectionCleared);
                self.events.emit(EditorEvent::InpaintFinished { success: true });
                self.events.emit(EditorEvent::Notify(Notification::success(
                    "Success",
                    "Inpainting applied successfully!",
                )));
            }
            Err(err) => {
                self.events.emit(EditorEvent::InpaintFinished { success: false });
                self.notify_error(err);
            }
        }
        result
    }

    /// Runs a complete inpaint round trip against `backend`
    pub async fn inpaint<B: InpaintBackend + ?Sized>(
        &mut self,
        backend: &B,
        user_text: &str,
    ) -> EditorResult<()> {
        let request = self.begin_inpaint(user_text)?;
        let outcome = backend.inpaint(request).await;
        self.finish_inpaint(outcome)
    }

    /// Encodes the current image as PNG
    pub fn export_png_bytes(&self) -> EditorResult<Vec<u8>> {
        let image = self.document.image().ok_or(EditorError::NoImage)?;
        image.export_png()
    }

    /// Writes the current image to `path` as PNG
    pub fn export_png(&self, path: &std::path::Path) -> EditorResult<()> {
        let bytes = self.export_png_bytes()?;
        std::fs::write(path, bytes)?;
        info!("Exported image to {}", path.display());
        Ok(())
    }

    pub fn notify_error(&self, err: &EditorError) {
        warn!("{}", err);
        self.events.emit(EditorEvent::Notify(Notification::from_error(err)));
    }

    pub fn notify(&self, notification: Notification) {
        self.events.emit(EditorEvent::Notify(notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_commit_is_dropped() {
        let mut session = EditorSession::new();
        session.apply(Some(Command::CommitSelection(Selection::Polygon {
            points: vec![Pos2::new(10.0, 10.0), Pos2::new(100.0, 10.0)],
        })));
        assert!(session.selection().is_none());

        let triangle = Selection::Polygon {
            points: vec![Pos2::new(10.0, 10.0), Pos2::new(100.0, 10.0), Pos2::new(50.0, 80.0)],
        };
        session.apply(Some(Command::CommitSelection(triangle.clone())));
        assert_eq!(session.selection(), Some(&triangle));
    }
}
