use std::sync::Arc;

use futures::channel::oneshot;
use parking_lot::Mutex;

use crate::config::StudioConfig;
use crate::error::{EditorError, EditorResult};
use crate::event::{Notification, ToastHandler, ToastQueue};
use crate::file_handler::{FileHandler, ImageFile};
use crate::inpaint::{GeminiBackend, InpaintBackend, InpaintResponse};
use crate::input::InputHandler;
use crate::panels;
use crate::renderer::Renderer;
use crate::selection::ToolKind;
use crate::session::EditorSession;
use crate::tools::SelectionTool;

type PendingInpaint = oneshot::Receiver<EditorResult<InpaintResponse>>;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct StudioApp {
    pub(crate) config: StudioConfig,
    pub(crate) active_tool: ToolKind,
    pub(crate) prompt: String,

    // The working image is not persisted
    #[serde(skip)]
    pub(crate) session: EditorSession,
    // Skip serializing the renderer since it contains GPU resources
    #[serde(skip)]
    pub(crate) renderer: Renderer,
    #[serde(skip)]
    pub(crate) input: InputHandler,
    #[serde(skip)]
    file_handler: FileHandler,
    #[serde(skip)]
    pub(crate) toasts: Arc<Mutex<ToastQueue>>,
    #[serde(skip)]
    backend: Option<Arc<dyn InpaintBackend>>,
    #[serde(skip)]
    runtime: Option<tokio::runtime::Runtime>,
    #[serde(skip)]
    pending: Option<PendingInpaint>,
}

impl Default for StudioApp {
    fn default() -> Self {
        Self {
            config: StudioConfig::default(),
            active_tool: ToolKind::default(),
            prompt: String::new(),
            session: EditorSession::default(),
            renderer: Renderer::new(),
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            toasts: Arc::new(Mutex::new(ToastQueue::new())),
            backend: None,
            runtime: None,
            pending: None,
        }
    }
}

impl StudioApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let restored: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let persisted = match restored.config.validate() {
            Ok(()) => restored.config.clone(),
            Err(err) => {
                log::warn!("Discarding persisted config: {}", err);
                StudioConfig::default()
            }
        };
        let config = match StudioConfig::from_env_path() {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                log::warn!("Ignoring config file: {}", err);
                persisted
            }
            None => persisted,
        }
        .with_env();

        let backend: Option<Arc<dyn InpaintBackend>> = match GeminiBackend::new(&config) {
            Ok(backend) => Some(Arc::new(backend)),
            Err(err) => {
                log::warn!("Inpainting backend unavailable: {}", err);
                None
            }
        };

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => Some(runtime),
            Err(err) => {
                log::error!("Failed to start async runtime: {}", err);
                None
            }
        };

        let mut app = Self::with_backend(config, backend, runtime);
        app.prompt = restored.prompt;
        app.select_tool(restored.active_tool);
        app
    }

    /// Builds an app around an explicit backend, without touching storage
    pub fn with_backend(
        config: StudioConfig,
        backend: Option<Arc<dyn InpaintBackend>>,
        runtime: Option<tokio::runtime::Runtime>,
    ) -> Self {
        let tool = SelectionTool::default().with_close_threshold(config.close_threshold_px);
        let session = EditorSession::with_tool(tool);
        let toasts = Arc::new(Mutex::new(ToastQueue::new()));
        session.subscribe(Box::new(ToastHandler::new(toasts.clone())));

        Self {
            config,
            session,
            toasts,
            backend,
            runtime,
            ..Self::default()
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    pub fn toasts(&self) -> Arc<Mutex<ToastQueue>> {
        self.toasts.clone()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn select_tool(&mut self, tool: ToolKind) {
        self.session.set_tool(tool);
        self.active_tool = tool;
    }

    pub fn open_image(&mut self, file: ImageFile) {
        if self.session.is_busy() {
            log::warn!("Ignoring {} while an inpaint is running", file.name);
            return;
        }
        match self.session.load_image(&file.bytes) {
            Ok(()) => log::info!("Opened {}", file.name),
            Err(err) => {
                log::warn!("Failed to open {}: {}", file.name, err);
                self.session.notify(Notification::error("Upload Failed", err.to_string()));
            }
        }
    }

    pub(crate) fn upload_image(&mut self) {
        if let Some(file) = FileHandler::pick_image() {
            self.open_image(file);
        }
    }

    pub(crate) fn export_image(&mut self) {
        let Some(path) = FileHandler::pick_export_path() else {
            return;
        };
        match self.session.export_png(&path) {
            Ok(()) => self.session.notify(Notification::success(
                "Exported",
                format!("Saved to {}", path.display()),
            )),
            Err(err) => self.session.notify_error(&err),
        }
    }

    /// Starts an inpaint with the current prompt. The result is collected by
    /// [`StudioApp::poll_inpaint`] on a later frame.
    pub fn start_inpaint(&mut self) {
        let (Some(backend), Some(runtime)) = (self.backend.clone(), self.runtime.as_ref()) else {
            self.session.notify(Notification::error(
                "Error",
                "Inpainting is unavailable. Set GEMINI_API_KEY and restart.",
            ));
            return;
        };

        let Ok(request) = self.session.begin_inpaint(&self.prompt) else {
            return;
        };

        let (sender, receiver) = oneshot::channel();
        let future = backend.inpaint(request);
        runtime.spawn(async move {
            // The receiver is gone only if the app shut down
            let _ = sender.send(future.await);
        });
        self.pending = Some(receiver);
    }

    /// Applies a finished inpaint, if any. Returns true while one is still running.
    pub fn poll_inpaint(&mut self) -> bool {
        let Some(receiver) = self.pending.as_mut() else {
            return false;
        };

        let outcome = match receiver.try_recv() {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return true,
            Err(oneshot::Canceled) => Err(EditorError::Remote("request was cancelled".to_string())),
        };
        self.pending = None;
        // Errors are already reported through the toast queue
        let _ = self.session.finish_inpaint(outcome);
        false
    }
}

impl eframe::App for StudioApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.poll_inpaint() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        if self.file_handler.check_for_dropped_files(ctx) {
            if let Some(file) = self.file_handler.take_dropped_image() {
                self.open_image(file);
            }
        }
        self.file_handler.preview_files_being_dropped(ctx);

        panels::tools_panel(self, ctx);
        panels::inpaint_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::toasts_overlay(self, ctx);
    }
}
