use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use egui::{Pos2, Vec2};
use futures::FutureExt;
use futures::executor::block_on;
use futures::future::BoxFuture;
use image::{GenericImageView, Rgba, RgbaImage};
use parking_lot::Mutex;
use studio_editor::event::{NotificationVariant, ToastHandler, ToastQueue};
use studio_editor::file_handler::ImageFile;
use studio_editor::{
    EditorError, EditorResult, EditorSession, ImageBuffer, InpaintBackend, InpaintRequest,
    InpaintResponse, StudioApp, StudioConfig,
};

/// Backend that answers every request with a canned response and remembers what it was sent
struct MockBackend {
    response: Mutex<Option<EditorResult<InpaintResponse>>>,
    calls: AtomicUsize,
    last_request: Mutex<Option<InpaintRequest>>,
}

impl MockBackend {
    fn new(response: EditorResult<InpaintResponse>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InpaintBackend for MockBackend {
    fn inpaint(&self, request: InpaintRequest) -> BoxFuture<'static, EditorResult<InpaintResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request);
        let response = self
            .response
            .lock()
            .take()
            .unwrap_or_else(|| Err(EditorError::Remote("no response queued".to_string())));
        async move { response }.boxed()
    }
}

fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    ImageBuffer::from_rgba(image).unwrap().export_png().unwrap()
}

fn red_payload(width: u32, height: u32) -> InpaintResponse {
    let image = ImageBuffer::from_rgba(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])))
        .unwrap();
    InpaintResponse::Image(image.to_inline())
}

// A session with a 100x80 image, a 20x20 rectangle selection and a toast queue attached
fn prepared_session() -> (EditorSession, Arc<Mutex<ToastQueue>>) {
    let mut session = EditorSession::new();
    let toasts = Arc::new(Mutex::new(ToastQueue::new()));
    session.subscribe(Box::new(ToastHandler::new(toasts.clone())));

    session.load_image(&png_bytes(100, 80, [0, 0, 255, 255])).unwrap();
    session.set_viewport(Vec2::new(100.0, 80.0));
    session.pointer_down(Pos2::new(10.0, 10.0));
    session.pointer_move(Pos2::new(30.0, 30.0));
    session.pointer_up(Pos2::new(30.0, 30.0));
    assert!(session.selection().is_some());

    (session, toasts)
}

#[test]
fn test_no_selection_never_sends_request() {
    let (mut session, toasts) = prepared_session();
    session.clear_selection();
    let backend = MockBackend::new(Ok(red_payload(100, 80)));

    let result = block_on(session.inpaint(&backend, "add a boat"));

    assert!(matches!(result, Err(EditorError::NoSelection)));
    assert_eq!(backend.calls(), 0);
    let queue = toasts.lock();
    assert_eq!(queue.toasts().len(), 1);
    assert_eq!(queue.toasts()[0].title, "Error");
    assert_eq!(queue.toasts()[0].variant, NotificationVariant::Destructive);
}

#[test]
fn test_empty_prompt_never_sends_request() {
    let (mut session, _toasts) = prepared_session();
    let backend = MockBackend::new(Ok(red_payload(100, 80)));

    let result = block_on(session.inpaint(&backend, "  \n "));

    assert!(matches!(result, Err(EditorError::EmptyInstruction)));
    assert_eq!(backend.calls(), 0);
    assert!(session.selection().is_some());
}

#[test]
fn test_success_replaces_image_and_clears_selection() {
    let (mut session, toasts) = prepared_session();
    let before = session.image().unwrap().generation();
    let backend = MockBackend::new(Ok(red_payload(120, 60)));

    block_on(session.inpaint(&backend, "make it red")).unwrap();

    let image = session.image().unwrap();
    assert_ne!(image.generation(), before);
    assert_eq!(image.pixels().get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
    // The returned image may have different dimensions; the view follows it
    assert_eq!(session.document().dimensions(), (120, 60));
    assert_eq!(session.view().image_size(), Vec2::new(120.0, 60.0));
    assert!(session.selection().is_none());
    assert!(!session.is_busy());

    let queue = toasts.lock();
    assert_eq!(queue.toasts().len(), 1);
    assert_eq!(queue.toasts()[0].description, "Inpainting applied successfully!");
    assert_eq!(queue.toasts()[0].variant, NotificationVariant::Default);
}

#[test]
fn test_request_carries_image_mask_and_instruction() {
    let (mut session, _toasts) = prepared_session();
    let backend = MockBackend::new(Ok(red_payload(100, 80)));

    block_on(session.inpaint(&backend, "add a small boat")).unwrap();

    let request = backend.last_request.lock().take().unwrap();
    assert_eq!(request.mask.mime_type, "image/png");
    assert!(request.instruction.ends_with("\"add a small boat\""));

    let mask = image::load_from_memory(&request.mask.bytes().unwrap()).unwrap();
    assert_eq!(mask.dimensions(), (100, 80));
    let mask = mask.to_luma8();
    assert_eq!(mask.get_pixel(20, 20).0, [255]);
    assert_eq!(mask.get_pixel(50, 50).0, [0]);

    let original = image::load_from_memory(&request.image.bytes().unwrap()).unwrap();
    assert_eq!(original.dimensions(), (100, 80));
}

#[test]
fn test_refusal_keeps_image_and_selection() {
    let (mut session, toasts) = prepared_session();
    let before = session.image().unwrap().generation();
    let selection = session.selection().cloned();
    let backend = MockBackend::new(Ok(InpaintResponse::Refusal(
        "I can't help with that edit.".to_string(),
    )));

    let result = block_on(session.inpaint(&backend, "remove the person"));

    assert!(matches!(result, Err(EditorError::Refused(_))));
    assert_eq!(session.image().unwrap().generation(), before);
    assert_eq!(session.selection().cloned(), selection);
    assert!(!session.is_busy());

    let queue = toasts.lock();
    assert_eq!(queue.toasts()[0].title, "Inpainting Failed");
    assert_eq!(queue.toasts()[0].description, "I can't help with that edit.");
}

#[test]
fn test_transport_failure_allows_retry() {
    let (mut session, _toasts) = prepared_session();
    let failing = MockBackend::new(Err(EditorError::Remote("connection reset".to_string())));
    assert!(block_on(session.inpaint(&failing, "sky")).is_err());
    assert!(!session.is_busy());

    let working = MockBackend::new(Ok(red_payload(100, 80)));
    block_on(session.inpaint(&working, "sky")).unwrap();
    assert_eq!(working.calls(), 1);
}

#[test]
fn test_input_is_ignored_while_requesting() {
    let (mut session, _toasts) = prepared_session();
    let selection = session.selection().cloned();

    session.begin_inpaint("sky").unwrap();
    session.pointer_down(Pos2::new(50.0, 50.0));
    session.pointer_up(Pos2::new(70.0, 70.0));
    assert_eq!(session.selection().cloned(), selection);

    // A second request while busy is refused without a toast
    assert!(matches!(session.begin_inpaint("sky"), Err(EditorError::Busy)));

    session.finish_inpaint(Ok(red_payload(100, 80))).unwrap();
    assert!(!session.is_busy());
}

#[test]
fn test_app_runs_request_on_runtime() {
    let backend = Arc::new(MockBackend::new(Ok(red_payload(64, 64))));
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut app = StudioApp::with_backend(
        StudioConfig::default(),
        Some(backend.clone() as Arc<dyn InpaintBackend>),
        Some(runtime),
    );

    app.open_image(ImageFile {
        name: "photo.png".to_string(),
        bytes: png_bytes(64, 64, [0, 255, 0, 255]),
    });
    let session = app.session_mut();
    session.set_viewport(Vec2::new(64.0, 64.0));
    session.pointer_down(Pos2::new(4.0, 4.0));
    session.pointer_move(Pos2::new(20.0, 20.0));
    session.pointer_up(Pos2::new(20.0, 20.0));
    assert!(session.selection().is_some());

    app.set_prompt("paint it red");
    app.start_inpaint();
    assert!(app.session().is_busy());

    let deadline = Instant::now() + Duration::from_secs(5);
    while app.poll_inpaint() {
        assert!(Instant::now() < deadline, "inpaint did not finish in time");
        std::thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(backend.calls(), 1);
    assert!(!app.session().is_busy());
    assert!(app.session().selection().is_none());
    assert_eq!(
        app.session().image().unwrap().pixels().get_pixel(0, 0),
        &Rgba([255, 0, 0, 255])
    );
}
