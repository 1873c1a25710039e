use eframe::egui;
use std::path::Path;

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Raw bytes of an image the user wants to open
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Collects images from drag-and-drop and the native open dialog
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stashes files dropped onto the window this frame. Returns true if there were any.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return false;
        }
        self.dropped_files = dropped;
        true
    }

    /// Returns the first readable image among the dropped files.
    /// The editor holds a single image, so extra files are ignored.
    pub fn take_dropped_image(&mut self) -> Option<ImageFile> {
        let files = std::mem::take(&mut self.dropped_files);
        if files.len() > 1 {
            log::warn!("{} files dropped; only the first image is opened", files.len());
        }
        files.iter().find_map(Self::read_dropped)
    }

    fn read_dropped(file: &egui::DroppedFile) -> Option<ImageFile> {
        let name = match (&file.path, file.name.is_empty()) {
            (Some(path), _) => path.display().to_string(),
            (None, false) => file.name.clone(),
            (None, true) => "unknown".to_owned(),
        };
        if !Self::is_image_file(file) {
            log::warn!("Skipping dropped file that is not an image: {}", name);
            return None;
        }

        match (&file.bytes, &file.path) {
            (Some(bytes), _) => {
                log::info!("Dropped image {} ({} bytes)", name, bytes.len());
                Some(ImageFile { name, bytes: bytes.to_vec() })
            }
            (None, Some(path)) => Self::read_path(path),
            (None, None) => {
                log::warn!("Dropped file has no readable data: {}", name);
                None
            }
        }
    }

    /// Shows the native open dialog and reads the chosen image
    pub fn pick_image() -> Option<ImageFile> {
        let path = rfd::FileDialog::new()
            .set_title("Upload Image")
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()?;
        Self::read_path(&path)
    }

    /// Shows the native save dialog for exporting a PNG
    pub fn pick_export_path() -> Option<std::path::PathBuf> {
        rfd::FileDialog::new()
            .set_title("Export Image")
            .set_file_name("design.png")
            .add_filter("PNG image", &["png"])
            .save_file()
    }

    fn read_path(path: &Path) -> Option<ImageFile> {
        log::info!("Processing image from path: {}", path.display());
        match std::fs::read(path) {
            Ok(bytes) => Some(ImageFile {
                name: path.display().to_string(),
                bytes,
            }),
            Err(err) => {
                log::error!("Failed to read image file: {}: {}", path.display(), err);
                None
            }
        }
    }

    /// MIME type wins when the platform supplies one; otherwise the extension decides
    fn is_image_file(file: &egui::DroppedFile) -> bool {
        if !file.mime.is_empty() {
            return file.mime.starts_with("image/");
        }
        let path = file.path.as_deref().unwrap_or_else(|| Path::new(&file.name));
        Self::has_image_extension(path)
    }

    fn has_image_extension(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Dims the window and lists the hovered files while a drag is over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        let hovered: Vec<String> = ctx.input(|i| {
            i.raw
                .hovered_files
                .iter()
                .map(|file| match &file.path {
                    Some(path) => path.display().to_string(),
                    None if !file.mime.is_empty() => file.mime.clone(),
                    None => "(unnamed file)".to_owned(),
                })
                .collect()
        });
        if hovered.is_empty() {
            return;
        }

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("image_drop_overlay"),
        ));
        let screen = ctx.screen_rect();
        painter.rect_filled(screen, 0.0, egui::Color32::from_black_alpha(192));
        painter.text(
            screen.center(),
            egui::Align2::CENTER_CENTER,
            format!("Drop to open\n\n{}", hovered.join("\n")),
            egui::TextStyle::Heading.resolve(&ctx.style()),
            egui::Color32::WHITE,
        );
    }
}
