#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod file_handler;
pub mod geometry;
pub mod image_buffer;
pub mod inpaint;
pub mod input;
pub mod mask;
pub mod panels;
pub mod renderer;
pub mod selection;
pub mod session;
pub mod texture_manager;
pub mod tools;

pub use app::StudioApp;
pub use command::Command;
pub use config::StudioConfig;
pub use document::Document;
pub use error::{EditorError, EditorResult, ErrorKind};
pub use geometry::ViewTransform;
pub use image_buffer::{ImageBuffer, InlineImage};
pub use inpaint::{GeminiBackend, InpaintBackend, InpaintRequest, InpaintResponse, Inpainter};
pub use input::{InputEvent, InputHandler, InputLocation};
pub use mask::MaskImage;
pub use renderer::Renderer;
pub use selection::{Selection, ToolKind};
pub use session::EditorSession;
pub use tools::SelectionTool;
