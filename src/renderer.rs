// src/renderer.rs
use eframe::egui::{self, Color32, Pos2, Rect, Shape, Stroke};

use crate::geometry::{ViewTransform, ellipse_outline};
use crate::selection::Selection;
use crate::session::EditorSession;
use crate::texture_manager::TextureManager;
use crate::tools::SelectionPreview;

const ELLIPSE_SEGMENTS: usize = 64;
const DASH_LENGTH: f32 = 10.0;
const DASH_SPEED: f64 = 10.0;

/// Draws the working image and the selection overlays onto the canvas
pub struct Renderer {
    textures: TextureManager,
    outline_color: Color32,
    shadow_color: Color32,
    outline_width: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            textures: TextureManager::new(),
            outline_color: Color32::WHITE,
            shadow_color: Color32::from_black_alpha(160),
            outline_width: 2.0,
        }
    }

    /// Renders the current frame
    ///
    /// Args:
    ///     ctx (egui::Context): The egui context for the current frame
    ///     painter (egui::Painter): The painter to draw with
    ///     canvas (egui::Rect): The on-screen canvas area
    ///     session (EditorSession): The session to draw
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        canvas: Rect,
        session: &EditorSession,
    ) {
        let Some(image) = session.image() else {
            self.textures.clear();
            return;
        };
        let view = session.view();
        if !view.is_valid() {
            return;
        }

        match self.textures.texture_for(image, ctx) {
            Ok(texture_id) => {
                painter.image(
                    texture_id,
                    view.image_rect_in(canvas),
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            Err(err) => log::error!("Failed to create image texture: {}", err),
        }

        if let Some(selection) = session.selection() {
            // Marching ants: shift the dash pattern over time
            let time = ctx.input(|i| i.time);
            let phase = ((time * DASH_SPEED) % (2.0 * DASH_LENGTH as f64)) as f32;
            let outline = selection_outline(selection, view, canvas);
            self.draw_dashed(painter, &outline, true, phase);
            ctx.request_repaint();
        }

        if let Some(preview) = session.preview() {
            match preview {
                SelectionPreview::Box { kind, rect } => {
                    let shape = match kind {
                        crate::selection::ToolKind::Ellipse => Selection::Ellipse { rect },
                        _ => Selection::Rectangle { rect },
                    };
                    let outline = selection_outline(&shape, view, canvas);
                    self.draw_dashed(painter, &outline, true, 0.0);
                }
                SelectionPreview::Path { points, .. } => {
                    let path: Vec<Pos2> = points.iter().map(|p| to_canvas(view, canvas, *p)).collect();
                    if path.len() == 1 {
                        painter.circle_filled(path[0], 3.0, self.outline_color);
                    } else {
                        painter.add(Shape::line(path.clone(), Stroke::new(self.outline_width + 1.0, self.shadow_color)));
                        painter.add(Shape::line(path, Stroke::new(self.outline_width, self.outline_color)));
                    }
                }
            }
        }
    }

    fn draw_dashed(&self, painter: &egui::Painter, outline: &[Pos2], closed: bool, phase: f32) {
        if outline.len() < 2 {
            return;
        }
        let mut path = outline.to_vec();
        if closed {
            path.push(outline[0]);
        }

        // Dark underlay keeps the outline visible on light images
        painter.add(Shape::line(path.clone(), Stroke::new(self.outline_width, self.shadow_color)));
        painter.extend(Shape::dashed_line_with_offset(
            &path,
            Stroke::new(self.outline_width, self.outline_color),
            &[DASH_LENGTH],
            &[DASH_LENGTH],
            phase,
        ));
    }

    /// Draws the empty-state hint shown before any image is loaded
    pub fn render_placeholder(&self, painter: &egui::Painter, canvas: Rect, text_color: Color32) {
        painter.text(
            canvas.center() - egui::vec2(0.0, 24.0),
            egui::Align2::CENTER_CENTER,
            "🖼",
            egui::FontId::proportional(48.0),
            text_color,
        );
        painter.text(
            canvas.center() + egui::vec2(0.0, 16.0),
            egui::Align2::CENTER_CENTER,
            "Upload an Image to Begin",
            egui::FontId::proportional(20.0),
            text_color,
        );
        painter.text(
            canvas.center() + egui::vec2(0.0, 40.0),
            egui::Align2::CENTER_CENTER,
            "Use the toolbar on the left to get started.",
            egui::FontId::proportional(14.0),
            text_color,
        );
    }
}

fn to_canvas(view: &ViewTransform, canvas: Rect, point: Pos2) -> Pos2 {
    view.to_screen(point) + canvas.min.to_vec2()
}

/// Outline of a selection in absolute screen coordinates
pub fn selection_outline(selection: &Selection, view: &ViewTransform, canvas: Rect) -> Vec<Pos2> {
    let image_space = match selection {
        Selection::Rectangle { rect } => vec![
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
        ],
        Selection::Ellipse { rect } => ellipse_outline(*rect, ELLIPSE_SEGMENTS),
        Selection::Polygon { points } | Selection::Lasso { points } => points.clone(),
    };
    image_space
        .into_iter()
        .map(|p| to_canvas(view, canvas, p))
        .collect()
}
