use eframe::egui;

use crate::selection::ToolKind;

/// Square icon button for one selection tool
pub struct ToolButton {
    pub tool: ToolKind,
    pub selected: bool,
    pub enabled: bool,
}

impl ToolButton {
    pub fn new(tool: ToolKind, selected: bool) -> Self {
        Self {
            tool,
            selected,
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(40.0, 40.0);
        let sense = if self.enabled {
            egui::Sense::click()
        } else {
            egui::Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(button_size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                egui::Color32::from_rgb(100, 181, 246) // Light blue when selected
            } else if response.hovered() && self.enabled {
                egui::Color32::from_gray(60)
            } else {
                egui::Color32::from_gray(40)
            };

            ui.painter().rect_filled(rect, 6.0, bg_color);

            let text_color = match (self.selected, self.enabled) {
                (true, _) => egui::Color32::BLACK,
                (false, true) => egui::Color32::WHITE,
                (false, false) => egui::Color32::from_gray(110),
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon(),
                egui::FontId::proportional(22.0),
                text_color,
            );

            if self.selected {
                ui.painter().rect_stroke(
                    rect,
                    6.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(self.tool.name())
    }
}
