use eframe::egui;

use crate::StudioApp;
use crate::components::tool_button::ToolButton;
use crate::selection::ToolKind;

pub fn tools_panel(app: &mut StudioApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .exact_width(64.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                let busy = app.session.is_busy();

                if ui
                    .add_enabled(!busy, egui::Button::new("📤").min_size(egui::vec2(40.0, 40.0)))
                    .on_hover_text("Upload Image")
                    .clicked()
                {
                    app.upload_image();
                }

                ui.separator();

                let has_image = app.session.image().is_some();
                let active = app.session.active_tool();
                for tool in ToolKind::ALL {
                    let button = ToolButton::new(tool, tool == active).enabled(has_image && !busy);
                    if button.show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.select_tool(tool);
                    }
                    ui.add_space(4.0);
                }

                ui.separator();

                let has_selection = app.session.selection().is_some();
                if ui
                    .add_enabled(has_selection && !busy, egui::Button::new("✖").min_size(egui::vec2(40.0, 40.0)))
                    .on_hover_text("Clear Selection")
                    .clicked()
                {
                    app.session.clear_selection();
                }

                if ui
                    .add_enabled(has_image && !busy, egui::Button::new("💾").min_size(egui::vec2(40.0, 40.0)))
                    .on_hover_text("Export PNG")
                    .clicked()
                {
                    app.export_image();
                }

                if has_image {
                    ui.add_space(8.0);
                    ui.small(app.session.tool_state_name());
                }
            });
        });
}
