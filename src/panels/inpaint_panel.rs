use eframe::egui;

use crate::StudioApp;

pub fn inpaint_panel(app: &mut StudioApp, ctx: &egui::Context) {
    egui::SidePanel::right("inpaint_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("AI Inpainting");
            ui.separator();

            ui.label("Prompt");
            ui.add(
                egui::TextEdit::multiline(&mut app.prompt)
                    .hint_text("e.g., add a small boat on the water")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);

            let busy = app.session.is_busy();
            let disabled = app.session.selection().is_none();

            ui.add_enabled_ui(!busy && !disabled, |ui| {
                let label = if busy { "Applying..." } else { "✨ Apply" };
                let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 32.0));
                if ui.add(button).clicked() {
                    app.start_inpaint();
                }
            });

            if busy {
                ui.vertical_centered(|ui| ui.spinner());
            } else if disabled {
                ui.vertical_centered(|ui| {
                    ui.small("Make a selection on the image to enable.");
                });
            }

            if !app.config.has_api_key() {
                ui.add_space(12.0);
                ui.colored_label(
                    ui.visuals().warn_fg_color,
                    "No API key found. Set GEMINI_API_KEY to enable inpainting.",
                );
            }
        });
}
