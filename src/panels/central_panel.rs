use eframe::egui;

use crate::StudioApp;
use crate::input::route_event;

pub fn central_panel(app: &mut StudioApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(ctx.style().visuals.extreme_bg_color))
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            app.session.set_viewport(canvas_rect.size());
            app.input.set_canvas_rect(canvas_rect);

            for event in app.input.process_input(ctx) {
                route_event(&event, &mut app.session);
            }

            if app.session.image().is_none() {
                app.renderer
                    .render_placeholder(&painter, canvas_rect, ui.visuals().weak_text_color());
                return;
            }

            if response.hovered() && app.session.accepts_input() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            app.renderer.render(ctx, &painter, canvas_rect, &app.session);

            if app.session.is_busy() {
                painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_black_alpha(120));
                let spinner_rect =
                    egui::Rect::from_center_size(canvas_rect.center(), egui::vec2(48.0, 48.0));
                ui.put(spinner_rect, egui::Spinner::new().size(48.0));
            }
        });
}
