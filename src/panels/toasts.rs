use eframe::egui;

use crate::StudioApp;
use crate::event::{NotificationVariant, TOAST_TTL_SECS};

/// Stacks pending notifications in the bottom-right corner
pub fn toasts_overlay(app: &mut StudioApp, ctx: &egui::Context) {
    let now = ctx.input(|i| i.time);
    let mut queue = app.toasts.lock();
    queue.expire(now, TOAST_TTL_SECS);
    if queue.is_empty() {
        return;
    }

    let mut dismissed = Vec::new();
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(320.0);
            for toast in queue.toasts() {
                let fill = match toast.variant {
                    NotificationVariant::Default => ui.visuals().window_fill,
                    NotificationVariant::Destructive => egui::Color32::from_rgb(127, 29, 29),
                };
                egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.strong(&toast.title);
                            ui.label(&toast.description);
                        });
                        if ui.small_button("✖").clicked() {
                            dismissed.push(toast.id);
                        }
                    });
                });
                ui.add_space(6.0);
            }
        });

    for id in dismissed {
        queue.dismiss(id);
    }
    // Keep repainting so toasts expire without further input
    ctx.request_repaint_after(std::time::Duration::from_millis(250));
}
