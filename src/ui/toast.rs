//! Toast overlay

use std::time::Instant;

use eframe::egui::{self, Color32, RichText};

use crate::core::notification::{Notifications, Toast, ToastKind};

fn accent(kind: ToastKind) -> Color32 {
    match kind {
        ToastKind::Info => Color32::from_rgb(97, 175, 239),
        ToastKind::Success => Color32::from_rgb(152, 195, 121),
        ToastKind::Error => Color32::from_rgb(224, 108, 117),
    }
}

/// Draw the toasts in the bottom-right corner. Clicking one dismisses it.
pub fn show(ctx: &egui::Context, notifications: &mut Notifications) {
    let now = Instant::now();
    notifications.prune(now);
    if notifications.is_empty() {
        return;
    }

    let mut dismissed = Vec::new();
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_max_width(320.0);
            for toast in notifications.iter() {
                if show_toast(ui, toast, now) {
                    dismissed.push(toast.id);
                }
                ui.add_space(6.0);
            }
        });

    for id in dismissed {
        notifications.dismiss(id);
    }

    // Keep repainting so toasts fade and expire without input
    ctx.request_repaint_after(std::time::Duration::from_millis(100));
}

fn show_toast(ui: &mut egui::Ui, toast: &Toast, now: Instant) -> bool {
    let progress = toast.progress(now);
    let alpha = if progress > 0.8 {
        ((1.0 - progress) / 0.2).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let color = accent(toast.kind).gamma_multiply(alpha);

    let response = egui::Frame::popup(ui.style())
        .stroke(egui::Stroke::new(1.0, color))
        .show(ui, |ui| {
            ui.set_width(300.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new(&toast.title).strong().color(color));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small("×");
                });
            });
            if !toast.description.is_empty() {
                ui.label(&toast.description);
            }
        })
        .response;

    response.interact(egui::Sense::click()).clicked()
}
