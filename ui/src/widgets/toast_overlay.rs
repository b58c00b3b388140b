use egui::{Align2, Area, Color32, Context, Frame, Id, RichText};
use taskflow_business::{ToastKind, Toasts};

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

/// Show the newest toast in the bottom-right corner.
pub fn toast_overlay(ctx: &Context, toasts: &Toasts) {
    let Some(toast) = toasts.latest() else {
        return;
    };

    let fill = match toast.kind {
        ToastKind::Success => COLOR_GREEN,
        ToastKind::Error => COLOR_RED,
    };

    Area::new(Id::new("toast_overlay"))
        .anchor(Align2::RIGHT_BOTTOM, [-16.0, -16.0])
        .interactable(false)
        .show(ctx, |ui| {
            Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                ui.label(RichText::new(&toast.message).color(Color32::WHITE));
            });
        });
}
