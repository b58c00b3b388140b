//! Password strength meter: a bar, the tier label and the five checks.

use egui::{ProgressBar, RichText, Ui};
use taskflow_business::PasswordStrength;

use crate::utils::colors::{COLOR_GREEN, COLOR_MUTED};

pub fn strength_meter(ui: &mut Ui, strength: &PasswordStrength) {
    let color = strength.tier.color();

    ui.horizontal(|ui| {
        ui.add(
            ProgressBar::new(f32::from(strength.percent()) / 100.0)
                .desired_width(160.0)
                .fill(color),
        );
        ui.label(
            RichText::new(format!("Strength: {}", strength.tier.label()))
                .color(color)
                .strong(),
        );
    });

    for (label, passed) in strength.checks.items() {
        let (mark, color) = if passed {
            ("✔", COLOR_GREEN)
        } else {
            ("○", COLOR_MUTED)
        };
        ui.label(RichText::new(format!("{mark} {label}")).color(color).small());
    }
}
