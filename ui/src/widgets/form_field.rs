use egui::{TextEdit, Ui};
use taskflow_business::{Field, FormEvent};

use crate::utils::colors::COLOR_RED;

/// A labelled single-line input. Edits and focus loss are pushed to `events`.
pub fn form_field(
    ui: &mut Ui,
    field: Field,
    value: &mut String,
    secret: bool,
    error: Option<&str>,
    events: &mut Vec<FormEvent>,
) {
    let label = ui.label(field.label());
    let response = ui
        .add(
            TextEdit::singleline(value)
                .password(secret)
                .desired_width(f32::INFINITY),
        )
        .labelled_by(label.id);

    if response.changed() {
        events.push(FormEvent::Changed(field, value.clone()));
    }
    if response.lost_focus() {
        events.push(FormEvent::Blurred(field));
    }

    if let Some(error) = error {
        ui.colored_label(COLOR_RED, error);
    }
    ui.add_space(6.0);
}
