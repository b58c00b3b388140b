//! Profile settings: display name, avatar and linked sign-in providers.

use egui::{Button, Id, Modal, RichText, TextEdit, Ui};
use taskflow_business::api::{OAuthProvider, UserProfile};
use taskflow_business::{
    ProfileCompute, ProfileEdit, ProfileUpdateCompute, can_unlink, request_profile,
    submit_profile_update, unlink_provider,
};

use crate::state::State;
use crate::utils::colors::{COLOR_GREEN, COLOR_MUTED, COLOR_RED};
use crate::widgets;

/// Everything the page can ask for in one frame, applied after rendering.
enum Action {
    Rename(String),
    PickAvatar,
    ClearAvatar,
    Save,
    Confirm,
    Cancel,
    Unlink(OAuthProvider),
    Retry,
}

pub fn profile_page(state: &mut State, ui: &mut Ui) {
    let compute = state.ctx.compute::<ProfileCompute>();
    let profile = compute.profile().cloned();
    let loading = compute.is_loading();
    let fetch_error = compute.error_message().map(str::to_owned);
    let saving = state.ctx.compute::<ProfileUpdateCompute>().is_saving();

    let mut actions = Vec::new();

    ui.heading("Profile settings");
    ui.add_space(8.0);

    match profile {
        Some(profile) => {
            let edit = state.ctx.state::<ProfileEdit>();
            profile_form(ui, &profile, edit, saving, &mut actions);
            if edit.is_confirming() {
                confirm_modal(ui, edit, &mut actions);
            }
        }
        None if loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading profile...");
            });
        }
        None => {
            if let Some(message) = &fetch_error {
                ui.colored_label(COLOR_RED, message);
            }
            if ui.button("Retry").clicked() {
                actions.push(Action::Retry);
            }
        }
    }

    apply(state, ui.ctx(), actions);
}

fn profile_form(
    ui: &mut Ui,
    profile: &UserProfile,
    edit: &ProfileEdit,
    saving: bool,
    actions: &mut Vec<Action>,
) {
    ui.horizontal(|ui| {
        widgets::avatar(ui, edit.preview(), &edit.display_name);
        ui.vertical(|ui| {
            if ui.button("Choose image").clicked() {
                actions.push(Action::PickAvatar);
            }
            if let Some(selection) = edit.avatar() {
                ui.label(RichText::new(selection.file_name()).color(COLOR_MUTED).small());
                if ui.button("Remove").clicked() {
                    actions.push(Action::ClearAvatar);
                }
            }
        });
    });
    ui.add_space(8.0);

    let label = ui.label("Display name");
    let mut name = edit.display_name.clone();
    let response = ui
        .add(TextEdit::singleline(&mut name).desired_width(f32::INFINITY))
        .labelled_by(label.id);
    if response.changed() {
        actions.push(Action::Rename(name));
    }

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label("Email");
        ui.label(RichText::new(&profile.email).color(COLOR_MUTED));
    });
    ui.horizontal(|ui| {
        ui.label("Member since");
        let since = profile.created_at.format("%B %-d, %Y").to_string();
        ui.label(RichText::new(since).color(COLOR_MUTED));
    });

    ui.add_space(8.0);
    ui.separator();
    ui.label(RichText::new("Linked accounts").strong());
    for provider in OAuthProvider::ALL {
        ui.horizontal(|ui| {
            ui.label(provider.label());
            if profile.is_linked(provider) {
                ui.label(RichText::new("Connected").color(COLOR_GREEN));
                if can_unlink(profile, provider)
                    && ui.button(format!("Unlink {}", provider.label())).clicked()
                {
                    actions.push(Action::Unlink(provider));
                }
            } else {
                ui.label(RichText::new("Not connected").color(COLOR_MUTED));
            }
        });
    }

    ui.add_space(8.0);
    if let Some(error) = &edit.error {
        ui.colored_label(COLOR_RED, error);
    }

    let label = if saving { "Saving..." } else { "Save changes" };
    let enabled = edit.has_pending_changes() && !saving;
    if ui.add_enabled(enabled, Button::new(label)).clicked() {
        actions.push(Action::Save);
    }
}

fn confirm_modal(ui: &mut Ui, edit: &ProfileEdit, actions: &mut Vec<Action>) {
    let modal = Modal::new(Id::new("profile_confirm")).show(ui.ctx(), |ui| {
        ui.set_width(280.0);
        ui.heading("Save changes?");
        if let Some(name) = edit.snapshot_name()
            && name != edit.display_name.trim()
        {
            ui.label(format!("Display name: {name} → {}", edit.display_name.trim()));
        }
        if let Some(selection) = edit.avatar() {
            ui.label(format!("New avatar: {}", selection.file_name()));
        }
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("Confirm").clicked() {
                actions.push(Action::Confirm);
            }
            if ui.button("Cancel").clicked() {
                actions.push(Action::Cancel);
            }
        });
    });

    if modal.should_close() {
        actions.push(Action::Cancel);
    }
}

fn apply(state: &mut State, egui_ctx: &egui::Context, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::Rename(name) => {
                state
                    .ctx
                    .update::<ProfileEdit, _>(|edit| edit.display_name = name);
            }
            Action::PickAvatar => {
                let Some(file) = state.picker.pick() else {
                    continue;
                };
                let result = state.ctx.update::<ProfileEdit, _>(|edit| {
                    edit.select_avatar(egui_ctx, &file.name, file.bytes)
                });
                if let Err(rejection) = result {
                    log::warn!("Avatar rejected: {rejection}");
                }
            }
            Action::ClearAvatar => state.ctx.update::<ProfileEdit, _>(ProfileEdit::clear_avatar),
            Action::Save => {
                state.ctx.update::<ProfileEdit, _>(ProfileEdit::request_confirm);
            }
            Action::Confirm => {
                submit_profile_update(&mut state.ctx);
            }
            Action::Cancel => state.ctx.update::<ProfileEdit, _>(ProfileEdit::cancel_confirm),
            Action::Unlink(provider) => unlink_provider(&mut state.ctx, provider),
            Action::Retry => request_profile(&mut state.ctx),
        }
    }
}
