//! Account creation page.

use egui::{Align, Button, Layout, Response, Ui};
use taskflow_business::api::{OAuthProvider, oauth_login_url};
use taskflow_business::{
    BusinessConfig, Field, FormEvent, PasswordStrengthCompute, SignupCompute, SignupForm,
    SubmitStatus, submit_signup,
};

use crate::state::State;
use crate::utils::colors::COLOR_RED;
use crate::widgets;

const FORM_WIDTH: f32 = 360.0;

pub fn signup_page(state: &mut State, ui: &mut Ui) -> Response {
    let form = state.ctx.state::<SignupForm>();
    let mut values = [
        form.full_name.clone(),
        form.email.clone(),
        form.password.clone(),
        form.confirm_password.clone(),
    ];
    let errors: Vec<Option<String>> = Field::SIGNUP
        .iter()
        .map(|field| form.error_for(*field).map(str::to_owned))
        .collect();
    let can_submit = form.can_submit();
    let submitting = form.is_submitting();

    let status = state.ctx.compute::<SignupCompute>().status.clone();
    let strength = state.ctx.compute::<PasswordStrengthCompute>().strength;
    let config = state.ctx.state::<BusinessConfig>().clone();

    let mut events = Vec::new();
    let mut should_submit = false;

    let response = ui
        .with_layout(Layout::top_down(Align::Center), |ui| {
            ui.set_max_width(FORM_WIDTH);
            ui.add_space(20.0);
            ui.heading("Create your account");
            ui.add_space(16.0);

            ui.with_layout(Layout::top_down(Align::Min), |ui| {
                for (i, field) in Field::SIGNUP.into_iter().enumerate() {
                    let secret = matches!(field, Field::Password | Field::ConfirmPassword);
                    widgets::form_field(
                        ui,
                        field,
                        &mut values[i],
                        secret,
                        errors[i].as_deref(),
                        &mut events,
                    );

                    if field == Field::Password
                        && let Some(strength) = &strength
                    {
                        widgets::strength_meter(ui, strength);
                        ui.add_space(6.0);
                    }
                }

                if let SubmitStatus::Failed(message) = &status {
                    ui.colored_label(COLOR_RED, message);
                }

                let busy = submitting || status == SubmitStatus::Succeeded;
                let label = if submitting {
                    "Creating account..."
                } else {
                    "Create account"
                };
                let button = Button::new(label).min_size([ui.available_width(), 32.0].into());
                if ui.add_enabled(can_submit && !busy, button).clicked() {
                    should_submit = true;
                }

                ui.add_space(12.0);
                ui.separator();
                ui.label("Or continue with");
                ui.horizontal(|ui| {
                    for provider in OAuthProvider::ALL {
                        if ui
                            .button(format!("Continue with {}", provider.label()))
                            .clicked()
                        {
                            let url = oauth_login_url(&config, provider);
                            log::info!("Opening {} sign-in", provider.as_str());
                            ui.ctx().open_url(egui::OpenUrl::same_tab(url));
                        }
                    }
                });
            });
        })
        .response;

    if !events.is_empty() {
        state.ctx.update::<SignupForm, _>(|form| {
            for event in events {
                form.apply(event);
            }
        });
    }

    if should_submit {
        submit_signup(&mut state.ctx);
    }

    response
}
