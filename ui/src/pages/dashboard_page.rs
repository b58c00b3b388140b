use egui::Ui;
use taskflow_business::{Navigation, ProfileCompute, Route};

use crate::state::State;

pub fn dashboard_page(state: &mut State, ui: &mut Ui) {
    let name = state
        .ctx
        .compute::<ProfileCompute>()
        .profile()
        .map(|profile| profile.display_name.clone());

    ui.heading("Dashboard");
    match name {
        Some(name) => ui.label(format!("Welcome back, {name}!")),
        None => ui.label("Welcome to Taskflow!"),
    };

    ui.add_space(12.0);
    if ui.button("Profile settings").clicked() {
        state
            .ctx
            .update::<Navigation, _>(|nav| nav.navigate(Route::Profile));
    }
}
