use std::time::Duration;

use chrono::Utc;
use taskflow_business::{Navigation, ProfileEdit, Route, Toasts, request_profile, reset_signup};
use taskflow_states::Time;

use crate::{pages, state::State, widgets};

/// How often to repaint while commands run or timers are pending.
const BACKGROUND_REPAINT: Duration = Duration::from_millis(100);

pub struct TaskflowApp {
    state: State,
    /// Route rendered last frame, to detect entering and leaving pages.
    last_route: Option<Route>,
}

impl TaskflowApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self {
            state,
            last_route: None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn tick(&mut self) {
        let ctx = &mut self.state.ctx;

        if self.state.follow_wall_clock {
            ctx.update::<Time, _>(|time| time.set(Utc::now()));
        }

        // Sync Compute for render
        ctx.sync_computes();

        let now = ctx.state::<Time>().now();
        if ctx.state::<Navigation>().pending_route().is_some() {
            ctx.update::<Navigation, _>(|nav| nav.poll(now));
        }
        if !ctx.state::<Toasts>().is_empty() {
            ctx.update::<Toasts, _>(|toasts| toasts.expire(now));
        }

        let route = ctx.state::<Navigation>().current();
        if self.last_route != Some(route) {
            if self.last_route == Some(Route::Profile) {
                ctx.update::<ProfileEdit, _>(ProfileEdit::reset);
            }
            match route {
                Route::Profile => request_profile(ctx),
                Route::Signup => {
                    reset_signup(ctx);
                }
                Route::Dashboard => {}
            }
            self.last_route = Some(route);
        }
    }

    fn has_background_work(&self) -> bool {
        let ctx = &self.state.ctx;
        #[cfg(not(target_arch = "wasm32"))]
        let running = ctx.task_count() > 0;
        #[cfg(target_arch = "wasm32")]
        let running = false;

        running
            || ctx.queued_commands() > 0
            || ctx.state::<Navigation>().pending_route().is_some()
            || !ctx.state::<Toasts>().is_empty()
    }
}

impl eframe::App for TaskflowApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick();

        let route = self.last_route.unwrap_or_default();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.strong("Taskflow");
                ui.separator();
                for (target, label) in [
                    (Route::Dashboard, "Dashboard"),
                    (Route::Profile, "Profile"),
                    (Route::Signup, "Sign up"),
                ] {
                    if ui.selectable_label(route == target, label).clicked() && route != target {
                        self.state
                            .ctx
                            .update::<Navigation, _>(|nav| nav.navigate(target));
                    }
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match route {
                Route::Signup => {
                    pages::signup_page(&mut self.state, ui);
                }
                Route::Profile => pages::profile_page(&mut self.state, ui),
                Route::Dashboard => pages::dashboard_page(&mut self.state, ui),
            });
        });

        widgets::toast_overlay(ctx, self.state.ctx.state::<Toasts>());

        // Run background jobs
        self.state.ctx.run_computed();
        self.state.ctx.flush_commands();

        #[cfg(not(target_arch = "wasm32"))]
        while let Some(joined) = self.state.ctx.task_set_mut().try_join_next() {
            if let Err(err) = joined {
                log::error!("Background command failed: {err}");
            }
        }

        if self.has_background_work() {
            ctx.request_repaint_after(BACKGROUND_REPAINT);
        }
    }
}
