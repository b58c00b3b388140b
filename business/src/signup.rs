//! Signup submission command + compute cache.
//!
//! The synchronous part of a submit (validate everything, lock the form) happens in
//! [`SignupForm::begin_submit`]; [`submit_signup`] runs it and enqueues [`SignupCommand`]
//! only when the form is valid, so an invalid form never reaches the network.
//!
//! ## How to use
//! 1) Register once during setup (see [`crate::build_state_ctx`]).
//! 2) When the user clicks "Create account": `submit_signup(&mut ctx);`
//! 3) In the update loop: `ctx.flush_commands(); ctx.sync_computes();`
//!
//! On success the identity cache is cleared, a toast is shown and the dashboard is opened
//! after [`REDIRECT_DELAY`], leaving the toast visible for a moment.

use std::any::Any;

use chrono::Duration;
use log::{error, info, warn};
use taskflow_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, NO_DEPS, StateCtx,
    Updater, assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::api;
use crate::http::ApiClient;
use crate::{FormEvent, Navigation, QueryCache, Route, SignupForm, Toast, Toasts};

pub const REDIRECT_DELAY: Duration = Duration::milliseconds(500);

pub const SIGNUP_FALLBACK_ERROR: &str = "Registration failed. Please try again.";
pub const SIGNUP_SUCCESS_MESSAGE: &str = "Account created successfully!";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Latest submission status. Written by [`SignupCommand`] only.
#[derive(Debug, Clone, Default)]
pub struct SignupCompute {
    pub status: SubmitStatus,
}

impl SignupCompute {
    pub fn is_submitting(&self) -> bool {
        matches!(self.status, SubmitStatus::Submitting)
    }

    pub fn error_message(&self) -> Option<&str> {
        if let SubmitStatus::Failed(ref msg) = self.status {
            Some(msg)
        } else {
            None
        }
    }
}

impl Compute for SignupCompute {
    fn deps(&self) -> ComputeDeps {
        NO_DEPS
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

/// Validate and lock the form, then enqueue [`SignupCommand`]. Returns whether a request
/// was enqueued.
pub fn submit_signup(ctx: &mut StateCtx) -> bool {
    let accepted = ctx.update::<SignupForm, _>(SignupForm::begin_submit);
    if accepted {
        ctx.enqueue_command::<SignupCommand>();
    }
    accepted
}

/// Return a completed signup to a blank, idle form, e.g. when the signup page is opened
/// again. Does nothing unless the last submit succeeded, so a failed attempt keeps its
/// values for a retry.
pub fn reset_signup(ctx: &mut StateCtx) -> bool {
    if ctx.compute::<SignupCompute>().status != SubmitStatus::Succeeded {
        return false;
    }
    info!("SignupCompute: resetting after a completed signup");
    ctx.update::<SignupForm, _>(|form| form.apply(FormEvent::Reset));
    ctx.updater().set(SignupCompute::default());
    ctx.sync_computes();
    true
}

#[derive(Default, Debug)]
pub struct SignupCommand;

impl Command for SignupCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let form = snap.state::<SignupForm>().clone();
        let client = snap.state::<ApiClient>().clone();

        Box::pin(async move {
            if !form.is_valid() {
                warn!("SignupCommand: form is invalid, skipping request");
                updater.update::<SignupForm>(SignupForm::finish_submit);
                return;
            }

            let request = form.to_request();
            info!("SignupCommand: submitting for {}", request.email);
            updater.set(SignupCompute {
                status: SubmitStatus::Submitting,
            });

            match api::register(&client, &request).await {
                Ok(_) => {
                    info!("SignupCommand: account created for {}", request.email);
                    updater.update::<QueryCache>(QueryCache::invalidate_all);
                    updater.update::<Toasts>(|toasts| {
                        toasts.push(Toast::success(SIGNUP_SUCCESS_MESSAGE));
                    });
                    updater.update::<Navigation>(|nav| {
                        nav.schedule_after(Route::Dashboard, REDIRECT_DELAY);
                    });
                    updater.set(SignupCompute {
                        status: SubmitStatus::Succeeded,
                    });
                }
                Err(err) => {
                    error!("SignupCommand: registration failed: {err}");
                    let message = err.user_message(SIGNUP_FALLBACK_ERROR);
                    let toast = Toast::error(message.clone());
                    updater.update::<Toasts>(move |toasts| toasts.push(toast));
                    updater.set(SignupCompute {
                        status: SubmitStatus::Failed(message),
                    });
                }
            }

            updater.update::<SignupForm>(SignupForm::finish_submit);
        })
    }
}
