//! Profile mutations: the multipart update and OAuth unlinking.
//!
//! Both commands read their input from a plain state filled right before enqueueing, the
//! same way the page fills [`ProfileUpdateInput`] from [`ProfileEdit`]. After a successful
//! mutation the profile and current-user cache entries are invalidated before anything
//! reads them again.

use std::any::Any;

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use taskflow_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, NO_DEPS, State, StateCtx,
    Time, Updater, assign_impl, state_assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::api::{self, OAuthProvider, ProfileUpdatePayload, UserProfile};
use crate::http::ApiClient;
use crate::{ProfileCompute, ProfileEdit, QueryCache, QueryKey, Toast, Toasts};

pub const PROFILE_UPDATE_FALLBACK_ERROR: &str = "Failed to update profile";
pub const PROFILE_UPDATE_SUCCESS_MESSAGE: &str = "Profile updated successfully";
pub const UNLINK_FALLBACK_ERROR: &str = "Failed to unlink account";
pub const UNLINK_PRIMARY_ERROR: &str = "You can't unlink the account you signed up with";

/// Input of [`UpdateProfileCommand`]. `Some` while a request is pending or in flight.
#[derive(Default, Debug, Clone)]
pub struct ProfileUpdateInput {
    pub payload: Option<ProfileUpdatePayload>,
}

impl State for ProfileUpdateInput {
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
        state_assign_impl(self, new_self);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdateCompute {
    pub status: SaveStatus,
}

impl ProfileUpdateCompute {
    pub fn is_saving(&self) -> bool {
        matches!(self.status, SaveStatus::Saving)
    }

    pub fn error_message(&self) -> Option<&str> {
        if let SaveStatus::Failed(ref msg) = self.status {
            Some(msg)
        } else {
            None
        }
    }
}

impl Compute for ProfileUpdateCompute {
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

/// Build the partial payload from the current edits and enqueue [`UpdateProfileCommand`].
///
/// Returns `false` when nothing changed or an update is already in flight.
pub fn submit_profile_update(ctx: &mut StateCtx) -> bool {
    if ctx.state::<ProfileUpdateInput>().payload.is_some() {
        info!("submit_profile_update: an update is already in flight");
        return false;
    }

    let payload = ProfileUpdatePayload::from_edit(ctx.state::<ProfileEdit>());
    ctx.update::<ProfileEdit, _>(ProfileEdit::cancel_confirm);
    if payload.is_empty() {
        return false;
    }

    ctx.state_mut::<ProfileUpdateInput>().payload = Some(payload);
    ctx.enqueue_command::<UpdateProfileCommand>();
    true
}

fn store_and_invalidate(updater: &Updater, profile: &UserProfile, now: DateTime<Utc>) {
    let profile = profile.clone();
    updater.update::<QueryCache>(move |cache| {
        cache.store(QueryKey::Profile, profile, now);
        cache.invalidate(QueryKey::Profile);
        cache.invalidate(QueryKey::CurrentUser);
    });
}

#[derive(Default, Debug)]
pub struct UpdateProfileCommand;

impl Command for UpdateProfileCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let input = snap.state::<ProfileUpdateInput>().clone();
        let client = snap.state::<ApiClient>().clone();
        let now = snap.state::<Time>().now();

        Box::pin(async move {
            let Some(payload) = input.payload else {
                info!("UpdateProfileCommand: no payload set, skipping");
                return;
            };

            info!(
                "UpdateProfileCommand: updating name: {}, avatar: {}",
                payload.display_name.is_some(),
                payload.avatar.is_some()
            );
            updater.set(ProfileUpdateCompute {
                status: SaveStatus::Saving,
            });

            match api::update_me(&client, &payload).await {
                Ok(profile) => {
                    info!("UpdateProfileCommand: profile {} updated", profile.id);
                    store_and_invalidate(&updater, &profile, now);
                    updater.update::<ProfileEdit>({
                        let profile = profile.clone();
                        let submitted = payload.display_name.clone();
                        move |edit| edit.mark_saved(&profile, submitted.as_deref())
                    });
                    updater.set(ProfileCompute::loaded(profile));
                    updater.update::<Toasts>(|toasts| {
                        toasts.push(Toast::success(PROFILE_UPDATE_SUCCESS_MESSAGE));
                    });
                    updater.set(ProfileUpdateCompute {
                        status: SaveStatus::Saved,
                    });
                }
                Err(err) => {
                    error!("UpdateProfileCommand: {err}");
                    // Edits stay in ProfileEdit so the user can retry.
                    let message = err.user_message(PROFILE_UPDATE_FALLBACK_ERROR);
                    let toast = Toast::error(message.clone());
                    updater.update::<Toasts>(move |toasts| toasts.push(toast));
                    updater.set(ProfileUpdateCompute {
                        status: SaveStatus::Failed(message),
                    });
                }
            }

            updater.update::<ProfileUpdateInput>(|input| input.payload = None);
        })
    }
}

// =====================
// OAuth unlinking
// =====================

#[derive(Default, Debug, Clone, Copy)]
pub struct UnlinkOAuthInput {
    pub provider: Option<OAuthProvider>,
}

impl State for UnlinkOAuthInput {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

/// The account's own sign-in method cannot be unlinked.
pub fn can_unlink(profile: &UserProfile, provider: OAuthProvider) -> bool {
    profile.is_linked(provider) && !profile.auth_provider.is(provider)
}

pub fn unlink_provider(ctx: &mut StateCtx, provider: OAuthProvider) {
    ctx.state_mut::<UnlinkOAuthInput>().provider = Some(provider);
    ctx.enqueue_command::<UnlinkOAuthCommand>();
}

#[derive(Default, Debug)]
pub struct UnlinkOAuthCommand;

impl Command for UnlinkOAuthCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let provider = snap.state::<UnlinkOAuthInput>().provider;
        let profile = snap.compute::<ProfileCompute>().profile().cloned();
        let client = snap.state::<ApiClient>().clone();
        let now = snap.state::<Time>().now();

        Box::pin(async move {
            let Some(provider) = provider else {
                info!("UnlinkOAuthCommand: no provider set, skipping");
                return;
            };

            if profile
                .as_ref()
                .is_some_and(|p| p.auth_provider.is(provider))
            {
                warn!(
                    "UnlinkOAuthCommand: refusing to unlink primary provider {}",
                    provider.as_str()
                );
                updater.update::<Toasts>(|toasts| {
                    toasts.push(Toast::error(UNLINK_PRIMARY_ERROR));
                });
                updater.update::<UnlinkOAuthInput>(|input| input.provider = None);
                return;
            }

            info!("UnlinkOAuthCommand: unlinking {}", provider.as_str());
            match api::unlink_oauth(&client, provider).await {
                Ok(profile) => {
                    store_and_invalidate(&updater, &profile, now);
                    updater.set(ProfileCompute::loaded(profile));
                    let toast = Toast::success(format!("{} account unlinked", provider.label()));
                    updater.update::<Toasts>(move |toasts| toasts.push(toast));
                }
                Err(err) => {
                    error!("UnlinkOAuthCommand: {err}");
                    let toast = Toast::error(err.user_message(UNLINK_FALLBACK_ERROR));
                    updater.update::<Toasts>(move |toasts| toasts.push(toast));
                }
            }

            updater.update::<UnlinkOAuthInput>(|input| input.provider = None);
        })
    }
}
