//! Profile fetch command + compute cache.
//!
//! `FetchProfileCommand` serves the profile from [`QueryCache`] while it is fresh and only
//! hits `GET /users/me` once it is stale or invalidated. A stale value keeps being shown
//! while the refetch is in flight.

use std::any::Any;

use log::{error, info};
use taskflow_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, NO_DEPS, StateCtx, Time,
    Updater, assign_impl,
};
use tokio_util::sync::CancellationToken;

use crate::api::{self, UserProfile};
use crate::http::ApiClient;
use crate::{ProfileEdit, QueryCache, QueryKey};

pub const PROFILE_FETCH_FALLBACK_ERROR: &str = "Failed to load profile";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfileStatus {
    #[default]
    Idle,
    Loading,
    Loaded(UserProfile),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct ProfileCompute {
    pub status: ProfileStatus,
    /// A refetch is running behind a stale `Loaded` value.
    pub refreshing: bool,
}

impl ProfileCompute {
    pub fn loaded(profile: UserProfile) -> Self {
        Self {
            status: ProfileStatus::Loaded(profile),
            refreshing: false,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        if let ProfileStatus::Loaded(ref profile) = self.status {
            Some(profile)
        } else {
            None
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, ProfileStatus::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        if let ProfileStatus::Error(ref msg) = self.status {
            Some(msg)
        } else {
            None
        }
    }
}

impl Compute for ProfileCompute {
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

/// Enqueue a profile read, e.g. when the profile page is entered.
pub fn request_profile(ctx: &mut StateCtx) {
    ctx.enqueue_command::<FetchProfileCommand>();
}

#[derive(Default, Debug)]
pub struct FetchProfileCommand;

impl Command for FetchProfileCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let client = snap.state::<ApiClient>().clone();
        let now = snap.state::<Time>().now();
        let cached = snap
            .state::<QueryCache>()
            .get(QueryKey::Profile, now)
            .map(|hit| (hit.value.clone(), hit.fresh));

        Box::pin(async move {
            match cached {
                Some((profile, true)) => {
                    info!("FetchProfileCommand: cache is fresh, skipping request");
                    updater.update::<ProfileEdit>({
                        let profile = profile.clone();
                        move |edit| edit.seed(&profile)
                    });
                    updater.set(ProfileCompute::loaded(profile));
                    return;
                }
                Some((stale, false)) => {
                    info!("FetchProfileCommand: cache is stale, refetching");
                    updater.set(ProfileCompute {
                        status: ProfileStatus::Loaded(stale),
                        refreshing: true,
                    });
                }
                None => {
                    info!("FetchProfileCommand: fetching profile");
                    updater.set(ProfileCompute {
                        status: ProfileStatus::Loading,
                        refreshing: false,
                    });
                }
            }

            match api::get_me(&client).await {
                Ok(profile) => {
                    info!("FetchProfileCommand: loaded profile {}", profile.id);
                    updater.update::<QueryCache>({
                        let profile = profile.clone();
                        move |cache| {
                            cache.store(QueryKey::Profile, profile.clone(), now);
                            cache.store(QueryKey::CurrentUser, profile, now);
                        }
                    });
                    updater.update::<ProfileEdit>({
                        let profile = profile.clone();
                        move |edit| edit.seed(&profile)
                    });
                    updater.set(ProfileCompute::loaded(profile));
                }
                Err(err) => {
                    error!("FetchProfileCommand: {err}");
                    updater.set(ProfileCompute {
                        status: ProfileStatus::Error(
                            err.user_message(PROFILE_FETCH_FALLBACK_ERROR),
                        ),
                        refreshing: false,
                    });
                }
            }
        })
    }
}
