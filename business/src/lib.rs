//! Signup and profile flows of the taskflow client.
//!
//! Everything here is rendering-agnostic: pages mutate states, call the `submit_*` helpers
//! and read computes, while commands talk to the backend through [`api`].

pub mod api;
mod avatar;
mod config;
mod error;
pub mod http;
mod navigation;
mod password_strength;
mod profile;
mod profile_edit;
mod profile_update;
mod query_cache;
mod signup;
mod signup_form;
mod toast;
pub mod validation;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod test_utils;


pub use avatar::{AvatarPreview, AvatarRejection, AvatarSelection, MAX_AVATAR_BYTES};
pub use config::{API_PREFIX, BusinessConfig};
pub use error::{ApiError, ApiResult};
pub use http::ApiClient;
pub use navigation::{Navigation, Route};
pub use password_strength::{
    PasswordChecks, PasswordStrength, PasswordStrengthCompute, SPECIAL_CHARS, StrengthTier, score,
};
pub use profile::{
    FetchProfileCommand, PROFILE_FETCH_FALLBACK_ERROR, ProfileCompute, ProfileStatus,
    request_profile,
};
pub use profile_edit::ProfileEdit;
pub use profile_update::{
    PROFILE_UPDATE_FALLBACK_ERROR, PROFILE_UPDATE_SUCCESS_MESSAGE, ProfileUpdateCompute,
    ProfileUpdateInput, SaveStatus, UNLINK_FALLBACK_ERROR, UNLINK_PRIMARY_ERROR,
    UnlinkOAuthCommand, UnlinkOAuthInput, UpdateProfileCommand, can_unlink, submit_profile_update,
    unlink_provider,
};
pub use query_cache::{Cached, QueryCache, QueryKey, STALE_AFTER};
pub use signup::{
    REDIRECT_DELAY, SIGNUP_FALLBACK_ERROR, SIGNUP_SUCCESS_MESSAGE, SignupCommand, SignupCompute,
    SubmitStatus, reset_signup, submit_signup,
};
pub use signup_form::{FormEvent, SignupForm};
pub use toast::{TOAST_LIFETIME, Toast, ToastKind, Toasts};
pub use validation::{Field, FieldErrors, TouchedSet, validate};

use taskflow_states::{StateCtx, Time};

/// A context with every state, compute and command of the client registered.
pub fn build_state_ctx(config: BusinessConfig) -> StateCtx {
    let mut ctx = StateCtx::new();

    ctx.add_state(ApiClient::new(&config));
    ctx.add_state(config);
    ctx.add_state(Time::default());
    ctx.add_state(Navigation::default());
    ctx.add_state(Toasts::default());
    ctx.add_state(QueryCache::default());
    ctx.add_state(SignupForm::default());
    ctx.add_state(ProfileEdit::default());
    ctx.add_state(ProfileUpdateInput::default());
    ctx.add_state(UnlinkOAuthInput::default());

    ctx.record_compute(PasswordStrengthCompute::default());
    ctx.record_compute(SignupCompute::default());
    ctx.record_compute(ProfileCompute::default());
    ctx.record_compute(ProfileUpdateCompute::default());

    ctx.record_command(SignupCommand);
    ctx.record_command(FetchProfileCommand);
    ctx.record_command(UpdateProfileCommand);
    ctx.record_command(UnlinkOAuthCommand);

    ctx
}
