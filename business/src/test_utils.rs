//! Test utilities for exercising the business commands against a mock backend.
//!
//! # Example
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx.mock_get_me(&sample_profile("Ada")).await;
//!
//! request_profile(&mut test_ctx.ctx);
//! test_ctx.flush_and_wait().await;
//!
//! assert!(test_ctx.ctx.compute::<ProfileCompute>().profile().is_some());
//! ```

#![cfg(all(test, not(target_arch = "wasm32")))]

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use taskflow_states::{StateCtx, Time};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::api::{AuthProvider, UserProfile};
use crate::{BusinessConfig, Field, FormEvent, SignupForm, build_state_ctx};

/// Test context that holds a mock server and a configured `StateCtx`.
pub struct TestContext {
    pub mock_server: MockServer,
    pub ctx: StateCtx,
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn sample_profile(name: &str) -> UserProfile {
    UserProfile {
        id: "42".to_owned(),
        display_name: name.to_owned(),
        email: "ada@example.com".to_owned(),
        avatar_url: None,
        created_at: t0(),
        google_linked: true,
        github_linked: true,
        auth_provider: AuthProvider::Google,
    }
}

impl TestContext {
    /// A context pointed at a fresh mock server, with the clock pinned to [`t0`].
    pub async fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let mut ctx = build_state_ctx(BusinessConfig::new(mock_server.uri()));
        ctx.state_mut::<Time>().set(t0());

        Self { mock_server, ctx }
    }

    pub fn advance(&mut self, by: chrono::Duration) {
        self.ctx.state_mut::<Time>().advance(by);
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.ctx.state::<Time>().now()
    }

    /// Fill the signup form with valid values.
    pub fn fill_signup(&mut self) {
        let form = self.ctx.state_mut::<SignupForm>();
        for (field, value) in [
            (Field::FullName, "Ada Lovelace"),
            (Field::Email, "ada@example.com"),
            (Field::Password, "Secret123!"),
            (Field::ConfirmPassword, "Secret123!"),
        ] {
            form.apply(FormEvent::Changed(field, value.to_owned()));
        }
    }

    /// Flush all pending commands and wait for their tasks, syncing after each one.
    pub async fn flush_and_wait(&mut self) {
        self.ctx.sync_computes();
        self.ctx.flush_commands();

        let timeout = Duration::from_secs(5);
        let start = std::time::Instant::now();

        while self.ctx.task_count() > 0 {
            if start.elapsed() > timeout {
                panic!(
                    "Timed out waiting for pending tasks ({} still in JoinSet)",
                    self.ctx.task_count()
                );
            }

            if self.ctx.task_set_mut().join_next().await.is_some() {
                self.ctx.sync_computes();
            }
        }

        self.ctx.sync_computes();
    }

    pub async fn requests(&self) -> Vec<Request> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
    }

    // =========================================================================
    // Mock endpoint helpers
    // =========================================================================

    pub async fn mock_register(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/register"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_get_me(&self, profile: &UserProfile) {
        Mock::given(method("GET"))
            .and(path("/api/v1/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_update_me(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("PUT"))
            .and(path("/api/v1/users/me"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_unlink(&self, provider: &str, status: u16, body: serde_json::Value) {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/v1/users/me/oauth/{provider}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }
}
