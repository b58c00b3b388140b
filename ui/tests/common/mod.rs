use std::time::Duration;

use chrono::{TimeZone, Utc};
use egui_kittest::Harness;
use taskflow_states::{StateCtx, Time};
use taskflow_ui::TaskflowApp;
use taskflow_ui::state::State;
use taskflow_ui::utils::file_picker::{FixedAvatarPicker, PickedFile};
use wiremock::Mock;
use wiremock::matchers::{method, path};
use wiremock::{MockServer, ResponseTemplate};

pub struct TestCtx<'a, T = State> {
    mock_server: MockServer,
    harness: Harness<'a, T>,
}

impl<'a, T> TestCtx<'a, T> {
    pub fn harness_mut(&mut self) -> &mut Harness<'a, T> {
        &mut self.harness
    }

    #[allow(unused)]
    pub fn harness(&self) -> &Harness<'a, T> {
        &self.harness
    }

    #[allow(unused)]
    pub fn mock_server(&self) -> &MockServer {
        &self.mock_server
    }
}

impl<'a> TestCtx<'a, State> {
    #[allow(unused)]
    pub async fn new(app: impl FnMut(&mut egui::Ui, &mut State) + 'a) -> Self {
        let (mock_server, state) = setup_test_state().await;
        let harness = Harness::new_ui_state(app, state);

        Self {
            mock_server,
            harness,
        }
    }
}

impl<'a> TestCtx<'a, TaskflowApp> {
    #[allow(unused)]
    pub async fn new_app() -> Self {
        Self::new_app_with(|state| state).await
    }

    /// Build the app after `configure` had a chance to adjust the state, e.g. to swap the
    /// avatar picker.
    pub async fn new_app_with(configure: impl FnOnce(State) -> State) -> Self {
        let (mock_server, state) = setup_test_state().await;
        let app = TaskflowApp::new(configure(state));
        let harness = Harness::new_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    pub fn ctx_mut(&mut self) -> &mut StateCtx {
        &mut self.harness.state_mut().state_mut().ctx
    }

    #[allow(unused)]
    pub fn ctx(&self) -> &StateCtx {
        &self.harness.state().state().ctx
    }

    #[allow(unused)]
    pub fn advance(&mut self, by: chrono::Duration) {
        self.ctx_mut().update::<Time, _>(|time| time.advance(by));
    }

    /// Step frames until no command is queued or running.
    pub async fn settle(&mut self) {
        for _ in 0..200 {
            self.harness.step();
            let ctx = &self.harness.state().state().ctx;
            if ctx.task_count() == 0 && ctx.queued_commands() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.harness.step();
    }
}

async fn setup_test_state() -> (MockServer, State) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mock_server = MockServer::start().await;

    let mut state = State::test(mock_server.uri());
    let t0 = Utc
        .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    state.ctx.update::<Time, _>(|time| time.set(t0));

    (mock_server, state)
}

#[allow(unused)]
pub fn profile_json(display_name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 42,
        "displayName": display_name,
        "email": "ada@example.com",
        "avatarUrl": null,
        "createdAt": "2024-03-05T10:00:00Z",
        "googleLinked": true,
        "githubLinked": true,
        "authProvider": "google"
    })
}

#[allow(unused)]
pub async fn mock_get_me(server: &MockServer, display_name: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(display_name)))
        .mount(server)
        .await;
}

/// A tiny valid PNG.
#[allow(unused)]
pub fn png_file(name: &str) -> PickedFile {
    let mut bytes = Vec::new();
    image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 80, 40, 255]))
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("encode png");
    PickedFile {
        name: name.to_owned(),
        bytes,
    }
}

#[allow(unused)]
pub fn fixed_picker(file: PickedFile) -> FixedAvatarPicker {
    FixedAvatarPicker(Some(file))
}
