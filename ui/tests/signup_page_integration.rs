//! Integration tests for the signup page, driven through the full app against a mocked backend.

use kittest::Queryable;
use taskflow_business::{
    Field, FormEvent, Navigation, Route, SignupCompute, SignupForm, SubmitStatus,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::TestCtx;

mod common;

fn fill_form(ctx: &mut TestCtx<'_, taskflow_ui::TaskflowApp>, password: &str) {
    ctx.ctx_mut().update::<SignupForm, _>(|form| {
        for (field, value) in [
            (Field::FullName, "Ada Lovelace"),
            (Field::Email, "ada@example.com"),
            (Field::Password, password),
            (Field::ConfirmPassword, password),
        ] {
            form.apply(FormEvent::Changed(field, value.to_owned()));
        }
    });
}

async fn mock_register(
    ctx: &TestCtx<'_, taskflow_ui::TaskflowApp>,
    status: u16,
    body: serde_json::Value,
) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(ctx.mock_server())
        .await;
}

#[tokio::test]
async fn test_signup_form_displayed() {
    let mut ctx = TestCtx::new_app().await;

    let harness = ctx.harness_mut();
    harness.step();

    assert!(
        harness.query_by_label_contains("Create your account").is_some(),
        "Heading should be displayed"
    );
    assert!(
        harness.query_by_label("Create account").is_some(),
        "Submit button should be displayed"
    );
    assert!(harness.query_by_label("Continue with Google").is_some());
    assert!(harness.query_by_label("Continue with GitHub").is_some());
}

/// Submitting an empty form shows every field error and sends nothing.
#[tokio::test]
async fn test_submit_empty_form_shows_errors() {
    let mut ctx = TestCtx::new_app().await;

    let harness = ctx.harness_mut();
    harness.step();
    harness
        .query_by_label("Create account")
        .expect("submit button")
        .click();
    harness.run_steps(3);

    assert!(
        harness
            .query_by_label_contains("Full name is required")
            .is_some(),
        "Full name error should be displayed"
    );
    assert!(
        harness.query_by_label_contains("Email is required").is_some(),
        "Email error should be displayed"
    );

    ctx.settle().await;
    let requests = ctx
        .mock_server()
        .received_requests()
        .await
        .unwrap_or_default();
    assert!(requests.is_empty(), "No request should be sent");
}

#[tokio::test]
async fn test_strength_meter_follows_password() {
    let mut ctx = TestCtx::new_app().await;
    ctx.harness_mut().step();

    assert!(
        ctx.harness().query_by_label_contains("Strength:").is_none(),
        "No meter while the password is empty"
    );

    fill_form(&mut ctx, "abc");
    ctx.harness_mut().run_steps(3);
    assert!(
        ctx.harness()
            .query_by_label_contains("Strength: Weak")
            .is_some()
    );

    fill_form(&mut ctx, "Secret123!");
    ctx.harness_mut().run_steps(3);
    assert!(
        ctx.harness()
            .query_by_label_contains("Strength: Strong")
            .is_some()
    );
}

/// A successful signup shows a toast and lands on the dashboard after the redirect delay.
#[tokio::test]
async fn test_signup_success_redirects_to_dashboard() {
    let mut ctx = TestCtx::new_app().await;
    mock_register(
        &ctx,
        201,
        serde_json::json!({ "success": true, "message": "User registered" }),
    )
    .await;

    ctx.harness_mut().step();
    fill_form(&mut ctx, "Secret123!");
    ctx.harness_mut().step();

    ctx.harness()
        .query_by_label("Create account")
        .expect("submit button")
        .click();
    ctx.settle().await;

    assert!(
        ctx.harness()
            .query_by_label_contains("Account created successfully!")
            .is_some(),
        "Success toast should be displayed"
    );
    assert_eq!(
        ctx.ctx().state::<Navigation>().pending_route(),
        Some(Route::Dashboard)
    );
    assert_eq!(ctx.ctx().state::<Navigation>().current(), Route::Signup);

    ctx.advance(chrono::Duration::milliseconds(600));
    ctx.harness_mut().run_steps(2);

    assert_eq!(ctx.ctx().state::<Navigation>().current(), Route::Dashboard);
    assert!(
        ctx.harness()
            .query_by_label_contains("Welcome to Taskflow!")
            .is_some()
    );
}

#[tokio::test]
async fn test_signup_failure_shows_server_message() {
    let mut ctx = TestCtx::new_app().await;
    mock_register(
        &ctx,
        409,
        serde_json::json!({ "message": "Email already registered" }),
    )
    .await;

    ctx.harness_mut().step();
    fill_form(&mut ctx, "Secret123!");
    ctx.harness_mut().step();

    ctx.harness()
        .query_by_label("Create account")
        .expect("submit button")
        .click();
    ctx.settle().await;

    assert!(
        !ctx.harness()
            .query_all_by_label("Email already registered")
            .collect::<Vec<_>>()
            .is_empty(),
        "Server message should be displayed"
    );
    assert_eq!(ctx.ctx().state::<Navigation>().current(), Route::Signup);
    assert!(
        !ctx.ctx().state::<SignupForm>().is_submitting(),
        "Form should be unlocked after the failure"
    );
}

/// Coming back to the signup page after a completed signup starts over with a blank form.
#[tokio::test]
async fn test_returning_after_success_allows_another_signup() {
    let mut ctx = TestCtx::new_app().await;
    mock_register(&ctx, 201, serde_json::json!({ "success": true })).await;

    ctx.harness_mut().step();
    fill_form(&mut ctx, "Secret123!");
    ctx.harness_mut().step();
    ctx.harness()
        .query_by_label("Create account")
        .expect("submit button")
        .click();
    ctx.settle().await;

    ctx.advance(chrono::Duration::milliseconds(600));
    ctx.harness_mut().run_steps(2);
    assert_eq!(ctx.ctx().state::<Navigation>().current(), Route::Dashboard);

    ctx.ctx_mut()
        .update::<Navigation, _>(|nav| nav.navigate(Route::Signup));
    ctx.harness_mut().run_steps(2);

    assert_eq!(
        ctx.ctx().compute::<SignupCompute>().status,
        SubmitStatus::Idle
    );
    assert!(ctx.ctx().state::<SignupForm>().email.is_empty());

    fill_form(&mut ctx, "Secret123!");
    ctx.harness_mut().step();
    ctx.harness()
        .query_by_label("Create account")
        .expect("submit button")
        .click();
    ctx.settle().await;

    let registrations = ctx
        .mock_server()
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == "/api/v1/auth/register")
        .count();
    assert_eq!(registrations, 2, "the second submit reaches the backend");
}
