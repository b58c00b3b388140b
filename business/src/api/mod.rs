//! One async function per backend endpoint.
//!
//! All wrappers share an [`ApiClient`] so the session cookie is attached automatically.
//! There is no retry and no batching: a non-2xx response becomes [`ApiError::Server`]
//! carrying the body's message, anything else is passed through.

mod auth;
mod tasks;
mod types;
mod users;

pub use auth::{oauth_login_url, register};
pub use tasks::{
    create_task, delete_task, get_task, list_my_tasks, list_project_tasks, my_task_stats,
    update_task,
};
pub use types::{
    AuthProvider, AvatarUpload, CreateTaskRequest, OAuthProvider, ProfileUpdatePayload,
    RegisterRequest, RegisterResponse, Task, TaskPriority, TaskStats, TaskStatus,
    UpdateTaskRequest, UserProfile,
};
pub use users::{get_me, unlink_oauth, update_me};

use serde::de::DeserializeOwned;

use crate::http::{RequestBuilder, Response};
use crate::{ApiError, ApiResult};

/// Send `request`, turning transport failures and non-2xx statuses into [`ApiError`].
async fn send(request: RequestBuilder) -> ApiResult<Response> {
    let response = request.send().await?;
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(&response))
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
    let response = send(request).await?;
    response
        .json::<T>()
        .map_err(|e| ApiError::Decode(e.to_string()))
}
