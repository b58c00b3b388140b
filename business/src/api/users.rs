use super::{OAuthProvider, ProfileUpdatePayload, UserProfile, send_json};
use crate::ApiResult;
use crate::http::ApiClient;

/// `GET /users/me`
pub async fn get_me(client: &ApiClient) -> ApiResult<UserProfile> {
    send_json(client.get("/users/me")).await
}

/// `PUT /users/me` as `multipart/form-data`, only with the fields present in `payload`.
pub async fn update_me(client: &ApiClient, payload: &ProfileUpdatePayload) -> ApiResult<UserProfile> {
    send_json(client.put("/users/me").multipart(payload.to_form())).await
}

/// `DELETE /users/me/oauth/{provider}`
pub async fn unlink_oauth(client: &ApiClient, provider: OAuthProvider) -> ApiResult<UserProfile> {
    send_json(client.delete(&format!("/users/me/oauth/{}", provider.as_str()))).await
}
