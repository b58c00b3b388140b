use log::info;

use super::{OAuthProvider, RegisterRequest, RegisterResponse, send};
use crate::http::ApiClient;
use crate::{ApiError, ApiResult, BusinessConfig};

/// `POST /auth/register`. The session cookie in the response is kept by the client.
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> ApiResult<RegisterResponse> {
    info!("register: creating account for {}", request.email);
    let response = send(client.post("/auth/register").json(request)?).await?;

    // Some deployments answer 201 with an empty body.
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RegisterResponse::default());
    }

    let body = response
        .json::<RegisterResponse>()
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if body.is_success() {
        Ok(body)
    } else {
        Err(ApiError::Server {
            status: response.status,
            message: body.message,
        })
    }
}

/// Full-page redirect target that starts the provider's consent flow.
pub fn oauth_login_url(config: &BusinessConfig, provider: OAuthProvider) -> String {
    format!("{}/auth/{}", config.api_url(), provider.as_str())
}
