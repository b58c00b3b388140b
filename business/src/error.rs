use serde::Deserialize;

use crate::http::{HttpError, Response};

/// Failure of a backend call.
///
/// Local validation problems never become an `ApiError`; they stay in
/// [`FieldErrors`](crate::FieldErrors).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connection refused, CORS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("server returned {status}: {}", message.as_deref().unwrap_or("<no message>"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// A 2xx body that does not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("failed to serialize request: {0}")]
    Serialize(String),
}

/// Error body shape: `{ "message": "..." }` or `{ "error": "..." }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiError {
    /// Build a `Server` error from a non-2xx response, pulling the message out of the body.
    pub fn from_response(response: &Response) -> Self {
        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message.or(body.error))
            .filter(|m| !m.trim().is_empty());

        Self::Server {
            status: response.status,
            message,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Server {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// Text shown to the user: the server's message verbatim, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_owned()
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        Self::Network(err.message)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
