//! Platform-abstracted HTTP transport with Send-safe futures.
//!
//! On WASM, `reqwest::Response` is not `Send` because it contains JS types. To keep
//! command futures `Send` on every target we:
//! - On **native**: use reqwest directly, with a cookie store so the session cookie set by
//!   `/auth/register` rides along on later calls.
//! - On **WASM**: spawn the request on the JS thread with `wasm_bindgen_futures::spawn_local`
//!   and send the result back through a `flume` channel. Requests use
//!   `credentials: include` so the browser attaches the session cookie.
//!
//! The session credential itself is opaque: nothing here reads or writes it.

use std::any::Any;
use std::collections::HashMap;

use taskflow_states::{State, state_assign_impl};
use ustr::Ustr;

use crate::BusinessConfig;

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A simplified HTTP response that contains only Send-safe data.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercased keys)
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level failure (DNS, connection reset, CORS, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// A cloneable, inspectable multipart body. Converted to reqwest's form when sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<(String, Part)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), Part::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push((
            name.into(),
            Part::File {
                file_name: file_name.into(),
                mime: mime.into(),
                bytes,
            },
        ));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn into_reqwest(self) -> HttpResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, part) in self.parts {
            form = match part {
                Part::Text(value) => form.text(name, value),
                Part::File {
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime)
                        .map_err(|e| HttpError::new(format!("Invalid MIME type {mime}: {e}")))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
enum Body {
    Bytes(Vec<u8>),
    Multipart(MultipartForm),
}

/// Shared transport for every API wrapper.
///
/// Holds one `reqwest::Client` so the cookie jar is shared across requests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    api_url: Ustr,
    inner: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &BusinessConfig) -> Self {
        Self::with_api_url(config.api_url())
    }

    pub fn with_api_url(api_url: Ustr) -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let inner = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap_or_else(|e| {
                log::error!("ApiClient: failed to build client with cookie store: {e}");
                reqwest::Client::new()
            });

        #[cfg(target_arch = "wasm32")]
        let inner = reqwest::Client::new();

        Self { api_url, inner }
    }

    pub fn api_url(&self) -> Ustr {
        self.api_url
    }

    /// Absolute URL for an endpoint path such as `/users/me`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Get, self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Post, self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Put, self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Delete, self.url(path))
    }
}

impl State for ApiClient {
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

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    body: Option<Body>,
}

impl RequestBuilder {
    fn new(client: reqwest::Client, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Add a header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let json_bytes = serde_json::to_vec(value)?;
        self.body = Some(Body::Bytes(json_bytes));
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    /// Set the request body as `multipart/form-data`. The boundary header is added by reqwest.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(Body::Multipart(form));
        self
    }

    /// Send the request and return a Send-safe future.
    pub async fn send(self) -> HttpResult<Response> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.execute().await
        }

        #[cfg(target_arch = "wasm32")]
        {
            self.send_wasm().await
        }
    }

    #[cfg(target_arch = "wasm32")]
    async fn send_wasm(self) -> HttpResult<Response> {
        // flume channels are Send-safe, so this future is Send
        let (tx, rx) = flume::bounded::<HttpResult<Response>>(1);

        // The spawned closure is NOT Send, but spawn_local doesn't require Send
        wasm_bindgen_futures::spawn_local(async move {
            let result = self.execute().await;
            // Receiver may already be gone if the command was dropped.
            let _ = tx.send_async(result).await;
        });

        rx.recv_async()
            .await
            .map_err(|_| HttpError::new("Request cancelled"))?
    }

    async fn execute(self) -> HttpResult<Response> {
        let client = &self.client;
        let mut request = match self.method {
            Method::Get => client.get(&self.url),
            Method::Post => client.post(&self.url),
            Method::Put => client.put(&self.url),
            Method::Delete => client.delete(&self.url),
        };

        #[cfg(target_arch = "wasm32")]
        {
            request = request.fetch_credentials_include();
        }

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        request = match self.body {
            Some(Body::Bytes(bytes)) => request.body(bytes),
            Some(Body::Multipart(form)) => request.multipart(form.into_reqwest()?),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;

        // Extract status and headers before consuming the response
        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), v.to_owned());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&BusinessConfig::new("http://localhost:9"))
    }

    #[test]
    fn test_response_is_success() {
        let mut response = Response {
            status: 204,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_success());

        response.status = 404;
        assert!(!response.is_success());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_owned(), "application/json".to_owned());

        let response = Response {
            status: 200,
            headers,
            body: Vec::new(),
        };

        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn urls_are_built_under_the_api_prefix() {
        let client = client();
        assert_eq!(client.url("/users/me"), "http://localhost:9/api/v1/users/me");

        let request = client.delete("/tasks/42");
        assert_eq!(request.method(), Method::Delete);
        assert_eq!(request.url(), "http://localhost:9/api/v1/tasks/42");
    }

    #[test]
    fn test_request_builder_json() {
        #[derive(serde::Serialize)]
        struct TestBody {
            name: String,
        }

        let builder = client()
            .post("/tasks")
            .json(&TestBody {
                name: "test".to_owned(),
            })
            .expect("body should serialize");

        assert_eq!(
            builder.headers.get("content-type"),
            Some(&"application/json".to_owned())
        );
        assert!(matches!(builder.body, Some(Body::Bytes(_))));
    }

    #[test]
    fn multipart_form_keeps_only_added_fields() {
        let form = MultipartForm::new().text("displayName", "Ada");

        assert!(form.contains("displayName"));
        assert!(!form.contains("avatar"));
        assert_eq!(form.get("displayName"), Some(&Part::Text("Ada".to_owned())));
        assert_eq!(form.field_names().collect::<Vec<_>>(), vec!["displayName"]);
    }

    #[test]
    fn multipart_form_rejects_invalid_mime() {
        let form = MultipartForm::new().file("avatar", "a.png", "not a mime", vec![1, 2, 3]);
        assert!(form.into_reqwest().is_err());
    }
}
