//! Request/response descriptors and fetch errors.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Deadline applied when the caller does not pick one.
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(6000);

/// Cross-origin mode of a request, mirrored into `Sec-Fetch-Mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    #[default]
    Cors,
    SameOrigin,
    NoCors,
}

impl RequestMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMode::Cors => "cors",
            RequestMode::SameOrigin => "same-origin",
            RequestMode::NoCors => "no-cors",
        }
    }
}

/// A network request descriptor.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub mode: RequestMode,
}

impl FetchRequest {
    /// Build a CORS `POST` carrying `payload` as JSON.
    pub fn post_json<T: Serialize>(url: Url, payload: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(payload)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            url,
            method: Method::POST,
            headers,
            body: Some(body),
            mode: RequestMode::Cors,
        })
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Ways a fetch can fail before a response is available.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The deadline elapsed before the network call settled.
    #[error("timeout")]
    Timeout,

    /// Transport-level failure (connect, TLS, reset, body read).
    #[error("{0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_sets_content_type_and_mode() {
        let url = Url::parse("http://127.0.0.1:8081/execute").unwrap();
        let req = FetchRequest::post_json(url, &serde_json::json!({"code": "fn main(){}"})).unwrap();

        assert_eq!(req.method, Method::POST);
        assert_eq!(req.mode, RequestMode::Cors);
        assert_eq!(req.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(req.body.as_deref(), Some(r#"{"code":"fn main(){}"}"#));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(FetchError::Timeout.to_string(), "timeout");
        assert_eq!(
            FetchError::Network("connection refused".into()).to_string(),
            "connection refused"
        );
    }
}
