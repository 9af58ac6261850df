//! Route handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::executor::ExecuteRequest;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `POST /execute`.
pub async fn execute(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let request_id = request_id(&headers).to_string();

    let request: ExecuteRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Invalid JSON");
            metrics::record_rejected("invalid_json");
            return (StatusCode::BAD_REQUEST, "Invalid JSON").into_response();
        }
    };

    tracing::info!(
        request_id = %request_id,
        code_len = request.code.len(),
        version = request.version.as_str(),
        edition = %request.edition,
        "Execute request parsed"
    );

    if request.code.trim().is_empty() {
        tracing::warn!(request_id = %request_id, "Empty code provided");
        metrics::record_rejected("empty_code");
        return (StatusCode::BAD_REQUEST, "Code cannot be empty").into_response();
    }

    let response = state.runner.execute(request).await;
    tracing::info!(request_id = %request_id, success = response.success, "Execute request answered");

    Json(response).into_response()
}

/// `OPTIONS /execute` without preflight headers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// `GET /`.
pub async fn status(State(state): State<AppState>) -> String {
    format!(
        "Local Rust Playground Server\nPOST /execute to run Rust code\n\n{}\n",
        state.toolchain_status
    )
}
