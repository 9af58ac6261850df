//! HTTP surface of the execution service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, CORS, body limit, tracing, request ID)
//!     → handlers.rs
//!         POST    /execute → parse, validate, CodeRunner::execute → JSON
//!         OPTIONS /execute → 200 (CORS preflight)
//!         GET     /        → plain-text status
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, PlaygroundServer};
