//! Code execution subsystem.
//!
//! # Data Flow
//! ```text
//! ExecuteRequest {code, version, edition}
//!     → runner.rs (temp cargo project, cargo init, write src/main.rs)
//!     → cargo run --target <host> under a wall-clock limit
//!     → ExecutionResponse {success, result, error}
//!
//! toolchain.rs: where cargo lives and how it gets installed
//! ```
//!
//! # Design Decisions
//! - One throwaway project per request; removed when the run ends
//! - A run over the limit is killed, never awaited
//! - `CodeRunner` is the seam the HTTP layer depends on

pub mod runner;
pub mod toolchain;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::playground::{Channel, Edition, ExecutionResponse};

pub use runner::{response_from_output, CargoRunner, ExecutorError};
pub use toolchain::{RustTarget, Toolchain, ToolchainError};

/// Body of `POST /execute`. Unknown fields such as `optimize` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub code: String,
    #[serde(default)]
    pub version: Channel,
    #[serde(default)]
    pub edition: Edition,
}

/// Something that can execute a submission.
pub trait CodeRunner: Send + Sync + 'static {
    fn execute(&self, request: ExecuteRequest) -> BoxFuture<'_, ExecutionResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_client_payload() {
        let request: ExecuteRequest = serde_json::from_str(
            r#"{"version":"nightly","optimize":"0","code":"fn main(){}","edition":"2021"}"#,
        )
        .unwrap();

        assert_eq!(request.code, "fn main(){}");
        assert_eq!(request.version, Channel::Nightly);
        assert_eq!(request.edition, Edition::E2021);
    }

    #[test]
    fn test_request_defaults() {
        let request: ExecuteRequest = serde_json::from_str(r#"{"code":"x"}"#).unwrap();
        assert_eq!(request.version, Channel::Stable);
        assert_eq!(request.edition, Edition::E2015);
    }
}
