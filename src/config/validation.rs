//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the execution endpoint is an http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PlaygroundConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::PlaygroundConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("server.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("executor.timeout_secs must be greater than zero")]
    ZeroExecutionTimeout,

    #[error("executor.workspace_dir must not be empty")]
    EmptyWorkspace,

    #[error("client.endpoint `{endpoint}` is invalid: {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("client.deadline_ms must be greater than zero")]
    ZeroDeadline,

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &PlaygroundConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.server.bind_address.clone()));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.executor.timeout_secs == 0 {
        errors.push(ValidationError::ZeroExecutionTimeout);
    }
    if config.executor.workspace_dir.trim().is_empty() {
        errors.push(ValidationError::EmptyWorkspace);
    }

    match config.client.endpoint_url() {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::Endpoint {
            endpoint: config.client.endpoint.clone(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::Endpoint {
            endpoint: config.client.endpoint.clone(),
            reason: e.to_string(),
        }),
    }
    if config.client.deadline_ms == 0 {
        errors.push(ValidationError::ZeroDeadline);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
