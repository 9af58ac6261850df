//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! playground server and client. All types derive Serde traits for
//! deserialization from TOML files.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Execution service listener.
    pub server: ServerConfig,

    /// Code execution settings.
    pub executor: ExecutorConfig,

    /// Settings for the run pipeline talking to the execution service.
    pub client: ClientConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Execution service listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8081").
    pub bind_address: String,

    /// Largest accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Replace the port of the bind address, keeping the host.
    pub fn set_port(&mut self, port: u16) -> Result<(), AddrParseError> {
        let mut addr: SocketAddr = self.bind_address.parse()?;
        addr.set_port(port);
        self.bind_address = addr.to_string();
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8081".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Where the Rust toolchain comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolchainMode {
    /// Install a private toolchain under the workspace with rustup-init.
    #[default]
    Managed,
    /// Use whatever `cargo` is on `PATH`.
    System,
}

/// Code execution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Directory holding the toolchain and temporary projects.
    pub workspace_dir: String,

    /// Wall-clock limit for `cargo run` in seconds.
    pub timeout_secs: u64,

    /// Toolchain source.
    pub toolchain: ToolchainMode,
}

impl ExecutorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            workspace_dir: "local-playground-workspace".to_string(),
            timeout_secs: 10,
            toolchain: ToolchainMode::Managed,
        }
    }
}

/// What to do with a run that settles after a newer run was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StaleResultPolicy {
    /// Whichever run settles last wins.
    #[default]
    Apply,
    /// Only the most recently started run may update its panel.
    Discard,
}

/// Run pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Execution endpoint URL.
    pub endpoint: String,

    /// Per-run deadline in milliseconds.
    pub deadline_ms: u64,

    /// Handling of out-of-order settlements.
    pub stale_results: StaleResultPolicy,
}

impl ClientConfig {
    pub fn endpoint_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.endpoint)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8081/execute".to_string(),
            deadline_ms: 6000,
            stale_results: StaleResultPolicy::Apply,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Prometheus listener address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9091".to_string(),
        }
    }
}
