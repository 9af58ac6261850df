//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PlaygroundConfig (validated, immutable)
//!     → server binary: [server], [executor], [observability]
//!     → run pipeline:  [client]
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_client_overrides, load_config, parse_config, ConfigError};
pub use schema::PlaygroundConfig;
pub use schema::{ClientConfig, ExecutorConfig, ObservabilityConfig, ServerConfig};
pub use schema::{LogFormat, StaleResultPolicy, ToolchainMode};
