//! Local Rust Playground Library
//!
//! Runnable code blocks for documentation pages: a deadline-bounded run
//! pipeline on the page side and a cargo-backed execution service.

pub mod config;
pub mod executor;
pub mod fetch;
pub mod http;
pub mod lifecycle;
pub mod markdown;
pub mod observability;
pub mod playground;

pub use config::schema::PlaygroundConfig;
pub use fetch::TimeoutBoundedFetcher;
pub use http::PlaygroundServer;
pub use lifecycle::Shutdown;
pub use playground::PlaygroundController;
