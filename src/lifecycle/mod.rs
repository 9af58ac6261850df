//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Ctrl+C / SIGTERM
//!     → shutdown.rs (broadcast to subscribers)
//!     → HTTP server stops accepting, drains in-flight executions
//!     → process exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
