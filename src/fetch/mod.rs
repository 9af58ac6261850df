//! Deadline-bounded HTTP fetching.
//!
//! # Data Flow
//! ```text
//! FetchRequest (url, method, headers, body, mode)
//!     → deadline.rs (spawn network call, start timer)
//!         ├─ network settles first → FetchResponse / FetchError::Network
//!         └─ timer fires first     → FetchError::Timeout ("timeout")
//!     → transport.rs (the actual network call, reqwest in production)
//! ```
//!
//! # Design Decisions
//! - Exactly one network attempt and one timer per call; no retries
//! - A timed-out call is detached, not aborted; its result is dropped
//! - The transport is a trait object seam so tests can script latency

pub mod deadline;
pub mod transport;
pub mod types;

pub use deadline::TimeoutBoundedFetcher;
pub use transport::{HttpTransport, Transport};
pub use types::{FetchError, FetchRequest, FetchResponse, RequestMode, DEFAULT_DEADLINE};
