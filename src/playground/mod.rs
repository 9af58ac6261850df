//! Interactive code blocks and the run pipeline.
//!
//! # Data Flow
//! ```text
//! CodeBlock (text + class tags)
//!     → controller.rs run()
//!         → panel.rs begin_run (Running, "Running...")
//!         → types.rs ExecutionRequest {version, optimize, code, edition}
//!         → fetch::TimeoutBoundedFetcher (POST, JSON, CORS, deadline)
//!         → classify: Output | Empty | Failed
//!         → panel.rs settle (guarded by run id)
//!     → panel.rs render() → text + classes for the page
//!
//! affordances.rs: which buttons a block gets and what they do
//! ```

pub mod affordances;
pub mod block;
pub mod controller;
pub mod panel;
pub mod types;

pub use affordances::{affordances, Affordance, PageOptions};
pub use block::CodeBlock;
pub use controller::{classify, Activation, PlaygroundController};
pub use panel::{render, PanelState, Phase, Rendered, ResultPanel, RunTicket};
pub use types::{Channel, Edition, ExecutionRequest, ExecutionResponse, RunError, RunOutcome};
