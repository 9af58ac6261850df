//! Result panel state machine.
//!
//! # States
//! - Idle: attached, nothing shown yet
//! - Running: a run is in flight, "Running..." is shown
//! - Succeeded / Empty / Failed: the last accepted run settled
//!
//! # State Transitions
//! ```text
//! Idle/any → Running:             begin_run (issues a new run id)
//! Running  → Succeeded(text):     settle with non-empty output
//! Running  → Empty:               settle with whitespace-only output
//! Running  → Failed(message):     settle with any failure
//! Running  → Idle:                cancel_pending
//! ```
//!
//! # Design Decisions
//! - Display is a projection of state (`render`), never mutated directly
//! - The empty-output marker survives failures; only successes touch it
//! - Run ids are monotonic per panel; stale settlements are filtered by policy

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::StaleResultPolicy;
use crate::playground::types::RunOutcome;

pub const RUNNING_TEXT: &str = "Running...";
pub const NO_OUTPUT_TEXT: &str = "No output";
pub const FAILURE_PREFIX: &str = "Playground Communication: ";

/// Classes every panel carries.
pub const PANEL_CLASSES: [&str; 3] = ["result", "hljs", "language-bash"];

/// Marker class for an empty result.
pub const NO_OUTPUT_CLASS: &str = "result-no-output";

/// Displayed state of a panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Running,
    Succeeded(String),
    Empty,
    Failed(String),
}

/// Coarse lifecycle phase of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Displayed,
}

impl PanelState {
    pub fn phase(&self) -> Phase {
        match self {
            PanelState::Idle => Phase::Idle,
            PanelState::Running => Phase::Running,
            PanelState::Succeeded(_) | PanelState::Empty | PanelState::Failed(_) => Phase::Displayed,
        }
    }
}

/// What a renderer should put on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: Option<String>,
    pub classes: Vec<&'static str>,
}

/// Project a panel state (plus marker) to text and classes.
pub fn render(state: &PanelState, no_output: bool) -> Rendered {
    let text = match state {
        PanelState::Idle => None,
        PanelState::Running => Some(RUNNING_TEXT.to_string()),
        PanelState::Succeeded(output) => Some(output.clone()),
        PanelState::Empty => Some(NO_OUTPUT_TEXT.to_string()),
        PanelState::Failed(message) => Some(format!("{}{}", FAILURE_PREFIX, message)),
    };

    let mut classes = PANEL_CLASSES.to_vec();
    if no_output {
        classes.push(NO_OUTPUT_CLASS);
    }

    Rendered { text, classes }
}

/// Identifies one run against its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct PanelInner {
    state: PanelState,
    no_output: bool,
    /// Id of the most recently issued run.
    issued: u64,
    /// Runs with an id at or below this were cancelled.
    cancelled_through: u64,
}

/// Display surface attached to one code block.
#[derive(Debug, Default)]
pub struct ResultPanel {
    inner: Mutex<PanelInner>,
}

impl ResultPanel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PanelInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> PanelState {
        self.lock().state.clone()
    }

    pub fn has_no_output_marker(&self) -> bool {
        self.lock().no_output
    }

    pub fn render(&self) -> Rendered {
        let inner = self.lock();
        render(&inner.state, inner.no_output)
    }

    /// Displayed text, `None` while idle.
    pub fn text(&self) -> Option<String> {
        self.render().text
    }

    /// Enter `Running` and hand out the id for the new run.
    pub(crate) fn begin_run(&self) -> RunTicket {
        let mut inner = self.lock();
        inner.issued += 1;
        inner.state = PanelState::Running;
        RunTicket(inner.issued)
    }

    /// Ignore every run started so far. A panel left running goes back to idle.
    pub fn cancel_pending(&self) {
        let mut inner = self.lock();
        inner.cancelled_through = inner.issued;
        if inner.state == PanelState::Running {
            inner.state = PanelState::Idle;
        }
    }

    /// Apply a settled run. Returns whether the panel changed.
    pub(crate) fn settle(&self, ticket: RunTicket, outcome: &RunOutcome, policy: StaleResultPolicy) -> bool {
        let mut inner = self.lock();

        if ticket.0 <= inner.cancelled_through {
            return false;
        }
        if policy == StaleResultPolicy::Discard && ticket.0 != inner.issued {
            return false;
        }

        match outcome {
            RunOutcome::Output(text) => {
                inner.state = PanelState::Succeeded(text.clone());
                inner.no_output = false;
            }
            RunOutcome::Empty => {
                inner.state = PanelState::Empty;
                inner.no_output = true;
            }
            RunOutcome::Failed(err) => {
                inner.state = PanelState::Failed(err.to_string());
            }
        }
        true
    }
}
