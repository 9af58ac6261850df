//! Per-block run lifecycle.
//!
//! # Responsibilities
//! - Attach a result panel to a block on first use
//! - Build the execution payload from the block's text and tags
//! - Race the request against the deadline and classify the settlement
//! - Drive the panel: Running on activation, Displayed on settlement
//!
//! # Design Decisions
//! - `run` performs the Running transition before returning its future
//! - The network await is the only suspension point of a run
//! - Every failure is terminal for its run and ends up as panel text

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt};
use url::Url;

use crate::config::{ClientConfig, StaleResultPolicy};
use crate::fetch::{
    FetchError, FetchRequest, FetchResponse, HttpTransport, TimeoutBoundedFetcher, Transport,
    DEFAULT_DEADLINE,
};
use crate::observability::metrics;
use crate::playground::affordances::Affordance;
use crate::playground::block::CodeBlock;
use crate::playground::panel::ResultPanel;
use crate::playground::types::{ExecutionRequest, ExecutionResponse, RunError, RunOutcome};

/// Classify a settled fetch.
pub fn classify(settled: Result<FetchResponse, FetchError>) -> RunOutcome {
    let response = match settled {
        Ok(response) => response,
        Err(e) => return RunOutcome::Failed(e.into()),
    };

    if !response.is_success() {
        return RunOutcome::Failed(RunError::Status(response.status.as_u16()));
    }

    match response.json::<ExecutionResponse>() {
        Ok(body) if body.result.trim().is_empty() => RunOutcome::Empty,
        Ok(body) => RunOutcome::Output(body.result),
        Err(e) => RunOutcome::Failed(RunError::ResponseFormat(e.to_string())),
    }
}

/// Result of activating one of a block's affordances.
pub enum Activation<'a> {
    /// A run was started; the panel already shows "Running...".
    Run(BoxFuture<'a, RunOutcome>),
    /// Text to put on the clipboard.
    Copied(String),
    /// Whether undo changed the text.
    Reset(bool),
    /// Boring lines are now hidden (`true`) or shown.
    Toggled { hidden: bool },
    /// The affordance does not apply to this block.
    Unavailable,
}

/// Runs playground blocks against an execution endpoint.
#[derive(Debug, Clone)]
pub struct PlaygroundController<T> {
    fetcher: TimeoutBoundedFetcher<T>,
    endpoint: Url,
    deadline: Duration,
    stale_results: StaleResultPolicy,
}

impl PlaygroundController<HttpTransport> {
    /// Controller talking HTTP to the configured endpoint.
    pub fn from_config(config: &ClientConfig) -> Result<Self, url::ParseError> {
        Ok(Self::new(HttpTransport::new(), config.endpoint_url()?)
            .with_deadline(config.deadline())
            .with_stale_results(config.stale_results))
    }
}

impl<T: Transport> PlaygroundController<T> {
    pub fn new(transport: T, endpoint: Url) -> Self {
        Self {
            fetcher: TimeoutBoundedFetcher::new(transport),
            endpoint,
            deadline: DEFAULT_DEADLINE,
            stale_results: StaleResultPolicy::default(),
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_stale_results(mut self, policy: StaleResultPolicy) -> Self {
        self.stale_results = policy;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// The block's panel, created empty on first call.
    pub fn ensure_result_panel(&self, block: &CodeBlock) -> Arc<ResultPanel> {
        block.panel_or_init()
    }

    pub fn build_request(&self, block: &CodeBlock) -> ExecutionRequest {
        ExecutionRequest::new(block.text(), block.edition())
    }

    /// Start a run of `block`.
    ///
    /// The panel shows "Running..." as soon as this returns; awaiting the
    /// future performs the request and settles the panel.
    pub fn run(&self, block: &CodeBlock) -> impl Future<Output = RunOutcome> + Send + '_ {
        let panel = self.ensure_result_panel(block);
        let ticket = panel.begin_run();
        let request = self.build_request(block);

        tracing::debug!(
            run_id = ticket.id(),
            edition = %request.edition,
            version = request.version.as_str(),
            code_len = request.code.len(),
            "Starting playground run"
        );

        async move {
            let started = Instant::now();
            let outcome = match FetchRequest::post_json(self.endpoint.clone(), &request) {
                Ok(fetch) => classify(self.fetcher.execute_with_deadline(fetch, self.deadline).await),
                Err(e) => RunOutcome::Failed(RunError::Unclassified(e.to_string())),
            };

            let applied = panel.settle(ticket, &outcome, self.stale_results);
            metrics::record_run(outcome.label(), started);

            match &outcome {
                RunOutcome::Failed(err) => tracing::warn!(
                    run_id = ticket.id(),
                    applied,
                    error = %err,
                    "Playground run failed"
                ),
                _ => tracing::debug!(
                    run_id = ticket.id(),
                    applied,
                    outcome = outcome.label(),
                    "Playground run settled"
                ),
            }

            outcome
        }
    }

    /// Dispatch an affordance activation to its handler.
    pub fn activate(&self, block: &mut CodeBlock, affordance: Affordance) -> Activation<'_> {
        match affordance {
            Affordance::Run if block.is_playground() => Activation::Run(self.run(block).boxed()),
            Affordance::Run => Activation::Unavailable,
            Affordance::CopyToClipboard => Activation::Copied(block.clipboard_text().to_string()),
            Affordance::UndoChanges if block.is_editable() => Activation::Reset(block.reset()),
            Affordance::UndoChanges => Activation::Unavailable,
            Affordance::ToggleBoringLines { .. } if block.has_boring_lines() => Activation::Toggled {
                hidden: block.toggle_boring(),
            },
            Affordance::ToggleBoringLines { .. } => Activation::Unavailable,
        }
    }
}
