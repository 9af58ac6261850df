//! Metrics collection and exposition.
//!
//! # Metrics
//! - `playground_runs_total` (counter): client runs by outcome
//! - `playground_run_duration_seconds` (histogram): request to settlement
//! - `playground_executions_total` (counter): server executions by result
//! - `playground_execution_duration_seconds` (histogram): cargo wall time
//! - `playground_rejected_requests_total` (counter): 4xx answers by reason

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_run(outcome: &'static str, started: Instant) {
    metrics::counter!("playground_runs_total", "outcome" => outcome).increment(1);
    metrics::histogram!("playground_run_duration_seconds", "outcome" => outcome)
        .record(started.elapsed().as_secs_f64());
}

pub fn record_execution(success: bool, started: Instant) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("playground_executions_total", "result" => result).increment(1);
    metrics::histogram!("playground_execution_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

pub fn record_rejected(reason: &'static str) {
    metrics::counter!("playground_rejected_requests_total", "reason" => reason).increment(1);
}
