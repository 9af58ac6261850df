//! Compile and run submitted code with cargo.

use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt};
use thiserror::Error;

use crate::config::ExecutorConfig;
use crate::executor::toolchain::Toolchain;
use crate::executor::{CodeRunner, ExecuteRequest};
use crate::observability::metrics;
use crate::playground::ExecutionResponse;

/// Setup failures. Their text is what the client sees.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to create temp projects directory: {0}")]
    CreateTempRoot(#[source] std::io::Error),

    #[error("Failed to create temp directory: {0}")]
    CreateTempDir(#[source] std::io::Error),

    #[error("Failed to initialize Cargo project: {0}")]
    InitSpawn(#[source] std::io::Error),

    #[error("Failed to initialize Cargo project: {0}")]
    Init(String),

    #[error("Failed to write code file: {0}")]
    WriteSource(#[source] std::io::Error),

    #[error("Failed to start program: {0}")]
    Start(#[source] std::io::Error),

    #[error("Failed to wait for program: {0}")]
    Wait(#[source] std::io::Error),
}

/// Runs each submission in a throwaway cargo project.
#[derive(Debug, Clone)]
pub struct CargoRunner {
    toolchain: Toolchain,
    timeout: Duration,
}

impl CargoRunner {
    pub fn new(toolchain: Toolchain, config: &ExecutorConfig) -> Self {
        Self {
            toolchain,
            timeout: config.timeout(),
        }
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    fn timeout_message(&self) -> String {
        format!("Execution timeout ({} seconds)", self.timeout.as_secs())
    }

    async fn run(&self, request: ExecuteRequest) -> ExecutionResponse {
        let started = Instant::now();
        let response = match self.try_run(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Execution setup failed");
                ExecutionResponse::failure(e.to_string())
            }
        };

        metrics::record_execution(response.success, started);
        tracing::info!(
            success = response.success,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Execution finished"
        );
        response
    }

    async fn try_run(&self, request: &ExecuteRequest) -> Result<ExecutionResponse, ExecutorError> {
        let temp_root = self.toolchain.temp_projects_dir();
        tokio::fs::create_dir_all(&temp_root)
            .await
            .map_err(ExecutorError::CreateTempRoot)?;

        // Removed on drop, whichever way this function returns.
        let project = tempfile::Builder::new()
            .prefix("rust-project-")
            .tempdir_in(&temp_root)
            .map_err(ExecutorError::CreateTempDir)?;

        let mut init = self.toolchain.cargo_command();
        init.args(["init", "--name", "temp_project"]);
        if let Some(edition) = request.edition.cargo_edition() {
            init.args(["--edition", edition]);
        }
        let init_output = init
            .arg(project.path())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(ExecutorError::InitSpawn)?;
        if !init_output.status.success() {
            let stderr = String::from_utf8_lossy(&init_output.stderr);
            return Err(ExecutorError::Init(stderr.trim().to_string()));
        }

        let main_rs = project.path().join("src").join("main.rs");
        tokio::fs::write(&main_rs, &request.code)
            .await
            .map_err(ExecutorError::WriteSource)?;

        tracing::debug!(
            project = %project.path().display(),
            target = self.toolchain.target().as_str(),
            "Running cargo"
        );

        let child = self
            .toolchain
            .cargo_command()
            .args(["run", "--target", self.toolchain.target().as_str()])
            .current_dir(project.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ExecutorError::Start)?;

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(response_from_output(&output)),
            Ok(Err(e)) => Err(ExecutorError::Wait(e)),
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "Execution timed out; process killed");
                Ok(ExecutionResponse::failure(self.timeout_message()))
            }
        }
    }
}

impl CodeRunner for CargoRunner {
    fn execute(&self, request: ExecuteRequest) -> BoxFuture<'_, ExecutionResponse> {
        self.run(request).boxed()
    }
}

/// Fold process output into a response.
///
/// On failure stdout and stderr are joined, separated by a newline when
/// stdout is not empty.
pub fn response_from_output(output: &Output) -> ExecutionResponse {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if output.status.success() {
        return ExecutionResponse::success(stdout, stderr);
    }

    let mut result = stdout;
    if !result.is_empty() {
        result.push('\n');
    }
    result.push_str(&stderr);

    ExecutionResponse {
        success: false,
        result,
        error: stderr,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn output(code: i32, stdout: &str, stderr: &str) -> Output {
        Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_success_keeps_stdout() {
        let response = response_from_output(&output(0, "Hello\n", "Compiling temp_project\n"));
        assert!(response.success);
        assert_eq!(response.result, "Hello\n");
        assert_eq!(response.error, "Compiling temp_project\n");
    }

    #[test]
    fn test_failure_joins_streams() {
        let response = response_from_output(&output(101, "partial", "thread 'main' panicked"));
        assert!(!response.success);
        assert_eq!(response.result, "partial\nthread 'main' panicked");
        assert_eq!(response.error, "thread 'main' panicked");

        let response = response_from_output(&output(1, "", "error[E0425]"));
        assert_eq!(response.result, "error[E0425]");
    }

    #[tokio::test]
    async fn test_missing_cargo_reports_init_failure() {
        let workspace = tempfile::tempdir().unwrap();
        let toolchain = Toolchain::new(crate::config::ToolchainMode::Managed, workspace.path());
        let runner = CargoRunner::new(toolchain, &ExecutorConfig::default());

        let response = runner
            .execute(ExecuteRequest {
                code: "fn main() {}".into(),
                version: Default::default(),
                edition: Default::default(),
            })
            .await;

        assert!(!response.success);
        assert!(response.result.starts_with("Failed to initialize Cargo project: "));
        let leftovers = std::fs::read_dir(workspace.path().join("temp-projects")).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
