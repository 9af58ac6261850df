//! Rust toolchain location and installation.
//!
//! # Responsibilities
//! - Pick the host target triple
//! - Lay out the private toolchain under the workspace
//! - Download rustup-init and install a minimal stable toolchain
//! - Build cargo commands with the right `RUSTUP_HOME` / `CARGO_HOME`

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::config::ToolchainMode;

const RUSTUP_DIST: &str = "https://static.rust-lang.org/rustup/dist";

/// Errors raised while installing the toolchain.
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download rustup-init: {0}")]
    Download(#[from] reqwest::Error),

    #[error("failed to download rustup-init: HTTP {0}")]
    DownloadStatus(u16),

    #[error("failed to save rustup-init: {0}")]
    Save(#[source] std::io::Error),

    #[error("failed to run rustup-init: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to install Rust: {status}\nOutput: {output}")]
    Install { status: String, output: String },
}

/// Host platforms with a prebuilt toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RustTarget {
    X86_64WindowsGnu,
    Aarch64Apple,
    X86_64Apple,
    Aarch64Linux,
    X86_64Linux,
}

impl RustTarget {
    pub fn host() -> Self {
        Self::for_platform(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn for_platform(os: &str, arch: &str) -> Self {
        match (os, arch) {
            ("windows", _) => RustTarget::X86_64WindowsGnu,
            ("macos", "aarch64") => RustTarget::Aarch64Apple,
            ("macos", _) => RustTarget::X86_64Apple,
            ("linux", "aarch64") => RustTarget::Aarch64Linux,
            _ => RustTarget::X86_64Linux,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RustTarget::X86_64WindowsGnu => "x86_64-pc-windows-gnu",
            RustTarget::Aarch64Apple => "aarch64-apple-darwin",
            RustTarget::X86_64Apple => "x86_64-apple-darwin",
            RustTarget::Aarch64Linux => "aarch64-unknown-linux-gnu",
            RustTarget::X86_64Linux => "x86_64-unknown-linux-gnu",
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, RustTarget::X86_64WindowsGnu)
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, RustTarget::Aarch64Linux | RustTarget::X86_64Linux)
    }

    fn exe_suffix(&self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }

    pub fn rustup_init_url(&self) -> String {
        format!("{}/{}/rustup-init{}", RUSTUP_DIST, self.as_str(), self.exe_suffix())
    }
}

/// A Rust toolchain the executor can drive.
#[derive(Debug, Clone)]
pub struct Toolchain {
    mode: ToolchainMode,
    target: RustTarget,
    workspace: PathBuf,
}

impl Toolchain {
    pub fn new(mode: ToolchainMode, workspace: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            target: RustTarget::host(),
            workspace: workspace.into(),
        }
    }

    pub fn with_target(mut self, target: RustTarget) -> Self {
        self.target = target;
        self
    }

    pub fn mode(&self) -> ToolchainMode {
        self.mode
    }

    pub fn target(&self) -> RustTarget {
        self.target
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn rust_home(&self) -> PathBuf {
        self.workspace.join("rust-toolchain")
    }

    pub fn cargo_home(&self) -> PathBuf {
        self.rust_home().join("cargo")
    }

    pub fn default_toolchain(&self) -> String {
        format!("stable-{}", self.target.as_str())
    }

    pub fn cargo_path(&self) -> PathBuf {
        match self.mode {
            ToolchainMode::System => PathBuf::from("cargo"),
            ToolchainMode::Managed => self
                .rust_home()
                .join("toolchains")
                .join(self.default_toolchain())
                .join("bin")
                .join(format!("cargo{}", self.target.exe_suffix())),
        }
    }

    pub fn rustup_init_path(&self) -> PathBuf {
        self.workspace.join(format!("rustup-init{}", self.target.exe_suffix()))
    }

    /// Directory holding per-run cargo projects.
    pub fn temp_projects_dir(&self) -> PathBuf {
        self.workspace.join("temp-projects")
    }

    pub fn is_installed(&self) -> bool {
        match self.mode {
            ToolchainMode::System => true,
            ToolchainMode::Managed => self.cargo_path().exists(),
        }
    }

    /// One-line description for status pages.
    pub fn describe(&self) -> String {
        match self.mode {
            ToolchainMode::System => "Using system Rust toolchain from PATH".to_string(),
            ToolchainMode::Managed => {
                format!("Using local Rust toolchain at: {}", self.rust_home().display())
            }
        }
    }

    /// A command whose environment points at this toolchain.
    pub fn command(&self, program: impl AsRef<std::ffi::OsStr>) -> Command {
        let mut command = Command::new(program);
        if self.mode == ToolchainMode::Managed {
            command
                .env("RUSTUP_HOME", self.rust_home())
                .env("CARGO_HOME", self.cargo_home());
        }
        command.env_remove("CARGO_TARGET_DIR");
        command
    }

    pub fn cargo_command(&self) -> Command {
        let mut command = self.command(self.cargo_path());
        if !self.target.is_windows() && !self.target.is_linux() {
            command.env("RUSTFLAGS", "-C linker=rust-lld");
        }
        command
    }

    /// Install the managed toolchain unless it is already present.
    pub async fn ensure_installed(&self, client: &reqwest::Client) -> Result<(), ToolchainError> {
        if self.is_installed() {
            tracing::info!(location = %self.describe(), "Rust toolchain already available");
            return Ok(());
        }

        let rust_home = self.rust_home();
        tracing::info!(rust_home = %rust_home.display(), "Installing Rust toolchain");
        create_dir(&rust_home).await?;
        create_dir(&self.cargo_home()).await?;

        let rustup_init = self.download_rustup_init(client).await?;
        let default_toolchain = self.default_toolchain();
        tracing::info!(toolchain = %default_toolchain, "Running rustup-init");

        let output = self
            .command(&rustup_init)
            .args(["--default-toolchain", &default_toolchain])
            .args(["--profile", "minimal", "--no-modify-path", "-y"])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(ToolchainError::Spawn)?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(ToolchainError::Install {
                status: output.status.to_string(),
                output: combined,
            });
        }

        tracing::info!(
            rustup_home = %rust_home.display(),
            cargo_home = %self.cargo_home().display(),
            cargo = %self.cargo_path().display(),
            "Rust toolchain installed"
        );
        Ok(())
    }

    async fn download_rustup_init(&self, client: &reqwest::Client) -> Result<PathBuf, ToolchainError> {
        let path = self.rustup_init_path();
        if let Ok(meta) = tokio::fs::metadata(&path).await {
            tracing::info!(path = %path.display(), size = meta.len(), "rustup-init already present");
            return Ok(path);
        }

        create_dir(&self.workspace).await?;

        let url = self.target.rustup_init_url();
        tracing::info!(url = %url, target = %path.display(), "Downloading rustup-init");

        let response = client
            .get(&url)
            .timeout(Duration::from_secs(60))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ToolchainError::DownloadStatus(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;

        tokio::fs::write(&path, &bytes).await.map_err(ToolchainError::Save)?;
        make_executable(&path).await?;

        tracing::info!(path = %path.display(), size = bytes.len(), "Downloaded rustup-init");
        Ok(path)
    }
}

async fn create_dir(path: &Path) -> Result<(), ToolchainError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| ToolchainError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<(), ToolchainError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .map_err(ToolchainError::Save)
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<(), ToolchainError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_selection() {
        assert_eq!(RustTarget::for_platform("windows", "x86_64").as_str(), "x86_64-pc-windows-gnu");
        assert_eq!(RustTarget::for_platform("macos", "aarch64").as_str(), "aarch64-apple-darwin");
        assert_eq!(RustTarget::for_platform("macos", "x86_64").as_str(), "x86_64-apple-darwin");
        assert_eq!(RustTarget::for_platform("linux", "aarch64").as_str(), "aarch64-unknown-linux-gnu");
        assert_eq!(RustTarget::for_platform("linux", "x86_64").as_str(), "x86_64-unknown-linux-gnu");
        assert_eq!(RustTarget::for_platform("freebsd", "riscv64").as_str(), "x86_64-unknown-linux-gnu");
    }

    #[test]
    fn test_rustup_init_url() {
        assert_eq!(
            RustTarget::X86_64WindowsGnu.rustup_init_url(),
            "https://static.rust-lang.org/rustup/dist/x86_64-pc-windows-gnu/rustup-init.exe"
        );
        assert_eq!(
            RustTarget::Aarch64Linux.rustup_init_url(),
            "https://static.rust-lang.org/rustup/dist/aarch64-unknown-linux-gnu/rustup-init"
        );
    }

    #[test]
    fn test_managed_layout() {
        let toolchain = Toolchain::new(ToolchainMode::Managed, "/srv/ws").with_target(RustTarget::X86_64Linux);

        assert_eq!(toolchain.rust_home(), PathBuf::from("/srv/ws/rust-toolchain"));
        assert_eq!(toolchain.cargo_home(), PathBuf::from("/srv/ws/rust-toolchain/cargo"));
        assert_eq!(
            toolchain.cargo_path(),
            PathBuf::from("/srv/ws/rust-toolchain/toolchains/stable-x86_64-unknown-linux-gnu/bin/cargo")
        );
        assert_eq!(toolchain.temp_projects_dir(), PathBuf::from("/srv/ws/temp-projects"));
        assert!(!toolchain.is_installed());

        let windows = toolchain.with_target(RustTarget::X86_64WindowsGnu);
        assert!(windows.cargo_path().ends_with("bin/cargo.exe"));
        assert!(windows.rustup_init_path().ends_with("rustup-init.exe"));
    }

    #[test]
    fn test_system_mode_uses_path_cargo() {
        let toolchain = Toolchain::new(ToolchainMode::System, "ws");
        assert_eq!(toolchain.cargo_path(), PathBuf::from("cargo"));
        assert!(toolchain.is_installed());
        assert_eq!(toolchain.describe(), "Using system Rust toolchain from PATH");
    }
}
