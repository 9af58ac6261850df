//! Execution payloads, editions and run outcomes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::fetch::FetchError;

/// Substring that opts code into unstable features.
pub const FEATURE_GATE_MARKER: &str = "#![feature";

/// Optimization level sent with every request.
pub const OPTIMIZE_LEVEL: &str = "0";

/// Class prefix carrying an edition, as in `edition2021`.
pub const EDITION_TAG_PREFIX: &str = "edition";

/// Release channel requested from the execution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Stable,
    Nightly,
}

impl Channel {
    /// Nightly iff the code contains a feature gate.
    pub fn for_code(code: &str) -> Self {
        if code.contains(FEATURE_GATE_MARKER) {
            Channel::Nightly
        } else {
            Channel::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Nightly => "nightly",
        }
    }
}

/// Rust edition a block is compiled with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Edition {
    #[default]
    E2015,
    E2018,
    E2021,
    E2024,
    /// Whatever followed `edition` in a tag we do not recognise.
    Other(String),
}

impl Edition {
    /// Resolve the edition from a block's tags; the last `edition*` tag wins.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter().fold(Edition::default(), |current, tag| {
            match tag.as_ref().strip_prefix(EDITION_TAG_PREFIX) {
                Some(suffix) => Edition::from(suffix),
                None => current,
            }
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Edition::E2015 => "2015",
            Edition::E2018 => "2018",
            Edition::E2021 => "2021",
            Edition::E2024 => "2024",
            Edition::Other(raw) => raw,
        }
    }

    /// Value for `cargo init --edition`, if cargo knows this edition.
    pub fn cargo_edition(&self) -> Option<&'static str> {
        match self {
            Edition::E2015 => Some("2015"),
            Edition::E2018 => Some("2018"),
            Edition::E2021 => Some("2021"),
            Edition::E2024 => Some("2024"),
            Edition::Other(_) => None,
        }
    }
}

impl From<&str> for Edition {
    fn from(raw: &str) -> Self {
        match raw {
            "2015" => Edition::E2015,
            "2018" => Edition::E2018,
            "2021" => Edition::E2021,
            "2024" => Edition::E2024,
            other => Edition::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Edition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Edition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Edition::from(raw.as_str()))
    }
}

/// Payload posted to the execution service. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub version: Channel,
    pub optimize: String,
    pub code: String,
    pub edition: Edition,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, edition: Edition) -> Self {
        let code = code.into();
        Self {
            version: Channel::for_code(&code),
            optimize: OPTIMIZE_LEVEL.to_string(),
            code,
            edition,
        }
    }
}

/// Body answered by the execution service.
///
/// Only `result` is required; `success` and `error` are informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResponse {
    #[serde(default)]
    pub success: bool,
    pub result: String,
    #[serde(default)]
    pub error: String,
}

impl ExecutionResponse {
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            success: true,
            result: stdout.into(),
            error: stderr.into(),
        }
    }

    /// A failure whose message is both the result and the error.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            result: message.clone(),
            error: message,
        }
    }
}

/// Why a run did not produce output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Timeout or transport failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The service answered with a non-2xx status.
    #[error("execution service returned HTTP {0}")]
    Status(u16),

    /// Body was not JSON or lacked a string `result`.
    #[error("{0}")]
    ResponseFormat(String),

    /// Anything else, such as a payload that failed to encode.
    #[error("{0}")]
    Unclassified(String),
}

/// Classified settlement of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Non-empty output, kept verbatim.
    Output(String),
    /// Output was empty after trimming.
    Empty,
    Failed(RunError),
}

impl RunOutcome {
    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Output(_) => "output",
            RunOutcome::Empty => "empty",
            RunOutcome::Failed(RunError::Fetch(FetchError::Timeout)) => "timeout",
            RunOutcome::Failed(_) => "failed",
        }
    }
}
