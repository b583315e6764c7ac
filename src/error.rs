//! Error types for lazydep
//!
//! All modules use `LazydepResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lazydep operations
pub type LazydepResult<T> = Result<T, LazydepError>;

/// All errors that can occur in lazydep
#[derive(Error, Debug)]
pub enum LazydepError {
    // Package identifier errors
    #[error("Invalid package identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    // Process errors
    #[error("Failed to start command: {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with code {exit_code}: {command}\n{stderr_tail}")]
    Process {
        command: String,
        exit_code: i32,
        stderr_tail: String,
    },

    // Cache errors
    #[error("Failed to install {identifier}: {source}")]
    Install {
        identifier: String,
        #[source]
        source: Box<LazydepError>,
    },

    #[error("Failed to load {identifier}: {reason}")]
    Load { identifier: String, reason: String },

    #[error("Registry resolution failed: {0}")]
    Resolution(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl LazydepError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Create a load error
    pub fn load(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a runner failure as an install failure for `identifier`
    pub fn install(identifier: impl Into<String>, source: LazydepError) -> Self {
        Self::Install {
            identifier: identifier.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error consumes import retry budget
    ///
    /// Only load failures are remediated by a forced reinstall.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Spawn { .. } => Some("Is the package manager installed and on PATH?"),
            Self::Install { source, .. } => source.hint(),
            Self::Resolution(_) => {
                Some("Set it explicitly: lazydep config set registry.url https://registry.npmjs.org/")
            }
            Self::Load { .. } => Some("Force a clean reinstall: lazydep import --force <package>"),
            _ => None,
        }
    }
}
