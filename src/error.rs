use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CpakError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("KDL parse error: {0}")]
    KdlError(#[from] kdl::KdlError),

    #[error("Unsupported package manager kind: {0}")]
    UnsupportedBackend(String),

    #[error("No supported package manager found (probed: {probed})")]
    NoManagerAvailable { probed: String },

    #[error("Package manager error: {0}")]
    PackageManagerError(String),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("Operation interrupted by user")]
    Interrupted,

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),

    /// Lock acquisition failed (e.g., mutex poisoned)
    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("Config file not found at: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CpakError>;
