//! Error types for tempr

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using tempr's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tempr operations
#[derive(Error, Debug)]
pub enum Error {
    /// Dataset file could not be opened
    #[error("Failed to open dataset {path}: {source}")]
    Dataset {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while reading records
    #[error("I/O error while reading dataset: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed dataset record
    #[error("Malformed record at line {line}: {reason}")]
    Parse {
        /// 1-based line number of the offending record
        line: usize,
        /// Reason the record could not be parsed
        reason: String,
    },

    /// Requested platform/device pair does not exist
    #[error("No adapter for platform {platform}, device {device}; available: {available}")]
    AdapterSelection {
        /// Requested platform (backend group) index
        platform: usize,
        /// Requested device index within the platform
        device: usize,
        /// Human-readable summary of what is available
        available: String,
    },

    /// GPU device request failed
    #[error("Device request failed: {0}")]
    Device(String),

    /// WGSL shader failed to build
    ///
    /// Carries the full compiler log so the failure can be diagnosed
    /// without rerunning under a debugger.
    #[error("Shader '{name}' failed to build:\n{log}")]
    ShaderBuild {
        /// Shader module name
        name: &'static str,
        /// Full compilation log
        log: String,
    },

    /// Any other device-API failure (submission, poll, readback)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

impl Error {
    /// Create a parse error for a dataset record
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }
}
