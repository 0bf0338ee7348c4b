//! Error types for the signpack workflow.

use thiserror::Error;

/// Core error type for keystore provisioning and packaging.
#[derive(Error, Debug)]
pub enum SignpackError {
    #[error("keytool exited with {}", exit_status(.status))]
    Keytool {
        /// Exit code, if the process was not killed by a signal.
        status: Option<i32>,
        /// Captured standard error of the failed invocation.
        stderr: String,
    },

    #[error("Failed to run {program}: {source}")]
    KeytoolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("Input closed before all answers were given")]
    InputClosed,

    #[error("Malformed signing properties: {0}")]
    MalformedProperties(String),
}

impl SignpackError {
    /// Wraps an I/O error with a description of the failed operation.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SignpackError::Io {
            context: context.into(),
            source,
        }
    }
}

fn exit_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Result type alias for signpack operations.
pub type Result<T> = std::result::Result<T, SignpackError>;
