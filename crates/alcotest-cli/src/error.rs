//! Error types surfaced to the embedding test suite

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why a run did not succeed
#[derive(Debug, Error)]
pub enum RunError {
    /// Bad command line; nothing was run
    #[error(transparent)]
    Args(#[from] clap::Error),

    #[error("{failures} test case(s) failed")]
    TestsFailed { failures: usize },

    #[error("failed to write test log {}: {source}", .path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl RunError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Args(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Outcome of a single failed test case
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TestFailure {
    #[error("{0}")]
    Failed(String),

    #[error("{name} timed out after {duration:?}")]
    TimedOut { name: String, duration: Duration },

    #[error("{name} panicked: {message}")]
    Panicked { name: String, message: String },
}

impl TestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        TestFailure::Failed(message.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TestFailure::TimedOut { .. })
    }
}

/// Turn a panic payload into a readable message
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
