//! Error types for the mapping engine.
//!
//! [`MappingError`] values are never raised past [`crate::MappingEngine::run`]:
//! the engine records them in the [`crate::MappingContext`] error log and
//! returns normally. [`ContextError`] and [`ConfigError`] are ordinary
//! `Result` errors produced while setting the engine up.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A condition recorded during a mapping run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MappingError {
    /// The walk did not report completion within the time budget.
    ///
    /// The walk itself is not interrupted; the caller simply stops waiting.
    #[error("Timeout running mapping processors")]
    Timeout {
        /// Budget that was exceeded, in milliseconds.
        budget_ms: u64,
    },

    /// The walk failed: a delegate action returned an error or the walk task
    /// panicked.
    #[error("Error running mapping processors: {message}")]
    Dispatch {
        /// Rendered cause chain.
        message: String,
    },

    /// A task registered by a delegate as an invoked task failed.
    #[error("Error running mapping processors: invoked task failed: {message}")]
    InvokedTask {
        /// Rendered cause chain.
        message: String,
    },

    /// Invoked tasks did not all complete within their configured timeout.
    #[error("Timeout awaiting invoked mapping tasks after {timeout_ms}ms")]
    InvokedTasksTimeout {
        /// The bound that was exceeded, in milliseconds.
        timeout_ms: u64,
    },

    /// The context's worker runtime was already shut down by an earlier run
    /// and has not been reset.
    #[error("Mapping worker runtime is not available; reset the mapping context")]
    WorkerUnavailable,
}

/// The mapping context could not be created or reset.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The worker runtime failed to start.
    #[error("Failed to build mapping worker runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// The requested worker count is invalid.
    #[error("Mapping worker runtime needs at least one worker thread")]
    NoWorkers,
}

/// Engine configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for [`crate::MappingEngineConfig`].
    #[error("Invalid mapping engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid mapping engine configuration: {message}")]
    Invalid {
        /// Which value and why.
        message: String,
    },
}
