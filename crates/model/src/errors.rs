//! Error types for the model ports.
//!
//! [`PathParseError`] is produced when a textual model path cannot be parsed.
//! [`ProcessError`] is the only error a domain tree walk can produce: it wraps
//! whatever failure a [`crate::Processor`] raised, tagged with the path at
//! which it happened.

use thiserror::Error;

/// A textual model path could not be parsed into a [`crate::ModelPath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathParseError {
    /// The input string was empty.
    #[error("model path is empty")]
    Empty,

    /// One dot-separated segment was malformed.
    #[error("invalid segment '{segment}' in model path '{path}': {reason}")]
    InvalidSegment {
        /// The full input string.
        path: String,
        /// The offending segment.
        segment: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// A processor aborted the walk of a model object tree.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The processor failed while handling the node at `path`.
    #[error("processing failed at {path}: {source:#}")]
    Aborted {
        /// Rendered path of the node being processed.
        path: String,
        /// The processor's own failure.
        source: anyhow::Error,
    },
}

impl ProcessError {
    /// Wraps `source` as a failure at `path`.
    pub fn aborted(path: &crate::ModelPath, source: anyhow::Error) -> Self {
        Self::Aborted {
            path: path.build_path(),
            source,
        }
    }
}
