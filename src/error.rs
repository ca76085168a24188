//! Crate-level error type and `Result` alias for structured error handling.
//! Parameter validation failures, collaborator shape violations, and errors raised
//! by the filler, signal provider, or truncator each get their own variant.
use thiserror::Error;

use crate::types::Stage;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by collaborator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid parameter: {arg}={value}")]
    InvalidParameter { arg: &'static str, value: String },

    #[error("Shape mismatch after {stage}: expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        stage: Stage,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Signal provider returned {found} scales, expected {expected}")]
    ScaleCountMismatch { expected: usize, found: usize },

    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub fn invalid<V: std::fmt::Display>(arg: &'static str, value: V) -> Self {
        Error::InvalidParameter {
            arg,
            value: value.to_string(),
        }
    }

    pub fn collaborator(stage: Stage, source: BoxError) -> Self {
        Error::Collaborator { stage, source }
    }

    /// The pipeline phase this error originated from, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::ShapeMismatch { stage, .. } | Error::Collaborator { stage, .. } => Some(*stage),
            Error::ScaleCountMismatch { .. } => Some(Stage::Analyze),
            Error::InvalidParameter { .. } => None,
        }
    }
}
