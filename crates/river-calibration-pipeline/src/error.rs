//! Error types shared by all calibration workflows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by an external solver in its `{ "error": { "message" } }`
/// envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct SolverError {
    pub message: String,
}

impl SolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// Malformed input rejected before any state was touched.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The two points of a scale line would coincide.
    #[error("scale line endpoints coincide at ({x}, {y})")]
    DegenerateScaleLine { x: f64, y: f64 },

    #[error("need at least {required} selected points, got {selected}")]
    NotEnoughPoints { required: usize, selected: usize },

    /// The solver answered with an error. Prior state is left untouched.
    #[error("solver failed: {0}")]
    Solver(#[from] SolverError),

    /// The response belongs to a request that is no longer current.
    #[error("discarded response for solve request #{token}")]
    StaleResponse { token: u64 },

    #[error("a solve request is already in progress")]
    Busy,
}

impl CalibrationError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T, E = CalibrationError> = std::result::Result<T, E>;
