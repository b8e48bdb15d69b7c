//! The seam to the external numerical solvers.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::error::SolverError;
use crate::session::Workflow;

/// An external solver for one workflow.
///
/// Called synchronously by [`CalibrationSession::submit`]. Asynchronous
/// callers use [`CalibrationSession::begin_solve`] and
/// [`CalibrationSession::complete_solve`] instead.
///
/// [`CalibrationSession::submit`]: crate::session::CalibrationSession::submit
/// [`CalibrationSession::begin_solve`]: crate::session::CalibrationSession::begin_solve
/// [`CalibrationSession::complete_solve`]: crate::session::CalibrationSession::complete_solve
pub trait Solver<W: Workflow> {
    fn solve(&mut self, request: &W::Request) -> Result<W::Response, SolverError>;
}

/// Solver backed by a closure. See [`from_fn`].
pub struct FnSolver<W, F> {
    f: F,
    _workflow: PhantomData<fn() -> W>,
}

/// Wrap a closure as a [`Solver`].
///
/// ```
/// use river_calibration_pipeline::error::SolverError;
/// use river_calibration_pipeline::solver::{Solver, from_fn};
/// use river_calibration_pipeline::uav::{UavRequest, UavWorkflow};
///
/// let mut solver = from_fn::<UavWorkflow, _>(|_req| Err(SolverError::new("offline")));
/// # let req: UavRequest = serde_json::from_str(
/// #     r#"{"dirPoints":[[0,0],[1,0]],"rwPoints":[[0,0],[1,0]],"pixelSize":1,"rwLength":1}"#,
/// # ).unwrap();
/// assert!(solver.solve(&req).is_err());
/// ```
pub fn from_fn<W, F>(f: F) -> FnSolver<W, F>
where
    W: Workflow,
    F: FnMut(&W::Request) -> Result<W::Response, SolverError>,
{
    FnSolver {
        f,
        _workflow: PhantomData,
    }
}

impl<W, F> Solver<W> for FnSolver<W, F>
where
    W: Workflow,
    F: FnMut(&W::Request) -> Result<W::Response, SolverError>,
{
    fn solve(&mut self, request: &W::Request) -> Result<W::Response, SolverError> {
        (self.f)(request)
    }
}

/// The JSON envelope every solver answers with: either
/// `{ "error": { "message": ... } }` or the response body itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SolverReply<T> {
    Failure { error: SolverError },
    Success(T),
}

impl<T> SolverReply<T> {
    pub fn into_result(self) -> Result<T, SolverError> {
        match self {
            Self::Failure { error } => Err(error),
            Self::Success(value) => Ok(value),
        }
    }
}

impl<T> From<SolverReply<T>> for Result<T, SolverError> {
    fn from(reply: SolverReply<T>) -> Self {
        reply.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Body {
        extent: Vec<f64>,
        #[serde(default)]
        error: Option<SolverError>,
    }

    #[test]
    fn reply_with_error_is_failure() {
        let json = r#"{"error": {"message": "not enough points"}}"#;
        let reply: SolverReply<Body> = serde_json::from_str(json).unwrap();
        let err = reply.into_result().unwrap_err();
        assert_eq!(err.message, "not enough points");
    }

    #[test]
    fn reply_without_error_is_success() {
        let json = r#"{"extent": [0.0, 10.0, 0.0, 5.0]}"#;
        let reply: SolverReply<Body> = serde_json::from_str(json).unwrap();
        let body = reply.into_result().unwrap();
        assert_eq!(body.extent, vec![0.0, 10.0, 0.0, 5.0]);
    }

    #[test]
    fn null_error_field_is_success() {
        let json = r#"{"extent": [1.0], "error": null}"#;
        let result: Result<Body, SolverError> =
            serde_json::from_str::<SolverReply<Body>>(json).unwrap().into();
        assert!(result.is_ok());
    }
}
