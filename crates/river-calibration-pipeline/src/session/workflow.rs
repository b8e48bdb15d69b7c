//! Workflow trait for calibration sessions.
//!
//! Defines the minimal interface a calibration mode implements to work with
//! [`CalibrationSession`](super::CalibrationSession).

use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

use crate::error::Result;

/// One calibration mode (UAV, Oblique, Ipcam).
///
/// Edits are step functions operating on `&mut CalibrationSession<Self>`;
/// the trait only describes what the solve gate needs: how to turn the
/// current state into a solver request and how to fold a response back in.
///
/// # Associated Types
///
/// - **Config**: tunables such as point-count thresholds (`()` if none)
/// - **State**: the editable point model of the mode
/// - **SolveOptions**: per-submission arguments (solve mode, form values)
/// - **Request** / **Response**: the external solver's wire types
/// - **Solution**: what the session keeps after a successful solve
pub trait Workflow: Sized + 'static {
    type Config: Clone + Default + Serialize + DeserializeOwned + Debug;

    type State: Clone + Default + Serialize + DeserializeOwned + Debug;

    type SolveOptions: Clone + Debug;

    type Request: Clone + Serialize + DeserializeOwned + Debug;

    type Response: Clone + Serialize + DeserializeOwned + Debug;

    type Solution: Clone + Serialize + DeserializeOwned + Debug;

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    /// Stable snake_case identifier, e.g. `"oblique"`.
    fn name() -> &'static str;

    /// Schema version of the serialized session.
    ///
    /// Sessions with a newer version than this are rejected on load.
    fn schema_version() -> u32 {
        1
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hooks
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_config(_config: &Self::Config) -> Result<()> {
        Ok(())
    }

    /// Check that the state can be sent to the solver.
    ///
    /// Only called when the gate decided a solve is needed.
    fn validate_for_solve(
        _state: &Self::State,
        _config: &Self::Config,
        _opts: &Self::SolveOptions,
    ) -> Result<()> {
        Ok(())
    }

    /// Whether the submission differs from what the current solution was
    /// computed from in a way the edit tracking cannot see.
    ///
    /// A drifted submission is solved even when nothing was edited.
    fn input_drifted(
        _state: &Self::State,
        _solution: Option<&Self::Solution>,
        _opts: &Self::SolveOptions,
    ) -> bool {
        false
    }

    fn build_request(
        state: &Self::State,
        config: &Self::Config,
        opts: &Self::SolveOptions,
    ) -> Result<Self::Request>;

    /// Summary recorded in the operation log when a solve is committed.
    fn solve_notes(_solution: &Self::Solution) -> Option<String> {
        None
    }

    /// Fold a successful response into a new state and solution.
    ///
    /// Must not have side effects: the session commits both or neither.
    fn apply_response(
        state: &Self::State,
        request: &Self::Request,
        response: Self::Response,
    ) -> Result<(Self::State, Self::Solution)>;
}
