//! Calibration session framework.
//!
//! A [`CalibrationSession`] is a mutable state container for one
//! [`Workflow`]. Step functions in the workflow modules edit it in place;
//! every committed edit marks it stale, and [`CalibrationSession::submit`]
//! (or the split [`begin_solve`](CalibrationSession::begin_solve) /
//! [`complete_solve`](CalibrationSession::complete_solve) pair for
//! asynchronous callers) decides whether the external solver must run.

pub mod calibsession;
pub mod types;
pub mod workflow;

pub use calibsession::{CalibrationSession, PendingSolve, SolveOutcome, SolvePlan, SolveTicket};
pub use types::{LogEntry, SessionMetadata, current_timestamp};
pub use workflow::Workflow;
