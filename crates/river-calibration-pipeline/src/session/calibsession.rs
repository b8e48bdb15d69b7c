//! Calibration session container and solve gate.
//!
//! A session owns the editable state of one workflow, the last solution and
//! the bookkeeping that decides whether a submission must reach the
//! external solver. Step functions mutate the session in-place.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::types::{LogEntry, SessionMetadata};
use super::workflow::Workflow;
use crate::error::{CalibrationError, Result, SolverError};
use crate::solver::Solver;

/// Identifies one dispatched solve request.
///
/// Handed out by [`CalibrationSession::begin_solve`] and presented back to
/// [`CalibrationSession::complete_solve`] with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolveTicket {
    token: u64,
}

impl SolveTicket {
    pub fn token(&self) -> u64 {
        self.token
    }
}

/// A request the caller must send to the solver.
#[derive(Debug, Clone)]
pub struct PendingSolve<R> {
    pub ticket: SolveTicket,
    pub request: R,
}

/// Decision taken by [`CalibrationSession::begin_solve`].
#[derive(Debug, Clone)]
pub enum SolvePlan<R> {
    /// Nothing changed since the last successful solve.
    UpToDate,
    Dispatch(PendingSolve<R>),
}

/// Result of [`CalibrationSession::submit`].
#[derive(Debug, Clone)]
pub enum SolveOutcome<S> {
    /// The gate skipped the solver; carries the untouched current solution.
    Unchanged(Option<Arc<S>>),
    Solved(Arc<S>),
}

impl<S> SolveOutcome<S> {
    pub fn solution(&self) -> Option<&Arc<S>> {
        match self {
            Self::Unchanged(solution) => solution.as_ref(),
            Self::Solved(solution) => Some(solution),
        }
    }

    pub fn was_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }
}

#[derive(Debug, Clone)]
struct PendingRequest<R> {
    token: u64,
    edit_generation: u64,
    request: R,
}

/// A calibration session for one workflow.
///
/// # Gate
///
/// - Every committed edit replaces the state, drops the solution and marks
///   the session as changed.
/// - A submission with no change (and no drift reported by the workflow)
///   never reaches the solver and keeps the solution `Arc` as is.
/// - A solver error leaves state, solution and the changed flag untouched.
/// - A response is discarded if its ticket is not the pending one or if
///   edits were committed after the request was built.
///
/// # Example
///
/// ```
/// use river_calibration_core::{CanvasEdit, Pt2};
/// use river_calibration_pipeline::session::CalibrationSession;
/// use river_calibration_pipeline::solver::from_fn;
/// use river_calibration_pipeline::uav::{self, UavResponse, UavWorkflow};
/// # fn main() -> river_calibration_pipeline::error::Result<()> {
///
/// let mut session = CalibrationSession::<UavWorkflow>::new();
/// let line = CanvasEdit {
///     points: vec![Pt2::new(100.0, 100.0), Pt2::new(400.0, 100.0)],
///     scale_factor: 1.0,
///     point_index: None,
/// };
/// uav::set_pixel_points_canvas(&mut session, &line)?;
/// uav::set_real_world_length(&mut session, 5.0)?;
/// assert!(session.has_changed());
///
/// let mut solver = from_fn::<UavWorkflow, _>(|_request| {
///     Ok(UavResponse {
///         uav_matrix: Default::default(),
///         ortho_image: "ortho.png".into(),
///         output_resolution: 0.1,
///         extent: vec![0.0, 5.0, 0.0, 5.0],
///         width: None,
///         height: None,
///     })
/// });
/// let outcome = session.submit(&mut solver, &())?;
/// assert!(outcome.was_solved());
/// assert!(!session.has_changed());
///
/// // Nothing edited since: the solver is not called again.
/// assert!(!session.submit(&mut solver, &())?.was_solved());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "W: Workflow")]
pub struct CalibrationSession<W: Workflow> {
    /// Session metadata (workflow, schema version, timestamps, description).
    pub metadata: SessionMetadata,

    /// Configuration parameters (defaults if not explicitly set).
    pub config: W::Config,

    state: W::State,

    /// Last successful solve. `None` while stale.
    solution: Option<Arc<W::Solution>>,

    has_changed: bool,

    next_token: u64,

    edit_generation: u64,

    #[serde(skip)]
    pending: Option<PendingRequest<W::Request>>,

    /// Operation log (lightweight audit trail).
    pub log: Vec<LogEntry>,
}

impl<W: Workflow> CalibrationSession<W> {
    // ─────────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new session with default configuration and entry state.
    pub fn new() -> Self {
        Self::with_metadata(SessionMetadata::new(W::name(), W::schema_version()))
    }

    pub fn with_description(description: impl Into<String>) -> Self {
        Self::with_metadata(SessionMetadata::with_description(
            W::name(),
            W::schema_version(),
            description,
        ))
    }

    /// Create a session with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Workflow::validate_config`] fails.
    pub fn with_config(config: W::Config) -> Result<Self> {
        let mut session = Self::new();
        session.set_config(config)?;
        Ok(session)
    }

    fn with_metadata(metadata: SessionMetadata) -> Self {
        Self {
            metadata,
            config: W::Config::default(),
            state: W::State::default(),
            solution: None,
            has_changed: false,
            next_token: 0,
            edit_generation: 0,
            pending: None,
            log: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the configuration. Does not invalidate the solution.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Workflow::validate_config`] fails.
    pub fn set_config(&mut self, config: W::Config) -> Result<()> {
        W::validate_config(&config)?;
        self.config = config;
        self.metadata.touch();
        Ok(())
    }

    /// Update configuration with a closure, then validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails after the update; the previous
    /// configuration is kept in that case.
    pub fn update_config<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut W::Config),
    {
        let mut new_config = self.config.clone();
        f(&mut new_config);
        self.set_config(new_config)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> &W::State {
        &self.state
    }

    pub fn solution(&self) -> Option<&Arc<W::Solution>> {
        self.solution.as_ref()
    }

    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    /// Whether the state was edited since the last successful solve.
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// Whether a solve request is in flight.
    pub fn is_backend_working(&self) -> bool {
        self.pending.is_some()
    }

    /// Commit an edited state: drops the solution and marks the session
    /// as changed. Any in-flight response becomes stale.
    ///
    /// Fine-grained edits (drags, form fields) are not written to the
    /// operation log; see [`replace_state`](Self::replace_state).
    pub(crate) fn commit_state(&mut self, operation: &str, state: W::State) {
        self.state = state;
        self.solution = None;
        self.has_changed = true;
        self.edit_generation += 1;
        self.metadata.touch();
        debug!(
            "{}: {operation} committed (generation {})",
            W::name(),
            self.edit_generation
        );
    }

    /// [`commit_state`](Self::commit_state) for wholesale replacements
    /// (imports, resets, bulk selection), which are also logged.
    pub(crate) fn replace_state(&mut self, operation: &str, state: W::State) {
        self.commit_state(operation, state);
        self.log_success(operation);
    }

    /// Mutable access for presentation-only fields that do not feed the
    /// solver (active image, display toggles).
    pub(crate) fn state_mut_untracked(&mut self) -> &mut W::State {
        self.metadata.touch();
        &mut self.state
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Solve gate
    // ─────────────────────────────────────────────────────────────────────────

    /// Decide whether a solve is needed and, if so, build the request.
    ///
    /// # Errors
    ///
    /// - [`CalibrationError::Busy`] while another request is pending.
    /// - Whatever [`Workflow::validate_for_solve`] or
    ///   [`Workflow::build_request`] report. The session is untouched then.
    pub fn begin_solve(&mut self, opts: &W::SolveOptions) -> Result<SolvePlan<W::Request>> {
        if self.pending.is_some() {
            return Err(CalibrationError::Busy);
        }

        let drifted = W::input_drifted(&self.state, self.solution.as_deref(), opts);
        if !self.has_changed && !drifted {
            debug!("{}: nothing changed, skipping solve", W::name());
            return Ok(SolvePlan::UpToDate);
        }

        let request = W::validate_for_solve(&self.state, &self.config, opts)
            .and_then(|()| W::build_request(&self.state, &self.config, opts));
        let request = match request {
            Ok(request) => request,
            Err(err) => {
                self.log_failure("solve", err.to_string());
                return Err(err);
            }
        };

        self.next_token += 1;
        let ticket = SolveTicket {
            token: self.next_token,
        };
        debug!(
            "{}: dispatching solve #{} (changed: {}, drifted: {drifted})",
            W::name(),
            ticket.token,
            self.has_changed
        );
        self.pending = Some(PendingRequest {
            token: ticket.token,
            edit_generation: self.edit_generation,
            request: request.clone(),
        });
        Ok(SolvePlan::Dispatch(PendingSolve { ticket, request }))
    }

    /// Integrate the solver's answer to a dispatched request.
    ///
    /// # Errors
    ///
    /// - [`CalibrationError::StaleResponse`] if the ticket is not the pending
    ///   one (including after [`cancel_solve`](Self::cancel_solve)) or edits
    ///   were committed while the request was in flight.
    /// - [`CalibrationError::Solver`] if the solver failed.
    ///
    /// In every error case the state, the solution and the changed flag are
    /// left as they were.
    pub fn complete_solve(
        &mut self,
        ticket: SolveTicket,
        result: std::result::Result<W::Response, SolverError>,
    ) -> Result<Arc<W::Solution>> {
        let pending = match self.pending.take() {
            Some(pending) if pending.token == ticket.token => pending,
            other => {
                self.pending = other;
                warn!(
                    "{}: discarding response #{}, no matching request",
                    W::name(),
                    ticket.token
                );
                return Err(CalibrationError::StaleResponse {
                    token: ticket.token,
                });
            }
        };

        if pending.edit_generation != self.edit_generation {
            warn!(
                "{}: discarding response #{}, state was edited while solving",
                W::name(),
                ticket.token
            );
            self.log_failure("solve", "response arrived after newer edits");
            return Err(CalibrationError::StaleResponse {
                token: ticket.token,
            });
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!("{}: solver failed: {err}", W::name());
                self.log_failure("solve", err.to_string());
                return Err(err.into());
            }
        };

        match W::apply_response(&self.state, &pending.request, response) {
            Ok((state, solution)) => {
                let solution = Arc::new(solution);
                self.state = state;
                self.solution = Some(Arc::clone(&solution));
                self.has_changed = false;
                match W::solve_notes(&solution) {
                    Some(notes) => {
                        info!("{}: solve #{} committed, {notes}", W::name(), ticket.token);
                        self.log_success_with_notes("solve", notes);
                    }
                    None => {
                        info!("{}: solve #{} committed", W::name(), ticket.token);
                        self.log_success("solve");
                    }
                }
                Ok(solution)
            }
            Err(err) => {
                warn!("{}: could not apply response: {err}", W::name());
                self.log_failure("solve", err.to_string());
                Err(err)
            }
        }
    }

    /// Forget the pending request, if any. Its response will be discarded.
    ///
    /// Returns whether a request was pending.
    pub fn cancel_solve(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                debug!("{}: cancelled solve #{}", W::name(), pending.token);
                true
            }
            None => false,
        }
    }

    /// Run the gate and, if needed, the solver synchronously.
    ///
    /// # Errors
    ///
    /// See [`begin_solve`](Self::begin_solve) and
    /// [`complete_solve`](Self::complete_solve).
    pub fn submit<S>(
        &mut self,
        solver: &mut S,
        opts: &W::SolveOptions,
    ) -> Result<SolveOutcome<W::Solution>>
    where
        S: Solver<W> + ?Sized,
    {
        match self.begin_solve(opts)? {
            SolvePlan::UpToDate => Ok(SolveOutcome::Unchanged(self.solution.clone())),
            SolvePlan::Dispatch(PendingSolve { ticket, request }) => {
                let result = solver.solve(&request);
                self.complete_solve(ticket, result).map(SolveOutcome::Solved)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Logging
    // ─────────────────────────────────────────────────────────────────────────

    pub fn log_success(&mut self, operation: impl Into<String>) {
        self.log.push(LogEntry::success(operation));
        self.metadata.touch();
    }

    pub fn log_success_with_notes(
        &mut self,
        operation: impl Into<String>,
        notes: impl Into<String>,
    ) {
        self.log.push(LogEntry::success_with_notes(operation, notes));
        self.metadata.touch();
    }

    pub fn log_failure(&mut self, operation: impl Into<String>, error: impl Into<String>) {
        self.log.push(LogEntry::failure(operation, error));
        self.metadata.touch();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reset
    // ─────────────────────────────────────────────────────────────────────────

    /// Return to the workflow's entry defaults, keeping config and
    /// description. Drops any pending request.
    pub fn reset(&mut self) {
        self.state = W::State::default();
        self.solution = None;
        self.has_changed = false;
        self.edit_generation += 1;
        self.pending = None;
        self.log.clear();
        self.metadata.touch();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize session to JSON string. A pending request is not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Deserialize session from JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Deserialization fails
    /// - Schema version is newer than supported
    /// - The session was saved by another workflow
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let session: Self = serde_json::from_str(json)?;

        if session.metadata.schema_version > W::schema_version() {
            anyhow::bail!(
                "session schema version {} is newer than supported version {}",
                session.metadata.schema_version,
                W::schema_version()
            );
        }
        if session.metadata.workflow != W::name() {
            anyhow::bail!(
                "session belongs to workflow '{}', expected '{}'",
                session.metadata.workflow,
                W::name()
            );
        }

        Ok(session)
    }
}

impl<W: Workflow> Default for CalibrationSession<W> {
    fn default() -> Self {
        Self::new()
    }
}
