//! Interactive calibration sessions for river footage.
//!
//! Three mutually exclusive workflows establish the pixel to real-world
//! correspondence of a video:
//!
//! - [`uav`]: a two-point scale line on nadir footage,
//! - [`oblique`]: four control corners plus six measured distances,
//! - [`ipcam`]: N surveyed 3D points for a full camera pose.
//!
//! Each workflow is a [`Workflow`] driven through a [`CalibrationSession`].
//! Step functions edit the session; every committed edit marks it stale and
//! drops the previous solution. Submitting runs the external solver only
//! when something changed, and integrates its answer atomically.
//!
//! ```
//! use river_calibration_core::{Distances, Pt2};
//! use river_calibration_pipeline::oblique::{
//!     self, ObliqueResponse, ObliqueSolveOptions, ObliqueWorkflow,
//! };
//! use river_calibration_pipeline::{CalibrationSession, solver::from_fn};
//! # fn main() -> river_calibration_pipeline::error::Result<()> {
//!
//! let mut session = CalibrationSession::<ObliqueWorkflow>::new();
//! oblique::draw_quad(&mut session, Pt2::new(0.0, 0.0), Pt2::new(100.0, 50.0), 640.0, 480.0, 1.0);
//! let measured = Distances::from_corners(&session.state().pixel_corners);
//! oblique::import_distances(&mut session, measured)?;
//!
//! let mut solver = from_fn::<ObliqueWorkflow, _>(|_request| {
//!     Ok(ObliqueResponse {
//!         oblique_matrix: Default::default(),
//!         extent: vec![0.0, 100.0, 0.0, 50.0],
//!         resolution: 1.0,
//!         roi: vec![0.0, 0.0, 100.0, 50.0],
//!         ortho_image: "ortho.png".into(),
//!         width: None,
//!         height: None,
//!     })
//! });
//! session.submit(&mut solver, &ObliqueSolveOptions::default())?;
//! assert_eq!(session.state().real_world_corners[2], Pt2::new(100.0, 50.0));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod session;
pub mod solver;

pub mod ipcam;
pub mod oblique;
pub mod uav;

pub use error::{CalibrationError, SolverError};
pub use session::{CalibrationSession, SolveOutcome, SolvePlan, SolveTicket, Workflow};
pub use solver::{Solver, SolverReply};
