//! Fixed-camera (IP camera) calibration from surveyed 3D control points.
//!
//! Points are imported in bulk, placed on frames one by one and selected for
//! the external camera solver. The solver either uses the selection as is
//! ([`SolveMode::DirectSolve`]) or picks its own subset
//! ([`SolveMode::OptimizeSolution`]); [`merge_camera_solution`] folds either
//! answer back into the points.

mod merge;
mod problem;
mod selection;
mod state;
mod steps;
mod types;

pub use merge::{Merged, merge_camera_solution};
pub use problem::{IpcamConfig, IpcamWorkflow};
pub use selection::{BulkSelection, infer_bulk_selection};
pub use state::IpcamState;
pub use steps::{
    PointEdit, apply_bulk_selection, edit_point, import_points, set_active_image, set_images,
    toggle_point,
};
pub use types::{CameraSolution, Ellipse, IpcamPoint, IpcamRequest, IpcamResponse, SolveMode};
