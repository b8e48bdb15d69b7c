//! Oblique calibration: four ground control corners, six measured
//! distances and a planar homography computed by the external solver.

mod problem;
mod state;
mod steps;

pub use problem::{
    ObliqueRequest, ObliqueResponse, ObliqueSolution, ObliqueSolveOptions, ObliqueWorkflow,
};
pub use state::ObliqueState;
pub use steps::{
    clear_distances, draw_quad, import_distances, move_corners, set_pixel_corner_form,
    set_real_world_corner_form, toggle_draw_points,
};
