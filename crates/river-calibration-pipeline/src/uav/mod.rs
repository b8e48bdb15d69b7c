//! UAV (nadir) calibration with a two-point scale line.
//!
//! ```
//! use river_calibration_core::{CanvasEdit, Pt2};
//! use river_calibration_pipeline::session::CalibrationSession;
//! use river_calibration_pipeline::uav::{self, UavWorkflow};
//!
//! let mut session = CalibrationSession::<UavWorkflow>::new();
//! let line = CanvasEdit {
//!     points: vec![Pt2::new(100.0, 100.0), Pt2::new(400.0, 100.0)],
//!     scale_factor: 1.0,
//!     point_index: None,
//! };
//! uav::set_pixel_points_canvas(&mut session, &line).unwrap();
//! uav::set_real_world_length(&mut session, 5.0).unwrap();
//! assert_eq!(session.state().pixel_size, 60.0);
//! ```

mod problem;
mod state;
mod steps;

pub use problem::{UavRequest, UavResponse, UavSolution, UavWorkflow};
pub use state::UavState;
pub use steps::{
    set_pixel_point_form, set_pixel_points_canvas, set_pixel_size, set_real_world_length,
    set_real_world_point_form, toggle_draw_line,
};
