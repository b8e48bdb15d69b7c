//! Editable state of the UAV scale workflow.

use river_calibration_core::{Pt2, Real};
use serde::{Deserialize, Serialize};

/// Two-point scale line drawn on a nadir frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UavState {
    /// Whether the scale line is shown on the canvas.
    pub draw_line: bool,

    /// Pixel endpoints of the scale line. `None` until drawn.
    pub pixel_points: Option<[Pt2; 2]>,

    /// Real-world endpoints, laid along the X axis unless edited by hand.
    pub real_world_points: [Pt2; 2],

    /// Pixels per real-world unit.
    pub pixel_size: Real,

    /// Real-world length of the scale line.
    pub rw_length: Real,
}

impl Default for UavState {
    fn default() -> Self {
        Self {
            draw_line: false,
            pixel_points: None,
            real_world_points: [Pt2::origin(), Pt2::origin()],
            pixel_size: 0.0,
            rw_length: 0.0,
        }
    }
}
