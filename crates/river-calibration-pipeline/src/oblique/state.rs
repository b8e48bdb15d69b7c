//! Editable state of the oblique four-point workflow.

use river_calibration_core::{Distances, Pt2};
use serde::{Deserialize, Serialize};

/// Four control corners and their six measured distances.
///
/// Corners follow the fixed order top-left, top-right, bottom-right,
/// bottom-left; the distance names refer to that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObliqueState {
    pub draw_points: bool,

    pub pixel_corners: [Pt2; 4],

    /// Real-world corners. Set by hand in the form or mapped back after a
    /// successful solve.
    pub real_world_corners: [Pt2; 4],

    pub distances: Distances,

    /// True until a quad has been drawn or edited.
    pub is_default_coordinates: bool,

    pub is_distances_loaded: bool,
}

impl ObliqueState {
    pub(crate) fn default_corners() -> [Pt2; 4] {
        [Pt2::origin(); 4]
    }
}

impl Default for ObliqueState {
    fn default() -> Self {
        Self {
            draw_points: false,
            pixel_corners: Self::default_corners(),
            real_world_corners: Self::default_corners(),
            distances: Distances::default(),
            is_default_coordinates: true,
            is_distances_loaded: false,
        }
    }
}
