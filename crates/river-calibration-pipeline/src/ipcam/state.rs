//! Editable state of the fixed-camera workflow.

use river_calibration_core::ZLimits;
use serde::{Deserialize, Serialize};

use super::types::IpcamPoint;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcamState {
    /// File the points were imported from.
    pub points_path: Option<String>,

    /// Control points. Empty until imported.
    pub points: Vec<IpcamPoint>,

    pub images_path: Option<String>,

    /// Frames available for picking pixel positions.
    pub images: Vec<String>,

    pub active_image: Option<usize>,

    pub active_point: Option<usize>,

    /// Number of selected points. Kept in step with `points`.
    pub selected_counter: usize,

    pub z_limits: ZLimits,
}
