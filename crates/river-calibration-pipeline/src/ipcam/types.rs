//! Point and solver wire types of the fixed-camera workflow.

use river_calibration_core::{ImportedPoint, Pt2, Pt3, Real};
use serde::{Deserialize, Serialize};

/// Uncertainty ellipse of a reprojected point, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: [Real; 2],
    /// Major axis length.
    pub width: Real,
    /// Minor axis length.
    pub height: Real,
    /// Rotation in radians.
    pub angle: Real,
}

/// A ground control point with its real-world and pixel coordinates.
///
/// Serialized with the field names the camera solver expects
/// (`X`, `Y`, `Z` real-world, `x`, `y` pixel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcamPoint {
    pub label: String,
    #[serde(rename = "X")]
    pub world_x: Real,
    #[serde(rename = "Y")]
    pub world_y: Real,
    #[serde(rename = "Z")]
    pub world_z: Real,
    pub x: Real,
    pub y: Real,
    pub selected: bool,
    /// Whether the pixel position was placed by the user or imported.
    pub was_established: bool,
    /// Index of the frame the pixel position was picked on.
    #[serde(default)]
    pub image: Option<usize>,
    #[serde(default)]
    pub ellipse: Option<Ellipse>,
    #[serde(default)]
    pub projected_point: Option<[Real; 2]>,
}

impl IpcamPoint {
    pub fn world(&self) -> Pt3 {
        Pt3::new(self.world_x, self.world_y, self.world_z)
    }

    pub fn pixel(&self) -> Pt2 {
        Pt2::new(self.x, self.y)
    }

    pub(crate) fn clear_solver_output(&mut self) {
        self.ellipse = None;
        self.projected_point = None;
    }
}

impl From<ImportedPoint> for IpcamPoint {
    /// Imported points start selected; a point is established when the
    /// table carried its pixel position.
    fn from(p: ImportedPoint) -> Self {
        let pixel = p.pixel.unwrap_or_else(Pt2::origin);
        Self {
            label: p.label,
            world_x: p.world.x,
            world_y: p.world.y,
            world_z: p.world.z,
            x: pixel.x,
            y: pixel.y,
            selected: true,
            was_established: p.pixel.is_some(),
            image: None,
            ellipse: None,
            projected_point: None,
        }
    }
}

/// How the camera solver treats the selected points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveMode {
    /// Pose from all selected points, no outlier rejection.
    #[serde(rename = "direct-solve")]
    DirectSolve,
    /// Optimization that may pick its own subset of points.
    #[serde(rename = "optimize-solution")]
    OptimizeSolution,
}

impl SolveMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DirectSolve => "direct-solve",
            Self::OptimizeSolution => "optimize-solution",
        }
    }
}

impl std::fmt::Display for SolveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SolveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct-solve" => Ok(Self::DirectSolve),
            "optimize-solution" => Ok(Self::OptimizeSolution),
            other => Err(format!(
                "unknown solve mode '{other}' (expected direct-solve or optimize-solution)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcamRequest {
    pub points: Vec<IpcamPoint>,
    pub mode: SolveMode,
}

/// Successful answer of the camera solver.
///
/// The per-point arrays are indexed like the request's point list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcamResponse {
    pub ortho_image_path: String,
    pub ortho_extent: Vec<Real>,
    pub reprojection_errors: Vec<Real>,
    pub mean_error: Real,
    pub camera_position: [Real; 3],
    pub camera_matrix: [[Real; 4]; 3],
    #[serde(default)]
    pub uncertainty_ellipses: Option<Vec<Option<Ellipse>>>,
    #[serde(default)]
    pub projected_points: Option<Vec<Option<[Real; 2]>>>,
    #[serde(default)]
    pub point_indices: Option<Vec<usize>>,
    #[serde(default)]
    pub num_points: Option<usize>,
}

impl IpcamResponse {
    pub fn ellipse_at(&self, index: usize) -> Option<Ellipse> {
        self.uncertainty_ellipses
            .as_ref()
            .and_then(|all| all.get(index).cloned().flatten())
    }

    pub fn projected_point_at(&self, index: usize) -> Option<[Real; 2]> {
        self.projected_points
            .as_ref()
            .and_then(|all| all.get(index).copied().flatten())
    }
}

/// Summary of a camera solve, kept by the session.
///
/// Per-point output (ellipses, projected points) lives on the points only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSolution {
    pub ortho_image_path: String,
    pub ortho_extent: Vec<Real>,
    pub reprojection_errors: Vec<Real>,
    pub mean_error: Real,
    pub camera_position: [Real; 3],
    pub camera_matrix: [[Real; 4]; 3],
    pub mode: SolveMode,
    /// Number of points the solve used.
    pub num_points: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_indices: Option<Vec<usize>>,
}

impl CameraSolution {
    /// Keep the summary fields of a response, dropping per-point payloads.
    pub fn from_response(response: IpcamResponse, mode: SolveMode, num_points: usize) -> Self {
        Self {
            ortho_image_path: response.ortho_image_path,
            ortho_extent: response.ortho_extent,
            reprojection_errors: response.reprojection_errors,
            mean_error: response.mean_error,
            camera_position: response.camera_position,
            camera_matrix: response.camera_matrix,
            mode,
            num_points,
            point_indices: response.point_indices,
        }
    }
}
