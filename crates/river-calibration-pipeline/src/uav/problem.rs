//! [`Workflow`] implementation for the UAV scale workflow.

use river_calibration_core::{PixelTransform, Pt2, Real};
use serde::{Deserialize, Serialize};

use crate::error::{CalibrationError, Result};
use crate::session::Workflow;

use super::state::UavState;

/// Nadir footage calibrated with a single scale line.
#[derive(Debug, Clone)]
pub struct UavWorkflow;

/// Request sent to the scale solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UavRequest {
    pub dir_points: [Pt2; 2],
    pub rw_points: [Pt2; 2],
    pub pixel_size: Real,
    pub rw_length: Real,
}

/// Successful answer of the scale solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UavResponse {
    pub uav_matrix: PixelTransform,
    pub ortho_image: String,
    #[serde(rename = "output_resolution")]
    pub output_resolution: Real,
    pub extent: Vec<Real>,
    /// Orthoimage size in pixels, when the solver reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UavSolution {
    pub ortho_image: String,
    pub extent: Vec<Real>,
    pub resolution: Real,
    /// Second scale-line endpoint mapped to real-world coordinates.
    pub second_point: Pt2,
    pub width: u32,
    pub height: u32,
    pub transform: PixelTransform,
}

impl Workflow for UavWorkflow {
    type Config = ();
    type State = UavState;
    type SolveOptions = ();
    type Request = UavRequest;
    type Response = UavResponse;
    type Solution = UavSolution;

    fn name() -> &'static str {
        "uav"
    }

    fn validate_for_solve(state: &UavState, _config: &(), _opts: &()) -> Result<()> {
        if state.pixel_points.is_none() {
            return Err(CalibrationError::validation("no scale line drawn"));
        }
        if !(state.rw_length > 0.0 && state.pixel_size > 0.0) {
            return Err(CalibrationError::validation(format!(
                "scale line needs a positive length and pixel size (length {}, pixel size {})",
                state.rw_length, state.pixel_size
            )));
        }
        Ok(())
    }

    fn build_request(state: &UavState, _config: &(), _opts: &()) -> Result<UavRequest> {
        let dir_points = state
            .pixel_points
            .ok_or_else(|| CalibrationError::validation("no scale line drawn"))?;
        Ok(UavRequest {
            dir_points,
            rw_points: state.real_world_points,
            pixel_size: state.pixel_size,
            rw_length: state.rw_length,
        })
    }

    fn apply_response(
        state: &UavState,
        request: &UavRequest,
        response: UavResponse,
    ) -> Result<(UavState, UavSolution)> {
        let second_point = response
            .uav_matrix
            .pixel_to_real_world(&request.dir_points[1]);
        let solution = UavSolution {
            ortho_image: response.ortho_image,
            extent: response.extent,
            resolution: response.output_resolution,
            second_point,
            width: response.width.unwrap_or(0),
            height: response.height.unwrap_or(0),
            transform: response.uav_matrix,
        };
        Ok((state.clone(), solution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_wire_names() {
        let request = UavRequest {
            dir_points: [Pt2::new(100.0, 100.0), Pt2::new(400.0, 100.0)],
            rw_points: [Pt2::new(0.0, 0.0), Pt2::new(5.0, 0.0)],
            pixel_size: 60.0,
            rw_length: 5.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["dirPoints"][1], serde_json::json!([400.0, 100.0]));
        assert_eq!(json["rwLength"], 5.0);
        assert_eq!(json["pixelSize"], 60.0);
    }

    #[test]
    fn response_keeps_snake_case_resolution() {
        let json = r#"{
            "uavMatrix": [[0.1, 0, -10], [0, 0.1, -10], [0, 0, 1]],
            "orthoImage": "/tmp/ortho.png",
            "output_resolution": 0.1,
            "extent": [0, 5, 0, 5]
        }"#;
        let response: UavResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.output_resolution, 0.1);
        assert!(response.uav_matrix.is_affine());
        assert!(response.width.is_none());
    }

    #[test]
    fn solution_maps_second_point() {
        let request = UavRequest {
            dir_points: [Pt2::new(100.0, 100.0), Pt2::new(400.0, 100.0)],
            rw_points: [Pt2::new(0.0, 0.0), Pt2::new(5.0, 0.0)],
            pixel_size: 60.0,
            rw_length: 5.0,
        };
        let s = 1.0 / 60.0;
        let response = UavResponse {
            uav_matrix: PixelTransform::from_rows([
                [s, 0.0, -100.0 * s],
                [0.0, s, -100.0 * s],
                [0.0, 0.0, 1.0],
            ]),
            ortho_image: "ortho.png".to_string(),
            output_resolution: s,
            extent: vec![0.0, 5.0, 0.0, 5.0],
            width: Some(300),
            height: None,
        };
        let (_, solution) =
            UavWorkflow::apply_response(&UavState::default(), &request, response).unwrap();

        assert!((solution.second_point.x - 5.0).abs() < 1e-9);
        assert!(solution.second_point.y.abs() < 1e-9);
        assert_eq!(solution.width, 300);
        assert_eq!(solution.height, 0);
    }
}
