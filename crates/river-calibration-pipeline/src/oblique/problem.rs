//! [`Workflow`] implementation for the oblique homography workflow.

use river_calibration_core::{Distances, PixelTransform, Pt2, Real};
use serde::{Deserialize, Serialize};

use crate::error::{CalibrationError, Result};
use crate::session::Workflow;

use super::state::ObliqueState;

/// Oblique footage rectified with a planar homography.
#[derive(Debug, Clone)]
pub struct ObliqueWorkflow;

/// Per-submission options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObliqueSolveOptions {
    /// Distances as currently shown in the entry form. `None` uses the
    /// stored ones. Values that differ from the stored distances force a
    /// solve even when nothing else was edited.
    pub distances: Option<Distances>,
}

impl ObliqueSolveOptions {
    pub fn with_distances(distances: Distances) -> Self {
        Self {
            distances: Some(distances),
        }
    }

    fn resolve(&self, state: &ObliqueState) -> Distances {
        self.distances.unwrap_or(state.distances)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObliqueRequest {
    pub coordinates: [Pt2; 4],
    pub distances: Distances,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObliqueResponse {
    pub oblique_matrix: PixelTransform,
    pub extent: Vec<Real>,
    pub resolution: Real,
    pub roi: Vec<Real>,
    pub ortho_image: String,
    /// Orthoimage size in pixels, when the solver reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObliqueSolution {
    pub ortho_image: String,
    pub extent: Vec<Real>,
    pub resolution: Real,
    pub roi: Vec<Real>,
    pub width: u32,
    pub height: u32,
    pub transform: PixelTransform,
}

impl Workflow for ObliqueWorkflow {
    type Config = ();
    type State = ObliqueState;
    type SolveOptions = ObliqueSolveOptions;
    type Request = ObliqueRequest;
    type Response = ObliqueResponse;
    type Solution = ObliqueSolution;

    fn name() -> &'static str {
        "oblique"
    }

    fn validate_for_solve(
        state: &ObliqueState,
        _config: &(),
        opts: &ObliqueSolveOptions,
    ) -> Result<()> {
        if state.is_default_coordinates {
            return Err(CalibrationError::validation("no control quad drawn"));
        }
        if let Some(key) = opts.resolve(state).first_invalid() {
            return Err(CalibrationError::validation(format!(
                "distance {} must be a non-negative number",
                key.name()
            )));
        }
        Ok(())
    }

    fn input_drifted(
        state: &ObliqueState,
        _solution: Option<&ObliqueSolution>,
        opts: &ObliqueSolveOptions,
    ) -> bool {
        opts.distances
            .is_some_and(|form| form.differs_from(&state.distances))
    }

    fn build_request(
        state: &ObliqueState,
        _config: &(),
        opts: &ObliqueSolveOptions,
    ) -> Result<ObliqueRequest> {
        Ok(ObliqueRequest {
            coordinates: state.pixel_corners,
            distances: opts.resolve(state),
        })
    }

    fn apply_response(
        state: &ObliqueState,
        request: &ObliqueRequest,
        response: ObliqueResponse,
    ) -> Result<(ObliqueState, ObliqueSolution)> {
        let transform = response.oblique_matrix;
        let mut state = state.clone();
        state.distances = request.distances;
        state.is_distances_loaded = true;
        state.real_world_corners = request
            .coordinates
            .map(|corner| transform.pixel_to_real_world(&corner));

        let solution = ObliqueSolution {
            ortho_image: response.ortho_image,
            extent: response.extent,
            resolution: response.resolution,
            roi: response.roi,
            width: response.width.unwrap_or(0),
            height: response.height.unwrap_or(0),
            transform,
        };
        Ok((state, solution))
    }
}
