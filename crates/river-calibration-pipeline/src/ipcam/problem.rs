//! [`Workflow`] implementation for the fixed-camera (3D pose) workflow.

use serde::{Deserialize, Serialize};

use crate::error::{CalibrationError, Result};
use crate::session::Workflow;

use super::merge::merge_camera_solution;
use super::selection::count_selected;
use super::state::IpcamState;
use super::types::{CameraSolution, IpcamRequest, IpcamResponse, SolveMode};

/// Fixed camera calibrated from N surveyed control points.
#[derive(Debug, Clone)]
pub struct IpcamWorkflow;

/// Minimum number of selected points per solve mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcamConfig {
    pub min_direct_points: usize,
    pub min_optimize_points: usize,
}

impl Default for IpcamConfig {
    fn default() -> Self {
        Self {
            min_direct_points: 6,
            min_optimize_points: 7,
        }
    }
}

impl IpcamConfig {
    pub fn min_points(&self, mode: SolveMode) -> usize {
        match mode {
            SolveMode::DirectSolve => self.min_direct_points,
            SolveMode::OptimizeSolution => self.min_optimize_points,
        }
    }
}

impl Workflow for IpcamWorkflow {
    type Config = IpcamConfig;
    type State = IpcamState;
    type SolveOptions = SolveMode;
    type Request = IpcamRequest;
    type Response = IpcamResponse;
    type Solution = CameraSolution;

    fn name() -> &'static str {
        "ipcam"
    }

    fn validate_config(config: &IpcamConfig) -> Result<()> {
        if config.min_direct_points == 0 || config.min_optimize_points == 0 {
            return Err(CalibrationError::validation(
                "point thresholds must be at least 1",
            ));
        }
        Ok(())
    }

    fn validate_for_solve(
        state: &IpcamState,
        config: &IpcamConfig,
        mode: &SolveMode,
    ) -> Result<()> {
        let required = config.min_points(*mode);
        let selected = count_selected(&state.points);
        if selected < required {
            return Err(CalibrationError::NotEnoughPoints { required, selected });
        }
        Ok(())
    }

    /// A request for another mode than the current solution's is a new solve.
    fn input_drifted(
        _state: &IpcamState,
        solution: Option<&CameraSolution>,
        mode: &SolveMode,
    ) -> bool {
        solution.is_some_and(|s| s.mode != *mode)
    }

    fn build_request(
        state: &IpcamState,
        _config: &IpcamConfig,
        mode: &SolveMode,
    ) -> Result<IpcamRequest> {
        Ok(IpcamRequest {
            points: state.points.clone(),
            mode: *mode,
        })
    }

    fn solve_notes(solution: &CameraSolution) -> Option<String> {
        Some(format!(
            "{}: {} points, mean error {:.3} px",
            solution.mode, solution.num_points, solution.mean_error
        ))
    }

    fn apply_response(
        state: &IpcamState,
        request: &IpcamRequest,
        response: IpcamResponse,
    ) -> Result<(IpcamState, CameraSolution)> {
        let merged = merge_camera_solution(&state.points, &response, request.mode);

        let mut state = state.clone();
        state.points = merged.points;
        state.selected_counter = count_selected(&state.points);

        let solution = CameraSolution::from_response(response, request.mode, merged.num_points);
        Ok((state, solution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipcam::types::IpcamPoint;

    fn state_with(selected: usize, total: usize) -> IpcamState {
        let points = (0..total)
            .map(|i| IpcamPoint {
                label: format!("P{i}"),
                world_x: 0.0,
                world_y: 0.0,
                world_z: 0.0,
                x: 0.0,
                y: 0.0,
                selected: i < selected,
                was_established: true,
                image: None,
                ellipse: None,
                projected_point: None,
            })
            .collect();
        IpcamState {
            points,
            selected_counter: selected,
            ..IpcamState::default()
        }
    }

    #[test]
    fn thresholds_per_mode() {
        let config = IpcamConfig::default();
        let six = state_with(6, 10);

        assert!(IpcamWorkflow::validate_for_solve(&six, &config, &SolveMode::DirectSolve).is_ok());
        assert_eq!(
            IpcamWorkflow::validate_for_solve(&six, &config, &SolveMode::OptimizeSolution),
            Err(CalibrationError::NotEnoughPoints {
                required: 7,
                selected: 6
            })
        );

        let five = state_with(5, 10);
        let direct = IpcamWorkflow::validate_for_solve(&five, &config, &SolveMode::DirectSolve);
        assert!(direct.is_err());
    }

    #[test]
    fn zero_threshold_is_invalid() {
        let config = IpcamConfig {
            min_direct_points: 0,
            ..IpcamConfig::default()
        };
        assert!(IpcamWorkflow::validate_config(&config).is_err());
    }

    #[test]
    fn optimize_counter_follows_selection_without_solver_count() {
        let state = state_with(10, 10);
        let request = IpcamWorkflow::build_request(
            &state,
            &IpcamConfig::default(),
            &SolveMode::OptimizeSolution,
        )
        .unwrap();
        let response = IpcamResponse {
            ortho_image_path: "ortho.png".into(),
            ortho_extent: vec![0.0, 1.0, 0.0, 1.0],
            reprojection_errors: vec![0.2; 7],
            mean_error: 0.2,
            camera_position: [0.0, 0.0, 10.0],
            camera_matrix: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
            uncertainty_ellipses: None,
            projected_points: None,
            point_indices: Some(vec![0, 2, 4, 6, 8, 9, 7]),
            num_points: None,
        };

        let (state, solution) = IpcamWorkflow::apply_response(&state, &request, response).unwrap();
        assert_eq!(state.selected_counter, 7);
        assert_eq!(count_selected(&state.points), 7);
        assert_eq!(solution.num_points, 0);
    }

    #[test]
    fn solve_notes_summarize_the_fit() {
        let state = state_with(6, 6);
        let request =
            IpcamWorkflow::build_request(&state, &IpcamConfig::default(), &SolveMode::DirectSolve)
                .unwrap();
        let response = IpcamResponse {
            ortho_image_path: "ortho.png".into(),
            ortho_extent: vec![0.0, 1.0, 0.0, 1.0],
            reprojection_errors: vec![0.25; 6],
            mean_error: 0.25,
            camera_position: [0.0, 0.0, 10.0],
            camera_matrix: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0]],
            uncertainty_ellipses: None,
            projected_points: None,
            point_indices: None,
            num_points: None,
        };

        let (_, solution) = IpcamWorkflow::apply_response(&state, &request, response).unwrap();
        let notes = IpcamWorkflow::solve_notes(&solution).unwrap();
        assert!(notes.contains("6 points"), "{notes}");
        assert!(notes.contains("mean error 0.250 px"), "{notes}");
    }

    #[test]
    fn config_fills_missing_fields() {
        let config: IpcamConfig = serde_json::from_str(r#"{"min_optimize_points": 9}"#).unwrap();
        assert_eq!(config.min_direct_points, 6);
        assert_eq!(config.min_optimize_points, 9);
    }
}
