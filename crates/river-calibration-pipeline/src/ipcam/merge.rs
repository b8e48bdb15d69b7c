//! Folding camera-solver output back into the control points.

use log::debug;

use super::types::{IpcamPoint, IpcamResponse, SolveMode};

/// Points after a merge and the number of points the solve used.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub points: Vec<IpcamPoint>,
    pub num_points: usize,
}

/// Attach a solver response to the points it was computed from.
///
/// - `DirectSolve`: the solver used exactly the selected points. Ellipses
///   and projected points are attached by array position; selection is left
///   alone and the used count is the number of selected points.
/// - `OptimizeSolution`: points listed in `pointIndices` become selected
///   and receive their ellipse and projected point; every other point is
///   deselected and cleared. The used count is the solver's `numPoints`,
///   or 0 if absent.
pub fn merge_camera_solution(
    points: &[IpcamPoint],
    response: &IpcamResponse,
    mode: SolveMode,
) -> Merged {
    let attach = |index: usize, point: &IpcamPoint| {
        let mut point = point.clone();
        point.ellipse = response.ellipse_at(index);
        point.projected_point = response.projected_point_at(index);
        point
    };

    let merged = match mode {
        SolveMode::DirectSolve => {
            let points: Vec<IpcamPoint> = points
                .iter()
                .enumerate()
                .map(|(i, p)| attach(i, p))
                .collect();
            let num_points = points.iter().filter(|p| p.selected).count();
            Merged { points, num_points }
        }
        SolveMode::OptimizeSolution => {
            let used = response.point_indices.as_deref().unwrap_or_default();
            let points = points
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    if used.contains(&i) {
                        let mut point = attach(i, p);
                        point.selected = true;
                        point
                    } else {
                        let mut point = p.clone();
                        point.clear_solver_output();
                        point.selected = false;
                        point
                    }
                })
                .collect();
            Merged {
                points,
                num_points: response.num_points.unwrap_or(0),
            }
        }
    };

    debug!(
        "merged {mode} solution: {} of {} points used",
        merged.num_points,
        merged.points.len()
    );
    merged
}
