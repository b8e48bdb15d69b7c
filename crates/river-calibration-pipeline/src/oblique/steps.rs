//! Edit steps for the oblique workflow.

use log::debug;
use river_calibration_core::{
    CanvasEdit, Distances, FormEdit, Pt2, Real, quad_from_diagonal, reconcile_canvas,
    reconcile_form, scale_to_image,
};

use crate::error::{CalibrationError, Result};
use crate::session::CalibrationSession;

use super::problem::ObliqueWorkflow;
use super::state::ObliqueState;

fn four_corners(points: &[Pt2]) -> Result<[Pt2; 4]> {
    points.try_into().map_err(|_| {
        CalibrationError::validation(format!("expected 4 corners, got {}", points.len()))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Step Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Build the control quad from a diagonal drawn on the canvas.
///
/// `a` and `b` are in displayed canvas coordinates, clipped to the displayed
/// image size and then scaled to full resolution with `scale_factor`.
pub fn draw_quad(
    session: &mut CalibrationSession<ObliqueWorkflow>,
    a: Pt2,
    b: Pt2,
    display_width: Real,
    display_height: Real,
    scale_factor: Real,
) {
    let corners = quad_from_diagonal(a, b, display_width, display_height);
    let corners = scale_to_image(&corners, scale_factor);
    debug!("oblique quad drawn: {corners:?}");

    let mut state = session.state().clone();
    state.pixel_corners = corners;
    state.draw_points = true;
    state.is_default_coordinates = false;
    session.commit_state("draw_quad", state);
}

/// Store corner positions reported by the canvas after a drag.
///
/// # Errors
///
/// [`CalibrationError::Validation`] unless exactly four points are reported.
pub fn move_corners(
    session: &mut CalibrationSession<ObliqueWorkflow>,
    edit: &CanvasEdit,
) -> Result<()> {
    let reconciled = reconcile_canvas(edit);
    let corners = four_corners(&reconciled.points)?;

    let mut state = session.state().clone();
    state.pixel_corners = corners;
    state.is_default_coordinates = false;
    session.commit_state("move_corners", state);
    Ok(())
}

/// Apply a form edit to one pixel coordinate. Returns whether it changed.
pub fn set_pixel_corner_form(
    session: &mut CalibrationSession<ObliqueWorkflow>,
    edit: FormEdit,
) -> Result<bool> {
    let reconciled = reconcile_form(&session.state().pixel_corners, &edit);
    if !reconciled.any_changed() {
        return Ok(false);
    }
    let corners = four_corners(&reconciled.points)?;

    let mut state = session.state().clone();
    state.pixel_corners = corners;
    state.is_default_coordinates = false;
    session.commit_state("set_pixel_corner_form", state);
    Ok(true)
}

/// Apply a form edit to one real-world coordinate.
///
/// All six distances are recomputed from the edited corners.
pub fn set_real_world_corner_form(
    session: &mut CalibrationSession<ObliqueWorkflow>,
    edit: FormEdit,
) -> Result<bool> {
    let reconciled = reconcile_form(&session.state().real_world_corners, &edit);
    if !reconciled.any_changed() {
        return Ok(false);
    }
    let corners = four_corners(&reconciled.points)?;

    let mut state = session.state().clone();
    state.distances = Distances::from_corners(&corners);
    state.real_world_corners = corners;
    session.commit_state("set_real_world_corner_form", state);
    Ok(true)
}

/// Replace the distances with an imported record.
///
/// Hand-entered real-world corners no longer match and are reset.
///
/// # Errors
///
/// [`CalibrationError::Validation`] if any distance is negative or not
/// finite.
pub fn import_distances(
    session: &mut CalibrationSession<ObliqueWorkflow>,
    distances: Distances,
) -> Result<()> {
    if let Some(key) = distances.first_invalid() {
        return Err(CalibrationError::validation(format!(
            "imported distance {} must be a non-negative number",
            key.name()
        )));
    }

    let mut state = session.state().clone();
    state.distances = distances;
    state.is_distances_loaded = true;
    state.real_world_corners = ObliqueState::default_corners();
    session.replace_state("import_distances", state);
    Ok(())
}

/// Drop loaded distances and real-world corners.
pub fn clear_distances(session: &mut CalibrationSession<ObliqueWorkflow>) {
    let mut state = session.state().clone();
    state.distances = Distances::default();
    state.is_distances_loaded = false;
    state.real_world_corners = ObliqueState::default_corners();
    session.replace_state("clear_distances", state);
}

/// Toggle corner drawing. Either way the quad and distances start over.
pub fn toggle_draw_points(session: &mut CalibrationSession<ObliqueWorkflow>) {
    let state = ObliqueState {
        draw_points: !session.state().draw_points,
        ..ObliqueState::default()
    };
    session.replace_state("toggle_draw_points", state);
}
