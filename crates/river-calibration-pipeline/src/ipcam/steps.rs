//! Edit steps for the fixed-camera workflow.

use log::debug;
use river_calibration_core::{ImportedPoints, Pt2, Real, round_to_tenth};

use crate::error::{CalibrationError, Result};
use crate::session::CalibrationSession;

use super::problem::IpcamWorkflow;
use super::selection::{self, BulkSelection, infer_bulk_selection};
use super::types::IpcamPoint;

/// One edit of a control point's pixel position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointEdit {
    /// Place a point that has no pixel position yet at the image center.
    EstablishAtCenter { image_width: Real, image_height: Real },
    /// Place the point at a picked position on the active frame.
    MoveTo(Pt2),
    /// Make the point active without touching its position.
    SelectOnly,
    NoOp,
}

fn point_index(session: &CalibrationSession<IpcamWorkflow>, index: usize) -> Result<usize> {
    let len = session.state().points.len();
    if index >= len {
        return Err(CalibrationError::validation(format!(
            "point index {index} out of range ({len} points)"
        )));
    }
    Ok(index)
}

// ─────────────────────────────────────────────────────────────────────────────
// Step Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Replace all control points with an imported set.
///
/// Every imported point starts selected.
pub fn import_points(
    session: &mut CalibrationSession<IpcamWorkflow>,
    imported: ImportedPoints,
    path: Option<String>,
) {
    let points: Vec<IpcamPoint> = imported.points.into_iter().map(IpcamPoint::from).collect();

    let mut state = session.state().clone();
    state.selected_counter = selection::count_selected(&points);
    state.points = points;
    state.z_limits = imported.z_limits;
    state.active_point = None;
    if path.is_some() {
        state.points_path = path;
    }
    debug!("imported {} control points", state.points.len());
    session.replace_state("import_points", state);
}

/// Set the frames used for picking pixel positions.
///
/// An active image index that no longer exists is cleared.
pub fn set_images(
    session: &mut CalibrationSession<IpcamWorkflow>,
    images: Vec<String>,
    path: impl Into<String>,
) {
    let state = session.state_mut_untracked();
    if state.active_image.is_some_and(|i| i >= images.len()) {
        state.active_image = None;
    }
    state.images = images;
    state.images_path = Some(path.into());
}

pub fn set_active_image(
    session: &mut CalibrationSession<IpcamWorkflow>,
    index: usize,
) -> Result<()> {
    let count = session.state().images.len();
    if index >= count {
        return Err(CalibrationError::validation(format!(
            "image index {index} out of range ({count} images)"
        )));
    }
    if session.state().active_image != Some(index) {
        session.state_mut_untracked().active_image = Some(index);
    }
    Ok(())
}

/// Apply one [`PointEdit`] to the point at `index`.
///
/// Position changes invalidate the camera solution. Returns whether the
/// point's position was committed.
///
/// # Errors
///
/// - [`CalibrationError::Validation`] if `index` is out of range.
/// - [`CalibrationError::Validation`] for `EstablishAtCenter` on a point
///   that already has a pixel position.
pub fn edit_point(
    session: &mut CalibrationSession<IpcamWorkflow>,
    index: usize,
    edit: PointEdit,
) -> Result<bool> {
    let index = point_index(session, index)?;

    match edit {
        PointEdit::EstablishAtCenter {
            image_width,
            image_height,
        } => {
            if session.state().points[index].was_established {
                return Err(CalibrationError::validation(format!(
                    "point {index} already has a pixel position"
                )));
            }
            let mut state = session.state().clone();
            let point = &mut state.points[index];
            point.x = round_to_tenth(image_width / 2.0);
            point.y = round_to_tenth(image_height / 2.0);
            point.clear_solver_output();
            state.active_point = Some(index);
            session.commit_state("establish_point", state);
            Ok(true)
        }
        PointEdit::MoveTo(pixel) => {
            let mut state = session.state().clone();
            let active_image = state.active_image;
            let point = &mut state.points[index];
            point.x = round_to_tenth(pixel.x);
            point.y = round_to_tenth(pixel.y);
            point.was_established = true;
            point.image = active_image;
            point.clear_solver_output();
            state.active_point = Some(index);
            session.commit_state("move_point", state);
            Ok(true)
        }
        PointEdit::SelectOnly => {
            session.state_mut_untracked().active_point = Some(index);
            Ok(false)
        }
        PointEdit::NoOp => Ok(false),
    }
}

/// Flip the selection of one point and adjust the counter by one.
pub fn toggle_point(session: &mut CalibrationSession<IpcamWorkflow>, index: usize) -> Result<()> {
    let index = point_index(session, index)?;

    let mut state = session.state().clone();
    let delta = selection::toggle(&mut state.points[index]);
    state.selected_counter = state.selected_counter.saturating_add_signed(delta);
    debug!(
        "point {index} {}, {} selected",
        if delta > 0 { "selected" } else { "deselected" },
        state.selected_counter
    );
    session.commit_state("toggle_point", state);
    Ok(())
}

/// React to a selection-set size reported by the points table.
///
/// Applies and returns the inferred bulk action, if any. See
/// [`infer_bulk_selection`] for when a size counts as bulk.
pub fn apply_bulk_selection(
    session: &mut CalibrationSession<IpcamWorkflow>,
    reported_size: usize,
) -> Option<BulkSelection> {
    let points = &session.state().points;
    let action = infer_bulk_selection(
        reported_size,
        points.len(),
        selection::count_selected(points),
    )?;

    let mut state = session.state().clone();
    state.selected_counter = selection::apply_bulk(&mut state.points, action);
    session.replace_state("bulk_selection", state);
    Some(action)
}
