//! Edit steps for the UAV scale workflow.
//!
//! Every step validates first and commits at most once, so a rejected edit
//! leaves the session exactly as it was.

use log::debug;
use river_calibration_core::scale::{
    default_scale_line, pixel_size, real_world_axis, real_world_length, segment_length,
};
use river_calibration_core::{CanvasEdit, FormEdit, Pt2, Real, reconcile_canvas, reconcile_form};

use crate::error::{CalibrationError, Result};
use crate::session::CalibrationSession;

use super::problem::UavWorkflow;
use super::state::UavState;

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

fn ensure_distinct(pair: &[Pt2; 2]) -> Result<()> {
    if pair[0] == pair[1] {
        return Err(CalibrationError::DegenerateScaleLine {
            x: pair[0].x,
            y: pair[0].y,
        });
    }
    Ok(())
}

fn ensure_positive(what: &str, value: Real) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(CalibrationError::validation(format!(
            "{what} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

fn scale_line(state: &UavState) -> Result<[Pt2; 2]> {
    state
        .pixel_points
        .ok_or_else(|| CalibrationError::validation("no scale line drawn"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Step Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Store scale-line endpoints reported by the canvas.
///
/// The pixel size is recomputed against the current real-world points.
///
/// # Errors
///
/// - [`CalibrationError::Validation`] unless exactly two points are reported.
/// - [`CalibrationError::DegenerateScaleLine`] if both endpoints land on the
///   same pixel.
pub fn set_pixel_points_canvas(
    session: &mut CalibrationSession<UavWorkflow>,
    edit: &CanvasEdit,
) -> Result<()> {
    let reconciled = reconcile_canvas(edit);
    let points: [Pt2; 2] = reconciled.to_array().ok_or_else(|| {
        CalibrationError::validation(format!(
            "scale line needs 2 points, got {}",
            reconciled.points.len()
        ))
    })?;
    ensure_distinct(&points)?;

    let mut state = session.state().clone();
    state.pixel_size = pixel_size(&points, &state.real_world_points);
    state.pixel_points = Some(points);
    session.commit_state("set_pixel_points", state);
    Ok(())
}

/// Apply a form edit to one pixel coordinate of the scale line.
///
/// Returns whether the value actually changed; an unchanged value commits
/// nothing.
///
/// # Errors
///
/// - [`CalibrationError::Validation`] if no line is drawn yet.
/// - [`CalibrationError::DegenerateScaleLine`] if the edit would make both
///   endpoints coincide.
pub fn set_pixel_point_form(
    session: &mut CalibrationSession<UavWorkflow>,
    edit: FormEdit,
) -> Result<bool> {
    let current = scale_line(session.state())?;
    let reconciled = reconcile_form(&current, &edit);
    if !reconciled.any_changed() {
        return Ok(false);
    }
    let points: [Pt2; 2] = reconciled
        .to_array()
        .ok_or_else(|| CalibrationError::validation("scale line needs 2 points"))?;
    ensure_distinct(&points)?;

    let mut state = session.state().clone();
    state.pixel_size = pixel_size(&points, &state.real_world_points);
    state.pixel_points = Some(points);
    session.commit_state("set_pixel_point_form", state);
    Ok(true)
}

/// Apply a form edit to one real-world coordinate.
///
/// Length and pixel size are rederived from the edited points.
///
/// # Errors
///
/// [`CalibrationError::DegenerateScaleLine`] if both real-world points would
/// coincide.
pub fn set_real_world_point_form(
    session: &mut CalibrationSession<UavWorkflow>,
    edit: FormEdit,
) -> Result<bool> {
    let reconciled = reconcile_form(&session.state().real_world_points, &edit);
    if !reconciled.any_changed() {
        return Ok(false);
    }
    let points: [Pt2; 2] = reconciled
        .to_array()
        .ok_or_else(|| CalibrationError::validation("scale line needs 2 points"))?;
    ensure_distinct(&points)?;

    let mut state = session.state().clone();
    state.rw_length = segment_length(&points);
    state.pixel_size = match state.pixel_points {
        Some(pixel) => pixel_size(&pixel, &points),
        None => 0.0,
    };
    state.real_world_points = points;
    session.commit_state("set_real_world_point_form", state);
    Ok(true)
}

/// Set the real-world length of the scale line.
///
/// Real-world points are reset to `(0, 0)` and `(length, 0)`; the pixel size
/// follows from the drawn line (0 while none is drawn).
pub fn set_real_world_length(
    session: &mut CalibrationSession<UavWorkflow>,
    length: Real,
) -> Result<()> {
    ensure_positive("real-world length", length)?;

    let mut state = session.state().clone();
    state.real_world_points = real_world_axis(length);
    state.rw_length = length;
    state.pixel_size = match state.pixel_points {
        Some(pixel) => pixel_size(&pixel, &state.real_world_points),
        None => 0.0,
    };
    session.commit_state("set_real_world_length", state);
    Ok(())
}

/// Enter a known pixel size directly.
///
/// Without a drawn line, a default horizontal line across the middle of the
/// image is placed and shown. The real-world length is derived from it.
pub fn set_pixel_size(
    session: &mut CalibrationSession<UavWorkflow>,
    size: Real,
    image_width: Real,
    image_height: Real,
) -> Result<()> {
    ensure_positive("pixel size", size)?;

    let mut state = session.state().clone();
    let line = match state.pixel_points {
        Some(line) => line,
        None => {
            ensure_positive("image width", image_width)?;
            ensure_positive("image height", image_height)?;
            let line = default_scale_line(image_width, image_height);
            ensure_distinct(&line)?;
            debug!("placing default scale line on {image_width}x{image_height} image");
            state.draw_line = true;
            line
        }
    };
    state.rw_length = real_world_length(&line, size);
    state.real_world_points = real_world_axis(state.rw_length);
    state.pixel_size = size;
    state.pixel_points = Some(line);
    session.commit_state("set_pixel_size", state);
    Ok(())
}

/// Toggle line drawing. Either way the scale line starts over.
pub fn toggle_draw_line(session: &mut CalibrationSession<UavWorkflow>) {
    let state = UavState {
        draw_line: !session.state().draw_line,
        ..UavState::default()
    };
    session.replace_state("toggle_draw_line", state);
}
