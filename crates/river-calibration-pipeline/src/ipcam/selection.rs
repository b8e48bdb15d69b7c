//! Selection bookkeeping for control points.

use super::types::IpcamPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkSelection {
    SelectAll,
    DeselectAll,
}

/// Infer a bulk select/deselect from the size of the selection set
/// reported by a table widget.
///
/// Only the boundary sizes (all points or none) are treated as bulk actions,
/// and only when they differ from the current number of selected points.
/// Any other size is an incremental change and yields `None`.
///
/// Known ambiguity: an incremental toggle that lands exactly on a boundary
/// size (selecting the last unselected point by hand) is indistinguishable
/// from a bulk action. Both lead to the same selection, so the result is
/// only observable through the event that fired.
pub fn infer_bulk_selection(
    reported_size: usize,
    total: usize,
    currently_selected: usize,
) -> Option<BulkSelection> {
    if reported_size == currently_selected {
        return None;
    }
    if reported_size == total {
        Some(BulkSelection::SelectAll)
    } else if reported_size == 0 {
        Some(BulkSelection::DeselectAll)
    } else {
        None
    }
}

/// Flip one point's selection. Deselecting also drops its frame.
///
/// Returns the signed change of the selected count.
pub(crate) fn toggle(point: &mut IpcamPoint) -> isize {
    point.selected = !point.selected;
    if point.selected {
        1
    } else {
        point.image = None;
        -1
    }
}

pub(crate) fn apply_bulk(points: &mut [IpcamPoint], action: BulkSelection) -> usize {
    let selected = action == BulkSelection::SelectAll;
    for point in points.iter_mut() {
        point.selected = selected;
    }
    if selected { points.len() } else { 0 }
}

pub(crate) fn count_selected(points: &[IpcamPoint]) -> usize {
    points.iter().filter(|p| p.selected).count()
}
