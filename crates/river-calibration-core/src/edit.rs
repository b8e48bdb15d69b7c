//! Reconciliation of the two point-edit channels.
//!
//! Points change either through direct manipulation on the canvas or through
//! numeric entry in a form. Both channels are normalized here into one
//! [`Reconciled`] value: the new point array plus one changed-flag per point.
//! Nothing is committed; the caller decides what to do with the result.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Pt2, Real, round_to_tenth};

/// Coordinate axis addressed by a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Typed address of a single coordinate: zero-based point index plus axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordKey {
    pub index: usize,
    pub axis: Axis,
}

impl CoordKey {
    pub fn new(index: usize, axis: Axis) -> Self {
        Self { index, axis }
    }

    pub fn x(index: usize) -> Self {
        Self::new(index, Axis::X)
    }

    pub fn y(index: usize) -> Self {
        Self::new(index, Axis::Y)
    }

    /// Parse a legacy form field name.
    ///
    /// Accepted prefixes are `x`/`y`, `xPoint`/`yPoint` and
    /// `eastPoint`/`northPoint`, followed by a 1-based ordinal
    /// (`x1`, `yPoint2`, `eastPoint3`, ...).
    pub fn parse(name: &str) -> Option<Self> {
        const PREFIXES: [(&str, Axis); 6] = [
            ("eastPoint", Axis::X),
            ("northPoint", Axis::Y),
            ("xPoint", Axis::X),
            ("yPoint", Axis::Y),
            ("x", Axis::X),
            ("y", Axis::Y),
        ];
        PREFIXES.iter().find_map(|(prefix, axis)| {
            let ordinal: usize = name.strip_prefix(prefix)?.parse().ok()?;
            let index = ordinal.checked_sub(1)?;
            Some(Self::new(index, *axis))
        })
    }

    fn read(&self, p: &Pt2) -> Real {
        match self.axis {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }

    fn write(&self, p: &mut Pt2, value: Real) {
        match self.axis {
            Axis::X => p.x = value,
            Axis::Y => p.y = value,
        }
    }
}

/// New point positions reported by the canvas.
///
/// `scale_factor` converts displayed canvas coordinates to full-resolution
/// pixels. `point_index = None` means the whole shape was (re)drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasEdit {
    pub points: Vec<Pt2>,
    pub scale_factor: Real,
    pub point_index: Option<usize>,
}

/// A committed value from a numeric form field. The value is already validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormEdit {
    pub value: Real,
    pub key: CoordKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Edit {
    Canvas(CanvasEdit),
    Form(FormEdit),
}

/// Result of reconciling one edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub points: Vec<Pt2>,
    pub changed: Vec<bool>,
}

impl Reconciled {
    pub fn any_changed(&self) -> bool {
        self.changed.iter().any(|c| *c)
    }

    /// Copy the points into a fixed-size array, if the length matches.
    pub fn to_array<const N: usize>(&self) -> Option<[Pt2; N]> {
        self.points.as_slice().try_into().ok()
    }
}

/// Map a displayed canvas coordinate to full-resolution pixel space.
pub fn to_image_space(p: &Pt2, scale_factor: Real) -> Pt2 {
    Pt2::new(
        round_to_tenth(p.x * scale_factor),
        round_to_tenth(p.y * scale_factor),
    )
}

pub fn reconcile_canvas(edit: &CanvasEdit) -> Reconciled {
    let points: Vec<Pt2> = edit
        .points
        .iter()
        .map(|p| to_image_space(p, edit.scale_factor))
        .collect();
    let changed = match edit.point_index {
        None => vec![true; points.len()],
        Some(index) => (0..points.len()).map(|i| i == index).collect(),
    };
    debug!(
        "canvas edit: {} points, index {:?}, factor {}",
        points.len(),
        edit.point_index,
        edit.scale_factor
    );
    Reconciled { points, changed }
}

/// Apply a form edit to `current`. Only the addressed coordinate can change,
/// and only when the new value differs from the stored one.
pub fn reconcile_form(current: &[Pt2], edit: &FormEdit) -> Reconciled {
    let mut points = current.to_vec();
    let mut changed = vec![false; current.len()];

    if let Some(point) = points.get_mut(edit.key.index) {
        if edit.key.read(point) != edit.value {
            edit.key.write(point, edit.value);
            changed[edit.key.index] = true;
        }
    }

    debug!(
        "form edit {:?} = {}: changed {:?}",
        edit.key, edit.value, changed
    );
    Reconciled { points, changed }
}

pub fn reconcile(current: &[Pt2], edit: &Edit) -> Reconciled {
    match edit {
        Edit::Canvas(canvas) => reconcile_canvas(canvas),
        Edit::Form(form) => reconcile_form(current, form),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Vec<Pt2> {
        vec![
            Pt2::new(10.0, 10.0),
            Pt2::new(200.0, 10.0),
            Pt2::new(200.0, 120.0),
            Pt2::new(10.0, 120.0),
        ]
    }

    #[test]
    fn canvas_redraw_flags_everything() {
        let edit = CanvasEdit {
            points: vec![Pt2::new(10.04, 20.0), Pt2::new(33.33, 41.0)],
            scale_factor: 3.0,
            point_index: None,
        };
        let out = reconcile_canvas(&edit);
        assert_eq!(out.points, vec![Pt2::new(30.1, 60.0), Pt2::new(100.0, 123.0)]);
        assert_eq!(out.changed, vec![true, true]);
    }

    #[test]
    fn canvas_drag_flags_one_point() {
        let edit = CanvasEdit {
            points: quad(),
            scale_factor: 1.0,
            point_index: Some(2),
        };
        let out = reconcile_canvas(&edit);
        assert_eq!(out.changed, vec![false, false, true, false]);
        assert_eq!(out.points, quad());
    }

    #[test]
    fn form_edit_touches_one_coordinate() {
        let current = quad();
        let out = reconcile_form(&current, &FormEdit {
            value: 55.5,
            key: CoordKey::y(1),
        });
        assert_eq!(out.changed, vec![false, true, false, false]);
        assert_eq!(out.points[1], Pt2::new(200.0, 55.5));
        for i in [0, 2, 3] {
            assert_eq!(out.points[i], current[i]);
        }
    }

    #[test]
    fn form_edit_with_same_value_is_a_no_op() {
        let current = quad();
        let out = reconcile_form(&current, &FormEdit {
            value: 200.0,
            key: CoordKey::x(2),
        });
        assert!(!out.any_changed());
        assert_eq!(out.points, current);
    }

    #[test]
    fn form_edit_out_of_range_changes_nothing() {
        let current = quad();
        let out = reconcile_form(&current, &FormEdit {
            value: 1.0,
            key: CoordKey::x(7),
        });
        assert!(!out.any_changed());
        assert_eq!(out.points, current);
    }

    #[test]
    fn parse_legacy_keys() {
        assert_eq!(CoordKey::parse("x1"), Some(CoordKey::x(0)));
        assert_eq!(CoordKey::parse("y2"), Some(CoordKey::y(1)));
        assert_eq!(CoordKey::parse("eastPoint2"), Some(CoordKey::x(1)));
        assert_eq!(CoordKey::parse("northPoint4"), Some(CoordKey::y(3)));
        assert_eq!(CoordKey::parse("yPoint3"), Some(CoordKey::y(2)));
        assert_eq!(CoordKey::parse("x0"), None);
        assert_eq!(CoordKey::parse("z1"), None);
        assert_eq!(CoordKey::parse("eastPoint"), None);
    }

    #[test]
    fn to_array_checks_length() {
        let out = reconcile_form(&quad(), &FormEdit {
            value: 0.0,
            key: CoordKey::x(0),
        });
        assert!(out.to_array::<4>().is_some());
        assert!(out.to_array::<2>().is_none());
    }
}
