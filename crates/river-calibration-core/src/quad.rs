//! Initial four-corner shape for the oblique workflow.

use crate::{Pt2, Real, edit::to_image_space};

/// Build the axis-aligned rectangle spanned by two opposite corners.
///
/// Corners come back in the fixed order top-left, top-right, bottom-right,
/// bottom-left, clipped to `[0, image_width] x [0, image_height]`. Either
/// diagonal, drawn in either direction, gives the same result.
pub fn quad_from_diagonal(a: Pt2, b: Pt2, image_width: Real, image_height: Real) -> [Pt2; 4] {
    let clip_x = |v: Real| v.clamp(0.0, image_width.max(0.0));
    let clip_y = |v: Real| v.clamp(0.0, image_height.max(0.0));

    let left = clip_x(a.x.min(b.x));
    let right = clip_x(a.x.max(b.x));
    let top = clip_y(a.y.min(b.y));
    let bottom = clip_y(a.y.max(b.y));

    [
        Pt2::new(left, top),
        Pt2::new(right, top),
        Pt2::new(right, bottom),
        Pt2::new(left, bottom),
    ]
}

/// Rescale canvas-space corners to full image resolution (one-decimal rounding).
pub fn scale_to_image<const N: usize>(points: &[Pt2; N], scale_factor: Real) -> [Pt2; N] {
    points.map(|p| to_image_space(&p, scale_factor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_corners_from_any_diagonal() {
        let expected = [
            Pt2::new(10.0, 20.0),
            Pt2::new(110.0, 20.0),
            Pt2::new(110.0, 70.0),
            Pt2::new(10.0, 70.0),
        ];
        let from_tl = quad_from_diagonal(Pt2::new(10.0, 20.0), Pt2::new(110.0, 70.0), 640.0, 480.0);
        let from_br = quad_from_diagonal(Pt2::new(110.0, 70.0), Pt2::new(10.0, 20.0), 640.0, 480.0);
        let from_tr = quad_from_diagonal(Pt2::new(110.0, 20.0), Pt2::new(10.0, 70.0), 640.0, 480.0);
        assert_eq!(from_tl, expected);
        assert_eq!(from_br, expected);
        assert_eq!(from_tr, expected);
    }

    #[test]
    fn clipped_to_image() {
        let q = quad_from_diagonal(Pt2::new(-15.0, 400.0), Pt2::new(700.0, 500.0), 640.0, 480.0);
        assert_eq!(q[0], Pt2::new(0.0, 400.0));
        assert_eq!(q[2], Pt2::new(640.0, 480.0));
    }

    #[test]
    fn scaled_like_canvas_edits() {
        let q = quad_from_diagonal(Pt2::new(10.0, 10.0), Pt2::new(20.05, 30.0), 100.0, 100.0);
        let scaled = scale_to_image(&q, 2.0);
        assert_eq!(scaled[1], Pt2::new(40.1, 20.0));
        assert_eq!(scaled[3], Pt2::new(20.0, 60.0));
    }
}
