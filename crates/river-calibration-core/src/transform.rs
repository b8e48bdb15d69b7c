//! Pixel <-> real-world mapping with a solver-provided 3x3 matrix.
//!
//! The matrix is applied projectively:
//!
//! ```text
//! [X', Y', W]^T = M * [px, py, 1]^T,   (X, Y) = (X' / W, Y' / W)
//! ```
//!
//! An affine matrix (last row `[0, 0, 1]`) is the special case `W = 1`, so the
//! same routine serves the UAV scale transform and the oblique homography.
//! No validation is done; a degenerate matrix produces non-finite
//! coordinates instead of an error.

use serde::{Deserialize, Serialize};

use crate::{Mat3, Pt2, Real, from_homogeneous, to_homogeneous};

/// Row-major 3x3 transform from pixel to real-world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[Real; 3]; 3]", into = "[[Real; 3]; 3]")]
pub struct PixelTransform {
    matrix: Mat3,
}

impl PixelTransform {
    pub fn new(matrix: Mat3) -> Self {
        Self { matrix }
    }

    pub fn identity() -> Self {
        Self::new(Mat3::identity())
    }

    pub fn from_rows(rows: [[Real; 3]; 3]) -> Self {
        Self::new(Mat3::new(
            rows[0][0], rows[0][1], rows[0][2], //
            rows[1][0], rows[1][1], rows[1][2], //
            rows[2][0], rows[2][1], rows[2][2],
        ))
    }

    pub fn to_rows(&self) -> [[Real; 3]; 3] {
        let m = &self.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }

    pub fn matrix(&self) -> &Mat3 {
        &self.matrix
    }

    pub fn is_affine(&self) -> bool {
        self.matrix[(2, 0)] == 0.0 && self.matrix[(2, 1)] == 0.0 && self.matrix[(2, 2)] == 1.0
    }

    pub fn pixel_to_real_world(&self, pixel: &Pt2) -> Pt2 {
        from_homogeneous(&(self.matrix * to_homogeneous(pixel)))
    }

    /// Inverse mapping. A singular matrix yields a NaN point.
    pub fn real_world_to_pixel(&self, world: &Pt2) -> Pt2 {
        match self.matrix.try_inverse() {
            Some(inv) => from_homogeneous(&(inv * to_homogeneous(world))),
            None => Pt2::new(Real::NAN, Real::NAN),
        }
    }
}

impl Default for PixelTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[[Real; 3]; 3]> for PixelTransform {
    fn from(rows: [[Real; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<PixelTransform> for [[Real; 3]; 3] {
    fn from(t: PixelTransform) -> Self {
        t.to_rows()
    }
}

/// Map a single pixel through a matrix given as rows, as delivered by a solver.
pub fn pixel_to_real_world(px: Real, py: Real, rows: [[Real; 3]; 3]) -> Pt2 {
    PixelTransform::from_rows(rows).pixel_to_real_world(&Pt2::new(px, py))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_scale_and_offset() {
        let t = PixelTransform::from_rows([[0.5, 0.0, 10.0], [0.0, -0.5, 20.0], [0.0, 0.0, 1.0]]);
        assert!(t.is_affine());
        let p = t.pixel_to_real_world(&Pt2::new(100.0, 40.0));
        assert_eq!(p, Pt2::new(60.0, 0.0));
        let back = t.real_world_to_pixel(&p);
        assert!((back - Pt2::new(100.0, 40.0)).norm() < 1e-9);
    }

    #[test]
    fn projective_divides_by_w() {
        let t = PixelTransform::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.01, 1.0]]);
        assert!(!t.is_affine());
        let p = t.pixel_to_real_world(&Pt2::new(50.0, 100.0));
        assert!((p.x - 25.0).abs() < 1e-12);
        assert!((p.y - 50.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_matrix_propagates_non_finite() {
        let zero = PixelTransform::from_rows([[0.0; 3]; 3]);
        let p = zero.pixel_to_real_world(&Pt2::new(3.0, 4.0));
        assert!(!p.x.is_finite() && !p.y.is_finite());
        let q = zero.real_world_to_pixel(&Pt2::new(3.0, 4.0));
        assert!(q.x.is_nan() && q.y.is_nan());
    }

    #[test]
    fn serializes_row_major() {
        let rows = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let t = PixelTransform::from(rows);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "[[1.0,2.0,3.0],[4.0,5.0,6.0],[7.0,8.0,9.0]]");
        let back: PixelTransform = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_rows(), rows);
        assert_eq!(pixel_to_real_world(1.0, 0.0, rows), t.pixel_to_real_world(&Pt2::new(1.0, 0.0)));
    }
}
