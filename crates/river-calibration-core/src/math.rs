use nalgebra::{Matrix3, Point2, Point3, Vector3};

pub type Real = f64;

pub type Vec3 = Vector3<Real>;
pub type Pt2 = Point2<Real>;
pub type Pt3 = Point3<Real>;
pub type Mat3 = Matrix3<Real>;

pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Divide by the third component. A zero `w` yields non-finite coordinates.
pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Round to a fixed number of decimals, half away from zero.
pub fn round_to(value: Real, decimals: i32) -> Real {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// One-decimal rounding applied to every pixel coordinate written from the canvas.
pub fn round_to_tenth(value: Real) -> Real {
    round_to(value, 1)
}

/// Euclidean distance between two points.
pub fn distance(a: &Pt2, b: &Pt2) -> Real {
    (b - a).norm()
}
