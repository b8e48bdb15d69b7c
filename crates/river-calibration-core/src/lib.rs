//! Geometry primitives for interactive river-footage calibration.
//!
//! This crate provides the pure building blocks used by the calibration
//! workflows in `river-calibration-pipeline`:
//!
//! - point and matrix type aliases (`Real`, `Pt2`, `Mat3`, ...),
//! - the six-distance engine for four control corners,
//! - quad construction from a drawn diagonal,
//! - reconciliation of canvas and form edits into one point array,
//! - the pixel <-> real-world transformation bridge,
//! - two-point scale math and tabular import normalization.
//!
//! Everything here is side-effect free. Degenerate geometry produces zeros or
//! non-finite values rather than errors; validation is left to callers.
//!
//! # Example
//!
//! ```
//! use river_calibration_core::{Distances, Pt2, quad_from_diagonal};
//!
//! let corners = quad_from_diagonal(Pt2::new(0.0, 0.0), Pt2::new(100.0, 50.0), 640.0, 480.0);
//! let d = Distances::from_corners(&corners);
//! assert_eq!(d.d12, 100.0);
//! assert_eq!(d.d23, 50.0);
//! ```

/// Linear algebra type aliases and homogeneous helpers.
mod math;

pub mod distances;
pub mod edit;
pub mod quad;
pub mod scale;
/// Normalization of imported spreadsheet rows.
pub mod table;
pub mod transform;

pub use distances::{DistanceImportError, DistanceKey, Distances};
pub use edit::{
    Axis, CanvasEdit, CoordKey, Edit, FormEdit, Reconciled, reconcile, reconcile_canvas,
    reconcile_form, to_image_space,
};
pub use math::*;
pub use quad::{quad_from_diagonal, scale_to_image};
pub use table::{Cell, ImportedPoint, ImportedPoints, PointImportError, ZLimits, points_from_table};
pub use transform::{PixelTransform, pixel_to_real_world};
