//! Two-point linear scale used by the UAV (nadir) workflow.

use crate::{Pt2, Real, distance, round_to_tenth};

pub fn segment_length(pair: &[Pt2; 2]) -> Real {
    distance(&pair[0], &pair[1])
}

/// Pixels per real-world unit along the scale line.
///
/// Returns 0 while the real-world segment has no length yet.
pub fn pixel_size(pixel: &[Pt2; 2], real_world: &[Pt2; 2]) -> Real {
    let rw_length = segment_length(real_world);
    if rw_length == 0.0 {
        return 0.0;
    }
    segment_length(pixel) / rw_length
}

/// Real-world length of the pixel segment for a given pixel size.
pub fn real_world_length(pixel: &[Pt2; 2], pixel_size: Real) -> Real {
    segment_length(pixel) / pixel_size
}

/// Real-world endpoints laid along the X axis: `(0, 0)` and `(length, 0)`.
pub fn real_world_axis(length: Real) -> [Pt2; 2] {
    [Pt2::origin(), Pt2::new(length, 0.0)]
}

/// Placeholder scale line used when a pixel size is entered before any line
/// has been drawn: horizontal, at mid-height, spanning the central half of
/// the image.
pub fn default_scale_line(image_width: Real, image_height: Real) -> [Pt2; 2] {
    let y = round_to_tenth(image_height / 2.0);
    [
        Pt2::new(round_to_tenth(image_width * 0.25), y),
        Pt2::new(round_to_tenth(image_width * 0.75), y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_size_from_length() {
        let pixel = [Pt2::new(100.0, 100.0), Pt2::new(400.0, 100.0)];
        let rw = real_world_axis(5.0);
        assert_eq!(pixel_size(&pixel, &rw), 60.0);
        assert_eq!(real_world_length(&pixel, 60.0), 5.0);
    }

    #[test]
    fn zero_real_world_length_gives_zero_size() {
        let pixel = [Pt2::new(0.0, 0.0), Pt2::new(10.0, 0.0)];
        assert_eq!(pixel_size(&pixel, &real_world_axis(0.0)), 0.0);
    }

    #[test]
    fn default_line_is_centered() {
        let line = default_scale_line(1920.0, 1080.0);
        assert_eq!(line, [Pt2::new(480.0, 540.0), Pt2::new(1440.0, 540.0)]);
    }
}
