use serde::{Deserialize, Serialize};

/// Scale factor applied to frames before detection.
pub const DETECTION_SCALE: f64 = 0.5;

/// Factor mapping half-resolution detections back to the original frame.
pub const UPSCALE_FACTOR: i32 = 2;

/// Face bounding box in pixel coordinates, `(top, right, bottom, left)`.
///
/// `right` and `bottom` are exclusive, matching slice semantics when the
/// box is used to crop a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceLocation {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl FaceLocation {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Builds a location from `[x1, y1, x2, y2]` corners, rounding outward.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            top: y1.floor() as i32,
            right: x2.ceil() as i32,
            bottom: y2.ceil() as i32,
            left: x1.floor() as i32,
        }
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Multiplies every coordinate by `factor`.
    pub fn scaled(&self, factor: i32) -> Self {
        Self {
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
            left: self.left * factor,
        }
    }

    /// Maps a box found on the half-resolution detection frame back to
    /// full-resolution coordinates.
    pub fn to_full_resolution(&self) -> Self {
        self.scaled(UPSCALE_FACTOR)
    }

    /// Restricts the box to `[0, width] x [0, height]`.
    pub fn clamp(&self, width: u32, height: u32) -> Self {
        let w = width as i32;
        let h = height as i32;
        Self {
            top: self.top.clamp(0, h),
            right: self.right.clamp(0, w),
            bottom: self.bottom.clamp(0, h),
            left: self.left.clamp(0, w),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_dimensions() {
        let loc = FaceLocation::new(10, 60, 40, 20);
        assert_eq!(loc.width(), 40);
        assert_eq!(loc.height(), 30);
        assert!(!loc.is_empty());
    }

    #[test]
    fn test_inverted_box_is_empty() {
        let loc = FaceLocation::new(40, 10, 20, 30);
        assert_eq!(loc.width(), 0);
        assert_eq!(loc.height(), 0);
        assert!(loc.is_empty());
    }

    #[rstest]
    #[case::origin((0, 0, 0, 0), (0, 0, 0, 0))]
    #[case::typical((12, 80, 64, 30), (24, 160, 128, 60))]
    #[case::odd((7, 13, 21, 3), (14, 26, 42, 6))]
    fn test_to_full_resolution_doubles_every_coordinate(
        #[case] half: (i32, i32, i32, i32),
        #[case] full: (i32, i32, i32, i32),
    ) {
        let loc = FaceLocation::new(half.0, half.1, half.2, half.3);
        assert_eq!(
            loc.to_full_resolution(),
            FaceLocation::new(full.0, full.1, full.2, full.3)
        );
    }

    #[test]
    fn test_scale_constants_are_inverse() {
        assert_eq!(DETECTION_SCALE * UPSCALE_FACTOR as f64, 1.0);
    }

    #[test]
    fn test_from_corners_rounds_outward() {
        let loc = FaceLocation::from_corners(10.4, 20.6, 30.2, 40.9);
        assert_eq!(loc, FaceLocation::new(20, 31, 41, 10));
    }

    #[test]
    fn test_clamp_to_frame() {
        let loc = FaceLocation::new(-10, 120, 90, -5);
        assert_eq!(loc.clamp(100, 80), FaceLocation::new(0, 100, 80, 0));
    }

    #[test]
    fn test_clamp_fully_outside_is_empty() {
        let loc = FaceLocation::new(200, 300, 250, 220);
        assert!(loc.clamp(100, 100).is_empty());
    }
}
