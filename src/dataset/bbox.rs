//! Bounding box type in XYWH pixel format.
//!
//! Both the per-image CSV input and the COCO output use `[x, y, width,
//! height]` with `(x, y)` as the top-left corner in absolute pixels, so
//! this crate carries boxes in that format end to end.
//!
//! Note: this type does NOT enforce positive dimensions in the
//! constructor, allowing malformed boxes to exist after parsing. This is
//! intentional - the row-filtering boundary rejects and counts them
//! rather than the parser panicking or erroring.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BBoxXYWH {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBoxXYWH {
    /// Creates a new bounding box from top-left corner and dimensions.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the maximum x coordinate (x + width).
    #[inline]
    pub fn xmax(&self) -> f64 {
        self.x + self.width
    }

    /// Returns the maximum y coordinate (y + height).
    #[inline]
    pub fn ymax(&self) -> f64 {
        self.y + self.height
    }

    /// Returns the area of the bounding box.
    ///
    /// May be zero or negative if the box is malformed.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Returns true if all fields are finite (not NaN or infinite).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Returns true if both dimensions are strictly positive.
    #[inline]
    pub fn has_positive_size(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Returns the box as the `[x, y, width, height]` array COCO expects.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_area() {
        let bbox = BBoxXYWH::new(107.37, 48.42, 22.0, 22.0);
        assert_eq!(bbox.area(), 484.0);
    }

    #[test]
    fn test_bbox_corners() {
        let bbox = BBoxXYWH::new(10.0, 20.0, 90.0, 60.0);
        assert_eq!(bbox.xmax(), 100.0);
        assert_eq!(bbox.ymax(), 80.0);
    }

    #[test]
    fn test_bbox_positive_size() {
        assert!(BBoxXYWH::new(0.0, 0.0, 1.0, 1.0).has_positive_size());
        assert!(!BBoxXYWH::new(0.0, 0.0, 0.0, 1.0).has_positive_size());
        assert!(!BBoxXYWH::new(0.0, 0.0, 10.0, -2.0).has_positive_size());
    }

    #[test]
    fn test_bbox_finite() {
        assert!(BBoxXYWH::new(1.0, 2.0, 3.0, 4.0).is_finite());
        assert!(!BBoxXYWH::new(f64::NAN, 2.0, 3.0, 4.0).is_finite());
        assert!(!BBoxXYWH::new(1.0, 2.0, f64::INFINITY, 4.0).is_finite());
    }

    #[test]
    fn test_bbox_to_array() {
        let bbox = BBoxXYWH::new(1.5, 2.5, 3.0, 4.0);
        assert_eq!(bbox.to_array(), [1.5, 2.5, 3.0, 4.0]);
    }
}
