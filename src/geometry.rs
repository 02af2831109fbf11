//! Geometric primitives: plot-coordinate points and the map extent.

use crate::error::{Error, Result};

/// A 2D point in plot coordinates.
///
/// Shapefile coordinates are assumed to be already projected; this crate
/// never transforms them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A sequence of vertices forming one drawable run (a ring or line part).
pub type Segment = Vec<Point>;

/// The rectangular map view in plot coordinates.
///
/// This is the crate's projection parameter: it fixes which slice of the
/// (already projected) plane the axes display.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapExtent {
    /// Minimum x coordinate (left edge).
    pub x_min: f64,
    /// Maximum x coordinate (right edge).
    pub x_max: f64,
    /// Minimum y coordinate (bottom edge).
    pub y_min: f64,
    /// Maximum y coordinate (top edge).
    pub y_max: f64,
}

impl MapExtent {
    /// Create a validated extent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtent`] if any bound is non-finite or a
    /// minimum is not strictly below its maximum.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let finite = [x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite());
        if !finite || x_min >= x_max || y_min >= y_max {
            return Err(Error::InvalidExtent {
                x_min,
                x_max,
                y_min,
                y_max,
            });
        }

        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Width of the extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Check whether a point falls inside the extent.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Center of the extent.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_valid() {
        let e = MapExtent::new(-10.0, 10.0, -5.0, 5.0).unwrap();
        assert!((e.width() - 20.0).abs() < f64::EPSILON);
        assert!((e.height() - 10.0).abs() < f64::EPSILON);
        assert_eq!(e.center(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_extent_rejects_degenerate() {
        assert!(MapExtent::new(1.0, 1.0, 0.0, 1.0).is_err());
        assert!(MapExtent::new(2.0, 1.0, 0.0, 1.0).is_err());
        assert!(MapExtent::new(0.0, 1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_extent_rejects_non_finite() {
        assert!(MapExtent::new(f64::NAN, 1.0, 0.0, 1.0).is_err());
        assert!(MapExtent::new(0.0, f64::INFINITY, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_extent_contains() {
        let e = MapExtent::new(0.0, 10.0, 0.0, 10.0).unwrap();
        assert!(e.contains(Point::new(5.0, 5.0)));
        assert!(e.contains(Point::new(0.0, 10.0)));
        assert!(!e.contains(Point::new(-0.1, 5.0)));
        assert!(!e.contains(Point::new(5.0, 10.1)));
    }

    #[test]
    fn test_point_from_tuple() {
        let p: Point = (1.5, -2.5).into();
        assert!((p.x - 1.5).abs() < f64::EPSILON);
        assert!((p.y + 2.5).abs() < f64::EPSILON);
    }
}
