//! The axis-aligned clip rectangle.

use crate::{GeometryError, Point3D, Result};

/// Tolerance for deciding which side of the window a boundary point lies on.
pub const BOUNDARY_EPSILON: f64 = 1e-6;

/// One side of the clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Left,
    Top,
    Right,
    Bottom,
}

/// Bounds of the clip region in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipperSetup {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

impl Default for ClipperSetup {
    fn default() -> Self {
        Self {
            xmin: -1.0,
            xmax: 1.0,
            ymin: -1.0,
            ymax: 1.0,
        }
    }
}

impl ClipperSetup {
    /// Fails if either range is inverted.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self> {
        if xmin > xmax || ymin > ymax {
            return Err(GeometryError::invalid(format!(
                "clip window [{xmin}, {xmax}] x [{ymin}, {ymax}] is inverted"
            )));
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Left edge.
    #[inline]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    /// Right edge.
    #[inline]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    /// Bottom edge.
    #[inline]
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    /// Top edge.
    #[inline]
    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    /// Horizontal extent.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Vertical extent.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Center of the window, on `z = 0`.
    pub fn center(&self) -> Point3D {
        Point3D::xy((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }

    /// Inclusive containment on x and y.
    pub fn contains(&self, point: Point3D) -> bool {
        (self.xmin..=self.xmax).contains(&point.x) && (self.ymin..=self.ymax).contains(&point.y)
    }

    /// The four corners, clockwise from the top-left.
    pub fn corners(&self) -> [Point3D; 4] {
        [
            Point3D::xy(self.xmin, self.ymax),
            Point3D::xy(self.xmax, self.ymax),
            Point3D::xy(self.xmax, self.ymin),
            Point3D::xy(self.xmin, self.ymin),
        ]
    }

    /// The side a boundary point lies on, matched by coordinate.
    ///
    /// Corners resolve in the order left, top, right, bottom.
    pub fn boundary_of(&self, point: Point3D) -> Option<Boundary> {
        let near = |a: f64, b: f64| (a - b).abs() <= BOUNDARY_EPSILON;
        if near(point.x, self.xmin) {
            Some(Boundary::Left)
        } else if near(point.y, self.ymax) {
            Some(Boundary::Top)
        } else if near(point.x, self.xmax) {
            Some(Boundary::Right)
        } else if near(point.y, self.ymin) {
            Some(Boundary::Bottom)
        } else {
            None
        }
    }

    /// Distance travelled clockwise along the perimeter to reach a boundary
    /// point, starting at the bottom-left corner and going up the left side.
    ///
    /// Left (ascending y), top (ascending x), right (descending y), bottom
    /// (descending x).
    pub fn perimeter_position(&self, point: Point3D) -> Option<f64> {
        let (w, h) = (self.width(), self.height());
        let s = match self.boundary_of(point)? {
            Boundary::Left => point.y - self.ymin,
            Boundary::Top => h + (point.x - self.xmin),
            Boundary::Right => h + w + (self.ymax - point.y),
            Boundary::Bottom => 2.0 * h + w + (self.xmax - point.x),
        };
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_ranges() {
        assert!(ClipperSetup::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(ClipperSetup::new(-1.0, 1.0, 2.0, 1.0).is_err());
        assert!(ClipperSetup::new(0.0, 0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn containment_is_inclusive() {
        let setup = ClipperSetup::default();
        assert!(setup.contains(Point3D::xy(1.0, -1.0)));
        assert!(setup.contains(Point3D::xy(0.0, 0.0)));
        assert!(!setup.contains(Point3D::xy(1.0001, 0.0)));
    }

    #[test]
    fn perimeter_runs_clockwise_from_bottom_left() {
        let setup = ClipperSetup::default();
        let order = [
            Point3D::xy(-1.0, -1.0),
            Point3D::xy(-1.0, 0.5),
            Point3D::xy(0.0, 1.0),
            Point3D::xy(1.0, 0.0),
            Point3D::xy(0.5, -1.0),
        ];
        let positions: Vec<f64> = order
            .iter()
            .map(|&p| setup.perimeter_position(p).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
        assert_eq!(setup.perimeter_position(Point3D::xy(0.0, 0.0)), None);
    }
}
