//! Normalized window to device coordinates.

use serde::Deserialize;

use crate::{Drawable, Point3D, Result};

/// Device rectangle. `ymin` is the top edge: device y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            xmin: 0.0,
            xmax: 600.0,
            ymin: 0.0,
            ymax: 600.0,
        }
    }
}

impl Viewport {
    /// Creates a viewport from its device-space bounds.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Horizontal extent in pixels.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Vertical extent in pixels.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Maps a normalized point, flipping y. z passes through.
    pub fn map_point(&self, point: Point3D) -> Point3D {
        let x = (point.x + 1.0) / 2.0 * self.width() + self.xmin;
        let y = (1.0 - (point.y + 1.0) / 2.0) * self.height() + self.ymin;
        Point3D::new(x, y, point.z)
    }

    /// Maps every point of a clipped drawable into device space.
    pub fn map(&self, drawable: &Drawable) -> Result<Drawable> {
        drawable.map_points(|p| Ok(self.map_point(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_flip_vertically() {
        let vp = Viewport::new(10.0, 110.0, 20.0, 220.0);
        assert_eq!(vp.map_point(Point3D::xy(-1.0, -1.0)), Point3D::xy(10.0, 220.0));
        assert_eq!(vp.map_point(Point3D::xy(1.0, 1.0)), Point3D::xy(110.0, 20.0));
        assert_eq!(vp.map_point(Point3D::xy(0.0, 0.0)), Point3D::xy(60.0, 120.0));
    }
}
