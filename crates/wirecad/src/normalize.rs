//! The world window and its normalization into `[-1, 1]²`.

use serde::Deserialize;

use crate::transform::{self, Transform};
use crate::{Drawable, GeometryError, Point3D, Result};

/// Direction of a window pan, relative to the window's own axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Whether a zoom shrinks (`In`) or grows (`Out`) the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Direction of a view-up rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Left,
    Right,
}

/// The region of view space shown on screen.
///
/// `width` and `height` are full extents. `vup_degrees` rotates the window
/// counter-clockwise; after normalization the window's up vector is +Y.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Window {
    pub center: Point3D,
    pub width: f64,
    pub height: f64,
    pub vup_degrees: f64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            center: Point3D::default(),
            width: 600.0,
            height: 600.0,
            vup_degrees: 0.0,
        }
    }
}

impl Window {
    /// Creates an unrotated window. Both extents must be positive.
    pub fn new(center: Point3D, width: f64, height: f64) -> Result<Self> {
        let window = Self {
            center,
            width,
            height,
            vup_degrees: 0.0,
        };
        window.validate()?;
        Ok(window)
    }

    /// Sets the view-up angle in degrees.
    pub fn with_vup(mut self, vup_degrees: f64) -> Self {
        self.vup_degrees = vup_degrees;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(GeometryError::invalid(format!(
                "window extents must be positive, got {} x {}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Unit vectors of the window's right and up axes in view space.
    fn axes(&self) -> ((f64, f64), (f64, f64)) {
        let (sin, cos) = self.vup_degrees.to_radians().sin_cos();
        ((cos, sin), (-sin, cos))
    }

    /// Moves the center by `step_percent` of the extent along the window's axes.
    pub fn pan(&mut self, direction: PanDirection, step_percent: f64) {
        let (right, up) = self.axes();
        let dx = self.width * step_percent / 100.0;
        let dy = self.height * step_percent / 100.0;
        let (ox, oy) = match direction {
            PanDirection::Right => (right.0 * dx, right.1 * dx),
            PanDirection::Left => (-right.0 * dx, -right.1 * dx),
            PanDirection::Up => (up.0 * dy, up.1 * dy),
            PanDirection::Down => (-up.0 * dy, -up.1 * dy),
        };
        self.center.x += ox;
        self.center.y += oy;
    }

    /// Shrinks (in) or grows (out) both extents by `step_percent / 2` percent,
    /// moving each side by that share of the half-extent.
    ///
    /// A zoom that would collapse the window is ignored.
    pub fn zoom(&mut self, direction: ZoomDirection, step_percent: f64) {
        let factor = match direction {
            ZoomDirection::In => 1.0 - step_percent / 200.0,
            ZoomDirection::Out => 1.0 + step_percent / 200.0,
        };
        if factor <= 0.0 {
            log::warn!("ignoring zoom of {step_percent}%: window would collapse");
            return;
        }
        self.width *= factor;
        self.height *= factor;
    }

    /// Rotates the view-up vector: left subtracts, right adds.
    pub fn rotate(&mut self, direction: RotateDirection, degrees: f64) {
        match direction {
            RotateDirection::Left => self.vup_degrees -= degrees,
            RotateDirection::Right => self.vup_degrees += degrees,
        }
    }

    /// `translate(−center) · rotation_z(−vup) · scale(2/width, 2/height, 1)`.
    pub fn normalization(&self) -> Result<Transform> {
        self.validate()?;
        Ok(transform::compose(&[
            transform::translation(-self.center.x, -self.center.y, 0.0),
            transform::rotation_z(-self.vup_degrees),
            transform::scaling(2.0 / self.width, 2.0 / self.height, 1.0),
        ]))
    }
}

/// Maps projected drawables into normalized window coordinates.
#[derive(Debug, Clone)]
pub struct Normalizer {
    matrix: Transform,
}

impl Normalizer {
    /// Builds the normalization for `window`; fails if the window is degenerate.
    pub fn new(window: &Window) -> Result<Self> {
        Ok(Self {
            matrix: window.normalization()?,
        })
    }

    /// Maps a projected point into normalized window coordinates.
    #[inline]
    pub fn normalize_point(&self, point: Point3D) -> Point3D {
        transform::transform_point(point, &self.matrix)
    }

    /// Maps every point of a drawable into normalized window coordinates.
    pub fn normalize(&self, drawable: &Drawable) -> Result<Drawable> {
        drawable.map_points(|p| Ok(self.normalize_point(p)))
    }
}
