//! Point, color and shared drawable attributes.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Tolerance used by [`Point3D`] equality.
/// Two points closer than this in both x and y compare equal.
pub const POINT_EPSILON: f64 = 1e-4;

/// A point in 3D world (or view, or normalized) space.
///
/// Equality is approximate and only looks at `x` and `y`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point3D {
    /// Creates a new point.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a point on the `z = 0` plane.
    #[inline]
    pub const fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Returns the vector from `self` to `other`.
    #[inline]
    pub fn vector_to(&self, other: &Self) -> Vector3<f64> {
        other.as_nalgebra() - self.as_nalgebra()
    }

    /// Returns the point as a nalgebra point.
    #[inline]
    pub fn as_nalgebra(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// Arithmetic mean of a set of points, `None` when empty.
    pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Point3D>) -> Option<Self> {
        let mut count = 0usize;
        let sum = points.into_iter().fold(Vector3::zeros(), |acc, p| {
            count += 1;
            acc + p.as_nalgebra().coords
        });
        (count > 0).then(|| Point3::from(sum / count as f64).into())
    }
}

impl PartialEq for Point3D {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() <= POINT_EPSILON && (self.y - other.y).abs() <= POINT_EPSILON
    }
}

impl From<Point3<f64>> for Point3D {
    fn from(p: Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl From<Point3D> for Point3<f64> {
    fn from(p: Point3D) -> Self {
        p.as_nalgebra()
    }
}

impl From<[f64; 3]> for Point3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// An RGB stroke color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Default stroke color.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Color of the grid decorations.
    pub const GRAY: Self = Self::new(128, 128, 128);

    /// Creates a color from 8-bit channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from unit-range float channels, as found in `Kd` material lines.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

/// Cosmetic, non-positional fields shared by every drawable.
///
/// Stages that derive new geometry copy these over untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub name: String,
    #[serde(default)]
    pub color: Rgb,
    #[serde(default = "default_thickness")]
    pub thickness: f64,
}

fn default_thickness() -> f64 {
    1.0
}

impl Attributes {
    /// Black, unit-thickness attributes with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: Rgb::BLACK,
            thickness: default_thickness(),
        }
    }

    /// Sets the stroke color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Sets the stroke thickness.
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }
}

/// A single drawable point.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPoint {
    attributes: Attributes,
    position: Point3D,
}

impl NamedPoint {
    /// Creates a point object at `position`.
    pub fn new(attributes: Attributes, position: Point3D) -> Self {
        Self {
            attributes,
            position,
        }
    }

    /// Returns the point attributes.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the position.
    #[inline]
    pub fn position(&self) -> Point3D {
        self.position
    }

    /// Same attributes at a new position.
    pub fn with_position(&self, position: Point3D) -> Self {
        Self::new(self.attributes.clone(), position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_approximate() {
        let a = Point3D::xy(1.0, 2.0);
        let b = Point3D::xy(1.0 + POINT_EPSILON / 2.0, 2.0 - POINT_EPSILON / 2.0);
        assert_eq!(a, b);
        assert_ne!(a, Point3D::xy(1.001, 2.0));
    }

    #[test]
    fn equality_ignores_z() {
        assert_eq!(Point3D::new(1.0, 2.0, 3.0), Point3D::new(1.0, 2.0, -50.0));
    }

    #[test]
    fn centroid_of_square() {
        let pts = [
            Point3D::xy(0.0, 0.0),
            Point3D::xy(2.0, 0.0),
            Point3D::xy(2.0, 2.0),
            Point3D::xy(0.0, 2.0),
        ];
        assert_eq!(Point3D::centroid(&pts), Some(Point3D::xy(1.0, 1.0)));
        assert_eq!(Point3D::centroid(std::iter::empty()), None);
    }

    #[test]
    fn unit_color_conversion_clamps() {
        assert_eq!(Rgb::from_unit(1.0, 0.5, -1.0), Rgb::new(255, 128, 0));
    }
}
