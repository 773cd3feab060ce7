//! Closed polygon (wireframe) representation.

use crate::{Attributes, GeometryError, Point3D, Result};

/// A closed ring of points, drawn as a polygon outline.
///
/// The ring is stored in a canonical winding: [`Wireframe::winding_sum`] is
/// never negative, i.e. the points run clockwise when `+y` points up. The
/// polygon clipper walks the clip window in the same direction and relies
/// on this to thread subject and window edges together.
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    attributes: Attributes,
    points: Vec<Point3D>,
}

impl Wireframe {
    /// Creates a new wireframe from a ring of points.
    ///
    /// The closing edge (last point back to the first) is implicit.
    /// Fails with [`GeometryError::InvalidArgument`] if fewer than 3 points
    /// are given.
    pub fn new(attributes: Attributes, mut points: Vec<Point3D>) -> Result<Self> {
        if points.len() < 3 {
            return Err(GeometryError::invalid(format!(
                "wireframe `{}` needs at least 3 points, got {}",
                attributes.name,
                points.len()
            )));
        }
        if Self::winding_sum_of(&points) < 0.0 {
            points.reverse();
        }
        Ok(Self { attributes, points })
    }

    /// Same attributes, new ring. The ring is canonicalized again.
    pub fn with_points(&self, points: Vec<Point3D>) -> Result<Self> {
        Self::new(self.attributes.clone(), points)
    }

    /// Returns the polygon attributes.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the ring, in canonical order.
    #[inline]
    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed wireframe.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates the edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point3D, Point3D)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Edge-form shoelace sum `Σ (x₂ − x₁)(y₂ + y₁)` over the ring.
    ///
    /// Positive for clockwise rings, negative for counter-clockwise, zero for
    /// degenerate (collinear or zero-area) rings.
    pub fn winding_sum(&self) -> f64 {
        Self::winding_sum_of(&self.points)
    }

    fn winding_sum_of(points: &[Point3D]) -> f64 {
        let n = points.len();
        (0..n)
            .map(|i| {
                let a = points[i];
                let b = points[(i + 1) % n];
                (b.x - a.x) * (b.y + a.y)
            })
            .sum()
    }

    /// Computes the mean of the ring points.
    pub fn centroid(&self) -> Point3D {
        Point3D::centroid(&self.points).unwrap_or_default()
    }

    /// Even-odd containment test on the xy projection of the ring.
    pub fn contains_xy(&self, point: Point3D) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}
