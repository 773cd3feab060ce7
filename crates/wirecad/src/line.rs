//! Line segment primitive.

use crate::{Attributes, Point3D};

/// A line segment between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    attributes: Attributes,
    p1: Point3D,
    p2: Point3D,
}

impl Line {
    /// Creates a line from `p1` to `p2`.
    pub fn new(attributes: Attributes, p1: Point3D, p2: Point3D) -> Self {
        Self { attributes, p1, p2 }
    }

    /// Returns the line attributes.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Start point.
    #[inline]
    pub fn p1(&self) -> Point3D {
        self.p1
    }

    /// End point.
    #[inline]
    pub fn p2(&self) -> Point3D {
        self.p2
    }

    /// Both endpoints, start first.
    #[inline]
    pub fn points(&self) -> [Point3D; 2] {
        [self.p1, self.p2]
    }

    /// Same attributes, new endpoints.
    pub fn with_points(&self, p1: Point3D, p2: Point3D) -> Self {
        Self::new(self.attributes.clone(), p1, p2)
    }

    /// Euclidean length in 3D.
    pub fn length(&self) -> f64 {
        self.p1.vector_to(&self.p2).norm()
    }
}
