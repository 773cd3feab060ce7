//! 3D solids as indexed face sets.

use crate::{Attributes, GeometryError, Point3D, Result, Wireframe};

/// A 3D solid: a point list plus faces indexing into it (0-based).
///
/// Only edges are ever drawn; [`Object3D::wireframes`] turns every face
/// into a closed ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Object3D {
    attributes: Attributes,
    points: Vec<Point3D>,
    faces: Vec<Vec<usize>>,
}

impl Object3D {
    /// Creates a solid, validating that every face has at least 3 in-range indices.
    pub fn new(attributes: Attributes, points: Vec<Point3D>, faces: Vec<Vec<usize>>) -> Result<Self> {
        for (i, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(GeometryError::invalid(format!(
                    "face {i} of `{}` has {} indices, needs at least 3",
                    attributes.name,
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&idx| idx >= points.len()) {
                return Err(GeometryError::invalid(format!(
                    "face {i} of `{}` references point {bad}, only {} points exist",
                    attributes.name,
                    points.len()
                )));
            }
        }
        Ok(Self {
            attributes,
            points,
            faces,
        })
    }

    /// Same attributes and faces, new point positions.
    ///
    /// The point count must not change.
    pub fn with_points(&self, points: Vec<Point3D>) -> Result<Self> {
        Self::new(self.attributes.clone(), points, self.faces.clone())
    }

    /// Returns the object attributes.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the vertex list.
    #[inline]
    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    /// Returns the faces as indices into [`Self::points`].
    #[inline]
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// One closed wireframe per face, named after the solid.
    pub fn wireframes(&self) -> Result<Vec<Wireframe>> {
        self.faces
            .iter()
            .map(|face| {
                let ring = face.iter().map(|&idx| self.points[idx]).collect();
                Wireframe::new(self.attributes.clone(), ring)
            })
            .collect()
    }

    /// Generates an axis-aligned cube centred on `center`.
    pub fn cube(attributes: Attributes, center: Point3D, size: f64) -> Self {
        let h = size / 2.0;
        let corner = |dx: f64, dy: f64, dz: f64| Point3D::new(center.x + dx, center.y + dy, center.z + dz);
        let points = vec![
            corner(-h, -h, -h), // 0: left-bottom-back
            corner(h, -h, -h),  // 1: right-bottom-back
            corner(h, h, -h),   // 2: right-top-back
            corner(-h, h, -h),  // 3: left-top-back
            corner(-h, -h, h),  // 4: left-bottom-front
            corner(h, -h, h),   // 5: right-bottom-front
            corner(h, h, h),    // 6: right-top-front
            corner(-h, h, h),   // 7: left-top-front
        ];
        let faces = vec![
            vec![4, 5, 6, 7], // front (+Z)
            vec![1, 0, 3, 2], // back (-Z)
            vec![0, 4, 7, 3], // left (-X)
            vec![5, 1, 2, 6], // right (+X)
            vec![7, 6, 2, 3], // top (+Y)
            vec![0, 1, 5, 4], // bottom (-Y)
        ];
        Self {
            attributes,
            points,
            faces,
        }
    }
}
