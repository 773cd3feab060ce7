//! Homogeneous 4×4 transform builders and object-level transforms.
//!
//! Matrices follow the row-vector convention: a point is the row
//! `[x y z 1]` multiplied on the left, so in [`compose`] the first matrix
//! of the list is applied first.

use nalgebra::{Matrix4, RowVector4};

use crate::{Drawable, GeometryError, Point3D, Result};

/// A homogeneous transform in row-vector convention.
pub type Transform = Matrix4<f64>;

/// Translation by `(dx, dy, dz)`.
#[rustfmt::skip]
pub fn translation(dx: f64, dy: f64, dz: f64) -> Transform {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        dx,  dy,  dz,  1.0,
    )
}

/// Scaling about the origin.
pub fn scaling(sx: f64, sy: f64, sz: f64) -> Transform {
    Matrix4::new_nonuniform_scaling(&nalgebra::Vector3::new(sx, sy, sz))
}

/// Counter-clockwise rotation about the X axis (Y towards Z), in degrees.
pub fn rotation_x(degrees: f64) -> Transform {
    rot_x(degrees.to_radians())
}

/// Counter-clockwise rotation about the Y axis (Z towards X), in degrees.
pub fn rotation_y(degrees: f64) -> Transform {
    rot_y(degrees.to_radians())
}

/// Counter-clockwise rotation about the Z axis (X towards Y), in degrees.
pub fn rotation_z(degrees: f64) -> Transform {
    rot_z(degrees.to_radians())
}

#[rustfmt::skip]
pub(crate) fn rot_x(radians: f64) -> Transform {
    let (s, c) = radians.sin_cos();
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, c,   s,   0.0,
        0.0, -s,  c,   0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub(crate) fn rot_y(radians: f64) -> Transform {
    let (s, c) = radians.sin_cos();
    Matrix4::new(
        c,   0.0, -s,  0.0,
        0.0, 1.0, 0.0, 0.0,
        s,   0.0, c,   0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[rustfmt::skip]
pub(crate) fn rot_z(radians: f64) -> Transform {
    let (s, c) = radians.sin_cos();
    Matrix4::new(
        c,   s,   0.0, 0.0,
        -s,  c,   0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Multiplies matrices in list order; an empty list gives the identity.
pub fn compose(matrices: &[Transform]) -> Transform {
    matrices
        .iter()
        .fold(Transform::identity(), |acc, m| acc * m)
}

/// Applies `matrix` to a single point, dropping the homogeneous coordinate.
#[inline]
pub fn transform_point(point: Point3D, matrix: &Transform) -> Point3D {
    let row = RowVector4::new(point.x, point.y, point.z, 1.0) * matrix;
    Point3D::new(row[0], row[1], row[2])
}

/// Applies `matrix` to every point, returning new points.
pub fn transform_points(points: &[Point3D], matrix: &Transform) -> Vec<Point3D> {
    points.iter().map(|&p| transform_point(p, matrix)).collect()
}

/// Rotation by `degrees` about the axis through `origin` towards `toward`.
///
/// Built as: move `origin` to the world origin, rotate about X and then Y
/// so the axis lies on +Z, rotate about Z, and undo the three steps.
pub fn rotation_about_axis(origin: Point3D, toward: Point3D, degrees: f64) -> Result<Transform> {
    let v = origin.vector_to(&toward);
    if v.norm() <= f64::EPSILON {
        return Err(GeometryError::invalid(
            "rotation axis needs two distinct points",
        ));
    }

    // About X: drop the Y component, leaving Z >= 0.
    let a = v.y.atan2(v.z);
    let z_after_x = v.y.hypot(v.z);
    // About Y: drop the X component.
    let b = (-v.x).atan2(z_after_x);

    Ok(compose(&[
        translation(-origin.x, -origin.y, -origin.z),
        rot_x(a),
        rot_y(b),
        rotation_z(degrees),
        rot_y(-b),
        rot_x(-a),
        translation(origin.x, origin.y, origin.z),
    ]))
}

/// Axis for a rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationAxis {
    X,
    Y,
    Z,
    /// Axis through `origin` pointing towards `toward`.
    Arbitrary { origin: Point3D, toward: Point3D },
}

impl RotationAxis {
    /// Parses an axis label (`x`, `y`, `z` or `arbitrary`, any case).
    ///
    /// `arbitrary` needs the two axis points.
    pub fn from_label(label: &str, points: Option<(Point3D, Point3D)>) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            "arbitrary" => points
                .map(|(origin, toward)| Self::Arbitrary { origin, toward })
                .ok_or_else(|| GeometryError::invalid("arbitrary axis needs two points")),
            other => Err(GeometryError::invalid(format!(
                "unknown rotation axis `{other}`"
            ))),
        }
    }

    /// Rotation matrix about this axis, through the world origin for the
    /// principal axes.
    pub fn matrix(&self, degrees: f64) -> Result<Transform> {
        match *self {
            Self::X => Ok(rotation_x(degrees)),
            Self::Y => Ok(rotation_y(degrees)),
            Self::Z => Ok(rotation_z(degrees)),
            Self::Arbitrary { origin, toward } => rotation_about_axis(origin, toward, degrees),
        }
    }
}

/// Point a principal-axis rotation turns around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pivot {
    GeometricCenter,
    Origin,
    Point(Point3D),
}

/// Object-level transforms. Every operation returns a new drawable.
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'a> {
    object: &'a Drawable,
}

impl<'a> Transformer<'a> {
    /// Wraps `object` for transformation.
    pub fn new(object: &'a Drawable) -> Self {
        Self { object }
    }

    /// Mean of the object's defining points.
    pub fn geometric_center(&self) -> Point3D {
        Point3D::centroid(&self.object.points()).unwrap_or_default()
    }

    /// Applies an arbitrary matrix to every defining point.
    pub fn apply(&self, matrix: &Transform) -> Result<Drawable> {
        self.object.map_points(|p| Ok(transform_point(p, matrix)))
    }

    /// Moves the object by a displacement vector.
    pub fn translate(&self, dx: f64, dy: f64, dz: f64) -> Result<Drawable> {
        self.apply(&translation(dx, dy, dz))
    }

    /// Moves the object so its geometric center lands on `target`.
    pub fn translate_to(&self, target: Point3D) -> Result<Drawable> {
        let c = self.geometric_center();
        self.translate(target.x - c.x, target.y - c.y, target.z - c.z)
    }

    /// Scales about the geometric center. A lone point is returned as is.
    pub fn scale(&self, sx: f64, sy: f64, sz: f64) -> Result<Drawable> {
        if let Drawable::Point(_) = self.object {
            return Ok(self.object.clone());
        }
        let c = self.geometric_center();
        self.apply(&compose(&[
            translation(-c.x, -c.y, -c.z),
            scaling(sx, sy, sz),
            translation(c.x, c.y, c.z),
        ]))
    }

    /// Rotates by `degrees` about `axis`.
    ///
    /// Principal axes pass through `pivot`; an arbitrary axis already
    /// carries its own position, so `pivot` is ignored for it.
    pub fn rotate(&self, axis: RotationAxis, degrees: f64, pivot: Pivot) -> Result<Drawable> {
        let rotation = axis.matrix(degrees)?;
        if let RotationAxis::Arbitrary { .. } = axis {
            return self.apply(&rotation);
        }
        let p = match pivot {
            Pivot::GeometricCenter => self.geometric_center(),
            Pivot::Origin => Point3D::default(),
            Pivot::Point(p) => p,
        };
        self.apply(&compose(&[
            translation(-p.x, -p.y, -p.z),
            rotation,
            translation(p.x, p.y, p.z),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attributes, Line, NamedPoint, Wireframe};
    use approx::assert_abs_diff_eq;

    fn assert_close(a: Point3D, b: Point3D) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-9);
    }

    fn square() -> Drawable {
        Wireframe::new(
            Attributes::named("sq"),
            vec![
                Point3D::new(0.0, 0.0, 1.0),
                Point3D::new(0.0, 2.0, 1.0),
                Point3D::new(2.0, 2.0, 1.0),
                Point3D::new(2.0, 0.0, 1.0),
            ],
        )
        .unwrap()
        .into()
    }

    #[test]
    fn rotation_z_is_counter_clockwise() {
        let p = transform_point(Point3D::xy(1.0, 0.0), &rotation_z(90.0));
        assert_close(p, Point3D::xy(0.0, 1.0));
    }

    #[test]
    fn rotation_x_and_y_follow_right_hand_rule() {
        assert_close(
            transform_point(Point3D::new(0.0, 1.0, 0.0), &rotation_x(90.0)),
            Point3D::new(0.0, 0.0, 1.0),
        );
        assert_close(
            transform_point(Point3D::new(0.0, 0.0, 1.0), &rotation_y(90.0)),
            Point3D::new(1.0, 0.0, 0.0),
        );
    }

    #[test]
    fn compose_applies_in_list_order() {
        // Translate then rotate differs from rotate then translate.
        let m = compose(&[translation(1.0, 0.0, 0.0), rotation_z(90.0)]);
        assert_close(transform_point(Point3D::default(), &m), Point3D::xy(0.0, 1.0));
        assert_eq!(compose(&[]), Transform::identity());
    }

    #[test]
    fn translate_round_trip() {
        let shape = square();
        let moved = Transformer::new(&shape).translate(3.5, -7.25, 2.0).unwrap();
        let back = Transformer::new(&moved).translate(-3.5, 7.25, -2.0).unwrap();
        for (a, b) in shape.points().into_iter().zip(back.points()) {
            assert_close(a, b);
        }
    }

    #[test]
    fn full_turn_restores_coordinates() {
        let shape = square();
        for axis in [RotationAxis::X, RotationAxis::Y, RotationAxis::Z] {
            let mut current = shape.clone();
            for _ in 0..8 {
                current = Transformer::new(&current)
                    .rotate(axis, 45.0, Pivot::Origin)
                    .unwrap();
            }
            let mut expected = shape.points();
            let mut actual = current.points();
            // Canonical winding may rotate the ring start; compare as sets.
            let key = |p: &Point3D| ((p.x * 1e6).round() as i64, (p.y * 1e6).round() as i64);
            expected.sort_by_key(key);
            actual.sort_by_key(key);
            for (a, b) in expected.into_iter().zip(actual) {
                assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-6);
                assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-6);
                assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn arbitrary_axis_through_diagonal_permutes_axes() {
        let m = rotation_about_axis(Point3D::default(), Point3D::new(1.0, 1.0, 1.0), 120.0).unwrap();
        assert_close(transform_point(Point3D::new(1.0, 0.0, 0.0), &m), Point3D::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn arbitrary_axis_offset_from_origin() {
        // Axis parallel to Z through (1, 1, 0).
        let m = rotation_about_axis(Point3D::xy(1.0, 1.0), Point3D::new(1.0, 1.0, 5.0), 90.0).unwrap();
        assert_close(transform_point(Point3D::xy(2.0, 1.0), &m), Point3D::xy(1.0, 2.0));
    }

    #[test]
    fn degenerate_axis_is_rejected() {
        let p = Point3D::xy(1.0, 1.0);
        assert!(rotation_about_axis(p, p, 10.0).is_err());
    }

    #[test]
    fn axis_labels() {
        assert_eq!(RotationAxis::from_label("X", None), Ok(RotationAxis::X));
        assert!(matches!(
            RotationAxis::from_label("w", None),
            Err(GeometryError::InvalidArgument(_))
        ));
        assert!(RotationAxis::from_label("arbitrary", None).is_err());
        assert!(
            RotationAxis::from_label(
                "arbitrary",
                Some((Point3D::default(), Point3D::new(0.0, 0.0, 1.0)))
            )
            .is_ok()
        );
    }

    #[test]
    fn scale_about_center() {
        let line: Drawable = Line::new(Attributes::named("l"), Point3D::xy(0.0, 0.0), Point3D::xy(2.0, 0.0)).into();
        let scaled = Transformer::new(&line).scale(2.0, 2.0, 1.0).unwrap();
        assert_eq!(scaled.points(), vec![Point3D::xy(-1.0, 0.0), Point3D::xy(3.0, 0.0)]);
    }

    #[test]
    fn scaling_a_point_is_identity() {
        let point: Drawable = NamedPoint::new(Attributes::named("p"), Point3D::xy(3.0, 4.0)).into();
        assert_eq!(Transformer::new(&point).scale(5.0, 5.0, 5.0).unwrap(), point);
    }

    #[test]
    fn rotate_about_own_center_keeps_center() {
        let shape = square();
        let rotated = Transformer::new(&shape)
            .rotate(RotationAxis::Z, 30.0, Pivot::GeometricCenter)
            .unwrap();
        assert_close(
            Transformer::new(&rotated).geometric_center(),
            Transformer::new(&shape).geometric_center(),
        );
    }

    #[test]
    fn translate_to_moves_center() {
        let shape = square();
        let moved = Transformer::new(&shape).translate_to(Point3D::new(10.0, 10.0, 1.0)).unwrap();
        assert_close(Transformer::new(&moved).geometric_center(), Point3D::new(10.0, 10.0, 1.0));
    }
}
