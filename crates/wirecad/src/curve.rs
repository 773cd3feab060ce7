//! Cubic Bezier and uniform cubic B-spline curves, and their tessellation
//! into line segments.

use nalgebra::{Matrix4, RowVector4, Vector4};

use crate::{Attributes, GeometryError, Line, Point3D, Result};

/// Bernstein basis in power form.
#[rustfmt::skip]
fn bezier_basis() -> Matrix4<f64> {
    Matrix4::new(
        -1.0,  3.0, -3.0, 1.0,
         3.0, -6.0,  3.0, 0.0,
        -3.0,  3.0,  0.0, 0.0,
         1.0,  0.0,  0.0, 0.0,
    )
}

/// Uniform cubic B-spline basis.
#[rustfmt::skip]
fn bspline_basis() -> Matrix4<f64> {
    Matrix4::new(
        -1.0,  3.0, -3.0, 1.0,
         3.0, -6.0,  3.0, 0.0,
        -3.0,  0.0,  3.0, 0.0,
         1.0,  4.0,  1.0, 0.0,
    ) / 6.0
}

/// Initial forward differences of a cubic at step `delta`.
#[rustfmt::skip]
fn forward_difference_matrix(delta: f64) -> Matrix4<f64> {
    let d2 = delta * delta;
    let d3 = d2 * delta;
    Matrix4::new(
        0.0,       0.0,       0.0,   1.0,
        d3,        d2,        delta, 0.0,
        6.0 * d3,  2.0 * d2,  0.0,   0.0,
        6.0 * d3,  0.0,       0.0,   0.0,
    )
}

/// Most segments a single cubic is split into.
pub const MAX_SEGMENTS: usize = 10_000;

/// Number of uniform segments for a parameter step in `[1 / MAX_SEGMENTS, 1]`.
fn segment_count(step: f64) -> Result<usize> {
    if !(step > 0.0 && step <= 1.0) {
        return Err(GeometryError::invalid(format!(
            "tessellation step must be in (0, 1], got {step}"
        )));
    }
    let count = (1.0 / step).round().max(1.0);
    if count > MAX_SEGMENTS as f64 {
        return Err(GeometryError::invalid(format!(
            "tessellation step {step} needs more than {MAX_SEGMENTS} segments per cubic"
        )));
    }
    Ok(count as usize)
}

/// Splits four control points into per-axis geometry vectors.
fn geometry(points: &[Point3D; 4]) -> [Vector4<f64>; 3] {
    [
        Vector4::new(points[0].x, points[1].x, points[2].x, points[3].x),
        Vector4::new(points[0].y, points[1].y, points[2].y, points[3].y),
        Vector4::new(points[0].z, points[1].z, points[2].z, points[3].z),
    ]
}

/// Joins consecutive polyline points into line segments.
fn polyline_to_lines(attributes: &Attributes, points: &[Point3D]) -> Vec<Line> {
    points
        .windows(2)
        .map(|pair| Line::new(attributes.clone(), pair[0], pair[1]))
        .collect()
}

/// The four control points of one cubic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSetup {
    points: [Point3D; 4],
}

impl BezierSetup {
    /// Creates a segment from its four control points.
    pub fn new(points: [Point3D; 4]) -> Self {
        Self { points }
    }

    /// Returns the control points.
    #[inline]
    pub fn points(&self) -> &[Point3D; 4] {
        &self.points
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    pub fn evaluate(&self, t: f64) -> Point3D {
        let basis = bezier_basis();
        let params = RowVector4::new(t * t * t, t * t, t, 1.0);
        let [gx, gy, gz] = geometry(&self.points);
        Point3D::new(
            (params * basis * gx)[0],
            (params * basis * gy)[0],
            (params * basis * gz)[0],
        )
    }
}

/// A piecewise cubic Bezier curve.
///
/// Control points come in `3k + 1` runs: each segment starts where the
/// previous one ended, so `P1..P4`, `P4..P7`, ... form the setups.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve {
    attributes: Attributes,
    control_points: Vec<Point3D>,
}

impl BezierCurve {
    /// Creates a curve from `3k + 1` control points, `k >= 1`.
    pub fn new(attributes: Attributes, control_points: Vec<Point3D>) -> Result<Self> {
        let n = control_points.len();
        if n < 4 || (n - 1) % 3 != 0 {
            return Err(GeometryError::invalid(format!(
                "bezier curve `{}` needs 3k + 1 control points (k >= 1), got {n}",
                attributes.name
            )));
        }
        Ok(Self {
            attributes,
            control_points,
        })
    }

    /// Same attributes, new control points.
    pub fn with_control_points(&self, control_points: Vec<Point3D>) -> Result<Self> {
        Self::new(self.attributes.clone(), control_points)
    }

    /// Returns the curve attributes.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the control points in order.
    #[inline]
    pub fn control_points(&self) -> &[Point3D] {
        &self.control_points
    }

    /// Returns one setup per cubic segment.
    pub fn setups(&self) -> Vec<BezierSetup> {
        self.control_points
            .windows(4)
            .step_by(3)
            .map(|w| BezierSetup::new([w[0], w[1], w[2], w[3]]))
            .collect()
    }

    /// Samples every segment at uniform parameter steps.
    ///
    /// Shared segment endpoints appear once.
    pub fn tessellate(&self, step: f64) -> Result<Vec<Point3D>> {
        let n = segment_count(step)?;
        let mut points = Vec::with_capacity(self.setups().len() * n + 1);
        for (i, setup) in self.setups().iter().enumerate() {
            let first = if i == 0 { 0 } else { 1 };
            points.extend((first..=n).map(|k| setup.evaluate(k as f64 / n as f64)));
        }
        Ok(points)
    }

    /// Tessellates into line segments carrying the curve's attributes.
    pub fn to_lines(&self, step: f64) -> Result<Vec<Line>> {
        Ok(polyline_to_lines(&self.attributes, &self.tessellate(step)?))
    }
}

/// A uniform cubic B-spline.
#[derive(Debug, Clone, PartialEq)]
pub struct BSplineCurve {
    attributes: Attributes,
    control_points: Vec<Point3D>,
}

impl BSplineCurve {
    /// Creates a B-spline; fails with fewer than 4 control points.
    pub fn new(attributes: Attributes, control_points: Vec<Point3D>) -> Result<Self> {
        if control_points.len() < 4 {
            return Err(GeometryError::invalid(format!(
                "b-spline `{}` needs at least 4 control points, got {}",
                attributes.name,
                control_points.len()
            )));
        }
        Ok(Self {
            attributes,
            control_points,
        })
    }

    /// Same attributes, new control points.
    pub fn with_control_points(&self, control_points: Vec<Point3D>) -> Result<Self> {
        Self::new(self.attributes.clone(), control_points)
    }

    /// Returns the curve attributes.
    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the control points in order.
    #[inline]
    pub fn control_points(&self) -> &[Point3D] {
        &self.control_points
    }

    /// Evaluates every 4-point window with forward differences.
    ///
    /// Each window contributes `1 / step` segments; windows join without
    /// duplicating the shared point.
    pub fn tessellate(&self, step: f64) -> Result<Vec<Point3D>> {
        let n = segment_count(step)?;
        let delta = 1.0 / n as f64;
        let basis = bspline_basis();
        let differences = forward_difference_matrix(delta);

        let windows = self.control_points.len() - 3;
        let mut points = Vec::with_capacity(windows * n + 1);

        for (i, w) in self.control_points.windows(4).enumerate() {
            let [gx, gy, gz] = geometry(&[w[0], w[1], w[2], w[3]]);
            let mut dx = differences * basis * gx;
            let mut dy = differences * basis * gy;
            let mut dz = differences * basis * gz;

            if i == 0 {
                points.push(Point3D::new(dx[0], dy[0], dz[0]));
            }
            for _ in 0..n {
                for d in [&mut dx, &mut dy, &mut dz] {
                    let (first, second, third) = (d[1], d[2], d[3]);
                    d[0] += first;
                    d[1] += second;
                    d[2] += third;
                }
                points.push(Point3D::new(dx[0], dy[0], dz[0]));
            }
        }
        Ok(points)
    }

    /// Tessellates into line segments carrying the curve's attributes.
    pub fn to_lines(&self, step: f64) -> Result<Vec<Line>> {
        Ok(polyline_to_lines(&self.attributes, &self.tessellate(step)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point3D> {
        coords.iter().map(|&(x, y)| Point3D::xy(x, y)).collect()
    }

    #[test]
    fn bezier_rejects_bad_counts() {
        for n in [0, 3, 5, 6] {
            let points = vec![Point3D::default(); n];
            assert!(
                BezierCurve::new(Attributes::named("b"), points).is_err(),
                "{n} points should be rejected"
            );
        }
        assert!(BezierCurve::new(Attributes::named("b"), vec![Point3D::default(); 7]).is_ok());
    }

    #[test]
    fn bezier_hits_its_endpoints() {
        let curve = BezierCurve::new(
            Attributes::named("b"),
            pts(&[(0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0)]),
        )
        .unwrap();
        let samples = curve.tessellate(0.1).unwrap();
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0], Point3D::xy(0.0, 0.0));
        assert_eq!(samples[10], Point3D::xy(4.0, 0.0));
        // Symmetric control polygon: midpoint at x = 2, y = 0.75 * 2.
        assert_abs_diff_eq!(samples[5].x, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(samples[5].y, 1.5, epsilon = 1e-9);
    }

    #[test]
    fn bezier_segments_share_endpoints() {
        let curve = BezierCurve::new(
            Attributes::named("b"),
            pts(&[
                (0.0, 0.0),
                (1.0, 1.0),
                (2.0, 1.0),
                (3.0, 0.0),
                (4.0, -1.0),
                (5.0, -1.0),
                (6.0, 0.0),
            ]),
        )
        .unwrap();
        assert_eq!(curve.setups().len(), 2);
        let samples = curve.tessellate(0.25).unwrap();
        assert_eq!(samples.len(), 9);
        assert_eq!(samples[4], Point3D::xy(3.0, 0.0));
        assert_eq!(curve.to_lines(0.25).unwrap().len(), 8);
    }

    #[test]
    fn bspline_needs_four_points() {
        let three = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert!(matches!(
            BSplineCurve::new(Attributes::named("s"), three),
            Err(GeometryError::InvalidArgument(_))
        ));

        let four = pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0)]);
        let spline = BSplineCurve::new(Attributes::named("s"), four).unwrap();
        assert!(!spline.to_lines(0.1).unwrap().is_empty());
    }

    #[test]
    fn bspline_forward_differences_match_direct_evaluation() {
        let control = pts(&[(0.0, 0.0), (1.0, 3.0), (4.0, 3.0), (5.0, 0.0)]);
        let spline = BSplineCurve::new(Attributes::named("s"), control.clone()).unwrap();
        let samples = spline.tessellate(0.25).unwrap();
        assert_eq!(samples.len(), 5);

        // Uniform B-spline starts at (P0 + 4 P1 + P2) / 6 and ends at (P1 + 4 P2 + P3) / 6.
        let start_x = (control[0].x + 4.0 * control[1].x + control[2].x) / 6.0;
        let end_x = (control[1].x + 4.0 * control[2].x + control[3].x) / 6.0;
        let end_y = (control[1].y + 4.0 * control[2].y + control[3].y) / 6.0;
        assert_abs_diff_eq!(samples[0].x, start_x, epsilon = 1e-9);
        assert_abs_diff_eq!(samples[4].x, end_x, epsilon = 1e-9);
        assert_abs_diff_eq!(samples[4].y, end_y, epsilon = 1e-9);
    }

    #[test]
    fn bspline_windows_join() {
        let control = pts(&[(0.0, 0.0), (1.0, 2.0), (2.0, 0.0), (3.0, 2.0), (4.0, 0.0)]);
        let spline = BSplineCurve::new(Attributes::named("s"), control).unwrap();
        let samples = spline.tessellate(0.5).unwrap();
        // Two windows, two segments each, one shared joint.
        assert_eq!(samples.len(), 5);
    }

    #[test]
    fn rejects_bad_step() {
        let spline = BSplineCurve::new(Attributes::named("s"), vec![Point3D::default(); 4]).unwrap();
        assert!(spline.tessellate(0.0).is_err());
        assert!(spline.tessellate(1.5).is_err());
    }

    #[test]
    fn rejects_steps_finer_than_the_segment_cap() {
        let spline = BSplineCurve::new(Attributes::named("s"), vec![Point3D::default(); 4]).unwrap();
        assert!(matches!(spline.tessellate(1e-12), Err(GeometryError::InvalidArgument(_))));
        let finest = 1.0 / MAX_SEGMENTS as f64;
        assert_eq!(spline.tessellate(finest).unwrap().len(), MAX_SEGMENTS + 1);

        let bezier = BezierCurve::new(Attributes::named("b"), vec![Point3D::default(); 4]).unwrap();
        assert!(bezier.to_lines(1e-12).is_err());
    }
}
