//! Liang-Barsky parametric line clipping.

use super::ClipperSetup;
use crate::Point3D;

/// `|p|` at or below this counts as parallel to a boundary.
pub const PARALLEL_EPSILON: f64 = 1e-6;

/// The visible part of a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedSegment {
    pub start: Point3D,
    pub end: Point3D,
    /// Parameter of `start` along the original segment.
    pub u1: f64,
    /// Parameter of `end` along the original segment.
    pub u2: f64,
}

/// Clips `p1 → p2` against the window. `None` when nothing is visible.
///
/// z is interpolated along with x and y.
pub fn clip_segment(setup: &ClipperSetup, p1: Point3D, p2: Point3D) -> Option<ClippedSegment> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let dz = p2.z - p1.z;

    let checks = [
        (-dx, p1.x - setup.xmin()),
        (dx, setup.xmax() - p1.x),
        (-dy, p1.y - setup.ymin()),
        (dy, setup.ymax() - p1.y),
    ];

    let mut u1: f64 = 0.0;
    let mut u2: f64 = 1.0;
    for (p, q) in checks {
        if p.abs() <= PARALLEL_EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            u1 = u1.max(r);
        } else {
            u2 = u2.min(r);
        }
    }

    if u1 > u2 {
        return None;
    }

    let at = |u: f64| Point3D::new(p1.x + dx * u, p1.y + dy * u, p1.z + dz * u);
    Some(ClippedSegment {
        start: at(u1),
        end: at(u2),
        u1,
        u2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(a: (f64, f64), b: (f64, f64)) -> Option<(Point3D, Point3D)> {
        clip_segment(&ClipperSetup::default(), Point3D::xy(a.0, a.1), Point3D::xy(b.0, b.1))
            .map(|s| (s.start, s.end))
    }

    #[test]
    fn horizontal_line_is_cut_to_window() {
        assert_eq!(
            clip((-2.0, 0.0), (2.0, 0.0)),
            Some((Point3D::xy(-1.0, 0.0), Point3D::xy(1.0, 0.0)))
        );
    }

    #[test]
    fn inside_line_is_untouched() {
        let segment = clip_segment(
            &ClipperSetup::default(),
            Point3D::xy(-0.5, -0.25),
            Point3D::xy(0.75, 0.5),
        )
        .unwrap();
        assert_eq!(segment.u1, 0.0);
        assert_eq!(segment.u2, 1.0);
        assert_eq!(segment.start, Point3D::xy(-0.5, -0.25));
        assert_eq!(segment.end, Point3D::xy(0.75, 0.5));
    }

    #[test]
    fn outside_lines_are_dropped() {
        assert_eq!(clip((2.0, 2.0), (3.0, 5.0)), None);
        // parallel to the left boundary, outside it
        assert_eq!(clip((-3.0, -0.5), (-3.0, 0.5)), None);
        // crosses the corner region without entering
        assert_eq!(clip((0.0, 3.0), (3.0, 0.0)), None);
    }

    #[test]
    fn diagonal_is_cut_on_two_sides() {
        let (a, b) = clip((-3.0, -3.0), (3.0, 3.0)).unwrap();
        assert_eq!(a, Point3D::xy(-1.0, -1.0));
        assert_eq!(b, Point3D::xy(1.0, 1.0));
    }

    #[test]
    fn depth_is_interpolated() {
        let s = clip_segment(
            &ClipperSetup::default(),
            Point3D::new(-3.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 4.0),
        )
        .unwrap();
        assert_eq!(s.start.x, -1.0);
        assert_eq!(s.start.z, 2.0);
    }
}
