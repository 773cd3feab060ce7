//! Weiler-Atherton polygon clipping against the rectangular window.
//!
//! Both the subject ring and the window are walked clockwise. Every place
//! the subject crosses the window boundary becomes an intersection node
//! present in both sequences; tracing alternates between them:
//! subject from an entering node to the next exiting node, then window from
//! that exiting node to the next entering node, until the start is reached
//! again. Each closed trace is one output polygon.

use std::collections::HashSet;

use super::ClipperSetup;
use super::liang_barsky::clip_segment;
use crate::{Point3D, Wireframe};

/// Parameters within this distance of 0 or 1 count as the segment's end.
const PARAM_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Tag {
    Original,
    Entering(usize),
    Exiting(usize),
}

#[derive(Debug, Clone, Copy)]
struct Node {
    point: Point3D,
    tag: Tag,
}

impl Node {
    fn new(point: Point3D, tag: Tag) -> Self {
        Self { point, tag }
    }
}

/// Inside part of one subject edge, with its parameters.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: Point3D,
    end: Point3D,
    u1: f64,
    u2: f64,
}

impl Span {
    fn starts_at_vertex(&self) -> bool {
        self.u1 <= PARAM_EPSILON
    }

    fn ends_at_vertex(&self) -> bool {
        self.u2 >= 1.0 - PARAM_EPSILON
    }
}

/// Clips a wireframe against the window. Returns 0..n rings carrying the
/// source attributes.
pub fn clip_polygon(setup: &ClipperSetup, polygon: &Wireframe) -> Vec<Wireframe> {
    let points = polygon.points();
    let n = points.len();

    let spans: Vec<Option<Span>> = polygon
        .edges()
        .map(|(a, b)| {
            clip_segment(setup, a, b)
                .filter(|s| s.u2 - s.u1 > PARAM_EPSILON)
                .map(|s| Span {
                    start: s.start,
                    end: s.end,
                    u1: s.u1,
                    u2: s.u2,
                })
        })
        .collect();

    let mut subject = Vec::with_capacity(n * 2);
    let mut crossings = Vec::new();
    let mut next_id = 0;
    for i in 0..n {
        subject.push(Node::new(points[i], Tag::Original));
        let Some(span) = spans[i] else { continue };
        let prev = spans[(i + n - 1) % n];
        let next = spans[(i + 1) % n];

        let continues_from_prev = span.starts_at_vertex() && prev.is_some_and(|p| p.ends_at_vertex());
        if !continues_from_prev {
            let node = Node::new(span.start, Tag::Entering(next_id));
            next_id += 1;
            subject.push(node);
            crossings.push(node);
        }

        let continues_into_next = span.ends_at_vertex() && next.is_some_and(|s| s.starts_at_vertex());
        if !continues_into_next {
            let node = Node::new(span.end, Tag::Exiting(next_id));
            next_id += 1;
            subject.push(node);
            crossings.push(node);
        }
    }

    if crossings.is_empty() {
        return unclipped(setup, polygon);
    }

    let window = window_sequence(setup, &crossings);
    trace(&subject, &window)
        .into_iter()
        .filter_map(|ring| polygon.with_points(ring).ok())
        .collect()
}

/// Polygon with no boundary crossings: fully inside, enclosing the window,
/// or fully outside.
fn unclipped(setup: &ClipperSetup, polygon: &Wireframe) -> Vec<Wireframe> {
    if polygon.points().iter().all(|&p| setup.contains(p)) {
        return vec![polygon.clone()];
    }
    if polygon.contains_xy(setup.center()) {
        return polygon
            .with_points(setup.corners().to_vec())
            .into_iter()
            .collect();
    }
    Vec::new()
}

/// Corners plus crossings, ordered clockwise along the perimeter.
fn window_sequence(setup: &ClipperSetup, crossings: &[Node]) -> Vec<Node> {
    let corners = [
        Point3D::xy(setup.xmin(), setup.ymin()),
        Point3D::xy(setup.xmin(), setup.ymax()),
        Point3D::xy(setup.xmax(), setup.ymax()),
        Point3D::xy(setup.xmax(), setup.ymin()),
    ];
    let mut keyed: Vec<(f64, usize, Node)> = corners
        .iter()
        .map(|&c| Node::new(c, Tag::Original))
        .chain(crossings.iter().copied())
        .enumerate()
        .filter_map(|(order, node)| {
            let position = setup.perimeter_position(node.point);
            if position.is_none() {
                log::debug!("crossing {:?} is off the window boundary", node.point);
            }
            position.map(|s| (s, order, node))
        })
        .collect();
    // Ties keep corners ahead of crossings.
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, _, node)| node).collect()
}

fn trace(subject: &[Node], window: &[Node]) -> Vec<Vec<Point3D>> {
    let position = |nodes: &[Node], tag: Tag| nodes.iter().position(|n| n.tag == tag);
    let step_limit = 2 * (subject.len() + window.len());

    let mut visited = HashSet::new();
    let mut rings = Vec::new();

    for (start_idx, start) in subject.iter().enumerate() {
        let Tag::Entering(_) = start.tag else { continue };
        if visited.contains(&start.tag) {
            continue;
        }
        visited.insert(start.tag);

        let mut ring = Vec::new();
        let mut idx = start_idx;
        let mut steps = 0;
        let closed = 'walk: loop {
            // Subject: entering node up to and including the next exiting node.
            loop {
                let node = subject[idx];
                ring.push(node.point);
                if let Tag::Exiting(_) = node.tag {
                    break;
                }
                idx = (idx + 1) % subject.len();
                steps += 1;
                if steps > step_limit {
                    break 'walk false;
                }
            }

            // Window: from that exiting node to the next entering node.
            let Some(mut widx) = position(window, subject[idx].tag) else {
                break 'walk false;
            };
            loop {
                widx = (widx + 1) % window.len();
                steps += 1;
                if steps > step_limit {
                    break 'walk false;
                }
                let node = window[widx];
                match node.tag {
                    Tag::Original => ring.push(node.point),
                    Tag::Exiting(_) => {}
                    Tag::Entering(_) if node.tag == start.tag => break 'walk true,
                    Tag::Entering(_) => {
                        visited.insert(node.tag);
                        match position(subject, node.tag) {
                            Some(next) => {
                                idx = next;
                                break;
                            }
                            None => break 'walk false,
                        }
                    }
                }
            }
        };

        if !closed {
            log::warn!("polygon trace did not close; dropping a partial ring");
            continue;
        }
        ring.dedup_by(|a, b| a == b);
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }
    rings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Attributes;

    fn square(half: f64, cx: f64, cy: f64) -> Wireframe {
        Wireframe::new(
            Attributes::named("sq"),
            vec![
                Point3D::xy(cx - half, cy - half),
                Point3D::xy(cx - half, cy + half),
                Point3D::xy(cx + half, cy + half),
                Point3D::xy(cx + half, cy - half),
            ],
        )
        .unwrap()
    }

    fn contains_point(ring: &Wireframe, p: Point3D) -> bool {
        ring.points().iter().any(|&q| q == p)
    }

    #[test]
    fn inside_polygon_is_unchanged() {
        let sq = square(0.5, 0.0, 0.0);
        let out = clip_polygon(&ClipperSetup::default(), &sq);
        assert_eq!(out, vec![sq]);
    }

    #[test]
    fn outside_polygon_is_dropped() {
        let out = clip_polygon(&ClipperSetup::default(), &square(0.5, 5.0, 5.0));
        assert!(out.is_empty());
    }

    #[test]
    fn enclosing_polygon_becomes_the_window() {
        let out = clip_polygon(&ClipperSetup::default(), &square(2.0, 0.0, 0.0));
        assert_eq!(out.len(), 1);
        let ring = &out[0];
        assert_eq!(ring.len(), 4);
        for corner in ClipperSetup::default().corners() {
            assert!(contains_point(ring, corner), "missing corner {corner:?}");
        }
        assert_eq!(ring.attributes().name, "sq");
    }

    #[test]
    fn overlapping_polygon_is_cut_at_the_boundary() {
        // Spans x in [0, 3]: the right part is cut off at x = 1.
        let rect = Wireframe::new(
            Attributes::named("r"),
            vec![
                Point3D::xy(0.0, -0.5),
                Point3D::xy(0.0, 0.5),
                Point3D::xy(3.0, 0.5),
                Point3D::xy(3.0, -0.5),
            ],
        )
        .unwrap();
        let out = clip_polygon(&ClipperSetup::default(), &rect);
        assert_eq!(out.len(), 1);
        let ring = &out[0];
        assert_eq!(ring.len(), 4);
        for p in [
            Point3D::xy(0.0, -0.5),
            Point3D::xy(0.0, 0.5),
            Point3D::xy(1.0, 0.5),
            Point3D::xy(1.0, -0.5),
        ] {
            assert!(contains_point(ring, p), "missing {p:?}");
        }
    }

    #[test]
    fn corner_overlap_picks_up_the_window_corner() {
        let out = clip_polygon(&ClipperSetup::default(), &square(1.0, 1.0, 1.0));
        assert_eq!(out.len(), 1);
        let ring = &out[0];
        for p in [
            Point3D::xy(0.0, 0.0),
            Point3D::xy(0.0, 1.0),
            Point3D::xy(1.0, 1.0),
            Point3D::xy(1.0, 0.0),
        ] {
            assert!(contains_point(ring, p), "missing {p:?}");
        }
        assert!(ring.winding_sum() >= 0.0);
    }

    #[test]
    fn polygon_touching_the_window_at_a_vertex_is_dropped() {
        let setup = ClipperSetup::default();
        let triangle = Wireframe::new(
            Attributes::named("t"),
            vec![
                Point3D::xy(-1.5, 3.5),
                Point3D::xy(-1.5, 2.0),
                Point3D::xy(-0.5, 1.0),
            ],
        )
        .unwrap();
        let out = clip_polygon(&setup, &triangle);
        assert!(out.iter().flat_map(|w| w.points()).all(|&p| setup.contains(p)));
        assert!(out.is_empty());
    }

    #[test]
    fn polygon_sharing_a_window_edge_from_outside_is_dropped() {
        let setup = ClipperSetup::default();
        for rect in [
            // Sits on top of y = 1.
            vec![
                Point3D::xy(-0.5, 1.0),
                Point3D::xy(-0.5, 2.0),
                Point3D::xy(0.5, 2.0),
                Point3D::xy(0.5, 1.0),
            ],
            // Sits right of x = 1.
            vec![
                Point3D::xy(1.0, -0.5),
                Point3D::xy(1.0, 0.5),
                Point3D::xy(2.0, 0.5),
                Point3D::xy(2.0, -0.5),
            ],
        ] {
            let rect = Wireframe::new(Attributes::named("r"), rect).unwrap();
            assert!(clip_polygon(&setup, &rect).is_empty());
        }
    }

    #[test]
    fn polygon_with_an_edge_on_the_boundary_inside_is_kept() {
        let rect = Wireframe::new(
            Attributes::named("r"),
            vec![
                Point3D::xy(-0.5, 0.0),
                Point3D::xy(-0.5, 1.0),
                Point3D::xy(1.0, 1.0),
                Point3D::xy(1.0, 0.0),
            ],
        )
        .unwrap();
        let out = clip_polygon(&ClipperSetup::default(), &rect);
        assert_eq!(out, vec![rect]);
    }

    #[test]
    fn u_shape_splits_into_two_polygons() {
        // A U opening upwards whose arms poke out of the top of the window.
        let u = Wireframe::new(
            Attributes::named("u"),
            vec![
                Point3D::xy(-0.8, -0.5),
                Point3D::xy(-0.8, 2.0),
                Point3D::xy(-0.4, 2.0),
                Point3D::xy(-0.4, 0.0),
                Point3D::xy(0.4, 0.0),
                Point3D::xy(0.4, 2.0),
                Point3D::xy(0.8, 2.0),
                Point3D::xy(0.8, -0.5),
            ],
        )
        .unwrap();
        let out = clip_polygon(&ClipperSetup::default(), &u);
        // The base stays connected: one polygon with both arms cut at y = 1.
        assert_eq!(out.len(), 1);
        assert!(contains_point(&out[0], Point3D::xy(-0.8, 1.0)));
        assert!(contains_point(&out[0], Point3D::xy(0.8, 1.0)));

        // Cut the base off instead: shift the window up so only the arms remain.
        let upper = ClipperSetup::new(-1.0, 1.0, 0.5, 1.5).unwrap();
        let arms = clip_polygon(&upper, &u);
        assert_eq!(arms.len(), 2);
        assert!(arms.iter().all(|w| w.len() == 4));
    }
}
