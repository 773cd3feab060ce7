//! Clipping against the normalized window.
//!
//! Points use inclusive containment, lines use Liang-Barsky and wireframes
//! use Weiler-Atherton. Curves and solids have to be tessellated before
//! they reach the clipper.

mod liang_barsky;
mod weiler_atherton;
mod window;

pub use liang_barsky::{ClippedSegment, PARALLEL_EPSILON, clip_segment};
pub use weiler_atherton::clip_polygon;
pub use window::{BOUNDARY_EPSILON, Boundary, ClipperSetup};

use crate::{Drawable, GeometryError, Line, NamedPoint, Result, Wireframe};

/// Geometry that can be clipped against a rectangular window.
pub trait Clippable: Sized {
    /// Returns the visible pieces: none when fully outside, possibly several
    /// for a polygon that straddles the window.
    fn clip(&self, setup: &ClipperSetup) -> Vec<Self>;
}

impl Clippable for NamedPoint {
    fn clip(&self, setup: &ClipperSetup) -> Vec<Self> {
        if setup.contains(self.position()) {
            vec![self.clone()]
        } else {
            Vec::new()
        }
    }
}

impl Clippable for Line {
    fn clip(&self, setup: &ClipperSetup) -> Vec<Self> {
        clip_segment(setup, self.p1(), self.p2())
            .map(|s| self.with_points(s.start, s.end))
            .into_iter()
            .collect()
    }
}

impl Clippable for Wireframe {
    fn clip(&self, setup: &ClipperSetup) -> Vec<Self> {
        clip_polygon(setup, self)
    }
}

/// Clips drawables against a fixed window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clipper {
    setup: ClipperSetup,
}

impl Clipper {
    /// Creates a clipper for the given window.
    pub fn new(setup: ClipperSetup) -> Self {
        Self { setup }
    }

    /// Returns the clipping window.
    #[inline]
    pub fn setup(&self) -> &ClipperSetup {
        &self.setup
    }

    /// Clips one drawable.
    ///
    /// Fails with [`GeometryError::TypeMismatch`] for curves and solids.
    pub fn clip(&self, drawable: &Drawable) -> Result<Vec<Drawable>> {
        fn wrap<T: Clippable + Into<Drawable>>(pieces: Vec<T>) -> Vec<Drawable> {
            pieces.into_iter().map(Into::into).collect()
        }

        match drawable {
            Drawable::Point(p) => Ok(wrap(p.clip(&self.setup))),
            Drawable::Line(l) => Ok(wrap(l.clip(&self.setup))),
            Drawable::Wireframe(w) => Ok(wrap(w.clip(&self.setup))),
            Drawable::Bezier(_) | Drawable::BSpline(_) | Drawable::Solid(_) => {
                Err(GeometryError::TypeMismatch {
                    expected: "point, line or wireframe",
                    found: drawable.kind(),
                })
            }
        }
    }

    /// Clips every drawable, skipping (and logging) the ones that fail.
    pub fn clip_all(&self, drawables: &[Drawable]) -> Vec<Drawable> {
        let mut visible = Vec::with_capacity(drawables.len());
        for drawable in drawables {
            match self.clip(drawable) {
                Ok(pieces) => visible.extend(pieces),
                Err(err) => log::warn!("skipping `{}` while clipping: {err}", drawable.name()),
            }
        }
        log::debug!("clipped {} drawables into {} pieces", drawables.len(), visible.len());
        visible
    }
}
