//! The viewing pipeline: world drawables in, device-space records out.
//!
//! ```text
//! tessellate → decorate → project → normalize → clip → map → emit
//! ```
//!
//! Stages are pure. A failure on one object is logged and that object is
//! skipped; only a misconfigured camera or window fails the whole frame.

use serde::Deserialize;

use crate::{
    Attributes, Camera, Clipper, ClipperSetup, Drawable, Line, Normalizer, Point3D, Projection,
    Projector, Result, Rgb, Viewport, ViewportObjectRepresentation, ViewportVisitor, Window,
};

/// Parameter steps used when turning curves into line segments.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    pub bezier_step: f64,
    pub bspline_step: f64,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            bezier_step: 0.05,
            bspline_step: 0.1,
        }
    }
}

/// Non-scene geometry drawn under the objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decorations {
    /// Draw the x and y axes.
    pub grid: bool,
    /// Half-length of each axis line.
    pub grid_extent: f64,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            grid: true,
            grid_extent: 1000.0,
        }
    }
}

impl Decorations {
    /// No decorations at all.
    pub fn none() -> Self {
        Self {
            grid: false,
            ..Self::default()
        }
    }

    fn lines(&self) -> Vec<Drawable> {
        if !self.grid {
            return Vec::new();
        }
        let e = self.grid_extent;
        let style = |name: &str| Attributes::named(name).with_color(Rgb::GRAY);
        vec![
            Line::new(style("x-axis"), Point3D::xy(-e, 0.0), Point3D::xy(e, 0.0)).into(),
            Line::new(style("y-axis"), Point3D::xy(0.0, -e), Point3D::xy(0.0, e)).into(),
        ]
    }
}

/// Everything needed to turn a scene into one frame.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub camera: Camera,
    pub window: Window,
    pub projection: Projection,
    pub viewport: Viewport,
    pub clip: ClipperSetup,
    pub tessellation: TessellationConfig,
    pub decorations: Decorations,
}

impl Pipeline {
    /// A pipeline with default camera, projection and clipping for the given window and viewport.
    pub fn new(window: Window, viewport: Viewport) -> Self {
        Self {
            window,
            viewport,
            ..Self::default()
        }
    }

    /// Renders a frame into a vector.
    pub fn render(&self, objects: &[Drawable]) -> Result<Vec<ViewportObjectRepresentation>> {
        let mut visitor = crate::CollectingVisitor::new();
        self.render_into(objects, &mut visitor)?;
        Ok(visitor.into_objects())
    }

    /// Renders a frame, handing each visible piece to `visitor` in draw order.
    ///
    /// Returns the number of pieces emitted.
    pub fn render_into<V: ViewportVisitor>(&self, objects: &[Drawable], visitor: &mut V) -> Result<usize> {
        let projector = Projector::new(&self.camera, self.projection, self.window.width)?;
        let normalizer = Normalizer::new(&self.window)?;
        let clipper = Clipper::new(self.clip);

        let mut pieces = self.decorations.lines();
        for object in objects {
            match self.tessellate(object) {
                Ok(expanded) => pieces.extend(expanded),
                Err(err) => log::warn!("skipping `{}` during tessellation: {err}", object.name()),
            }
        }
        log::debug!("{} objects tessellated into {} pieces", objects.len(), pieces.len());

        let mut emitted = 0;
        for piece in &pieces {
            let staged = projector
                .project(piece)
                .and_then(|projected| normalizer.normalize(&projected))
                .and_then(|normalized| clipper.clip(&normalized));
            let visible = match staged {
                Ok(visible) => visible,
                Err(err) => {
                    log::warn!("skipping `{}`: {err}", piece.name());
                    continue;
                }
            };
            for clipped in visible {
                match self.viewport.map(&clipped) {
                    Ok(mapped) => {
                        visitor.visit(&mapped.to_representation());
                        emitted += 1;
                    }
                    Err(err) => log::warn!("skipping `{}` in viewport mapping: {err}", clipped.name()),
                }
            }
        }
        log::debug!("emitted {emitted} visible pieces");
        Ok(emitted)
    }

    /// Breaks curves into lines and solids into face rings. Other kinds pass
    /// through unchanged.
    pub fn tessellate(&self, drawable: &Drawable) -> Result<Vec<Drawable>> {
        Ok(match drawable {
            Drawable::Point(_) | Drawable::Line(_) | Drawable::Wireframe(_) => vec![drawable.clone()],
            Drawable::Bezier(curve) => curve
                .to_lines(self.tessellation.bezier_step)?
                .into_iter()
                .map(Drawable::from)
                .collect(),
            Drawable::BSpline(curve) => curve
                .to_lines(self.tessellation.bspline_step)?
                .into_iter()
                .map(Drawable::from)
                .collect(),
            Drawable::Solid(solid) => solid.wireframes()?.into_iter().map(Drawable::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BSplineCurve, BezierCurve, NamedPoint, Object3D, Wireframe};

    fn pipeline() -> Pipeline {
        Pipeline {
            decorations: Decorations::none(),
            ..Pipeline::new(
                Window::new(Point3D::default(), 200.0, 200.0).unwrap(),
                Viewport::new(0.0, 400.0, 0.0, 400.0),
            )
        }
    }

    #[test]
    fn point_maps_to_device_space() {
        let scene = [NamedPoint::new(Attributes::named("p"), Point3D::xy(50.0, 50.0)).into()];
        let out = pipeline().render(&scene).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "p");
        assert_eq!(out[0].points, vec![Point3D::xy(300.0, 100.0)]);
    }

    #[test]
    fn objects_outside_the_window_are_dropped() {
        let scene = [
            NamedPoint::new(Attributes::named("far"), Point3D::xy(500.0, 0.0)).into(),
            Line::new(Attributes::named("gone"), Point3D::xy(200.0, 200.0), Point3D::xy(300.0, 300.0)).into(),
        ];
        assert!(pipeline().render(&scene).unwrap().is_empty());
    }

    #[test]
    fn grid_lines_come_first() {
        let mut p = pipeline();
        p.decorations = Decorations::default();
        let scene = [NamedPoint::new(Attributes::named("p"), Point3D::default()).into()];
        let out = p.render(&scene).unwrap();
        let names: Vec<_> = out.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["x-axis", "y-axis", "p"]);
        // axes are clipped to the window and span the viewport
        assert_eq!(out[0].points, vec![Point3D::xy(0.0, 200.0), Point3D::xy(400.0, 200.0)]);
    }

    #[test]
    fn curves_and_solids_are_broken_up() {
        let p = pipeline();
        let bezier = BezierCurve::new(
            Attributes::named("b"),
            vec![
                Point3D::xy(-50.0, 0.0),
                Point3D::xy(-25.0, 50.0),
                Point3D::xy(25.0, 50.0),
                Point3D::xy(50.0, 0.0),
            ],
        )
        .unwrap();
        let pieces = p.tessellate(&bezier.into()).unwrap();
        assert_eq!(pieces.len(), 20);
        assert!(pieces.iter().all(|d| matches!(d, Drawable::Line(_))));

        let spline = BSplineCurve::new(
            Attributes::named("s"),
            vec![
                Point3D::xy(0.0, 0.0),
                Point3D::xy(10.0, 20.0),
                Point3D::xy(20.0, 0.0),
                Point3D::xy(30.0, 20.0),
                Point3D::xy(40.0, 0.0),
            ],
        )
        .unwrap();
        assert_eq!(p.tessellate(&spline.into()).unwrap().len(), 20);

        let cube = Object3D::cube(Attributes::named("c"), Point3D::default(), 10.0);
        let faces = p.tessellate(&cube.into()).unwrap();
        assert_eq!(faces.len(), 6);
        assert!(faces.iter().all(|d| matches!(d, Drawable::Wireframe(_))));
    }

    #[test]
    fn failing_objects_are_skipped() {
        let mut p = pipeline();
        p.projection = Projection::Perspective { fov_degrees: 90.0 };
        // window width 200, fov 90 → d = 200; camera at z = 500 puts z = 0 at -500.
        let behind = Line::new(
            Attributes::named("behind"),
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(0.0, 0.0, 900.0),
        );
        let fine = Wireframe::new(
            Attributes::named("fine"),
            vec![Point3D::xy(-10.0, -10.0), Point3D::xy(-10.0, 10.0), Point3D::xy(10.0, 0.0)],
        )
        .unwrap();
        let out = p.render(&[behind.into(), fine.into()]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "fine");
    }

    #[test]
    fn bad_window_fails_the_frame() {
        let mut p = pipeline();
        p.window.width = 0.0;
        assert!(p.render(&[]).is_err());
    }
}
