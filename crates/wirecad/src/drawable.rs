//! The closed set of drawable object kinds and the pipeline's output record.

use crate::{
    Attributes, BSplineCurve, BezierCurve, GeometryError, Line, NamedPoint, Object3D, Point3D,
    Result, Rgb, Wireframe,
};

/// Any object the viewing pipeline can draw.
///
/// Every stage matches on this exhaustively, so adding a variant forces
/// each stage to decide what to do with it.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    Point(NamedPoint),
    Line(Line),
    Wireframe(Wireframe),
    Bezier(BezierCurve),
    BSpline(BSplineCurve),
    Solid(Object3D),
}

impl Drawable {
    /// Short lowercase name of the variant, used in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Line(_) => "line",
            Self::Wireframe(_) => "wireframe",
            Self::Bezier(_) => "bezier curve",
            Self::BSpline(_) => "b-spline curve",
            Self::Solid(_) => "solid",
        }
    }

    /// Returns the attributes of the wrapped object.
    pub fn attributes(&self) -> &Attributes {
        match self {
            Self::Point(p) => p.attributes(),
            Self::Line(l) => l.attributes(),
            Self::Wireframe(w) => w.attributes(),
            Self::Bezier(c) => c.attributes(),
            Self::BSpline(c) => c.attributes(),
            Self::Solid(s) => s.attributes(),
        }
    }

    /// Returns the object name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.attributes().name
    }

    /// Every defining point: positions, endpoints, ring points, control
    /// points or solid vertices.
    pub fn points(&self) -> Vec<Point3D> {
        match self {
            Self::Point(p) => vec![p.position()],
            Self::Line(l) => l.points().to_vec(),
            Self::Wireframe(w) => w.points().to_vec(),
            Self::Bezier(c) => c.control_points().to_vec(),
            Self::BSpline(c) => c.control_points().to_vec(),
            Self::Solid(s) => s.points().to_vec(),
        }
    }

    /// Rebuilds the same variant with every defining point passed through `f`.
    ///
    /// Attributes (and solid faces) are carried over; `self` is untouched.
    pub fn map_points<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(Point3D) -> Result<Point3D>,
    {
        let mut map_all = |points: &[Point3D]| -> Result<Vec<Point3D>> {
            points.iter().map(|&p| f(p)).collect()
        };
        Ok(match self {
            Self::Point(p) => Self::Point(p.with_position(map_all(&[p.position()][..])?[0])),
            Self::Line(l) => {
                let mapped = map_all(&l.points()[..])?;
                Self::Line(l.with_points(mapped[0], mapped[1]))
            }
            Self::Wireframe(w) => Self::Wireframe(w.with_points(map_all(w.points())?)?),
            Self::Bezier(c) => Self::Bezier(c.with_control_points(map_all(c.control_points())?)?),
            Self::BSpline(c) => {
                Self::BSpline(c.with_control_points(map_all(c.control_points())?)?)
            }
            Self::Solid(s) => Self::Solid(s.with_points(map_all(s.points())?)?),
        })
    }

    /// Same geometry under new attributes.
    pub fn with_attributes(&self, attributes: Attributes) -> Result<Self> {
        Ok(match self {
            Self::Point(p) => Self::Point(NamedPoint::new(attributes, p.position())),
            Self::Line(l) => Self::Line(Line::new(attributes, l.p1(), l.p2())),
            Self::Wireframe(w) => Self::Wireframe(Wireframe::new(attributes, w.points().to_vec())?),
            Self::Bezier(c) => Self::Bezier(BezierCurve::new(attributes, c.control_points().to_vec())?),
            Self::BSpline(c) => {
                Self::BSpline(BSplineCurve::new(attributes, c.control_points().to_vec())?)
            }
            Self::Solid(s) => {
                Self::Solid(Object3D::new(attributes, s.points().to_vec(), s.faces().to_vec())?)
            }
        })
    }

    /// Builds the output record from already device-mapped points.
    pub fn to_representation(&self) -> ViewportObjectRepresentation {
        let attributes = self.attributes();
        ViewportObjectRepresentation {
            name: attributes.name.clone(),
            points: self.points(),
            color: attributes.color,
            thickness: attributes.thickness,
        }
    }
}

impl From<NamedPoint> for Drawable {
    fn from(point: NamedPoint) -> Self {
        Self::Point(point)
    }
}

impl From<Line> for Drawable {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Wireframe> for Drawable {
    fn from(wireframe: Wireframe) -> Self {
        Self::Wireframe(wireframe)
    }
}

impl From<BezierCurve> for Drawable {
    fn from(curve: BezierCurve) -> Self {
        Self::Bezier(curve)
    }
}

impl From<BSplineCurve> for Drawable {
    fn from(curve: BSplineCurve) -> Self {
        Self::BSpline(curve)
    }
}

impl From<Object3D> for Drawable {
    fn from(solid: Object3D) -> Self {
        Self::Solid(solid)
    }
}

impl TryFrom<Drawable> for Line {
    type Error = GeometryError;

    fn try_from(drawable: Drawable) -> Result<Self> {
        match drawable {
            Drawable::Line(line) => Ok(line),
            other => Err(GeometryError::TypeMismatch {
                expected: "line",
                found: other.kind(),
            }),
        }
    }
}

impl TryFrom<Drawable> for Wireframe {
    type Error = GeometryError;

    fn try_from(drawable: Drawable) -> Result<Self> {
        match drawable {
            Drawable::Wireframe(wireframe) => Ok(wireframe),
            other => Err(GeometryError::TypeMismatch {
                expected: "wireframe",
                found: other.kind(),
            }),
        }
    }
}

/// A drawable ready for the renderer: device-space points plus style.
///
/// One point is a dot, two a segment, more a closed polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportObjectRepresentation {
    pub name: String,
    pub points: Vec<Point3D>,
    pub color: Rgb,
    pub thickness: f64,
}
