//! Wireframe CAD viewing pipeline.
//!
//! World objects go through tessellation, projection onto the camera's view
//! plane, normalization into the window, clipping and finally viewport
//! mapping:
//!
//! ```
//! use wirecad::{Attributes, Drawable, Line, Pipeline, Point3D, Viewport, Window};
//!
//! let window = Window::new(Point3D::default(), 200.0, 200.0).unwrap();
//! let pipeline = Pipeline::new(window, Viewport::new(0.0, 400.0, 0.0, 400.0));
//!
//! let scene: Vec<Drawable> = vec![
//!     Line::new(Attributes::named("diagonal"), Point3D::xy(-500.0, -500.0), Point3D::xy(500.0, 500.0)).into(),
//! ];
//! let frame = pipeline.render(&scene).unwrap();
//! assert!(frame.iter().any(|o| o.name == "diagonal"));
//! ```

pub mod clip;
mod curve;
mod display_file;
mod drawable;
mod error;
mod line;
mod normalize;
pub mod pipeline;
mod point;
mod projection;
mod solid;
pub mod transform;
mod viewport;
mod visitor;
pub mod wavefront;
mod wireframe;

pub use clip::{Clippable, Clipper, ClipperSetup};
pub use curve::{BSplineCurve, BezierCurve, BezierSetup, MAX_SEGMENTS};
pub use display_file::DisplayFile;
pub use drawable::{Drawable, ViewportObjectRepresentation};
pub use error::{GeometryError, Result};
pub use line::Line;
pub use normalize::{Normalizer, PanDirection, RotateDirection, Window, ZoomDirection};
pub use pipeline::{Decorations, Pipeline, TessellationConfig};
pub use point::{Attributes, NamedPoint, POINT_EPSILON, Point3D, Rgb};
pub use projection::{Camera, Projection, Projector};
pub use solid::Object3D;
pub use transform::{Pivot, RotationAxis, Transform, Transformer};
pub use viewport::Viewport;
pub use visitor::{CollectingVisitor, FnVisitor, ViewportVisitor};
pub use wireframe::Wireframe;
