//! View-plane projection from a VRP/VPN camera.

use serde::Deserialize;

use crate::transform::{self, Transform, rot_x, rot_y};
use crate::{Drawable, GeometryError, Point3D, Result};

/// Components smaller than this are treated as zero when aligning the VPN.
const ALIGN_EPSILON: f64 = 1e-9;

/// Perspective divisors at or below this are rejected.
const DIVISOR_EPSILON: f64 = 1e-9;

/// Camera position and look direction.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Camera {
    /// View reference point: where the camera sits.
    pub vrp: Point3D,
    /// A second point; the view plane normal runs from `vrp` towards it.
    pub vpn_target: Point3D,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            vrp: Point3D::new(0.0, 0.0, 500.0),
            vpn_target: Point3D::new(0.0, 0.0, 499.0),
        }
    }
}

impl Camera {
    /// Returns the camera looking from `vrp` in the direction of `vpn_target`.
    pub fn new(vrp: Point3D, vpn_target: Point3D) -> Self {
        Self { vrp, vpn_target }
    }

    /// Matrix taking world space into view space: the VRP at the origin and
    /// the VPN along −Z, with +Y kept as up where the geometry allows.
    pub fn alignment(&self) -> Result<Transform> {
        let d = self.vrp.vector_to(&self.vpn_target);
        if d.norm() <= ALIGN_EPSILON {
            return Err(GeometryError::invalid(
                "camera VRP and VPN target must differ",
            ));
        }

        let mut matrices = vec![transform::translation(-self.vrp.x, -self.vrp.y, -self.vrp.z)];
        let mut dir = Point3D::new(d.x, d.y, d.z);

        // About X until the direction has no Y component.
        if dir.y.abs() > ALIGN_EPSILON {
            let angle = if dir.z.abs() <= ALIGN_EPSILON {
                dir.y.signum() * std::f64::consts::FRAC_PI_2
            } else {
                (dir.y / dir.z).atan()
            };
            let rotation = rot_x(angle);
            dir = transform::transform_point(dir, &rotation);
            matrices.push(rotation);
        }

        // About Y until it has no X component.
        if dir.x.abs() > ALIGN_EPSILON {
            let angle = if dir.z.abs() <= ALIGN_EPSILON {
                -dir.x.signum() * std::f64::consts::FRAC_PI_2
            } else {
                (-dir.x / dir.z).atan()
            };
            let rotation = rot_y(angle);
            dir = transform::transform_point(dir, &rotation);
            matrices.push(rotation);
        }

        if dir.z > 0.0 {
            matrices.push(rot_y(std::f64::consts::PI));
        }

        Ok(transform::compose(&matrices))
    }
}

/// Projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Projection {
    /// Orthographic: align to the view frame and ignore depth.
    #[default]
    Parallel,
    /// Perspective divide with the given field of view.
    Perspective { fov_degrees: f64 },
}

/// Projects drawables onto the camera's view plane.
#[derive(Debug, Clone)]
pub struct Projector {
    alignment: Transform,
    /// Distance to the centre of projection; `None` for parallel projection.
    distance: Option<f64>,
}

impl Projector {
    /// Builds a projector.
    ///
    /// `window_width` sets the perspective distance
    /// `d = window_width / tan(fov / 2)`.
    pub fn new(camera: &Camera, projection: Projection, window_width: f64) -> Result<Self> {
        let distance = match projection {
            Projection::Parallel => None,
            Projection::Perspective { fov_degrees } => {
                if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
                    return Err(GeometryError::invalid(format!(
                        "field of view must be in (0, 180) degrees, got {fov_degrees}"
                    )));
                }
                Some(window_width / (fov_degrees.to_radians() / 2.0).tan())
            }
        };
        Ok(Self {
            alignment: camera.alignment()?,
            distance,
        })
    }

    /// Perspective distance, if any.
    #[inline]
    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    /// Projects a single point. Depth is kept in `z`.
    pub fn project_point(&self, point: Point3D) -> Option<Point3D> {
        let aligned = transform::transform_point(point, &self.alignment);
        match self.distance {
            None => Some(aligned),
            Some(d) => {
                let divisor = 1.0 - aligned.z / d;
                (divisor > DIVISOR_EPSILON).then(|| {
                    Point3D::new(aligned.x / divisor, aligned.y / divisor, aligned.z)
                })
            }
        }
    }

    /// Projects every defining point of a drawable.
    pub fn project(&self, drawable: &Drawable) -> Result<Drawable> {
        drawable.map_points(|p| {
            self.project_point(p).ok_or_else(|| GeometryError::BehindCamera {
                name: drawable.name().to_owned(),
            })
        })
    }
}
