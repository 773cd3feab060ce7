//! Macroquad front end for the wirecad viewing pipeline.

use std::path::Path;

use anyhow::Context;
use macroquad::prelude::*;
use nalgebra::{Rotation3, Unit, Vector3};
use wirecad::wavefront::{self, Materials};
use wirecad::{
    Attributes, BSplineCurve, BezierCurve, DisplayFile, FnVisitor, Line, NamedPoint, Object3D,
    Pipeline, Point3D, Rgb, ViewportObjectRepresentation, Wireframe,
};

pub mod config;
pub mod controls;

pub use config::{ViewerConfig, load_config};
pub use controls::{Action, Controls};

/// Radius used to draw single points, in pixels.
const POINT_RADIUS: f32 = 3.0;

/// Converts a pipeline color to a macroquad color.
pub fn to_color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

/// Draws one pipeline output: a dot, a segment or a closed outline.
pub fn draw_representation(object: &ViewportObjectRepresentation) {
    let color = to_color(object.color);
    let thickness = object.thickness as f32;
    let at = |p: &Point3D| vec2(p.x as f32, p.y as f32);

    match object.points.as_slice() {
        [] => {}
        [p] => {
            let c = at(p);
            draw_circle(c.x, c.y, POINT_RADIUS.max(thickness), color);
        }
        [a, b] => {
            let (a, b) = (at(a), at(b));
            draw_line(a.x, a.y, b.x, b.y, thickness, color);
        }
        ring => {
            for (i, p) in ring.iter().enumerate() {
                let (a, b) = (at(p), at(&ring[(i + 1) % ring.len()]));
                draw_line(a.x, a.y, b.x, b.y, thickness, color);
            }
        }
    }
}

/// Renders `scene` and draws each object as the pipeline emits it.
///
/// Returns the number of objects drawn.
pub fn draw_scene(pipeline: &Pipeline, scene: &DisplayFile) -> wirecad::Result<usize> {
    pipeline.render_into(scene.as_slice(), &mut FnVisitor::new(draw_representation))
}

/// Draws the viewport border.
pub fn draw_viewport_frame(viewport: &wirecad::Viewport) {
    draw_rectangle_lines(
        viewport.xmin as f32,
        viewport.ymin as f32,
        viewport.width() as f32,
        viewport.height() as f32,
        1.0,
        DARKGRAY,
    );
}

/// A cube rotated about its own center.
pub fn rotated_cube(attributes: Attributes, center: Point3D, size: f64, rotation: &Rotation3<f64>) -> Object3D {
    let cube = Object3D::cube(attributes, Point3D::default(), size);
    let corners = cube
        .points()
        .iter()
        .map(|p| {
            let turned = rotation * p.as_nalgebra().coords;
            Point3D::new(center.x + turned.x, center.y + turned.y, center.z + turned.z)
        })
        .collect();
    // Same point count as the cube we started from.
    cube.with_points(corners).unwrap_or(cube)
}

/// The built-in scene: one of each drawable kind.
pub fn demo_scene() -> wirecad::Result<DisplayFile> {
    let mut scene = DisplayFile::new();

    let rotation = Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::x()), 0.3)
        * Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::y()), 0.4)
        * Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::z()), 0.25);
    scene.insert(
        rotated_cube(
            Attributes::named("tilted cube").with_color(Rgb::new(230, 120, 60)),
            Point3D::new(-150.0, 50.0, 0.0),
            120.0,
            &rotation,
        )
        .into(),
    )?;
    scene.insert(
        Object3D::cube(
            Attributes::named("cube").with_color(Rgb::new(90, 170, 250)),
            Point3D::new(150.0, 50.0, 0.0),
            120.0,
        )
        .into(),
    )?;
    scene.insert(
        Wireframe::new(
            Attributes::named("triangle").with_color(Rgb::new(120, 220, 120)),
            vec![
                Point3D::xy(-250.0, -250.0),
                Point3D::xy(-100.0, -120.0),
                Point3D::xy(-20.0, -260.0),
            ],
        )?
        .into(),
    )?;
    scene.insert(
        BezierCurve::new(
            Attributes::named("bezier").with_color(Rgb::new(240, 220, 90)).with_thickness(2.0),
            vec![
                Point3D::xy(0.0, -200.0),
                Point3D::xy(60.0, -100.0),
                Point3D::xy(140.0, -300.0),
                Point3D::xy(200.0, -200.0),
                Point3D::xy(260.0, -100.0),
                Point3D::xy(300.0, -250.0),
                Point3D::xy(350.0, -200.0),
            ],
        )?
        .into(),
    )?;
    scene.insert(
        BSplineCurve::new(
            Attributes::named("b-spline").with_color(Rgb::new(220, 110, 220)).with_thickness(2.0),
            vec![
                Point3D::xy(-300.0, 200.0),
                Point3D::xy(-250.0, 280.0),
                Point3D::xy(-150.0, 180.0),
                Point3D::xy(-50.0, 290.0),
                Point3D::xy(50.0, 190.0),
                Point3D::xy(150.0, 260.0),
            ],
        )?
        .into(),
    )?;
    scene.insert(
        Line::new(
            Attributes::named("long line").with_color(Rgb::new(200, 200, 200)),
            Point3D::xy(-500.0, -400.0),
            Point3D::xy(500.0, 350.0),
        )
        .into(),
    )?;
    scene.insert(
        NamedPoint::new(
            Attributes::named("origin marker").with_color(Rgb::new(255, 80, 80)),
            Point3D::default(),
        )
        .into(),
    )?;
    Ok(scene)
}

/// Loads an OBJ scene, coloring it from any `mtllib` found next to it.
pub fn load_scene(path: &Path) -> anyhow::Result<DisplayFile> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    let file = wavefront::parse_obj(&source)
        .with_context(|| format!("parsing scene {}", path.display()))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut materials = Materials::new();
    for library in &file.material_libraries {
        let mtl_path = dir.join(library);
        match std::fs::read_to_string(&mtl_path) {
            Ok(text) => materials.extend(
                wavefront::parse_mtl(&text)
                    .with_context(|| format!("parsing materials {}", mtl_path.display()))?,
            ),
            Err(err) => log::warn!("material library {} not loaded: {err}", mtl_path.display()),
        }
    }

    let mut scene = DisplayFile::new();
    scene.extend(file.apply_materials(&materials)?);
    log::info!("loaded {} objects from {}", scene.len(), path.display());
    Ok(scene)
}
