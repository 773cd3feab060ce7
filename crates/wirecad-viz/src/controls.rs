//! Keyboard navigation of the window and camera.

use macroquad::prelude::*;
use wirecad::transform::{self, rotation_about_axis};
use wirecad::{
    PanDirection, Pipeline, Point3D, Projection, RotateDirection, ZoomDirection,
};

use crate::config::NavigationConfig;

/// Field of view used when switching to perspective without one configured.
const DEFAULT_FOV_DEGREES: f64 = 60.0;

/// One navigation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    Pan(PanDirection),
    Zoom(ZoomDirection),
    RotateWindow(RotateDirection),
    /// Orbit the camera around its target, horizontally (`true`) or vertically.
    Orbit { horizontal: bool, degrees: f64 },
    ToggleProjection,
    ToggleGrid,
    Reset,
}

/// Applies keyboard actions to a pipeline's window and camera.
pub struct Controls {
    config: NavigationConfig,
    initial: Pipeline,
    last_fov: f64,
}

impl Controls {
    /// `initial` is restored by [`Action::Reset`].
    pub fn new(config: NavigationConfig, initial: Pipeline) -> Self {
        let last_fov = match initial.projection {
            Projection::Perspective { fov_degrees } => fov_degrees,
            Projection::Parallel => DEFAULT_FOV_DEGREES,
        };
        Self {
            config,
            initial,
            last_fov,
        }
    }

    /// Reads this frame's key presses.
    pub fn actions(&self) -> Vec<Action> {
        let step = self.config.rotation_degrees;
        let bindings = [
            (KeyCode::W, Action::Pan(PanDirection::Up)),
            (KeyCode::S, Action::Pan(PanDirection::Down)),
            (KeyCode::A, Action::Pan(PanDirection::Left)),
            (KeyCode::D, Action::Pan(PanDirection::Right)),
            (KeyCode::Equal, Action::Zoom(ZoomDirection::In)),
            (KeyCode::Minus, Action::Zoom(ZoomDirection::Out)),
            (KeyCode::Q, Action::RotateWindow(RotateDirection::Left)),
            (KeyCode::E, Action::RotateWindow(RotateDirection::Right)),
            (KeyCode::Left, Action::Orbit { horizontal: true, degrees: -step }),
            (KeyCode::Right, Action::Orbit { horizontal: true, degrees: step }),
            (KeyCode::Up, Action::Orbit { horizontal: false, degrees: step }),
            (KeyCode::Down, Action::Orbit { horizontal: false, degrees: -step }),
            (KeyCode::P, Action::ToggleProjection),
            (KeyCode::G, Action::ToggleGrid),
            (KeyCode::R, Action::Reset),
        ];
        bindings
            .into_iter()
            .filter(|(key, _)| is_key_pressed(*key))
            .map(|(_, action)| action)
            .collect()
    }

    /// Handles keyboard input. Returns true if the view changed.
    pub fn update(&mut self, pipeline: &mut Pipeline) -> bool {
        let mut changed = false;
        for action in self.actions() {
            changed |= self.apply(pipeline, action);
        }
        changed
    }

    /// Applies one action. Returns false if it had no effect.
    pub fn apply(&mut self, pipeline: &mut Pipeline, action: Action) -> bool {
        match action {
            Action::Pan(direction) => pipeline.window.pan(direction, self.config.step_percent),
            Action::Zoom(direction) => pipeline.window.zoom(direction, self.config.step_percent),
            Action::RotateWindow(direction) => {
                pipeline.window.rotate(direction, self.config.rotation_degrees)
            }
            Action::Orbit { horizontal, degrees } => return orbit(pipeline, horizontal, degrees),
            Action::ToggleProjection => {
                pipeline.projection = match pipeline.projection {
                    Projection::Parallel => Projection::Perspective {
                        fov_degrees: self.last_fov,
                    },
                    Projection::Perspective { fov_degrees } => {
                        self.last_fov = fov_degrees;
                        Projection::Parallel
                    }
                };
            }
            Action::ToggleGrid => pipeline.decorations.grid = !pipeline.decorations.grid,
            Action::Reset => *pipeline = self.initial.clone(),
        }
        true
    }

    /// Draws the key help and current view state.
    pub fn draw_ui(&self, pipeline: &Pipeline, y_offset: f32) {
        let window = &pipeline.window;
        let projection = match pipeline.projection {
            Projection::Parallel => "parallel".to_string(),
            Projection::Perspective { fov_degrees } => format!("perspective {fov_degrees:.0}°"),
        };
        draw_text(
            &format!(
                "Window: center ({:.1}, {:.1}) size {:.1} x {:.1} vup {:.0}°",
                window.center.x, window.center.y, window.width, window.height, window.vup_degrees
            ),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Projection: {projection}"),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            "WASD pan | +/- zoom | Q/E rotate | arrows orbit | [P]rojection | [G]rid | [R]eset",
            10.0,
            y_offset + 40.0,
            16.0,
            DARKGRAY,
        );
    }
}

/// Rotates the camera position about its target. The camera keeps looking
/// at the target.
fn orbit(pipeline: &mut Pipeline, horizontal: bool, degrees: f64) -> bool {
    let camera = &mut pipeline.camera;
    let target = camera.vpn_target;
    let axis_end = if horizontal {
        Point3D::new(target.x, target.y + 1.0, target.z)
    } else {
        // Horizontal axis perpendicular to the view direction.
        let view = camera.vrp.vector_to(&target);
        let side = nalgebra::Vector3::new(-view.z, 0.0, view.x);
        if side.norm() <= f64::EPSILON {
            log::debug!("camera looks straight along Y; vertical orbit skipped");
            return false;
        }
        Point3D::new(target.x + side.x, target.y, target.z + side.z)
    };
    match rotation_about_axis(target, axis_end, degrees) {
        Ok(matrix) => {
            camera.vrp = transform::transform_point(camera.vrp, &matrix);
            true
        }
        Err(err) => {
            log::warn!("camera orbit failed: {err}");
            false
        }
    }
}
