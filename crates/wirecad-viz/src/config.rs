//! TOML viewer configuration.
//!
//! Every section is optional; a missing file section falls back to the
//! defaults below.
//!
//! ```toml
//! scene = "models/house.obj"
//!
//! [window]
//! center = { x = 0, y = 0 }
//! width = 600
//! height = 600
//! vup_degrees = 0
//!
//! [camera]
//! vrp = { x = 0, y = 0, z = 500 }
//! vpn_target = { x = 0, y = 0, z = 499 }
//!
//! [projection]
//! mode = "perspective"
//! fov_degrees = 60
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use wirecad::{Camera, Decorations, Pipeline, Projection, TessellationConfig, Viewport, Window};

/// Everything the viewer reads from its TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub window: Window,
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,
    #[serde(default)]
    pub camera: Camera,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default)]
    pub tessellation: TessellationConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    /// OBJ file to load instead of the built-in demo scene.
    pub scene: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: Window::default(),
            viewport: default_viewport(),
            camera: Camera::default(),
            projection: Projection::default(),
            tessellation: TessellationConfig::default(),
            grid: GridConfig::default(),
            navigation: NavigationConfig::default(),
            scene: None,
        }
    }
}

/// Leaves room above the drawing area for the status text.
fn default_viewport() -> Viewport {
    Viewport::new(20.0, 620.0, 90.0, 690.0)
}

/// World axes drawn under the scene.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub enabled: bool,
    pub extent: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extent: 1000.0,
        }
    }
}

/// Step sizes for the keyboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Pan and zoom step, as a percentage of the window extent.
    pub step_percent: f64,
    /// Window and camera rotation step.
    pub rotation_degrees: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            step_percent: 10.0,
            rotation_degrees: 15.0,
        }
    }
}

impl ViewerConfig {
    /// Builds the initial pipeline from this configuration.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline {
            camera: self.camera,
            window: self.window,
            projection: self.projection,
            viewport: self.viewport,
            tessellation: self.tessellation,
            decorations: Decorations {
                grid: self.grid.enabled,
                grid_extent: self.grid.extent,
            },
            ..Pipeline::default()
        }
    }
}

/// Reads and parses a viewer configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<ViewerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ViewerConfig =
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use wirecad::Point3D;

    #[test]
    fn empty_file_gives_defaults() {
        let config: ViewerConfig = toml::from_str("").unwrap();
        assert_eq!(config.window, Window::default());
        assert_eq!(config.projection, Projection::Parallel);
        assert!(config.grid.enabled);
        assert!(config.scene.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let source = r#"
scene = "house.obj"

[window]
center = { x = 10.0, y = -5.0 }
width = 300.0

[camera]
vrp = { x = 100.0, y = 0.0, z = 0.0 }
vpn_target = { x = 0.0, y = 0.0, z = 0.0 }

[projection]
mode = "perspective"
fov_degrees = 60.0

[grid]
enabled = false

[navigation]
step_percent = 5.0
"#;
        let config: ViewerConfig = toml::from_str(source).unwrap();
        assert_eq!(config.scene.as_deref(), Some(Path::new("house.obj")));
        assert_eq!(config.window.center, Point3D::xy(10.0, -5.0));
        assert_abs_diff_eq!(config.window.width, 300.0);
        assert_abs_diff_eq!(config.window.height, Window::default().height);
        assert_eq!(config.camera.vrp, Point3D::new(100.0, 0.0, 0.0));
        assert_eq!(config.projection, Projection::Perspective { fov_degrees: 60.0 });
        assert!(!config.grid.enabled);
        assert_abs_diff_eq!(config.navigation.step_percent, 5.0);
        assert_abs_diff_eq!(config.navigation.rotation_degrees, 15.0);

        let pipeline = config.pipeline();
        assert!(!pipeline.decorations.grid);
        assert_eq!(pipeline.viewport, default_viewport());
    }

    #[test]
    fn unknown_projection_mode_is_an_error() {
        let source = "[projection]\nmode = \"fisheye\"\n";
        assert!(toml::from_str::<ViewerConfig>(source).is_err());
    }
}
