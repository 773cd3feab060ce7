//! Interactive wireframe viewer.
//!
//! ```sh
//! wirecad-viz --config viewer.toml --scene models/house.obj
//! ```

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::*;
use wirecad_viz::{
    Controls, ViewerConfig, demo_scene, draw_scene, draw_viewport_frame, load_config, load_scene,
};

#[derive(Parser)]
#[command(name = "wirecad-viz")]
#[command(about = "Wireframe CAD viewer")]
#[command(version)]
struct Cli {
    /// Path to a TOML viewer configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// OBJ scene to show (overrides the config file setting).
    #[arg(short, long)]
    scene: Option<PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "wirecad".to_owned(),
        window_width: 640,
        window_height: 710,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ViewerConfig::default(),
    };

    let scene = match cli.scene.as_ref().or(config.scene.as_ref()) {
        Some(path) => load_scene(path)?,
        None => demo_scene()?,
    };
    log::info!("scene has {} objects", scene.len());

    let mut pipeline = config.pipeline();
    let mut controls = Controls::new(config.navigation, pipeline.clone());

    loop {
        if controls.update(&mut pipeline) {
            log::debug!("view changed: {:?}", pipeline.window);
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));

        let drawn = match draw_scene(&pipeline, &scene) {
            Ok(drawn) => drawn,
            Err(err) => {
                draw_text(&format!("cannot render: {err}"), 30.0, 110.0, 18.0, RED);
                0
            }
        };
        draw_viewport_frame(&pipeline.viewport);

        draw_text(
            &format!("wirecad - {} objects, {drawn} drawn", scene.len()),
            10.0,
            20.0,
            20.0,
            WHITE,
        );
        controls.draw_ui(&pipeline, 40.0);

        next_frame().await
    }
}
