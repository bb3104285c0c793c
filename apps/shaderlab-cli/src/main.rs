use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shaderlab_camera::{PLANE_BOTTOM, PLANE_FAR, PLANE_LEFT, PLANE_NEAR, PLANE_RIGHT, PLANE_TOP};
use shaderlab_common::{GameTime, Viewport};
use shaderlab_input::ScriptedMouse;
use shaderlab_render::shaders;
use tracing_subscriber::EnvFilter;

mod scene;

use scene::{Drag, FRAME, Scene, SceneOptions};

#[derive(Parser)]
#[command(name = "shaderlab", about = "Orbit camera and per-part effect demo, rendered as text")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and built-in effect parameters
    Info,
    /// Run scripted frames and print the draw transcript
    Run {
        /// Number of frames to simulate at 60 Hz
        #[arg(short, long, default_value = "3")]
        frames: u32,
        /// Hold the middle button at this offset, e.g. `10,-4`
        #[arg(long, allow_hyphen_values = true)]
        drag: Option<Drag>,
        /// Scroll wheel value after the first frame
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        scroll: i32,
        /// Camera config (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Content manifest (JSON); defaults to the built-in sample content
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// Model asset path
        #[arg(long, default_value = "mdls/suzanne/model")]
        model: String,
        /// Effect cloned onto every mesh part
        #[arg(long, default_value = "shaders/ModelEffect")]
        effect: String,
        /// Draw with the model's own basic effects instead
        #[arg(long)]
        basic: bool,
    },
    /// Print the camera frustum planes after one update
    Frustum {
        /// Camera config (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("shaderlab v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", shaderlab_common::crate_info());
            println!("input: {}", shaderlab_input::crate_info());
            println!("camera: {}", shaderlab_camera::crate_info());
            println!("render: {}", shaderlab_render::crate_info());
            println!("assets: {}", shaderlab_assets::crate_info());
            for program in [shaders::model_effect_program(), shaders::basic_effect_program()] {
                let names: Vec<String> = program
                    .parameters()
                    .iter()
                    .map(|p| format!("{}:{:?}", p.name, p.kind))
                    .collect();
                println!("effect {}: {}", program.name(), names.join(", "));
            }
        }
        Commands::Run {
            frames,
            drag,
            scroll,
            config,
            manifest,
            model,
            effect,
            basic,
        } => {
            let options = SceneOptions {
                config,
                manifest,
                model,
                effect,
                basic,
            };
            let mut scene = Scene::load(&options)?;
            let viewport = *scene.camera().viewport();
            let mut mouse = scene::mouse_script(&viewport, frames, drag, scroll);

            for _ in 0..frames {
                scene.frame(&mut mouse)?;
                print!("{}", scene.take_transcript());
                let camera = scene.camera();
                let p = camera.position();
                println!(
                    "camera: yaw={:.4} pitch={:.4} zoom={:.1} distance={:.3} position=({:.3}, {:.3}, {:.3}) visible={}",
                    camera.yaw(),
                    camera.pitch(),
                    camera.zoom(),
                    camera.distance(),
                    p.x,
                    p.y,
                    p.z,
                    scene.entity().is_visible(camera)
                );
            }
        }
        Commands::Frustum { config } => {
            let mut camera = scene::load_camera(config.as_ref(), Viewport::default())?;
            camera.update(&GameTime::new(FRAME, FRAME), &mut ScriptedMouse::default());

            let p = camera.position();
            println!("camera position=({:.3}, {:.3}, {:.3})", p.x, p.y, p.z);
            let frustum = camera.frustum();
            for (name, index) in [
                ("left", PLANE_LEFT),
                ("right", PLANE_RIGHT),
                ("bottom", PLANE_BOTTOM),
                ("top", PLANE_TOP),
                ("near", PLANE_NEAR),
                ("far", PLANE_FAR),
            ] {
                let plane = frustum.planes()[index];
                println!(
                    "{name:>6}: n=({:.4}, {:.4}, {:.4}) d={:.4}",
                    plane.x, plane.y, plane.z, plane.w
                );
            }
        }
    }

    Ok(())
}
