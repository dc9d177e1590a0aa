use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use whittle_tracer::{render, CameraOptionsBuilder, RenderMode, RenderOptions, Vector3};

/// Whitted-style recursive ray tracer.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Scene file to render.
    scene: PathBuf,

    /// Output PNG path.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 500)]
    width: u32,

    #[arg(long, default_value_t = 500)]
    height: u32,

    /// Vertical field of view, in radians.
    #[arg(long, default_value_t = std::f64::consts::FRAC_PI_2)]
    fov: f64,

    #[arg(long, value_parser = parse_vector3, default_value = "0,0,0")]
    look_from: Vector3,

    #[arg(long, value_parser = parse_vector3, default_value = "0,0,-1")]
    look_to: Vector3,

    /// Render mode: depth, normal, or full.
    #[arg(long, default_value = "full")]
    mode: String,

    /// Recursion budget for reflection/refraction/shadow bounces.
    #[arg(long, default_value_t = 4)]
    ttl: i32,
}

fn parse_vector3(s: &str) -> Result<Vector3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    let [x, y, z] = parts[..] else {
        return Err(format!("expected \"x,y,z\", got {s:?}"));
    };
    let parse = |p: &str| p.trim().parse::<f64>().map_err(|e| e.to_string());
    Ok(Vector3::new(parse(x)?, parse(y)?, parse(z)?))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let camera_options = CameraOptionsBuilder::new(cli.width, cli.height)
        .fov(cli.fov)
        .look_from(cli.look_from)
        .look_to(cli.look_to)
        .build();
    let mode: RenderMode = cli
        .mode
        .parse()
        .with_context(|| format!("invalid --mode {:?}", cli.mode))?;
    let render_options = RenderOptions {
        ttl_depth: cli.ttl,
        mode,
    };

    log::info!("rendering {} -> {}", cli.scene.display(), cli.output.display());
    let image = render(&cli.scene, camera_options, render_options)
        .with_context(|| format!("failed to render {}", cli.scene.display()))?;

    image
        .save_png(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    Ok(())
}
