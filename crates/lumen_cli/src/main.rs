use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::{RenderConfig, Scene};
use lumen_renderer::{FrameBuffer, Renderer};

/// Render a scene of spheres, planes and point lights to a PNG.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Options {
    /// JSON render config; fields left out keep their defaults.
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON scene description. The built-in demo scene is used otherwise.
    #[arg(long, short = 's', value_name = "FILE")]
    scene: Option<PathBuf>,

    /// Where to write the image.
    #[arg(long, short = 'o', value_name = "FILE", default_value = "render.png")]
    output: PathBuf,

    #[arg(long, value_name = "PIXELS")]
    width: Option<u32>,

    #[arg(long, value_name = "PIXELS")]
    height: Option<u32>,

    /// Maximum number of mirror bounces.
    #[arg(long, value_name = "NUM")]
    depth: Option<u32>,

    /// Take one sample per pixel.
    #[arg(long)]
    no_aa: bool,

    /// Worker threads (defaults to one per logical CPU).
    #[arg(long, short = 't', value_name = "NUM")]
    threads: Option<usize>,

    /// Render a warm-up frame first, then time a second one.
    #[arg(long)]
    benchmark: bool,
}

impl Options {
    /// Command-line values win over the config file.
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if self.no_aa {
            config.anti_aliasing = false;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options = Options::parse();

    if let Some(threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    // Everything is validated before any rendering work starts
    let mut config = match &options.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    options.apply(&mut config);
    config.validate()?;

    let scene = match &options.scene {
        Some(path) => Scene::from_json_file(path)?,
        None => Scene::default_scene()?,
    };
    let camera = config.camera()?;
    log::info!(
        "Camera at {} rotated {:?} degrees, fov {}",
        camera.position(),
        camera.euler_degrees(),
        camera.fov()
    );

    log::info!(
        "Rendering {}x{} @ {} spp, reflection depth {}, {} primitives, {} lights",
        config.width,
        config.height,
        config.params().samples_per_pixel(),
        config.max_depth,
        scene.primitive_count(),
        scene.lights().len()
    );

    let renderer = Renderer::new(Arc::new(scene), &camera, config.params())
        .with_bucket_size(config.bucket_size);
    let mut frame = FrameBuffer::new(config.width, config.height);

    if options.benchmark {
        renderer.render_into(&mut frame)?;
        log::info!("Warm-up frame done");
    }

    let start = Instant::now();
    renderer.render_into(&mut frame)?;
    log::info!("time: {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);

    frame
        .to_rgb_image()
        .save(&options.output)
        .with_context(|| format!("Failed to write {}", options.output.display()))?;
    log::info!("Saved to {}", options.output.display());

    Ok(())
}
