//! Prism command-line renderer.
//!
//! Renders one of the built-in scenes to a PNG:
//!
//! ```text
//! RUST_LOG=info prism --scene glass --spp 16 --output glass.png
//! prism --settings render.json --accelerator linear
//! ```

mod scenes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use prism_core::{AcceleratorKind, RenderSettings};
use prism_renderer::render;

use crate::scenes::SceneKind;

#[derive(Parser, Debug)]
#[command(name = "prism", version, about = "BVH-accelerated Whitted ray tracer")]
struct Args {
    /// JSON render settings; flags below override individual fields
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::Random)]
    scene: SceneKind,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel (0 = one centered ray)
    #[arg(long)]
    spp: Option<u32>,

    /// Maximum recursion depth
    #[arg(long)]
    depth: Option<u32>,

    /// Ray accelerator: bvh or linear
    #[arg(long)]
    accelerator: Option<Accelerator>,

    /// Maximum primitives per BVH leaf
    #[arg(long)]
    leaf_size: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Accelerator {
    Bvh,
    Linear,
}

impl From<Accelerator> for AcceleratorKind {
    fn from(value: Accelerator) -> Self {
        match value {
            Accelerator::Bvh => AcceleratorKind::Bvh,
            Accelerator::Linear => AcceleratorKind::Linear,
        }
    }
}

impl Args {
    /// Settings file (or defaults) with command-line overrides applied.
    fn resolve_settings(&self) -> Result<RenderSettings> {
        let mut settings = match &self.settings {
            Some(path) => RenderSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => RenderSettings::default(),
        };

        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(spp) = self.spp {
            settings.samples_per_pixel = spp;
        }
        if let Some(depth) = self.depth {
            settings.max_depth = depth;
        }
        if let Some(accelerator) = self.accelerator {
            settings.accelerator = accelerator.into();
        }
        if let Some(leaf_size) = self.leaf_size {
            settings.leaf_size = leaf_size;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }

        settings.validate().context("Invalid render settings")?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = args.resolve_settings()?;
    log::debug!("Render settings: {:?}", settings);

    let (scene, camera) = scenes::build(args.scene, &settings);
    let buffer = render(&scene, &camera, &settings);

    image::save_buffer(
        &args.output,
        &buffer.to_rgb8(),
        buffer.width,
        buffer.height,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}
