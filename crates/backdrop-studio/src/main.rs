//! Backdrop studio
//!
//! Opens a window and mounts one procedural backdrop: the wave-interference
//! grid or the spiral particle field.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use backdrop_engine::device::GpuInit;
use backdrop_engine::logging::init_logging;
use backdrop_engine::stage::Backdrop;
use backdrop_engine::window::Runtime;
use backdrop_fields::{ParticleField, WaveField};

use config::{StudioConfig, VisualKind};

/// Procedural animated backdrops
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Visual to mount
    #[arg(short, long, value_enum)]
    visual: Option<VisualKind>,

    /// Override the target frame rate
    #[arg(long)]
    fps: Option<f32>,

    /// Override the wave grid resolution (cells per side)
    #[arg(long)]
    resolution: Option<u32>,

    /// Override the particle count
    #[arg(long)]
    count: Option<u32>,

    /// Seed for a reproducible particle cloud
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter, e.g. "debug" or "backdrop_engine=debug"
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut StudioConfig) {
        if let Some(visual) = self.visual {
            config.visual = visual;
        }
        if let Some(fps) = self.fps {
            config.waves.target_fps = fps;
            config.particles.target_fps = fps;
        }
        if let Some(resolution) = self.resolution {
            config.waves.resolution = resolution;
        }
        if let Some(count) = self.count {
            config.particles.count = count;
        }
        if self.seed.is_some() {
            config.particles.seed = self.seed;
        }
        if let Some(filter) = &self.log {
            config.logging.filter = Some(filter.clone());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => StudioConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StudioConfig::default(),
    };
    args.apply(&mut config);

    init_logging(config.logging_config());
    log::info!("mounting {:?}", config.visual);

    let runtime = config.runtime_config();
    let gpu_init = GpuInit::default();

    match config.visual {
        VisualKind::Waves => {
            let options = &config.waves;
            let backdrop = Backdrop::new(options.stage_config(), WaveField::new(options));
            Runtime::run(runtime, gpu_init, backdrop)
        }
        VisualKind::Particles => {
            let options = &config.particles;
            let backdrop = Backdrop::new(options.stage_config(), ParticleField::new(options));
            Runtime::run(runtime, gpu_init, backdrop)
        }
    }
}
