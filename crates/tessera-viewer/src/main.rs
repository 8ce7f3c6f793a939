//! Tessera viewer: renders a demo world through the chunk + composite passes.
//!
//! Opens a window by default; `--capture out.png` renders a single frame
//! headlessly instead.

mod app;
mod camera;
mod capture;
mod resources;
mod scene;
mod stats;
mod textures;
mod world;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use winit::dpi::LogicalSize;

use tessera_engine::device::GpuInit;
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::render::{
    AddressMode, FilterMode, FrameRenderer, RendererConfig, SamplerConfig, ShadingMode,
};
use tessera_engine::window::{Runtime, RuntimeConfig};

use crate::app::{TITLE, ViewerApp};
use crate::camera::FlyCamera;
use crate::scene::SceneKind;
use crate::world::World;

#[derive(Parser, Debug)]
#[command(name = "tessera-viewer")]
#[command(about = "Voxel chunk renderer demo (block pass + fullscreen composite)")]
struct Cli {
    /// Fragment policy of the chunk pass
    #[arg(long, value_enum, default_value_t = Shading::Textured)]
    shading: Shading,

    /// Demo world contents
    #[arg(long, value_enum, default_value_t = SceneKind::Cube)]
    scene: SceneKind,

    /// Block texture filtering
    #[arg(long, value_enum, default_value_t = Filter::Nearest)]
    filter: Filter,

    /// Render one frame headlessly and write it to this PNG instead of opening a window
    #[arg(long)]
    capture: Option<PathBuf>,

    /// Output width in pixels (capture) or logical window width
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Output height in pixels (capture) or logical window height
    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Shading {
    Textured,
    Debug,
}

impl From<Shading> for ShadingMode {
    fn from(s: Shading) -> Self {
        match s {
            Shading::Textured => ShadingMode::Textured,
            Shading::Debug => ShadingMode::Debug,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Filter {
    Nearest,
    Linear,
}

impl From<Filter> for SamplerConfig {
    fn from(f: Filter) -> Self {
        let filter = match f {
            Filter::Nearest => FilterMode::Nearest,
            Filter::Linear => FilterMode::Linear,
        };
        SamplerConfig {
            filter,
            address_mode: AddressMode::ClampToEdge,
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let cli = Cli::parse();

    let world = World::build(cli.scene);
    let (min, max) = world.bounds().unwrap_or_default();
    let camera = FlyCamera::framing(min, max);
    let config = RendererConfig {
        shading: cli.shading.into(),
        clear_color: wgpu::Color {
            r: 0.45,
            g: 0.65,
            b: 0.9,
            a: 1.0,
        },
        ..Default::default()
    };
    let sampler = SamplerConfig::from(cli.filter);

    if let Some(path) = cli.capture {
        let size = (cli.width, cli.height);
        return capture::capture_png(&path, size, config, &world, sampler, &camera);
    }

    let runtime = RuntimeConfig {
        title: TITLE.to_string(),
        initial_size: LogicalSize::new(cli.width as f64, cli.height as f64),
    };
    let app = ViewerApp::new(FrameRenderer::new(config)?, world, sampler, camera);
    Runtime::run(runtime, GpuInit::default(), app)
}
