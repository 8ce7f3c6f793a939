use std::path::Path;

use anyhow::{Context, Result};

use tessera_engine::device::{GpuInit, HeadlessGpu};
use tessera_engine::render::{
    FrameRenderer, RenderCtx, RenderTarget, RendererConfig, SamplerConfig,
};

use crate::camera::FlyCamera;
use crate::resources::SceneResources;
use crate::world::World;

/// sRGB so the PNG holds display-encoded bytes, like a swapchain would.
const CAPTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Renders one frame without a window and writes it to `path` as PNG.
pub fn capture_png(
    path: &Path,
    (width, height): (u32, u32),
    config: RendererConfig,
    world: &World,
    sampler: SamplerConfig,
    camera: &FlyCamera,
) -> Result<()> {
    anyhow::ensure!(width > 0 && height > 0, "capture size must be non-zero");

    let gpu = HeadlessGpu::new_blocking(GpuInit::default())
        .context("no GPU adapter available for headless capture")?;
    log::info!("capture adapter: {}", gpu.adapter().get_info().name);

    let mut resources = SceneResources::new(
        gpu.device(),
        gpu.queue(),
        world,
        config.shading,
        sampler,
    )?;

    resources
        .camera
        .write(gpu.queue(), camera.view_proj(width as f32 / height as f32));

    let output = gpu.create_output_texture(width, height, CAPTURE_FORMAT);
    let view = output.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessera capture encoder"),
        });

    let mut renderer = FrameRenderer::new(config)?;
    {
        let rctx = RenderCtx::new(gpu.device(), gpu.queue(), CAPTURE_FORMAT, (width, height));
        let mut target = RenderTarget::new(&mut encoder, &view);
        resources.draw(|frame| renderer.render(&rctx, &mut target, frame));
    }

    gpu.submit_and_wait(encoder)?;
    let pixels = gpu.read_texture_rgba8(&output)?;

    let image = image::RgbaImage::from_raw(width, height, pixels)
        .context("readback size does not match the capture size")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))?;

    log::info!("wrote {}x{} capture to {}", width, height, path.display());
    Ok(())
}
