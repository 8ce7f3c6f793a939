use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::init::GpuCore;
use super::surface::{self, SurfaceErrorAction};
use super::{GpuFrame, GpuInit};

/// Windowed GPU context: a [`GpuCore`] plus the window's swapchain.
///
/// The surface borrows the window for `'w`; the runtime keeps both in one
/// self-referencing entry.
pub struct Gpu<'w> {
    // Dropped before `core` so the surface never outlives its instance.
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    core: GpuCore,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = GpuCore::new_instance();
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;
        let core = GpuCore::request(instance, &init, Some(&surface), "tessera device").await?;

        let config = surface::initial_config(&surface, &core.adapter, &init, size)?;
        surface.configure(&core.device, &config);
        log::debug!(
            "surface configured: {:?} {}x{} {:?}",
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        Ok(Self {
            surface,
            config,
            size,
            core,
        })
    }

    /// Format of the presentation attachment.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Last size handed to [`Gpu::resize`], possibly zero while minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.core.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.core.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.core.queue
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.core.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Acquires the next swapchain texture with a fresh encoder.
    pub fn begin_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .core
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessera frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the frame's commands, then presents its surface texture.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.core.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }

    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(
            &self.surface,
            &self.core.device,
            &self.config,
            self.size,
            err,
        )
    }
}
