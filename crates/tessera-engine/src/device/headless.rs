use anyhow::{Context, Result};

use super::GpuInit;
use super::init::GpuCore;

/// Surface-less GPU context.
///
/// Renders into plain textures instead of a swapchain. Used for one-shot
/// captures and for GPU-backed tests; the render code path is the same one the
/// windowed runtime drives.
pub struct HeadlessGpu {
    core: GpuCore,
}

impl HeadlessGpu {
    /// Acquires an adapter without a compatible surface and creates a device.
    pub async fn new(init: GpuInit) -> Result<Self> {
        let core = GpuCore::request(
            GpuCore::new_instance(),
            &init,
            None,
            "tessera headless device",
        )
        .await?;
        Ok(Self { core })
    }

    /// Blocking variant of [`HeadlessGpu::new`].
    pub fn new_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
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

    /// Creates a texture usable as a presentation stand-in: render attachment
    /// plus copy source for readback.
    pub fn create_output_texture(
        &self,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> wgpu::Texture {
        self.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera headless output"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    /// Submits `encoder` and blocks until the GPU has finished it.
    pub fn submit_and_wait(&self, encoder: wgpu::CommandEncoder) -> Result<()> {
        self.queue().submit(std::iter::once(encoder.finish()));
        self.device()
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed")?;
        Ok(())
    }

    /// Copies layer 0 / mip 0 of a 4-byte-per-texel texture back to the CPU.
    ///
    /// Returns tightly packed rows (`width * 4` bytes each), top row first, in
    /// the texture's own channel order.
    pub fn read_texture_rgba8(&self, texture: &wgpu::Texture) -> Result<Vec<u8>> {
        let format = texture.format();
        anyhow::ensure!(
            format.block_copy_size(None) == Some(4),
            "readback expects a 4-byte texel format, got {format:?}"
        );

        let width = texture.width();
        let height = texture.height();
        let unpadded = width * 4;
        let padded = padded_bytes_per_row(width);

        let staging = self.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera readback staging"),
            size: (padded * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessera readback encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.submit_and_wait(encoder)?;

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device()
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed")?;
        rx.recv()
            .context("readback map callback was dropped")?
            .context("failed to map readback buffer")?;

        let mut pixels = Vec::with_capacity((unpadded * height) as usize);
        {
            let data = slice.get_mapped_range();
            for row in 0..height {
                let start = (row * padded) as usize;
                pixels.extend_from_slice(&data[start..start + unpadded as usize]);
            }
        }
        staging.unmap();

        Ok(pixels)
    }
}

/// Row pitch for a 4-byte-per-texel copy, rounded up to wgpu's copy alignment.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
