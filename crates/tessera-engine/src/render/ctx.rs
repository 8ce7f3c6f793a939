/// Device handles plus a description of the output being drawn.
///
/// Built per frame by whoever owns the output: the windowed runtime from the
/// acquired swapchain texture, a headless capture from its output texture.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Format of the attachment the composite pass writes.
    pub output_format: wgpu::TextureFormat,
    /// Physical pixels, never zero.
    pub output_size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        output_format: wgpu::TextureFormat,
        output_size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            output_format,
            output_size: (output_size.0.max(1), output_size.1.max(1)),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.output_size.0 as f32 / self.output_size.1 as f32
    }
}

/// Encoder the passes record into, and the output view they end at.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self {
            encoder,
            color_view,
        }
    }
}

