//! Offscreen render target written by the chunk pass and sampled by the composite pass.

use super::texture::{SamplerConfig, texture_array_bind_group};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Layers allocated for the color texture. Only layer 0 is rendered or sampled.
///
/// GL backends pick `TEXTURE_2D` for single-layer textures, which a
/// `texture_2d_array` binding then reads as black; a second layer forces
/// `TEXTURE_2D_ARRAY`.
const COLOR_LAYERS: u32 = 2;

/// Color + depth attachments sized to the output.
///
/// Layer 0 of the color texture is exposed two ways: a plain 2D view for use as
/// a render attachment, and a one-layer array view (inside `bind_group`) for
/// sampling in the composite pass.
pub struct OffscreenTarget {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    format: wgpu::TextureFormat,
    size: (u32, u32),
}

impl OffscreenTarget {
    pub fn new(
        device: &wgpu::Device,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        sampler: SamplerConfig,
    ) -> Self {
        let size = (size.0.max(1), size.1.max(1));
        let extent = wgpu::Extent3d {
            width: size.0,
            height: size.1,
            depth_or_array_layers: 1,
        };

        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera offscreen color"),
            size: wgpu::Extent3d {
                depth_or_array_layers: COLOR_LAYERS,
                ..extent
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let color_view = color.create_view(&wgpu::TextureViewDescriptor {
            label: Some("tessera offscreen color attachment"),
            dimension: Some(wgpu::TextureViewDimension::D2),
            base_array_layer: 0,
            array_layer_count: Some(1),
            ..Default::default()
        });

        let sampled_view = color.create_view(&wgpu::TextureViewDescriptor {
            label: Some("tessera offscreen color sampled"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            base_array_layer: 0,
            array_layer_count: Some(1),
            ..Default::default()
        });

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera offscreen depth"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = sampler.create_sampler(device, "tessera offscreen sampler");
        let bind_group = texture_array_bind_group(
            device,
            "tessera offscreen bind group",
            &sampled_view,
            &sampler,
        );

        log::debug!("offscreen target {}x{} {:?}", size.0, size.1, format);

        Self {
            color,
            color_view,
            depth_view,
            bind_group,
            format,
            size,
        }
    }

    /// True when this target can be reused for an output of `size` / `format`.
    pub fn matches(&self, size: (u32, u32), format: wgpu::TextureFormat) -> bool {
        self.size == (size.0.max(1), size.1.max(1)) && self.format == format
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// The color texture (layer 0 is the rendered image).
    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color
    }

    pub(crate) fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub(crate) fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
