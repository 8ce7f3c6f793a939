use std::fmt;

use super::chunk::{ChunkFrame, ChunkPass, ShadingMode};
use super::composite::CompositePass;
use super::ctx::{RenderCtx, RenderTarget};
use super::target::OffscreenTarget;
use super::texture::SamplerConfig;

/// Renderer configuration.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Fragment policy of the chunk pass.
    pub shading: ShadingMode,

    /// Background written to the offscreen target before chunks are drawn.
    pub clear_color: wgpu::Color,

    /// Offscreen color format. `None` follows the output format.
    ///
    /// Must be a filterable float format; the composite pass samples it through
    /// a filtering sampler.
    pub offscreen_format: Option<wgpu::TextureFormat>,

    /// Sampler the composite pass reads the offscreen target with.
    ///
    /// Nearest + clamp keeps the composite a pixel-exact copy at equal sizes.
    pub composite_sampler: SamplerConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Textured,
            clear_color: wgpu::Color::BLACK,
            offscreen_format: None,
            composite_sampler: SamplerConfig::NEAREST_CLAMP,
        }
    }
}

/// True when `format` can back the offscreen target: uncompressed and sampled
/// as a filterable float without optional device features.
pub fn offscreen_format_supported(format: wgpu::TextureFormat) -> bool {
    !format.is_compressed()
        && matches!(
            format.sample_type(None, None),
            Some(wgpu::TextureSampleType::Float { filterable: true })
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererConfigError {
    UnfilterableOffscreenFormat(wgpu::TextureFormat),
}

impl fmt::Display for RendererConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnfilterableOffscreenFormat(format) => {
                write!(f, "offscreen format {format:?} is not a filterable float format")
            }
        }
    }
}

impl std::error::Error for RendererConfigError {}

/// Frame orchestrator: chunk pass into the offscreen target, then composite
/// onto the output.
///
/// Both passes are recorded into the same encoder in that order, which is the
/// only ordering guarantee the composite pass relies on.
pub struct FrameRenderer {
    config: RendererConfig,
    chunk: ChunkPass,
    composite: CompositePass,
    offscreen: Option<OffscreenTarget>,
    rejected_output_format: Option<wgpu::TextureFormat>,
}

impl FrameRenderer {
    pub fn new(config: RendererConfig) -> Result<Self, RendererConfigError> {
        if let Some(format) = config.offscreen_format
            && !offscreen_format_supported(format)
        {
            return Err(RendererConfigError::UnfilterableOffscreenFormat(format));
        }

        Ok(Self {
            chunk: ChunkPass::new(config.shading),
            composite: CompositePass::new(),
            offscreen: None,
            rejected_output_format: None,
            config,
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn shading(&self) -> ShadingMode {
        self.chunk.shading()
    }

    pub fn set_shading(&mut self, shading: ShadingMode) {
        self.config.shading = shading;
        self.chunk.set_shading(shading);
    }

    pub fn set_clear_color(&mut self, clear: wgpu::Color) {
        self.config.clear_color = clear;
    }

    /// The offscreen target of the last rendered frame, if any.
    pub fn offscreen(&self) -> Option<&OffscreenTarget> {
        self.offscreen.as_ref()
    }

    /// Drops the offscreen target if it no longer matches `size`; the next
    /// `render` recreates it.
    pub fn resize(&mut self, size: (u32, u32)) {
        let size = (size.0.max(1), size.1.max(1));
        if self.offscreen.as_ref().is_some_and(|t| t.size() != size) {
            log::debug!("offscreen target released for resize to {}x{}", size.0, size.1);
            self.offscreen = None;
        }
    }

    /// Renders one frame into `target.color_view`.
    ///
    /// The offscreen target is (re)created when the output size or format changed.
    /// An output format that cannot back the offscreen target draws nothing.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &ChunkFrame<'_>,
    ) {
        let format = self.config.offscreen_format.unwrap_or(ctx.output_format);
        self.ensure_offscreen(ctx.device, ctx.output_size, format);

        let Some(offscreen) = self.offscreen.as_ref() else { return };

        self.chunk.render(
            ctx.device,
            target.encoder,
            offscreen,
            frame,
            self.config.clear_color,
        );
        self.composite.render(
            ctx.device,
            target.encoder,
            offscreen,
            target.color_view,
            ctx.output_format,
        );
    }

    fn ensure_offscreen(
        &mut self,
        device: &wgpu::Device,
        size: (u32, u32),
        format: wgpu::TextureFormat,
    ) {
        if self
            .offscreen
            .as_ref()
            .is_some_and(|t| t.matches(size, format))
        {
            return;
        }

        if !offscreen_format_supported(format) {
            if self.rejected_output_format != Some(format) {
                log::error!(
                    "offscreen format {format:?} cannot be sampled; set RendererConfig::offscreen_format"
                );
                self.rejected_output_format = Some(format);
            }
            self.offscreen = None;
            return;
        }

        self.offscreen = Some(OffscreenTarget::new(
            device,
            size,
            format,
            self.config.composite_sampler,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_follows_output_format_with_nearest_composite() {
        let config = RendererConfig::default();
        assert_eq!(config.shading, ShadingMode::Textured);
        assert_eq!(config.offscreen_format, None);
        assert_eq!(config.composite_sampler, SamplerConfig::NEAREST_CLAMP);
    }

    #[test]
    fn shading_changes_reach_the_chunk_pass() {
        let mut renderer = FrameRenderer::new(RendererConfig::default()).unwrap();
        renderer.set_shading(ShadingMode::Debug);
        assert_eq!(renderer.shading(), ShadingMode::Debug);
        assert_eq!(renderer.config().shading, ShadingMode::Debug);
        assert!(renderer.offscreen().is_none());
    }

    #[test]
    fn filterable_offscreen_formats_accepted() {
        for format in [
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba16Float,
        ] {
            assert!(offscreen_format_supported(format), "{format:?}");
        }
    }

    #[test]
    fn unfilterable_offscreen_format_rejected() {
        let config = RendererConfig {
            offscreen_format: Some(wgpu::TextureFormat::Rgba32Float),
            ..Default::default()
        };
        assert_eq!(
            FrameRenderer::new(config).err(),
            Some(RendererConfigError::UnfilterableOffscreenFormat(
                wgpu::TextureFormat::Rgba32Float
            ))
        );

        for format in [
            wgpu::TextureFormat::R32Uint,
            wgpu::TextureFormat::Depth32Float,
            wgpu::TextureFormat::Bc1RgbaUnorm,
        ] {
            assert!(!offscreen_format_supported(format), "{format:?}");
        }
    }
}
