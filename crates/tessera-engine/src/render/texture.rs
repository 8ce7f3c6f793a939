//! Texture-array bindings shared by both passes.
//!
//! Binding contract (one bind group):
//! - binding 0: `texture_2d_array<f32>` (filterable float)
//! - binding 1: filtering sampler
//!
//! The chunk pass binds the block texture array at group 1; the composite pass
//! binds the offscreen color target (as a one-layer array) at group 0.

use std::fmt;

use wgpu::util::DeviceExt;

/// Texel filter used for both minification and magnification.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FilterMode {
    #[default]
    Nearest,
    Linear,
}

/// Wrap behavior outside `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
}

/// Sampler configuration. The renderer does not depend on a particular choice.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SamplerConfig {
    pub filter: FilterMode,
    pub address_mode: AddressMode,
}

impl SamplerConfig {
    pub const NEAREST_CLAMP: Self = Self {
        filter: FilterMode::Nearest,
        address_mode: AddressMode::ClampToEdge,
    };

    pub fn create_sampler(self, device: &wgpu::Device, label: &str) -> wgpu::Sampler {
        let filter = match self.filter {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        };
        let address_mode = match self.address_mode {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
        };

        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        })
    }
}

/// Bind group layout for a sampled texture array + its sampler.
pub(crate) fn texture_array_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2Array,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

pub(crate) fn texture_array_bind_group(
    device: &wgpu::Device,
    label: &str,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let layout = texture_array_bind_group_layout(device, label);
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

// ── block texture array ───────────────────────────────────────────────────

/// One RGBA8 layer, rows top to bottom, tightly packed.
#[derive(Debug, Copy, Clone)]
pub struct LayerData<'a> {
    pub width: u32,
    pub height: u32,
    pub rgba: &'a [u8],
}

/// Texture-array setup error. Raised before anything reaches the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureArrayError {
    NoLayers,
    EmptyLayer { layer: usize },
    DimensionMismatch {
        layer: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },
    ByteLength {
        layer: usize,
        expected: usize,
        found: usize,
    },
    TooManyLayers { count: usize, max: u32 },
}

impl fmt::Display for TextureArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLayers => write!(f, "texture array needs at least one layer"),
            Self::EmptyLayer { layer } => write!(f, "texture array layer {layer} has zero size"),
            Self::DimensionMismatch {
                layer,
                expected,
                found,
            } => write!(
                f,
                "texture array layer {layer} is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            Self::ByteLength {
                layer,
                expected,
                found,
            } => write!(
                f,
                "texture array layer {layer} has {found} bytes, expected {expected}"
            ),
            Self::TooManyLayers { count, max } => {
                write!(f, "texture array has {count} layers, device allows {max}")
            }
        }
    }
}

impl std::error::Error for TextureArrayError {}

/// Checks that `layers` form a valid array and returns the common `(width, height)`.
pub fn validate_layers(
    layers: &[LayerData<'_>],
    max_layers: u32,
) -> Result<(u32, u32), TextureArrayError> {
    let first = layers.first().ok_or(TextureArrayError::NoLayers)?;
    let dims = (first.width, first.height);

    if layers.len() > max_layers as usize {
        return Err(TextureArrayError::TooManyLayers {
            count: layers.len(),
            max: max_layers,
        });
    }

    for (i, layer) in layers.iter().enumerate() {
        if layer.width == 0 || layer.height == 0 {
            return Err(TextureArrayError::EmptyLayer { layer: i });
        }
        if (layer.width, layer.height) != dims {
            return Err(TextureArrayError::DimensionMismatch {
                layer: i,
                expected: dims,
                found: (layer.width, layer.height),
            });
        }
        let expected = layer.width as usize * layer.height as usize * 4;
        if layer.rgba.len() != expected {
            return Err(TextureArrayError::ByteLength {
                layer: i,
                expected,
                found: layer.rgba.len(),
            });
        }
    }

    Ok(dims)
}

/// Creation parameters for [`BlockTextureArray`].
#[derive(Debug, Clone)]
pub struct BlockTextureDesc<'a> {
    pub label: &'a str,
    pub sampler: SamplerConfig,
    /// Interpret texels as sRGB (decoded to linear on sample).
    pub srgb: bool,
}

impl Default for BlockTextureDesc<'_> {
    fn default() -> Self {
        Self {
            label: "tessera block textures",
            sampler: SamplerConfig::NEAREST_CLAMP,
            srgb: true,
        }
    }
}

/// Block texture array: one layer per block texture, selected by `block_type`.
///
/// Owned by the asset layer; the chunk pass borrows its bind group per draw.
pub struct BlockTextureArray {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    layer_count: u32,
    layer_size: (u32, u32),
}

impl BlockTextureArray {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        desc: &BlockTextureDesc<'_>,
        layers: &[LayerData<'_>],
    ) -> Result<Self, TextureArrayError> {
        let (width, height) = validate_layers(layers, device.limits().max_texture_array_layers)?;
        let layer_count = layers.len() as u32;

        let format = if desc.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        // A single layer is duplicated so GL backends allocate an array texture.
        let allocated_layers = layer_count.max(2);
        let mut data: Vec<u8> = layers.iter().flat_map(|l| l.rgba.iter().copied()).collect();
        if allocated_layers > layer_count {
            data.extend_from_slice(layers[0].rgba);
        }

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(desc.label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: allocated_layers,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(desc.label),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            array_layer_count: Some(allocated_layers),
            ..Default::default()
        });
        let sampler = desc.sampler.create_sampler(device, desc.label);
        let bind_group = texture_array_bind_group(device, desc.label, &view, &sampler);

        log::debug!(
            "block texture array '{}': {layer_count} layers of {width}x{height} ({format:?})",
            desc.label
        );

        Ok(Self {
            texture,
            bind_group,
            layer_count,
            layer_size: (width, height),
        })
    }

    /// Layers supplied by the caller. The GPU texture may hold more.
    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    pub fn layer_size(&self) -> (u32, u32) {
        self.layer_size
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(w: u32, h: u32, bytes: &[u8]) -> LayerData<'_> {
        LayerData {
            width: w,
            height: h,
            rgba: bytes,
        }
    }

    #[test]
    fn valid_layers_report_dimensions() {
        let a = [0u8; 2 * 2 * 4];
        let b = [255u8; 2 * 2 * 4];
        assert_eq!(validate_layers(&[layer(2, 2, &a), layer(2, 2, &b)], 256), Ok((2, 2)));
    }

    #[test]
    fn empty_array_rejected() {
        assert_eq!(validate_layers(&[], 256), Err(TextureArrayError::NoLayers));
    }

    #[test]
    fn mismatched_dimensions_rejected() {
        let a = [0u8; 2 * 2 * 4];
        let b = [0u8; 4 * 2 * 4];
        assert_eq!(
            validate_layers(&[layer(2, 2, &a), layer(4, 2, &b)], 256),
            Err(TextureArrayError::DimensionMismatch {
                layer: 1,
                expected: (2, 2),
                found: (4, 2),
            })
        );
    }

    #[test]
    fn short_layer_rejected() {
        let a = [0u8; 15];
        assert_eq!(
            validate_layers(&[layer(2, 2, &a)], 256),
            Err(TextureArrayError::ByteLength {
                layer: 0,
                expected: 16,
                found: 15,
            })
        );
    }

    #[test]
    fn zero_sized_layer_rejected() {
        assert_eq!(
            validate_layers(&[layer(0, 4, &[])], 256),
            Err(TextureArrayError::EmptyLayer { layer: 0 })
        );
    }

    #[test]
    fn layer_limit_enforced() {
        let a = [0u8; 4];
        let layers = [layer(1, 1, &a), layer(1, 1, &a), layer(1, 1, &a)];
        assert_eq!(
            validate_layers(&layers, 2),
            Err(TextureArrayError::TooManyLayers { count: 3, max: 2 })
        );
    }

    #[test]
    fn errors_render_readable_messages() {
        let err = TextureArrayError::DimensionMismatch {
            layer: 3,
            expected: (16, 16),
            found: (8, 16),
        };
        assert_eq!(err.to_string(), "texture array layer 3 is 8x16, expected 16x16");
    }
}
