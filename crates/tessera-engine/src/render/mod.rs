//! GPU rendering subsystem.
//!
//! Two passes per frame, recorded in order into one encoder:
//! 1. [`ChunkPass`]: block geometry -> offscreen color + depth target.
//! 2. [`CompositePass`]: offscreen target -> presentation attachment.
//!
//! [`FrameRenderer`] owns both passes and the offscreen target. Scene state
//! (camera, block textures, chunk meshes) is owned by the caller and handed in
//! per frame through [`ChunkFrame`].
//!
//! Binding contract:
//! - chunk pass group 0 / binding 0: camera uniform (64-byte view-projection)
//! - chunk pass group 1 / bindings 0-1: block texture array + sampler (textured mode)
//! - composite pass group 0 / bindings 0-1: offscreen color (one-layer array) + sampler

mod camera;
mod chunk;
mod composite;
mod ctx;
mod frame;
mod target;
mod texture;
mod vertex;

pub use camera::{CameraBinding, CameraUniform};
pub use chunk::{ChunkFrame, ChunkMesh, ChunkPass, DEBUG_BLOCK_TYPES, ShadingMode};
pub use composite::CompositePass;
pub use ctx::{RenderCtx, RenderTarget};
pub use frame::{FrameRenderer, RendererConfig, RendererConfigError, offscreen_format_supported};
pub use target::{DEPTH_FORMAT, OffscreenTarget};
pub use texture::{
    AddressMode, BlockTextureArray, BlockTextureDesc, FilterMode, LayerData, SamplerConfig,
    TextureArrayError, validate_layers,
};
pub use vertex::{BlockVertex, FULLSCREEN_QUAD, FULLSCREEN_QUAD_INDICES, ScreenVertex};

/// WGSL source of the chunk pass (`vs_main`, `fs_textured`, `fs_debug`).
pub const CHUNK_SHADER: &str = include_str!("shaders/chunk.wgsl");

/// WGSL source of the composite pass (`vs_main`, `fs_main`).
pub const COMPOSITE_SHADER: &str = include_str!("shaders/composite.wgsl");
