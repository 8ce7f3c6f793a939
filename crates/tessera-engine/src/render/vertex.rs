//! Vertex contracts for both passes.
//!
//! These layouts must match the `@location` inputs of `shaders/chunk.wgsl` and
//! `shaders/composite.wgsl` exactly by offset and format.

use bytemuck::{Pod, Zeroable};

// ── chunk pass ────────────────────────────────────────────────────────────

/// One cube-face corner as produced by the mesh generator.
///
/// `position` is already in world space (chunk offset baked in); there is no
/// model matrix. `block_type` selects the texture-array layer and is not
/// validated against the bound array.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BlockVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    pub block_type: u32,
}

impl BlockVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2, // tex_coord
        2 => Uint32     // block_type
    ];

    #[inline]
    pub const fn new(position: [f32; 3], tex_coord: [f32; 2], block_type: u32) -> Self {
        Self {
            position,
            tex_coord,
            block_type,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BlockVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── composite pass ────────────────────────────────────────────────────────

/// Fullscreen-quad vertex: clip-space position + image uv.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ScreenVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl ScreenVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ScreenVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Fullscreen quad in clip space.
///
/// Image row 0 is the top of the screen, so clip `y = +1` maps to `v = 0`.
/// With this mapping the composite pass is a pixel-exact identity.
pub const FULLSCREEN_QUAD: [ScreenVertex; 4] = [
    ScreenVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    ScreenVertex { position: [1.0, -1.0], uv: [1.0, 1.0] },
    ScreenVertex { position: [-1.0, 1.0], uv: [0.0, 0.0] },
    ScreenVertex { position: [1.0, 1.0], uv: [1.0, 0.0] },
];

pub const FULLSCREEN_QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];
