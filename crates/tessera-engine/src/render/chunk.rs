use wgpu::util::DeviceExt;

use super::camera::{CameraBinding, camera_bind_group_layout};
use super::target::{DEPTH_FORMAT, OffscreenTarget};
use super::texture::{BlockTextureArray, texture_array_bind_group_layout};
use super::vertex::BlockVertex;

/// Number of block ids the debug shading can tell apart.
///
/// Mirrors `DEBUG_BLOCK_TYPES` in `shaders/chunk.wgsl`. Ids at or above this
/// wrap around (`block_type % 16`) in the blue channel.
pub const DEBUG_BLOCK_TYPES: u32 = 16;

/// Fragment policy of the chunk pass, fixed when the pipeline is built.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ShadingMode {
    /// Sample the block texture array at layer `block_type`, uv flipped on both axes.
    #[default]
    Textured,
    /// `(u, v, (block_type % 16) / 16, 1)`; needs no textures.
    Debug,
}

impl ShadingMode {
    pub fn fragment_entry_point(self) -> &'static str {
        match self {
            ShadingMode::Textured => "fs_textured",
            ShadingMode::Debug => "fs_debug",
        }
    }

    /// Whether the pipeline expects a block texture array at group 1.
    pub fn uses_block_textures(self) -> bool {
        matches!(self, ShadingMode::Textured)
    }
}

/// GPU geometry for one chunk: `BlockVertex` buffer + `u32` index buffer.
///
/// Built from the mesh generator's output; immutable once uploaded.
pub struct ChunkMesh {
    buffers: Option<(wgpu::Buffer, wgpu::Buffer)>,
    index_count: u32,
}

impl ChunkMesh {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        vertices: &[BlockVertex],
        indices: &[u32],
    ) -> Self {
        if vertices.is_empty() || indices.is_empty() {
            return Self::empty();
        }

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vbo")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} ibo")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            buffers: Some((vbo, ibo)),
            index_count: indices.len() as u32,
        }
    }

    /// A mesh with nothing to draw (all-air chunk).
    pub fn empty() -> Self {
        Self {
            buffers: None,
            index_count: 0,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_none()
    }
}

/// Per-frame inputs of the chunk pass. Borrowed for one draw; owned elsewhere.
pub struct ChunkFrame<'a> {
    pub camera: &'a CameraBinding,
    /// Required by [`ShadingMode::Textured`], ignored by [`ShadingMode::Debug`].
    pub textures: Option<&'a BlockTextureArray>,
    pub meshes: &'a [&'a ChunkMesh],
}

/// Chunk geometry pass: clears the offscreen target and draws every mesh into it.
///
/// Depth-tested opaque rendering; the pipeline is rebuilt lazily when the
/// target format or the shading mode changes.
#[derive(Default)]
pub struct ChunkPass {
    shading: ShadingMode,
    pipeline_key: Option<(wgpu::TextureFormat, ShadingMode)>,
    pipeline: Option<wgpu::RenderPipeline>,

    warned_missing_textures: bool,
}

impl ChunkPass {
    pub fn new(shading: ShadingMode) -> Self {
        Self {
            shading,
            ..Default::default()
        }
    }

    pub fn shading(&self) -> ShadingMode {
        self.shading
    }

    /// Switches the fragment policy; takes effect on the next render.
    pub fn set_shading(&mut self, shading: ShadingMode) {
        if self.shading != shading {
            self.shading = shading;
            self.warned_missing_textures = false;
        }
    }

    /// Records the pass into `encoder`, writing `target`'s color and depth.
    ///
    /// The target is always cleared, even when nothing can be drawn.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        target: &OffscreenTarget,
        frame: &ChunkFrame<'_>,
        clear: wgpu::Color,
    ) {
        self.ensure_pipeline(device, target.format());

        let textures = match (self.shading.uses_block_textures(), frame.textures) {
            (true, None) => {
                if !self.warned_missing_textures {
                    log::warn!("ChunkPass: textured shading without block textures; draws skipped");
                    self.warned_missing_textures = true;
                }
                None
            }
            (true, Some(t)) => Some(Some(t)),
            (false, _) => Some(None),
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera chunk pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view(),
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some(textures) = textures else { return };
        let Some(pipeline) = self.pipeline.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, frame.camera.bind_group(), &[]);
        if let Some(textures) = textures {
            rpass.set_bind_group(1, textures.bind_group(), &[]);
        }

        for mesh in frame.meshes {
            let Some((vbo, ibo)) = mesh.buffers.as_ref() else { continue };
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        let key = (format, self.shading);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return;
        }

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessera chunk shader"),
            source: wgpu::ShaderSource::Wgsl(super::CHUNK_SHADER.into()),
        });

        let camera_bgl = camera_bind_group_layout(device);
        let texture_bgl;
        let mut bind_group_layouts = vec![&camera_bgl];
        if self.shading.uses_block_textures() {
            texture_bgl = texture_array_bind_group_layout(device, "tessera block textures bgl");
            bind_group_layouts.push(&texture_bgl);
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera chunk pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera chunk pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[BlockVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(self.shading.fragment_entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Mesh winding is not guaranteed consistent across faces.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        log::debug!("chunk pipeline built: {:?} / {:?}", format, self.shading);

        self.pipeline_key = Some(key);
        self.pipeline = Some(pipeline);
    }
}
