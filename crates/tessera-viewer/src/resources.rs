use anyhow::{Context, Result};
use glam::Mat4;

use tessera_engine::render::{
    BlockTextureArray, BlockTextureDesc, CameraBinding, ChunkFrame, ChunkMesh, SamplerConfig,
    ShadingMode,
};

use crate::textures::TextureCatalog;
use crate::world::World;

/// GPU-side scene state shared by the windowed and the capture paths.
pub struct SceneResources {
    pub camera: CameraBinding,
    textures: Option<BlockTextureArray>,
    meshes: Vec<ChunkMesh>,
}

impl SceneResources {
    /// Uploads one mesh per non-empty chunk and, for textured shading, the
    /// block textures.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        world: &World,
        shading: ShadingMode,
        sampler: SamplerConfig,
    ) -> Result<Self> {
        let textures = if shading.uses_block_textures() {
            let catalog = TextureCatalog::generate();
            let desc = BlockTextureDesc {
                sampler,
                ..Default::default()
            };
            let array = BlockTextureArray::new(device, queue, &desc, &catalog.layers())
                .context("failed to create block texture array")?;
            log::info!(
                "block textures: {} layers of {}x{}",
                array.layer_count(),
                array.layer_size().0,
                array.layer_size().1
            );
            Some(array)
        } else {
            None
        };

        let mut faces = 0;
        let meshes: Vec<ChunkMesh> = world
            .meshes()
            .into_iter()
            .filter(|(_, geometry)| geometry.face_count() > 0)
            .map(|(pos, geometry)| {
                faces += geometry.face_count();
                let label = format!("chunk {} {} {}", pos.x, pos.y, pos.z);
                ChunkMesh::new(device, &label, &geometry.vertices, &geometry.indices)
            })
            .collect();
        log::info!("world mesh: {} chunks, {faces} faces", meshes.len());

        Ok(Self {
            camera: CameraBinding::new(device, Mat4::IDENTITY),
            textures,
            meshes,
        })
    }

    pub fn draw<R>(&self, f: impl FnOnce(&ChunkFrame<'_>) -> R) -> R {
        let meshes: Vec<&ChunkMesh> = self.meshes.iter().collect();
        let frame = ChunkFrame {
            camera: &self.camera,
            textures: self.textures.as_ref(),
            meshes: &meshes,
        };
        f(&frame)
    }
}
