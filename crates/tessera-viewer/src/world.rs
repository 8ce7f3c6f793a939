//! Sparse map of chunk positions to chunks, and the mesher that culls faces
//! across chunk borders.
//!
//! Chunk `p` covers world blocks `p * CHUNK_SIZE .. (p + 1) * CHUNK_SIZE` on
//! every axis. Meshes are emitted in world coordinates, so each `ChunkMesh`
//! carries its chunk offset in its vertex positions.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use crate::scene::{Block, CHUNK_SIZE, Chunk, ChunkGeometry, Face, SceneKind};
use crate::textures::face_layer;

/// Chunks per side of the terrain scene (one chunk tall).
pub const TERRAIN_CHUNKS: i32 = 3;

#[derive(Debug, Clone, Default)]
pub struct World {
    chunks: HashMap<IVec3, Chunk>,
}

impl World {
    pub fn build(kind: SceneKind) -> Self {
        let mut world = Self::default();
        let size = CHUNK_SIZE as i32;

        match kind {
            SceneKind::Cube => {
                world.insert(IVec3::ZERO, Chunk::filled(Block::Stone));
            }
            SceneKind::Terrain => {
                let center = TERRAIN_CHUNKS / 2;
                for cx in 0..TERRAIN_CHUNKS {
                    for cz in 0..TERRAIN_CHUNKS {
                        let mut chunk = Chunk::terrain(cx * size, cz * size);
                        if (cx, cz) == (center, center) {
                            chunk.plant_tree(8, 8);
                        }
                        world.insert(IVec3::new(cx, 0, cz), chunk);
                    }
                }
            }
        }

        log::debug!("{kind:?} world: {} chunks", world.len());
        world
    }

    /// Returns the chunk previously stored at `pos`.
    pub fn insert(&mut self, pos: IVec3, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(pos, chunk)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk positions in x, y, z order.
    pub fn positions(&self) -> Vec<IVec3> {
        let mut positions: Vec<IVec3> = self.chunks.keys().copied().collect();
        positions.sort_by_key(|p| (p.x, p.y, p.z));
        positions
    }

    /// Block at a world position. Unloaded chunks read as air.
    pub fn block(&self, pos: IVec3) -> Block {
        let size = IVec3::splat(CHUNK_SIZE as i32);
        let local = pos.rem_euclid(size);
        self.chunks
            .get(&pos.div_euclid(size))
            .map_or(Block::Air, |c| c.get(local.x, local.y, local.z))
    }

    /// One quad per block face not hidden by its neighbour, which may live in
    /// an adjacent chunk. Empty for an unloaded position.
    pub fn mesh_chunk(&self, pos: IVec3) -> ChunkGeometry {
        let mut geometry = ChunkGeometry::default();
        let Some(chunk) = self.chunks.get(&pos) else {
            return geometry;
        };

        let origin = pos * CHUNK_SIZE as i32;
        let inside = |p: IVec3| {
            p.cmpge(IVec3::ZERO).all() && p.cmplt(IVec3::splat(CHUNK_SIZE as i32)).all()
        };

        for x in 0..CHUNK_SIZE as i32 {
            for y in 0..CHUNK_SIZE as i32 {
                for z in 0..CHUNK_SIZE as i32 {
                    let block = chunk.get(x, y, z);
                    if block == Block::Air {
                        continue;
                    }

                    let local = IVec3::new(x, y, z);
                    for face in Face::ALL {
                        let n = local + IVec3::from_array(face.normal());
                        let neighbour = if inside(n) {
                            chunk.get(n.x, n.y, n.z)
                        } else {
                            self.block(origin + n)
                        };
                        if neighbour.is_opaque() || neighbour == block {
                            continue;
                        }
                        let layer = face_layer(block, face);
                        geometry.emit_face((origin + local).to_array(), face, layer);
                    }
                }
            }
        }

        geometry
    }

    /// Meshes for every chunk, in [`World::positions`] order.
    pub fn meshes(&self) -> Vec<(IVec3, ChunkGeometry)> {
        self.positions()
            .into_iter()
            .map(|pos| (pos, self.mesh_chunk(pos)))
            .collect()
    }

    /// World-space box around all chunks, or `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut keys = self.chunks.keys();
        let first = *keys.next()?;
        let (min, max) = keys.fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        let size = CHUNK_SIZE as f32;
        Some((min.as_vec3() * size, (max + IVec3::ONE).as_vec3() * size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(pos: IVec3, chunk: Chunk) -> World {
        let mut world = World::default();
        world.insert(pos, chunk);
        world
    }

    fn quads(geometry: &ChunkGeometry) -> impl Iterator<Item = [[f32; 3]; 4]> + '_ {
        geometry
            .vertices
            .chunks_exact(4)
            .map(|q| [q[0].position, q[1].position, q[2].position, q[3].position])
    }

    #[test]
    fn filled_chunk_emits_only_the_outer_shell() {
        let geometry = single(IVec3::ZERO, Chunk::filled(Block::Stone)).mesh_chunk(IVec3::ZERO);
        assert_eq!(geometry.face_count(), 6 * CHUNK_SIZE * CHUNK_SIZE);
        assert_eq!(geometry.vertices.len(), geometry.face_count() * 4);
        assert_eq!(geometry.indices.len(), geometry.face_count() * 6);
    }

    #[test]
    fn single_block_emits_six_faces() {
        let mut chunk = Chunk::empty();
        chunk.set(3, 3, 3, Block::Dirt);
        let geometry = single(IVec3::ZERO, chunk).mesh_chunk(IVec3::ZERO);

        assert_eq!(geometry.face_count(), 6);
        assert_eq!(geometry.indices[..6], [0, 1, 2, 2, 3, 0]);
        assert_eq!(geometry.indices[6..12], [4, 5, 6, 6, 7, 4]);

        for v in &geometry.vertices {
            for axis in v.position {
                assert!(axis == 3.0 || axis == 4.0);
            }
        }
    }

    #[test]
    fn unloaded_chunk_has_no_geometry() {
        let world = single(IVec3::ZERO, Chunk::filled(Block::Stone));
        assert_eq!(world.mesh_chunk(IVec3::X).face_count(), 0);
        assert!(World::default().meshes().is_empty());
    }

    #[test]
    fn shared_wall_between_adjacent_chunks_emits_no_faces() {
        let mut world = World::default();
        world.insert(IVec3::ZERO, Chunk::filled(Block::Stone));
        world.insert(IVec3::X, Chunk::filled(Block::Stone));

        let side = CHUNK_SIZE * CHUNK_SIZE;
        let west = world.mesh_chunk(IVec3::ZERO);
        let east = world.mesh_chunk(IVec3::X);
        assert_eq!(west.face_count(), 5 * side);
        assert_eq!(east.face_count(), 5 * side);

        let wall = CHUNK_SIZE as f32;
        let on_wall = |q: &[[f32; 3]; 4]| q.iter().all(|p| p[0] == wall);
        assert_eq!(quads(&west).filter(on_wall).count(), 0);
        assert_eq!(quads(&east).filter(on_wall).count(), 0);
    }

    #[test]
    fn chunk_offset_is_baked_into_positions() {
        let mut chunk = Chunk::empty();
        chunk.set(0, 0, 0, Block::Stone);
        let pos = IVec3::new(1, 0, -1);
        let geometry = single(pos, chunk).mesh_chunk(pos);

        let size = CHUNK_SIZE as f32;
        for v in &geometry.vertices {
            let [x, y, z] = v.position;
            assert!((size..=size + 1.0).contains(&x));
            assert!((0.0..=1.0).contains(&y));
            assert!((-size..=-size + 1.0).contains(&z));
        }
    }

    #[test]
    fn blocks_resolve_through_negative_chunk_positions() {
        let world = single(IVec3::NEG_X, Chunk::filled(Block::Dirt));
        let size = CHUNK_SIZE as i32;

        assert_eq!(world.block(IVec3::new(-1, 0, 0)), Block::Dirt);
        assert_eq!(world.block(IVec3::new(-size, size - 1, 0)), Block::Dirt);
        assert_eq!(world.block(IVec3::new(-size - 1, 0, 0)), Block::Air);
        assert_eq!(world.block(IVec3::ZERO), Block::Air);
    }

    #[test]
    fn terrain_world_is_a_grid_with_every_block_kind() {
        let world = World::build(SceneKind::Terrain);
        assert_eq!(world.len(), (TERRAIN_CHUNKS * TERRAIN_CHUNKS) as usize);
        assert_eq!(world.meshes().len(), world.len());

        let extent = TERRAIN_CHUNKS * CHUNK_SIZE as i32;
        let mut seen = Vec::new();
        for x in 0..extent {
            for y in 0..CHUNK_SIZE as i32 {
                for z in 0..extent {
                    let b = world.block(IVec3::new(x, y, z));
                    if !seen.contains(&b) {
                        seen.push(b);
                    }
                }
            }
        }
        for b in [
            Block::Air,
            Block::Dirt,
            Block::Stone,
            Block::Grass,
            Block::OakWood,
            Block::OakLeaves,
        ] {
            assert!(seen.contains(&b), "missing {b:?}");
        }
    }

    #[test]
    fn bounds_cover_every_chunk() {
        assert_eq!(World::default().bounds(), None);

        let (min, max) = World::build(SceneKind::Terrain).bounds().unwrap();
        let extent = (TERRAIN_CHUNKS * CHUNK_SIZE as i32) as f32;
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(extent, CHUNK_SIZE as f32, extent));
    }
}
