//! Blocks, 16^3 chunks of them, and the per-face quad table the mesher uses.

use tessera_engine::render::BlockVertex;

/// Edge length of a chunk, in blocks.
pub const CHUNK_SIZE: usize = 16;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Block {
    #[default]
    Air,
    Dirt,
    Stone,
    Grass,
    OakWood,
    OakLeaves,
}

impl Block {
    /// Whether the block hides the faces of its neighbours.
    pub fn is_opaque(self) -> bool {
        !matches!(self, Block::Air | Block::OakLeaves)
    }
}

/// Face directions, in `FACE_TABLE` order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Face {
    East,
    West,
    Up,
    Down,
    South,
    North,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::East,
        Face::West,
        Face::Up,
        Face::Down,
        Face::South,
        Face::North,
    ];

    pub fn normal(self) -> [i32; 3] {
        match self {
            Face::East => [1, 0, 0],
            Face::West => [-1, 0, 0],
            Face::Up => [0, 1, 0],
            Face::Down => [0, -1, 0],
            Face::South => [0, 0, 1],
            Face::North => [0, 0, -1],
        }
    }
}

/// Unit-cube corners (position, tex_coord) per face.
///
/// Winding differs between faces; the chunk pass draws with culling off.
const FACE_TABLE: [[([f32; 3], [f32; 2]); 4]; 6] = [
    // +X
    [
        ([1.0, 0.0, 1.0], [0.0, 0.0]),
        ([1.0, 1.0, 1.0], [0.0, 1.0]),
        ([1.0, 1.0, 0.0], [1.0, 1.0]),
        ([1.0, 0.0, 0.0], [1.0, 0.0]),
    ],
    // -X
    [
        ([0.0, 0.0, 1.0], [0.0, 0.0]),
        ([0.0, 1.0, 1.0], [0.0, 1.0]),
        ([0.0, 1.0, 0.0], [1.0, 1.0]),
        ([0.0, 0.0, 0.0], [1.0, 0.0]),
    ],
    // +Y
    [
        ([1.0, 1.0, 0.0], [1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0]),
        ([0.0, 1.0, 1.0], [0.0, 1.0]),
        ([1.0, 1.0, 1.0], [1.0, 1.0]),
    ],
    // -Y
    [
        ([0.0, 0.0, 1.0], [0.0, 1.0]),
        ([1.0, 0.0, 1.0], [1.0, 1.0]),
        ([1.0, 0.0, 0.0], [1.0, 0.0]),
        ([0.0, 0.0, 0.0], [0.0, 0.0]),
    ],
    // +Z
    [
        ([0.0, 1.0, 1.0], [0.0, 1.0]),
        ([0.0, 0.0, 1.0], [0.0, 0.0]),
        ([1.0, 0.0, 1.0], [1.0, 0.0]),
        ([1.0, 1.0, 1.0], [1.0, 1.0]),
    ],
    // -Z
    [
        ([1.0, 0.0, 0.0], [1.0, 0.0]),
        ([1.0, 1.0, 0.0], [1.0, 1.0]),
        ([0.0, 1.0, 0.0], [0.0, 1.0]),
        ([0.0, 0.0, 0.0], [0.0, 0.0]),
    ],
];

const FACE_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Which demo world to build.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum SceneKind {
    /// One chunk filled with stone: one big cube.
    #[default]
    Cube,
    /// A grid of chunks with rolling grass/dirt/stone terrain and a tree.
    Terrain,
}

/// Dense block grid indexed `[x][y][z]`, in chunk-local coordinates.
#[derive(Debug, Clone)]
pub struct Chunk {
    blocks: Box<[[[Block; CHUNK_SIZE]; CHUNK_SIZE]; CHUNK_SIZE]>,
}

impl Chunk {
    pub fn empty() -> Self {
        Self::filled(Block::Air)
    }

    pub fn filled(block: Block) -> Self {
        Self {
            blocks: Box::new([[[block; CHUNK_SIZE]; CHUNK_SIZE]; CHUNK_SIZE]),
        }
    }

    /// Terrain for the chunk whose minimum corner sits at world column
    /// `(origin_x, origin_z)`. Heights are continuous across chunk borders.
    pub fn terrain(origin_x: i32, origin_z: i32) -> Self {
        let mut chunk = Self::empty();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let h = terrain_height(origin_x + x as i32, origin_z + z as i32);
                for y in 0..=h {
                    let block = if y == h {
                        Block::Grass
                    } else if y + 3 >= h {
                        Block::Dirt
                    } else {
                        Block::Stone
                    };
                    chunk.set(x, y, z, block);
                }
            }
        }

        chunk
    }

    /// Trunk on top of the ground at local column `(x, z)`, with a leaf crown.
    /// `x` and `z` must leave two blocks of room to the chunk edge.
    pub fn plant_tree(&mut self, x: usize, z: usize) {
        let Some(ground) = (0..CHUNK_SIZE).rev().find(|&y| self.blocks[x][y][z] != Block::Air)
        else {
            return;
        };
        let base = ground + 1;
        let top = base + 4;

        for y in base..top {
            self.set(x, y, z, Block::OakWood);
        }
        for y in top - 2..=top {
            for lx in x - 2..=x + 2 {
                for lz in z - 2..=z + 2 {
                    if self.get(lx as i32, y as i32, lz as i32) == Block::Air {
                        self.set(lx, y, lz, Block::OakLeaves);
                    }
                }
            }
        }
    }

    /// Out-of-bounds coordinates read as air.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Block {
        let range = 0..CHUNK_SIZE as i32;
        if !(range.contains(&x) && range.contains(&y) && range.contains(&z)) {
            return Block::Air;
        }
        self.blocks[x as usize][y as usize][z as usize]
    }

    /// Panics when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, z: usize, block: Block) {
        self.blocks[x][y][z] = block;
    }
}

/// Height of the grass surface at world column `(x, z)`; stays within `3..=8`.
fn terrain_height(x: i32, z: i32) -> usize {
    let (fx, fz) = (x as f32, z as f32);
    let wave = (fx * 0.45).sin() * 1.5 + (fz * 0.35).cos() * 1.5 + ((fx + fz) * 0.2).sin();
    (5.5 + wave).round().clamp(3.0, 8.0) as usize
}

/// CPU-side chunk mesh, ready for upload.
#[derive(Debug, Clone, Default)]
pub struct ChunkGeometry {
    pub vertices: Vec<BlockVertex>,
    pub indices: Vec<u32>,
    face_count: usize,
}

impl ChunkGeometry {
    /// Appends one quad for the unit block at world position `origin`.
    pub(crate) fn emit_face(&mut self, origin: [i32; 3], face: Face, layer: u32) {
        let base = self.vertices.len() as u32;

        for (corner, tex_coord) in FACE_TABLE[face as usize] {
            let position = [
                corner[0] + origin[0] as f32,
                corner[1] + origin[1] as f32,
                corner[2] + origin[2] as f32,
            ];
            self.vertices.push(BlockVertex::new(position, tex_coord, layer));
        }

        self.indices.extend(FACE_INDICES.iter().map(|i| base + i));
        self.face_count += 1;
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }
}
