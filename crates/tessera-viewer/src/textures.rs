//! Procedural block texture catalog.
//!
//! Every layer is a 16x16 RGBA8 image, rows top to bottom. Layer 0 is the
//! magenta/black "missing" checkerboard; the other layers are indexed by
//! [`face_layer`] and end up in `BlockVertex::block_type`.

use tessera_engine::render::LayerData;

use crate::scene::{Block, Face};

pub const LAYER_SIZE: u32 = 16;

pub const MISSING: u32 = 0;
pub const DIRT: u32 = 1;
pub const STONE: u32 = 2;
pub const GRASS_TOP: u32 = 3;
pub const GRASS_SIDE: u32 = 4;
pub const OAK_TOP: u32 = 5;
pub const OAK_SIDE: u32 = 6;
pub const LEAVES: u32 = 7;

pub const LAYER_COUNT: u32 = 8;

/// Texture layer for one face of a block.
///
/// Column blocks (grass, logs) use a distinct side texture; grass shows dirt
/// underneath.
pub fn face_layer(block: Block, face: Face) -> u32 {
    match block {
        Block::Air => MISSING,
        Block::Dirt => DIRT,
        Block::Stone => STONE,
        Block::Grass => match face {
            Face::Up => GRASS_TOP,
            Face::Down => DIRT,
            _ => GRASS_SIDE,
        },
        Block::OakWood => match face {
            Face::Up | Face::Down => OAK_TOP,
            _ => OAK_SIDE,
        },
        Block::OakLeaves => LEAVES,
    }
}

/// All layers, generated once.
pub struct TextureCatalog {
    layers: Vec<Vec<u8>>,
}

impl TextureCatalog {
    pub fn generate() -> Self {
        let layers = (0..LAYER_COUNT).map(generate_layer).collect();
        Self { layers }
    }

    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    /// Borrowed views in layer order, as `BlockTextureArray::new` takes them.
    pub fn layers(&self) -> Vec<LayerData<'_>> {
        self.layers
            .iter()
            .map(|rgba| LayerData {
                width: LAYER_SIZE,
                height: LAYER_SIZE,
                rgba,
            })
            .collect()
    }
}

fn generate_layer(layer: u32) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((LAYER_SIZE * LAYER_SIZE * 4) as usize);

    for y in 0..LAYER_SIZE {
        for x in 0..LAYER_SIZE {
            let noise = hash(x, y, layer);
            let texel = match layer {
                DIRT => shade([121, 85, 58], noise, 24),
                STONE => shade([125, 125, 125], noise, 30),
                GRASS_TOP => shade([96, 159, 62], noise, 28),
                GRASS_SIDE if y < 4 || (y == 4 && noise % 3 == 0) => {
                    shade([96, 159, 62], noise, 28)
                }
                GRASS_SIDE => shade([121, 85, 58], noise, 24),
                OAK_TOP => {
                    let (dx, dy) = (x as i32 * 2 - 15, y as i32 * 2 - 15);
                    let ring = ((dx * dx + dy * dy) as f32).sqrt() as u32 / 4;
                    if ring % 2 == 0 {
                        shade([176, 143, 86], noise, 12)
                    } else {
                        shade([150, 118, 70], noise, 12)
                    }
                }
                OAK_SIDE if x % 4 == 0 => shade([84, 64, 40], noise, 10),
                OAK_SIDE => shade([107, 84, 51], noise, 16),
                LEAVES if noise % 7 == 0 => shade([38, 82, 30], noise, 10),
                LEAVES => shade([58, 120, 44], noise, 30),
                _ => missing_texel(x, y),
            };
            rgba.extend_from_slice(&texel);
        }
    }

    rgba
}

/// 2x2 checkerboard of 8x8 cells, magenta top-left.
fn missing_texel(x: u32, y: u32) -> [u8; 4] {
    let half = LAYER_SIZE / 2;
    if (x / half + y / half) % 2 == 0 {
        [255, 0, 255, 255]
    } else {
        [0, 0, 0, 255]
    }
}

/// Base color with a brightness jitter of up to `spread`.
fn shade(base: [u8; 3], noise: u32, spread: u8) -> [u8; 4] {
    let offset = (noise % (spread as u32 + 1)) as i32 - spread as i32 / 2;
    let c = |v: u8| (v as i32 + offset).clamp(0, 255) as u8;
    [c(base[0]), c(base[1]), c(base[2]), 255]
}

/// Small integer hash; deterministic so captures are reproducible.
fn hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = x
        .wrapping_mul(0x9E37_79B1)
        ^ y.wrapping_mul(0x85EB_CA77)
        ^ seed.wrapping_mul(0xC2B2_AE3D);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h
}
