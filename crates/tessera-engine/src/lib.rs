//! Tessera engine crate.
//!
//! Chunked voxel rendering on wgpu: a block-geometry pass into an offscreen
//! target followed by a fullscreen composite onto the presentation surface.
//! Also owns the platform + GPU runtime pieces the viewer builds on.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
