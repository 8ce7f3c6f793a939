//! Shared headless setup for the GPU-backed tests.
#![allow(dead_code)]

use glam::Mat4;

use tessera_engine::device::{GpuInit, HeadlessGpu};
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::render::{
    BlockTextureArray, BlockTextureDesc, BlockVertex, CameraBinding, ChunkFrame, ChunkMesh,
    FrameRenderer, LayerData, RenderCtx, RenderTarget, RendererConfig,
};

/// Linear output so expected values are plain `round(x * 255)`.
pub const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Headless device, or `None` (logged) when the machine has no usable adapter.
pub fn headless() -> Option<HeadlessGpu> {
    init_logging(LoggingConfig::default());
    match HeadlessGpu::new_blocking(GpuInit::default()) {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            log::warn!("skipping GPU test, no adapter: {e:#}");
            None
        }
    }
}

/// Two triangles covering clip space at depth 0.5, `tex_coord = (pos + 1) / 2`.
pub fn fullscreen_blocks(block_type: u32) -> (Vec<BlockVertex>, Vec<u32>) {
    let corner = |x: f32, y: f32| {
        BlockVertex::new([x, y, 0.5], [(x + 1.0) * 0.5, (y + 1.0) * 0.5], block_type)
    };
    let vertices = vec![
        corner(-1.0, -1.0),
        corner(1.0, -1.0),
        corner(-1.0, 1.0),
        corner(1.0, 1.0),
    ];
    (vertices, vec![0, 1, 2, 2, 1, 3])
}

/// Non-sRGB, nearest/clamp block texture array.
pub fn texture_array(gpu: &HeadlessGpu, layers: &[LayerData<'_>]) -> BlockTextureArray {
    let desc = BlockTextureDesc {
        srgb: false,
        ..Default::default()
    };
    BlockTextureArray::new(gpu.device(), gpu.queue(), &desc, layers).expect("valid layers")
}

/// Renders chunk + composite into a fresh output texture and reads it back.
pub fn render_frame(
    gpu: &HeadlessGpu,
    config: RendererConfig,
    size: (u32, u32),
    camera: Mat4,
    textures: Option<&BlockTextureArray>,
    meshes: &[&ChunkMesh],
) -> Vec<u8> {
    let camera = CameraBinding::new(gpu.device(), camera);
    let output = gpu.create_output_texture(size.0, size.1, OUTPUT_FORMAT);
    let view = output.create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("test") });

    let mut renderer = FrameRenderer::new(config).expect("renderer config");
    {
        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), OUTPUT_FORMAT, size);
        let mut target = RenderTarget::new(&mut encoder, &view);
        let frame = ChunkFrame {
            camera: &camera,
            textures,
            meshes,
        };
        renderer.render(&ctx, &mut target, &frame);
    }

    gpu.submit_and_wait(encoder).expect("submit");
    gpu.read_texture_rgba8(&output).expect("readback")
}

pub fn pixel(rgba: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3]]
}

pub fn assert_close(actual: [u8; 4], expected: [u8; 4], tolerance: u8) {
    for c in 0..4 {
        let d = actual[c].abs_diff(expected[c]);
        assert!(
            d <= tolerance,
            "channel {c}: got {actual:?}, expected {expected:?} (tolerance {tolerance})"
        );
    }
}
