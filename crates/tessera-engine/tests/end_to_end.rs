mod common;

use glam::Mat4;

use tessera_engine::render::{BlockVertex, ChunkMesh, LayerData, RendererConfig};

use common::{headless, pixel, render_frame, texture_array};

const RED: [u8; 4] = [255, 0, 0, 255];
const CLEAR: [u8; 4] = [0, 0, 255, 255];

/// Unit cube at the origin, 24 vertices, every face on layer 0.
fn unit_cube() -> (Vec<BlockVertex>, Vec<u32>) {
    let faces: [[[f32; 3]; 4]; 6] = [
        [[1., 0., 1.], [1., 1., 1.], [1., 1., 0.], [1., 0., 0.]],
        [[0., 0., 1.], [0., 1., 1.], [0., 1., 0.], [0., 0., 0.]],
        [[1., 1., 0.], [0., 1., 0.], [0., 1., 1.], [1., 1., 1.]],
        [[0., 0., 1.], [1., 0., 1.], [1., 0., 0.], [0., 0., 0.]],
        [[0., 1., 1.], [0., 0., 1.], [1., 0., 1.], [1., 1., 1.]],
        [[1., 0., 0.], [1., 1., 0.], [0., 1., 0.], [0., 0., 0.]],
    ];
    let uvs = [[0., 0.], [0., 1.], [1., 1.], [1., 0.]];

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for face in faces {
        let base = vertices.len() as u32;
        for (corner, uv) in face.into_iter().zip(uvs) {
            vertices.push(BlockVertex::new(corner, uv, 0));
        }
        indices.extend([0, 1, 2, 2, 3, 0].map(|i| base + i));
    }
    (vertices, indices)
}

#[test]
fn red_cube_covers_the_top_right_quadrant_under_identity_camera() {
    let Some(gpu) = headless() else { return };

    let red: Vec<u8> = [RED; 4].concat();
    let textures = texture_array(&gpu, &[LayerData { width: 2, height: 2, rgba: &red }]);

    let (vertices, indices) = unit_cube();
    let mesh = ChunkMesh::new(gpu.device(), "cube", &vertices, &indices);

    let config = RendererConfig {
        clear_color: wgpu::Color::BLUE,
        ..Default::default()
    };
    let out = render_frame(&gpu, config, (8, 8), Mat4::IDENTITY, Some(&textures), &[&mesh]);

    for y in 0..8 {
        for x in 0..8 {
            let expected = if x >= 4 && y < 4 { RED } else { CLEAR };
            assert_eq!(pixel(&out, 8, x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn empty_mesh_leaves_the_clear_color() {
    let Some(gpu) = headless() else { return };

    let red: Vec<u8> = [RED; 4].concat();
    let textures = texture_array(&gpu, &[LayerData { width: 2, height: 2, rgba: &red }]);
    let mesh = ChunkMesh::new(gpu.device(), "empty", &[], &[]);
    assert!(mesh.is_empty());

    let config = RendererConfig {
        clear_color: wgpu::Color::BLUE,
        ..Default::default()
    };
    let out = render_frame(&gpu, config, (4, 4), Mat4::IDENTITY, Some(&textures), &[&mesh]);

    for px in out.chunks_exact(4) {
        assert_eq!(px, CLEAR);
    }
}

#[test]
fn single_layer_array_keeps_its_reported_layer_count() {
    let Some(gpu) = headless() else { return };

    let red: Vec<u8> = [RED; 4].concat();
    let textures = texture_array(&gpu, &[LayerData { width: 2, height: 2, rgba: &red }]);

    assert_eq!(textures.layer_count(), 1);
    assert_eq!(textures.layer_size(), (2, 2));
    assert!(textures.texture().depth_or_array_layers() >= 2);
}
