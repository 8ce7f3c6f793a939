//! Camera uniform contract (chunk pass, group 0 / binding 0).

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// View-projection matrix as uploaded to the GPU: 4x4 f32, column-major, 64 bytes.
///
/// The matrix must be a finite, invertible projective transform; nothing here
/// checks that.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub const SIZE: u64 = std::mem::size_of::<CameraUniform>() as u64;

    #[inline]
    pub fn from_matrix(view_proj: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}

/// Returns the `wgpu` minimum binding size for the camera uniform buffer.
pub(crate) fn camera_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(CameraUniform::SIZE)
        .expect("CameraUniform has non-zero size by construction")
}

/// Bind group layout for the camera uniform.
pub(crate) fn camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("tessera camera bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(camera_ubo_min_binding_size()),
            },
            count: None,
        }],
    })
}

/// GPU side of the camera: uniform buffer + bind group.
///
/// Owned by whoever drives the camera; the chunk pass only borrows it for a draw.
pub struct CameraBinding {
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    current: CameraUniform,
}

impl CameraBinding {
    pub fn new(device: &wgpu::Device, view_proj: Mat4) -> Self {
        let current = CameraUniform::from_matrix(view_proj);

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera camera ubo"),
            size: CameraUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });
        ubo.slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytemuck::bytes_of(&current));
        ubo.unmap();

        let layout = camera_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera camera bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        Self {
            ubo,
            bind_group,
            current,
        }
    }

    /// Uploads a new view-projection matrix. Skips the write when unchanged.
    pub fn write(&mut self, queue: &wgpu::Queue, view_proj: Mat4) {
        let next = CameraUniform::from_matrix(view_proj);
        if next == self.current {
            return;
        }
        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&next));
        self.current = next;
    }

    /// The last uploaded uniform value.
    pub fn uniform(&self) -> CameraUniform {
        self.current
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
