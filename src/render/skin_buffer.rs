//! GPU resources for skinned drawing

use super::renderer::{AnimRenderer, MeshUniforms, RenderFrame};
use crate::animation::skin::SkinVertex;
use crate::core::Result;

const SKIN_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![4 => Uint32x4, 5 => Float32x4];

/// Vertex buffer layout for interleaved `SkinVertex` data (locations 4 and 5)
pub fn skin_vertex_layout<'a>() -> wgpu::VertexBufferLayout<'a> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SkinVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &SKIN_ATTRIBUTES,
    }
}

/// Uniform buffer holding one mesh's `MeshUniforms`
pub struct SkinUniformBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl SkinUniformBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Skin Uniform Buffer"),
            size: std::mem::size_of::<MeshUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skin Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<MeshUniforms>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skin Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniforms: &MeshUniforms) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Renderer that uploads every mesh's uniforms into its own buffer.
///
/// Draw calls are left to the host, which binds `buffers()[mesh]`.
pub struct UniformUploader<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    buffers: Vec<SkinUniformBuffer>,
}

impl<'a> UniformUploader<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            buffers: Vec::new(),
        }
    }

    pub fn buffers(&self) -> &[SkinUniformBuffer] {
        &self.buffers
    }
}

impl AnimRenderer for UniformUploader<'_> {
    fn draw(&mut self, frame: &RenderFrame<'_>) -> Result<()> {
        while self.buffers.len() < frame.mesh_count() {
            self.buffers.push(SkinUniformBuffer::new(self.device));
        }
        for (mesh, buffer) in self.buffers.iter().enumerate() {
            if let Some(uniforms) = frame.uniforms(mesh) {
                buffer.update(self.queue, &uniforms);
            }
        }
        Ok(())
    }
}
