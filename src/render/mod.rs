//! Renderer-facing data: prepared meshes, per-frame uniforms and GPU buffers

pub mod mesh_data;
pub mod renderer;
pub mod skin_buffer;

pub use mesh_data::{MeshBuffers, MeshData};
pub use renderer::{AnimRenderer, MeshUniforms, RenderFrame};
pub use skin_buffer::{skin_vertex_layout, SkinUniformBuffer, UniformUploader};
pub use crate::animation::skin::SkinVertex;
