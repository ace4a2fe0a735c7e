//! Bone influence packing
//!
//! Converts each mesh's per-bone weight lists into fixed-width per-vertex
//! arrays: four bone slots and four weights per vertex, zero padded. This is
//! the vertex attribute layout the skinning shader reads (`uvec4` + `vec4`).

use bytemuck::{Pod, Zeroable};

use crate::core::{Error, Result, MAX_BONES_PER_MESH, MAX_BONES_PER_VERTEX};
use crate::scene::mesh::Mesh;

/// Interleaved GPU vertex attribute pair for skinning
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SkinVertex {
    pub bone_indices: [u32; MAX_BONES_PER_VERTEX],
    pub weights: [f32; MAX_BONES_PER_VERTEX],
}

/// Packed influences for one mesh: `vertex_count * 4` indices and weights
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackedInfluences {
    indices: Vec<u32>,
    weights: Vec<f32>,
}

impl PackedInfluences {
    pub fn vertex_count(&self) -> usize {
        self.indices.len() / MAX_BONES_PER_VERTEX
    }

    /// Flat bone slot indices, four per vertex
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Flat weights, four per vertex
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Slots of a single vertex
    pub fn vertex(&self, vertex: usize) -> Option<SkinVertex> {
        let start = vertex.checked_mul(MAX_BONES_PER_VERTEX)?;
        let end = start + MAX_BONES_PER_VERTEX;
        let indices = self.indices.get(start..end)?;
        let weights = self.weights.get(start..end)?;

        let mut out = SkinVertex::default();
        out.bone_indices.copy_from_slice(indices);
        out.weights.copy_from_slice(weights);
        Some(out)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn weight_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.weights)
    }

    /// Interleaved form for a single vertex buffer
    pub fn to_skin_vertices(&self) -> Vec<SkinVertex> {
        (0..self.vertex_count()).filter_map(|v| self.vertex(v)).collect()
    }
}

/// Pack the bone influences of `mesh` (mesh index `mesh_index`, used for errors).
///
/// Slot order within a vertex follows bone order. Weights are taken as is; no
/// pruning or renormalization happens here.
pub fn pack_bone_influences(mesh_index: usize, mesh: &Mesh) -> Result<PackedInfluences> {
    if mesh.bones.len() > MAX_BONES_PER_MESH {
        return Err(Error::TooManyBones {
            mesh: mesh_index,
            count: mesh.bones.len(),
            max: MAX_BONES_PER_MESH,
        });
    }

    let vertex_count = mesh.vertex_count();
    let mut per_vertex: Vec<Vec<(u32, f32)>> = vec![Vec::new(); vertex_count];

    for (slot, bone) in mesh.bones.iter().enumerate() {
        for influence in &bone.weights {
            let vertex = influence.vertex as usize;
            let list = per_vertex.get_mut(vertex).ok_or(Error::VertexOutOfRange {
                mesh: mesh_index,
                bone: slot,
                vertex,
                vertex_count,
            })?;
            list.push((slot as u32, influence.weight));
        }
    }

    let mut packed = PackedInfluences {
        indices: vec![0; vertex_count * MAX_BONES_PER_VERTEX],
        weights: vec![0.0; vertex_count * MAX_BONES_PER_VERTEX],
    };

    for (vertex, influences) in per_vertex.iter().enumerate() {
        if influences.len() > MAX_BONES_PER_VERTEX {
            return Err(Error::TooManyInfluences {
                mesh: mesh_index,
                vertex,
                count: influences.len(),
                max: MAX_BONES_PER_VERTEX,
            });
        }

        let base = vertex * MAX_BONES_PER_VERTEX;
        for (slot, &(bone, weight)) in influences.iter().enumerate() {
            packed.indices[base + slot] = bone;
            packed.weights[base + slot] = weight;
        }
    }

    log::debug!(
        "Packed {} bones over {} vertices for mesh {} ('{}')",
        mesh.bones.len(),
        vertex_count,
        mesh_index,
        mesh.name
    );

    Ok(packed)
}
