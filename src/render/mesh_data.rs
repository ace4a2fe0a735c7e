//! Per-mesh vertex data prepared for upload

use glam::Vec3;

use crate::animation::skin::{pack_bone_influences, PackedInfluences};
use crate::core::{AnimationConfig, Result};
use crate::scene::Mesh;

/// Upload-ready copy of one mesh
#[derive(Clone, Debug)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    /// Tangents and bitangents are kept together or not at all
    pub tangents: Option<(Vec<Vec3>, Vec<Vec3>)>,
    pub uv_channels: Vec<Vec<Vec3>>,
    /// Flattened triangle list
    pub indices: Vec<u32>,
    /// Fixed-width bone influences, present when the mesh has bones
    pub skin: Option<PackedInfluences>,
}

impl MeshData {
    /// Prepare `mesh` for upload. Fails when its bone influences cannot be packed.
    pub fn build(mesh_index: usize, mesh: &Mesh, config: &AnimationConfig) -> Result<Self> {
        let indices = flatten_faces(&mesh.faces);

        let uv_limit = config.uv_channel_limit();
        if mesh.uv_channels.len() > uv_limit {
            log::warn!(
                "Mesh '{}' has {} UV channels, keeping {}",
                mesh.name,
                mesh.uv_channels.len(),
                uv_limit
            );
        }
        let uv_channels = mesh.uv_channels.iter().take(uv_limit).cloned().collect();

        let normals = mesh.has_normals().then(|| mesh.normals.clone());
        let tangents = mesh
            .has_tangents()
            .then(|| (mesh.tangents.clone(), mesh.bitangents.clone()));

        let skin = if mesh.has_bones() {
            Some(pack_bone_influences(mesh_index, mesh)?)
        } else {
            None
        };

        Ok(Self {
            name: mesh.name.clone(),
            positions: mesh.positions.clone(),
            normals,
            tangents,
            uv_channels,
            indices,
            skin,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices to draw
    pub fn element_count(&self) -> usize {
        self.indices.len()
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn is_skinned(&self) -> bool {
        self.skin.is_some()
    }
}

/// Faces with fewer than three indices are dropped, larger faces keep their first triangle.
fn flatten_faces(faces: &[Vec<u32>]) -> Vec<u32> {
    let mut indices = Vec::with_capacity(faces.len() * 3);
    for face in faces {
        if let [a, b, c, ..] = face.as_slice() {
            indices.extend_from_slice(&[*a, *b, *c]);
        }
    }
    indices
}

/// Owns the prepared data of every mesh in a scene
#[derive(Clone, Debug, Default)]
pub struct MeshBuffers {
    meshes: Vec<MeshData>,
}

impl MeshBuffers {
    pub fn build(meshes: &[Mesh], config: &AnimationConfig) -> Result<Self> {
        let meshes = meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| MeshData::build(i, mesh, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { meshes })
    }

    pub fn get(&self, index: usize) -> Option<&MeshData> {
        self.meshes.get(index)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeshData> {
        self.meshes.iter()
    }
}
