//! Loaded scene: hierarchy, meshes, clips and load-time lookup tables

use std::collections::HashMap;
use std::path::Path;

use super::graph::SceneGraph;
use super::import::SceneImport;
use super::index::SceneGraphIndex;
use super::mesh::{Light, Mesh, SceneCamera};
use crate::animation::clip::AnimationClip;
use crate::core::{AnimationConfig, Result};
use crate::render::mesh_data::{MeshBuffers, MeshData};

/// An imported scene. Read-only once built; animation instances borrow it.
#[derive(Clone, Debug)]
pub struct Scene {
    graph: SceneGraph,
    meshes: Vec<Mesh>,
    clips: Vec<AnimationClip>,
    lights: Vec<Light>,
    cameras: Vec<SceneCamera>,
    index: SceneGraphIndex,
    buffers: MeshBuffers,
    clip_names: HashMap<String, usize>,
}

impl Scene {
    /// Validate and convert an import description
    pub fn from_import(import: SceneImport, config: &AnimationConfig) -> Result<Self> {
        let meshes = import
            .meshes
            .iter()
            .map(|m| m.to_mesh())
            .collect::<Result<Vec<_>>>()?;
        let graph = import.build_graph(meshes.len())?;
        let clips = import
            .animations
            .iter()
            .map(|c| c.to_clip())
            .collect::<Result<Vec<_>>>()?;

        let buffers = MeshBuffers::build(&meshes, config)?;
        let index = SceneGraphIndex::build(&graph, &meshes, &clips, &import.lights, &import.cameras);

        let mut clip_names = HashMap::with_capacity(clips.len());
        for (i, clip) in clips.iter().enumerate() {
            if clip_names.contains_key(&clip.name) {
                log::warn!("Duplicate clip name '{}', keeping the first", clip.name);
            } else {
                clip_names.insert(clip.name.clone(), i);
            }
        }

        log::info!(
            "Scene loaded: {} nodes, {} meshes, {} clips, {} bone nodes",
            graph.node_count(),
            meshes.len(),
            clips.len(),
            index.bone_node_count()
        );

        Ok(Self {
            graph,
            meshes,
            clips,
            lights: import.lights,
            cameras: import.cameras,
            index,
            buffers,
            clip_names,
        })
    }

    /// Read a JSON scene description from disk
    pub fn load(path: &Path, config: &AnimationConfig) -> Result<Self> {
        log::info!("Loading scene {}", path.display());
        Self::from_import(SceneImport::load(path)?, config)
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Prepared vertex data. `None` for an out of range index.
    pub fn mesh_data(&self, index: usize) -> Option<&MeshData> {
        self.buffers.get(index)
    }

    pub fn mesh_buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    pub fn find_mesh(&self, name: &str) -> Option<usize> {
        self.meshes.iter().position(|m| m.name == name)
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    pub fn clip(&self, index: usize) -> Option<&AnimationClip> {
        self.clips.get(index)
    }

    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.clip_names.get(name).copied()
    }

    pub fn clip_by_name(&self, name: &str) -> Option<&AnimationClip> {
        self.clip_index(name).and_then(|i| self.clips.get(i))
    }

    pub fn index(&self) -> &SceneGraphIndex {
        &self.index
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn cameras(&self) -> &[SceneCamera] {
        &self.cameras
    }
}
