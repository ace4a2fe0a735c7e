//! Lookup tables over an imported scene
//!
//! Built once at load time: which light, camera, bone references and clips
//! belong to each node. Names with no matching node are skipped; imported
//! assets routinely carry stale names.

use std::collections::HashMap;

use super::graph::SceneGraph;
use super::mesh::{Light, Mesh, SceneCamera};
use super::node::NodeId;
use crate::animation::clip::AnimationClip;

/// A bone slot of a particular mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoneRef {
    pub mesh: usize,
    pub bone: usize,
}

/// Node -> scene element lookups
#[derive(Clone, Debug, Default)]
pub struct SceneGraphIndex {
    lights: HashMap<NodeId, usize>,
    cameras: HashMap<NodeId, usize>,
    /// One node may drive bones in several meshes (shared skeletons)
    bones: HashMap<NodeId, Vec<BoneRef>>,
    /// One node may be animated by several clips
    clips: HashMap<NodeId, Vec<usize>>,
}

impl SceneGraphIndex {
    pub fn build(
        graph: &SceneGraph,
        meshes: &[Mesh],
        clips: &[AnimationClip],
        lights: &[Light],
        cameras: &[SceneCamera],
    ) -> Self {
        let mut index = Self::default();

        for (i, light) in lights.iter().enumerate() {
            match graph.find(&light.name) {
                Some(node) => {
                    index.lights.entry(node).or_insert(i);
                }
                None => log::debug!("Light '{}' has no node, skipping", light.name),
            }
        }

        for (i, camera) in cameras.iter().enumerate() {
            match graph.find(&camera.name) {
                Some(node) => {
                    index.cameras.entry(node).or_insert(i);
                }
                None => log::debug!("Camera '{}' has no node, skipping", camera.name),
            }
        }

        for (mesh_index, mesh) in meshes.iter().enumerate() {
            for (bone_index, bone) in mesh.bones.iter().enumerate() {
                match graph.find(&bone.name) {
                    Some(node) => index.bones.entry(node).or_default().push(BoneRef {
                        mesh: mesh_index,
                        bone: bone_index,
                    }),
                    None => log::debug!(
                        "Bone '{}' of mesh {} has no node, skipping",
                        bone.name,
                        mesh_index
                    ),
                }
            }
        }

        for (clip_index, clip) in clips.iter().enumerate() {
            for channel in &clip.channels {
                match graph.find(&channel.node_name) {
                    Some(node) => {
                        let list = index.clips.entry(node).or_default();
                        if !list.contains(&clip_index) {
                            list.push(clip_index);
                        }
                    }
                    None => log::debug!(
                        "Channel '{}' of clip '{}' has no node, skipping",
                        channel.node_name,
                        clip.name
                    ),
                }
            }
        }

        index
    }

    pub fn light(&self, node: NodeId) -> Option<usize> {
        self.lights.get(&node).copied()
    }

    pub fn camera(&self, node: NodeId) -> Option<usize> {
        self.cameras.get(&node).copied()
    }

    /// Bone slots driven by `node`; empty if the node is not a bone
    pub fn bones(&self, node: NodeId) -> &[BoneRef] {
        self.bones.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_bone(&self, node: NodeId) -> bool {
        self.bones.contains_key(&node)
    }

    /// Clips with a channel targeting `node`
    pub fn clips(&self, node: NodeId) -> &[usize] {
        self.clips.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct bone nodes
    pub fn bone_node_count(&self) -> usize {
        self.bones.len()
    }
}
