//! Hierarchy transform evaluation
//!
//! One pass per frame over the node tree, parents before children: compose
//! each node's local transform (animated or bind pose) with its parent's world
//! transform, record mesh model transforms and write skinning matrices
//! (`world * offset`) for every bone slot the node drives.

use glam::Mat4;

use super::clip::{AnimationClip, NodeChannel};
use super::interpolate::{interpolate_rotation, interpolate_scale, interpolate_translation};
use crate::core::{Result, ScaleMode, MAX_BONES_PER_MESH};
use crate::scene::{NodeId, Scene, SceneGraph};

/// Skinning matrices of one mesh, one per bone slot
pub type BoneMatrices = [Mat4; MAX_BONES_PER_MESH];

/// Current skinning matrices for every mesh, indexed `[mesh][bone slot]`.
/// Unused slots hold identity.
#[derive(Clone, Debug, PartialEq)]
pub struct BoneMatrixTable {
    meshes: Vec<BoneMatrices>,
}

impl BoneMatrixTable {
    pub fn new(mesh_count: usize) -> Self {
        Self {
            meshes: vec![[Mat4::IDENTITY; MAX_BONES_PER_MESH]; mesh_count],
        }
    }

    /// Reset every slot to identity
    pub fn reset(&mut self) {
        for matrices in &mut self.meshes {
            matrices.fill(Mat4::IDENTITY);
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn get(&self, mesh: usize) -> Option<&BoneMatrices> {
        self.meshes.get(mesh)
    }

    pub fn bone(&self, mesh: usize, slot: usize) -> Option<Mat4> {
        self.meshes.get(mesh)?.get(slot).copied()
    }

    fn set(&mut self, mesh: usize, slot: usize, matrix: Mat4) {
        if let Some(target) = self.meshes.get_mut(mesh).and_then(|m| m.get_mut(slot)) {
            *target = matrix;
        }
    }
}

/// Everything one evaluation produces
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    pub bones: BoneMatrixTable,
    /// Model transform per mesh; identity for meshes no node draws
    pub mesh_transforms: Vec<Mat4>,
    /// World transform per node, indexed by `NodeId`
    pub world_transforms: Vec<Mat4>,
}

impl FrameState {
    pub fn new(mesh_count: usize, node_count: usize) -> Self {
        Self {
            bones: BoneMatrixTable::new(mesh_count),
            mesh_transforms: vec![Mat4::IDENTITY; mesh_count],
            world_transforms: vec![Mat4::IDENTITY; node_count],
        }
    }

    pub fn for_scene(scene: &Scene) -> Self {
        Self::new(scene.mesh_count(), scene.graph().node_count())
    }

    fn reset(&mut self) {
        self.bones.reset();
        self.mesh_transforms.fill(Mat4::IDENTITY);
        self.world_transforms.fill(Mat4::IDENTITY);
    }
}

/// Channel index of a clip for each node, resolved once when a clip is bound
#[derive(Clone, Debug)]
pub struct ClipBinding {
    channels: Vec<Option<usize>>,
}

impl ClipBinding {
    pub fn new(graph: &SceneGraph, clip: &AnimationClip) -> Self {
        let mut channels = vec![None; graph.node_count()];
        for (i, channel) in clip.channels.iter().enumerate() {
            match graph.find(&channel.node_name) {
                Some(node) => {
                    let slot = &mut channels[node.index()];
                    if slot.is_none() {
                        *slot = Some(i);
                    }
                }
                None => log::debug!(
                    "Clip '{}' animates unknown node '{}'",
                    clip.name,
                    channel.node_name
                ),
            }
        }
        Self { channels }
    }

    pub fn channel(&self, node: NodeId) -> Option<usize> {
        self.channels.get(node.index()).copied().flatten()
    }

    pub fn animated_node_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_some()).count()
    }
}

/// Local transform of an animated node at tick `t`
pub fn animated_local_transform(channel: &NodeChannel, t: f32, scale_mode: ScaleMode) -> Result<Mat4> {
    let translation = interpolate_translation(channel, t)?;
    let rotation = interpolate_rotation(channel, t)?;
    let scale = interpolate_scale(channel, t)?;

    Ok(match scale_mode {
        ScaleMode::Ignore => Mat4::from_rotation_translation(rotation, translation),
        ScaleMode::Apply => Mat4::from_scale_rotation_translation(scale, rotation, translation),
    })
}

/// Evaluate `clip` at tick `t` over the whole scene into `out`.
///
/// `out` is fully overwritten. On error its contents are unspecified; callers
/// wanting to keep the previous frame evaluate into a scratch state.
pub fn evaluate(
    scene: &Scene,
    clip: &AnimationClip,
    binding: &ClipBinding,
    t: f32,
    scale_mode: ScaleMode,
    out: &mut FrameState,
) -> Result<()> {
    out.reset();

    let graph = scene.graph();
    let index = scene.index();
    let meshes = scene.meshes();

    let mut stack: Vec<(NodeId, Mat4)> = vec![(graph.root(), Mat4::IDENTITY)];
    while let Some((id, parent_world)) = stack.pop() {
        let Some(node) = graph.get(id) else {
            continue;
        };

        let local = match binding.channel(id).and_then(|c| clip.channels.get(c)) {
            Some(channel) => animated_local_transform(channel, t, scale_mode)?,
            None => node.transform,
        };
        let world = parent_world * local;
        if let Some(slot) = out.world_transforms.get_mut(id.index()) {
            *slot = world;
        }

        for &mesh in &node.meshes {
            if let Some(slot) = out.mesh_transforms.get_mut(mesh) {
                *slot = world;
            }
        }

        for bone_ref in index.bones(id) {
            let offset = meshes
                .get(bone_ref.mesh)
                .and_then(|m| m.bones.get(bone_ref.bone))
                .map_or(Mat4::IDENTITY, |b| b.offset);
            out.bones.set(bone_ref.mesh, bone_ref.bone, world * offset);
        }

        stack.extend(graph.children(id).iter().rev().map(|&child| (child, world)));
    }

    Ok(())
}
