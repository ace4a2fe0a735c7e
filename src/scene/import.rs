//! Scene import description
//!
//! Plain serde data as handed over by an external importer (or written by
//! hand for tests). Matrices are column-major `[f32; 16]`, quaternions are
//! `[x, y, z, w]`, key times are in clip ticks.

use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::graph::SceneGraph;
use super::mesh::{Bone, Light, Mesh, SceneCamera, VertexWeight};
use super::node::NodeId;
use crate::animation::clip::{AnimationClip, Key, NodeChannel};
use crate::core::{Error, Result};

const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, //
];

fn identity() -> [f32; 16] {
    IDENTITY
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneImport {
    pub root: NodeImport,
    #[serde(default)]
    pub meshes: Vec<MeshImport>,
    #[serde(default)]
    pub animations: Vec<ClipImport>,
    #[serde(default)]
    pub lights: Vec<Light>,
    #[serde(default)]
    pub cameras: Vec<SceneCamera>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeImport {
    pub name: String,
    #[serde(default = "identity")]
    pub transform: [f32; 16],
    #[serde(default)]
    pub meshes: Vec<usize>,
    #[serde(default)]
    pub children: Vec<NodeImport>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MeshImport {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
    #[serde(default)]
    pub tangents: Vec<[f32; 3]>,
    #[serde(default)]
    pub bitangents: Vec<[f32; 3]>,
    #[serde(default)]
    pub uv_channels: Vec<Vec<[f32; 3]>>,
    #[serde(default)]
    pub faces: Vec<Vec<u32>>,
    #[serde(default)]
    pub bones: Vec<BoneImport>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoneImport {
    pub name: String,
    #[serde(default = "identity")]
    pub offset_matrix: [f32; 16],
    #[serde(default)]
    pub weights: Vec<VertexWeight>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClipImport {
    pub name: String,
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub ticks_per_second: f32,
    #[serde(default)]
    pub channels: Vec<ChannelImport>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelImport {
    pub node: String,
    #[serde(default)]
    pub position_keys: Vec<VectorKeyImport>,
    #[serde(default)]
    pub rotation_keys: Vec<QuatKeyImport>,
    #[serde(default)]
    pub scaling_keys: Vec<VectorKeyImport>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct VectorKeyImport {
    pub time: f32,
    pub value: [f32; 3],
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct QuatKeyImport {
    pub time: f32,
    pub value: [f32; 4],
}

fn matrix(values: &[f32; 16], what: &str) -> Result<Mat4> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(Mat4::from_cols_array(values))
    } else {
        Err(Error::Import(format!("non-finite matrix in {}", what)))
    }
}

fn vector_key(key: &VectorKeyImport, node: &str, track: &str) -> Result<Key<Vec3>> {
    if key.time.is_finite() && key.value.iter().all(|v| v.is_finite()) {
        Ok(Key::new(key.time, Vec3::from_array(key.value)))
    } else {
        Err(Error::Import(format!(
            "non-finite {} key at time {} for node '{}'",
            track, key.time, node
        )))
    }
}

/// Rotation keys must be finite and non-zero so they survive normalization
fn quat_key(key: &QuatKeyImport, node: &str) -> Result<Key<Quat>> {
    let value = Quat::from_array(key.value);
    let length_squared = value.length_squared();
    if key.time.is_finite() && value.is_finite() && length_squared.is_normal() {
        Ok(Key::new(key.time, value))
    } else {
        Err(Error::Import(format!(
            "invalid rotation key {:?} at time {} for node '{}'",
            key.value, key.time, node
        )))
    }
}

fn vectors(values: &[[f32; 3]]) -> Vec<Vec3> {
    values.iter().copied().map(Vec3::from_array).collect()
}

impl SceneImport {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Import(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Import(format!("{}: {}", path.display(), e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Import(e.to_string()))
    }

    /// Build the node hierarchy, checking mesh references against `mesh_count`.
    pub fn build_graph(&self, mesh_count: usize) -> Result<SceneGraph> {
        let root = &self.root;
        let mut graph = SceneGraph::new(root.name.clone(), matrix(&root.transform, &root.name)?);
        let root_id = graph.root();
        check_mesh_refs(root, mesh_count)?;
        graph.set_meshes(root_id, root.meshes.clone());

        for child in &root.children {
            add_subtree(&mut graph, root_id, child, mesh_count)?;
        }
        Ok(graph)
    }
}

fn check_mesh_refs(node: &NodeImport, mesh_count: usize) -> Result<()> {
    match node.meshes.iter().find(|&&m| m >= mesh_count) {
        Some(bad) => Err(Error::Import(format!(
            "node '{}' references mesh {} but the scene has {} meshes",
            node.name, bad, mesh_count
        ))),
        None => Ok(()),
    }
}

/// Pre-order insertion so duplicate names resolve like a depth-first search
fn add_subtree(
    graph: &mut SceneGraph,
    parent: NodeId,
    node: &NodeImport,
    mesh_count: usize,
) -> Result<()> {
    check_mesh_refs(node, mesh_count)?;
    let id = graph
        .add_child(parent, node.name.clone(), matrix(&node.transform, &node.name)?)
        .ok_or_else(|| Error::Import(format!("missing parent for node '{}'", node.name)))?;
    graph.set_meshes(id, node.meshes.clone());

    for child in &node.children {
        add_subtree(graph, id, child, mesh_count)?;
    }
    Ok(())
}

impl MeshImport {
    pub fn to_mesh(&self) -> Result<Mesh> {
        let bones = self
            .bones
            .iter()
            .map(|b| {
                Ok(Bone::new(b.name.clone(), matrix(&b.offset_matrix, &b.name)?)
                    .with_weights(b.weights.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Mesh {
            name: self.name.clone(),
            positions: vectors(&self.positions),
            normals: vectors(&self.normals),
            tangents: vectors(&self.tangents),
            bitangents: vectors(&self.bitangents),
            uv_channels: self.uv_channels.iter().map(|c| vectors(c)).collect(),
            faces: self.faces.clone(),
            bones,
        })
    }
}

impl ClipImport {
    /// Convert to a clip, sorting out-of-order keys and rejecting empty tracks.
    pub fn to_clip(&self) -> Result<AnimationClip> {
        if !self.duration.is_finite() || !self.ticks_per_second.is_finite() {
            return Err(Error::Import(format!(
                "clip '{}' has a non-finite duration or tick rate",
                self.name
            )));
        }
        let mut clip = AnimationClip::new(self.name.clone(), self.duration, self.ticks_per_second);

        for source in &self.channels {
            let node = source.node.as_str();
            let mut channel = NodeChannel::new(node);
            channel.positions = source
                .position_keys
                .iter()
                .map(|k| vector_key(k, node, "position"))
                .collect::<Result<_>>()?;
            channel.rotations = source
                .rotation_keys
                .iter()
                .map(|k| quat_key(k, node))
                .collect::<Result<_>>()?;
            channel.scalings = source
                .scaling_keys
                .iter()
                .map(|k| vector_key(k, node, "scaling"))
                .collect::<Result<_>>()?;

            if channel.normalize() {
                log::warn!(
                    "Clip '{}': keys for node '{}' were not time-sorted",
                    self.name,
                    channel.node_name
                );
            }
            clip.add_channel(channel);
        }
        clip.validate()?;

        if clip.duration <= 0.0 {
            clip.calculate_duration();
        }
        Ok(clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        "root": {
            "name": "Scene",
            "children": [
                { "name": "Armature",
                  "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,2,0,1],
                  "children": [ { "name": "Bone" } ] },
                { "name": "Body", "meshes": [0] }
            ]
        },
        "meshes": [
            { "name": "body",
              "positions": [[0,0,0],[1,0,0],[0,1,0]],
              "faces": [[0,1,2]],
              "bones": [ { "name": "Bone", "weights": [ { "vertex": 0, "weight": 1.0 } ] } ] }
        ],
        "animations": [
            { "name": "Wiggle", "ticks_per_second": 10,
              "channels": [ { "node": "Bone",
                "position_keys": [ { "time": 10, "value": [1,0,0] }, { "time": 0, "value": [0,0,0] } ],
                "rotation_keys": [ { "time": 0, "value": [0,0,0,2] } ],
                "scaling_keys": [ { "time": 0, "value": [1,1,1] } ] } ] }
        ]
    }"#;

    #[test]
    fn test_parse_and_build_graph() {
        let import = SceneImport::from_json(SCENE).unwrap();
        let graph = import.build_graph(import.meshes.len()).unwrap();

        assert_eq!(graph.node_count(), 4);
        let armature = graph.find("Armature").unwrap();
        let t = graph.get(armature).unwrap().transform;
        assert_eq!(t.w_axis.truncate(), Vec3::new(0.0, 2.0, 0.0));
        // Missing transform defaults to identity
        assert_eq!(graph.get(graph.find("Bone").unwrap()).unwrap().transform, Mat4::IDENTITY);
        assert_eq!(graph.get(graph.find("Body").unwrap()).unwrap().meshes, vec![0]);
    }

    #[test]
    fn test_bad_mesh_reference() {
        let import = SceneImport::from_json(SCENE).unwrap();
        assert!(matches!(import.build_graph(0), Err(Error::Import(_))));
    }

    #[test]
    fn test_mesh_conversion() {
        let import = SceneImport::from_json(SCENE).unwrap();
        let mesh = import.meshes[0].to_mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert!(!mesh.has_normals());
        assert_eq!(mesh.bones.len(), 1);
        assert_eq!(mesh.bones[0].offset, Mat4::IDENTITY);
        assert_eq!(mesh.bones[0].weights[0], VertexWeight::new(0, 1.0));
    }

    #[test]
    fn test_clip_conversion_sorts_and_normalizes() {
        let import = SceneImport::from_json(SCENE).unwrap();
        let clip = import.animations[0].to_clip().unwrap();
        let channel = &clip.channels[0];

        assert_eq!(channel.positions[0].time, 0.0);
        assert_eq!(channel.positions[1].time, 10.0);
        assert!((channel.rotations[0].value.length() - 1.0).abs() < 1e-6);
        // Duration derived from keys when not declared
        assert_eq!(clip.duration, 10.0);
        assert_eq!(clip.ticks_per_second, 10.0);
    }

    #[test]
    fn test_clip_with_empty_track() {
        let clip = ClipImport {
            name: "broken".into(),
            duration: 1.0,
            ticks_per_second: 0.0,
            channels: vec![ChannelImport {
                node: "Bone".into(),
                position_keys: vec![VectorKeyImport { time: 0.0, value: [0.0; 3] }],
                rotation_keys: Vec::new(),
                scaling_keys: vec![VectorKeyImport { time: 0.0, value: [1.0; 3] }],
            }],
        };
        assert!(matches!(clip.to_clip(), Err(Error::EmptyChannel { .. })));
    }

    fn single_key_clip(position: VectorKeyImport, rotation: QuatKeyImport) -> ClipImport {
        ClipImport {
            name: "keys".into(),
            duration: 0.0,
            ticks_per_second: 0.0,
            channels: vec![ChannelImport {
                node: "Bone".into(),
                position_keys: vec![position],
                rotation_keys: vec![rotation],
                scaling_keys: vec![VectorKeyImport { time: 0.0, value: [1.0; 3] }],
            }],
        }
    }

    const ORIGIN: VectorKeyImport = VectorKeyImport { time: 0.0, value: [0.0; 3] };
    const UNIT: QuatKeyImport = QuatKeyImport { time: 0.0, value: [0.0, 0.0, 0.0, 1.0] };

    #[test]
    fn test_zero_rotation_key_rejected() {
        let clip = single_key_clip(ORIGIN, QuatKeyImport { time: 0.0, value: [0.0; 4] });
        assert!(matches!(clip.to_clip(), Err(Error::Import(_))));

        let clip = single_key_clip(ORIGIN, QuatKeyImport { time: 0.0, value: [0.0, f32::NAN, 0.0, 1.0] });
        assert!(matches!(clip.to_clip(), Err(Error::Import(_))));
    }

    #[test]
    fn test_non_finite_key_time_rejected() {
        let clip = single_key_clip(VectorKeyImport { time: f32::INFINITY, value: [0.0; 3] }, UNIT);
        assert!(matches!(clip.to_clip(), Err(Error::Import(_))));

        let clip = single_key_clip(ORIGIN, QuatKeyImport { time: f32::NAN, value: [0.0, 0.0, 0.0, 1.0] });
        assert!(matches!(clip.to_clip(), Err(Error::Import(_))));
    }

    #[test]
    fn test_non_finite_key_value_rejected() {
        let clip = single_key_clip(VectorKeyImport { time: 0.0, value: [f32::NAN, 0.0, 0.0] }, UNIT);
        assert!(matches!(clip.to_clip(), Err(Error::Import(_))));

        let mut clip = single_key_clip(ORIGIN, UNIT);
        clip.channels[0].scaling_keys[0].value = [1.0, f32::INFINITY, 1.0];
        assert!(matches!(clip.to_clip(), Err(Error::Import(_))));
    }

    #[test]
    fn test_overflowing_key_time_in_json_rejected() {
        let json = r#"{ "root": { "name": "Bone" },
            "animations": [ { "name": "far",
                "channels": [ { "node": "Bone",
                    "position_keys": [ { "time": 1e39, "value": [0,0,0] } ],
                    "rotation_keys": [ { "time": 0, "value": [0,0,0,1] } ],
                    "scaling_keys": [ { "time": 0, "value": [1,1,1] } ] } ] } ] }"#;
        // serde_json either refuses the out-of-range f32 or yields infinity
        if let Ok(import) = SceneImport::from_json(json) {
            assert!(matches!(import.animations[0].to_clip(), Err(Error::Import(_))));
        }
    }

    #[test]
    fn test_valid_keys_accepted() {
        let clip = single_key_clip(ORIGIN, UNIT).to_clip().unwrap();
        assert_eq!(clip.channels[0].rotations[0].value, Quat::IDENTITY);
    }

    #[test]
    fn test_non_finite_matrix() {
        let mut import = SceneImport::from_json(SCENE).unwrap();
        import.root.children[0].transform[12] = f32::NAN;
        assert!(matches!(import.build_graph(1), Err(Error::Import(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(SceneImport::from_json("{"), Err(Error::Import(_))));
    }

    #[test]
    fn test_json_round_trip_preserves_hierarchy() {
        let import = SceneImport::from_json(SCENE).unwrap();
        let again = SceneImport::from_json(&import.to_json().unwrap()).unwrap();
        assert_eq!(again.root.children.len(), 2);
        assert_eq!(again.animations[0].channels[0].position_keys.len(), 2);
    }
}
