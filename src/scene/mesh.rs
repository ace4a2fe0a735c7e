//! Imported mesh, bone, light and camera data

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// One raw (vertex, weight) influence of a bone
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexWeight {
    pub vertex: u32,
    pub weight: f32,
}

impl VertexWeight {
    pub fn new(vertex: u32, weight: f32) -> Self {
        Self { vertex, weight }
    }
}

/// A bone reference inside a mesh.
///
/// The name resolves to exactly one scene node; that node's animated world
/// transform drives the bone.
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    /// Mesh space -> bone rest frame
    pub offset: Mat4,
    pub weights: Vec<VertexWeight>,
}

impl Bone {
    pub fn new(name: impl Into<String>, offset: Mat4) -> Self {
        Self {
            name: name.into(),
            offset,
            weights: Vec::new(),
        }
    }

    pub fn with_weights(mut self, weights: Vec<VertexWeight>) -> Self {
        self.weights = weights;
        self
    }
}

/// Triangle mesh as supplied by the importer
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    /// Empty when the mesh has no normals
    pub normals: Vec<Vec3>,
    /// Empty when the mesh has no tangent frame
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub uv_channels: Vec<Vec<Vec3>>,
    /// Face index lists; triangles after import post-processing
    pub faces: Vec<Vec<u32>>,
    pub bones: Vec<Bone>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            positions,
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty() && !self.bitangents.is_empty()
    }

    pub fn has_bones(&self) -> bool {
        !self.bones.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    #[default]
    Point,
    Directional,
    Spot,
    Ambient,
}

/// Light source, bound to a node of the same name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub name: String,
    #[serde(default)]
    pub kind: LightKind,
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
}

fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Camera description, bound to a node of the same name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneCamera {
    pub name: String,
    /// Horizontal field of view in radians
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default)]
    pub aspect: f32,
}

fn default_fov() -> f32 {
    std::f32::consts::FRAC_PI_4
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}
