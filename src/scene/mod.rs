//! Imported scene data and load-time lookup tables

pub mod graph;
pub mod import;
pub mod index;
pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;

pub use graph::SceneGraph;
pub use import::SceneImport;
pub use index::{BoneRef, SceneGraphIndex};
pub use mesh::{Bone, Light, LightKind, Mesh, SceneCamera, VertexWeight};
pub use node::{NodeId, SceneNode};
pub use scene::Scene;
