//! Scene graph node types

use glam::Mat4;

/// Index of a node in its scene graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single node of an imported hierarchy.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: NodeId,
    /// Lookup key for bones, channels, lights and cameras
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Bind-pose transform relative to the parent
    pub transform: Mat4,
    /// Indices into the scene's mesh array drawn at this node
    pub meshes: Vec<usize>,
}

impl SceneNode {
    pub fn new(id: NodeId, name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform,
            meshes: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_node_id_equality() {
        assert_eq!(NodeId(1), NodeId(1));
        assert_ne!(NodeId(1), NodeId(2));
        assert_eq!(NodeId(7).index(), 7);
    }

    #[test]
    fn test_scene_node_new() {
        let transform = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let node = SceneNode::new(NodeId(0), "Armature", transform);
        assert_eq!(node.name, "Armature");
        assert_eq!(node.transform, transform);
        assert!(node.is_root());
        assert!(node.children.is_empty());
        assert!(node.meshes.is_empty());
    }
}
