//! Scene graph: the imported node hierarchy.
//!
//! Nodes live in a flat arena indexed by `NodeId`. The graph is assembled once
//! by the importer and read-only afterwards; animation never mutates it.

use std::collections::HashMap;

use glam::Mat4;

use super::node::{NodeId, SceneNode};

/// Node hierarchy with name lookup
#[derive(Clone, Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: NodeId,
    by_name: HashMap<String, NodeId>,
}

impl SceneGraph {
    /// Create a graph holding only a root node.
    pub fn new(root_name: impl Into<String>, root_transform: Mat4) -> Self {
        let root = NodeId(0);
        let node = SceneNode::new(root, root_name, root_transform);

        let mut by_name = HashMap::new();
        by_name.insert(node.name.clone(), root);

        Self {
            nodes: vec![node],
            root,
            by_name,
        }
    }

    /// Root node ID
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a child node under `parent`. Returns the new node's ID, or `None` if
    /// `parent` does not exist.
    ///
    /// When names collide the node added first keeps the name lookup; adding in
    /// depth-first pre-order therefore matches a depth-first name search.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Mat4,
    ) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }

        let id = NodeId(self.nodes.len());
        let mut node = SceneNode::new(id, name, transform);
        node.parent = Some(parent);

        if self.by_name.contains_key(&node.name) {
            log::warn!("Duplicate node name '{}', keeping the first", node.name);
        } else {
            self.by_name.insert(node.name.clone(), id);
        }

        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    /// Attach mesh indices to a node
    pub fn set_meshes(&mut self, id: NodeId, meshes: Vec<usize>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.meshes = meshes;
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Find a node by name
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node IDs in depth-first, parent-before-children order
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }
}
