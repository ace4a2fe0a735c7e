//! Graphviz dump of a loaded scene

use std::io::{self, Write};

use crate::scene::{NodeId, Scene};

/// Escape text for use inside a quoted DOT label
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Collects DOT statements: edges first, then labelled nodes
#[derive(Default)]
struct DotBuilder {
    edges: Vec<String>,
    nodes: Vec<String>,
}

impl DotBuilder {
    fn node(&mut self, id: &str, lines: &[String]) {
        let label = lines.iter().map(|l| escape(l)).collect::<Vec<_>>().join("\\n");
        self.nodes.push(format!("    {} [label=\"{}\\n\"];", id, label));
    }

    fn edge(&mut self, from: &str, to: &str) {
        self.edges.push(format!("    {} -> {};", from, to));
    }

    fn write(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "digraph scene {{")?;
        writeln!(out, "    node [shape=box];")?;
        for edge in &self.edges {
            writeln!(out, "{}", edge)?;
        }
        writeln!(out)?;
        for node in &self.nodes {
            writeln!(out, "{}", node)?;
        }
        writeln!(out, "}}")
    }
}

fn mesh_id(mesh: usize) -> String {
    format!("mesh_{}", mesh)
}

fn node_id(node: NodeId) -> String {
    format!("node_{}", node.index())
}

/// Write `scene` as a DOT digraph: summary, meshes with their bones, clips and
/// the node hierarchy annotated with everything each node references.
pub fn write_dot(scene: &Scene, out: &mut impl Write) -> io::Result<()> {
    let mut dot = DotBuilder::default();

    dot.node(
        "scene",
        &[
            "Scene".to_string(),
            format!("Meshes: {}", scene.mesh_count()),
            format!("Lights: {}", scene.lights().len()),
            format!("Cameras: {}", scene.cameras().len()),
            format!("Animations: {}", scene.clips().len()),
        ],
    );

    for (i, mesh) in scene.meshes().iter().enumerate() {
        let index_count = scene.mesh_data(i).map_or(0, |d| d.element_count());
        let tangents = if mesh.has_tangents() { mesh.vertex_count() } else { 0 };
        dot.node(
            &mesh_id(i),
            &[
                format!("Mesh: {}", mesh.name),
                format!("Vertices: {}", mesh.vertex_count()),
                format!("Indices: {}", index_count),
                format!("UV channels: {}", mesh.uv_channels.len()),
                format!("Tangents/bitangents: {}", tangents),
                format!("Bones: {}", mesh.bones.len()),
            ],
        );

        for (j, bone) in mesh.bones.iter().enumerate() {
            let id = format!("mesh_{}_bone_{}", i, j);
            dot.node(
                &id,
                &[format!("Bone: {}", bone.name), format!("Weights: {}", bone.weights.len())],
            );
            dot.edge(&mesh_id(i), &id);
        }
    }

    for (i, clip) in scene.clips().iter().enumerate() {
        dot.node(
            &format!("clip_{}", i),
            &[
                format!("Animation: {}", clip.name),
                format!("Duration (ticks): {}", clip.duration),
                format!("Ticks per second: {}", clip.ticks_per_second),
                format!("Channels: {}", clip.channels.len()),
            ],
        );
    }

    let graph = scene.graph();
    let index = scene.index();
    for id in graph.depth_first() {
        let Some(node) = graph.get(id) else {
            continue;
        };

        let mut lines = vec![format!("Name: {}", node.name)];
        if !node.meshes.is_empty() {
            let list = node.meshes.iter().map(|m| format!("'{}'", m)).collect::<Vec<_>>();
            lines.push(format!("References mesh(es) {}", list.join(", ")));
            for &mesh in &node.meshes {
                dot.edge(&node_id(id), &mesh_id(mesh));
            }
        }
        for bone in index.bones(id) {
            lines.push(format!("References bone from mesh '{}', bone ID '{}'", bone.mesh, bone.bone));
        }
        if let Some(light) = index.light(id) {
            lines.push(format!("References light '{}'", light));
        }
        if let Some(camera) = index.camera(id) {
            lines.push(format!("References camera '{}'", camera));
        }
        for &clip in index.clips(id) {
            lines.push(format!("Animated by '{}'", clip));
        }

        dot.node(&node_id(id), &lines);
        for &child in graph.children(id) {
            dot.edge(&node_id(id), &node_id(child));
        }
    }

    dot.write(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AnimationConfig;
    use crate::scene::SceneImport;

    const SCENE: &str = r#"{
        "root": { "name": "Root", "children": [
            { "name": "Arm \"L\"", "children": [ { "name": "Hand" } ] },
            { "name": "Body", "meshes": [0, 1] },
            { "name": "Key" } ] },
        "meshes": [
            { "name": "a", "positions": [[0,0,0],[1,0,0],[0,1,0]], "faces": [[0,1,2],[0,1]],
              "bones": [ { "name": "Hand", "weights": [ { "vertex": 0, "weight": 1.0 } ] } ] },
            { "name": "b", "positions": [[0,0,0]],
              "bones": [ { "name": "Hand" } ] } ],
        "animations": [ { "name": "Wave", "duration": 4, "ticks_per_second": 24,
            "channels": [ { "node": "Hand",
                "position_keys": [ { "time": 0, "value": [0,0,0] } ],
                "rotation_keys": [ { "time": 0, "value": [0,0,0,1] } ],
                "scaling_keys": [ { "time": 0, "value": [1,1,1] } ] } ] } ],
        "lights": [ { "name": "Key" } ]
    }"#;

    fn dump() -> String {
        let import = SceneImport::from_json(SCENE).unwrap();
        let scene = Scene::from_import(import, &AnimationConfig::default()).unwrap();
        let mut out = Vec::new();
        write_dot(&scene, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_dot_structure() {
        let dot = dump();
        assert!(dot.starts_with("digraph scene {"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("Meshes: 2"));
        assert!(dot.contains("Indices: 3"));
        assert!(dot.contains("mesh_0 -> mesh_0_bone_0;"));
        assert!(dot.contains("Duration (ticks): 4"));
        assert!(dot.contains("node_0 -> node_1;"));
    }

    #[test]
    fn test_node_references() {
        let dot = dump();
        assert!(dot.contains("References mesh(es) '0', '1'"));
        assert!(dot.contains("References bone from mesh '0', bone ID '0'"));
        assert!(dot.contains("References bone from mesh '1', bone ID '0'"));
        assert!(dot.contains("References light '0'"));
        assert!(dot.contains("Animated by '0'"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let dot = dump();
        assert!(dot.contains(r#"Name: Arm \"L\""#));
        assert_eq!(escape("a\\b"), "a\\\\b");
    }
}
