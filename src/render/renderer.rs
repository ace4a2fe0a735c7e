//! Boundary between animation evaluation and a renderer

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::mesh_data::MeshData;
use crate::animation::evaluator::FrameState;
use crate::core::{Result, MAX_BONES_PER_MESH};
use crate::scene::Scene;

/// Per-mesh uniform block uploaded before drawing a skinned mesh
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshUniforms {
    pub bones: [[[f32; 4]; 4]; MAX_BONES_PER_MESH],
    pub model: [[f32; 4]; 4],
    pub camera: [[f32; 4]; 4],
}

impl MeshUniforms {
    pub fn new(bones: &[Mat4; MAX_BONES_PER_MESH], model: Mat4, camera: Mat4) -> Self {
        Self {
            bones: bones.map(|m| m.to_cols_array_2d()),
            model: model.to_cols_array_2d(),
            camera: camera.to_cols_array_2d(),
        }
    }

    pub fn bone(&self, slot: usize) -> Option<Mat4> {
        self.bones.get(slot).map(Mat4::from_cols_array_2d)
    }
}

/// One evaluated frame as seen by a renderer
pub struct RenderFrame<'a> {
    scene: &'a Scene,
    state: &'a FrameState,
    camera: Mat4,
}

impl<'a> RenderFrame<'a> {
    pub fn new(scene: &'a Scene, state: &'a FrameState, camera: Mat4) -> Self {
        Self { scene, state, camera }
    }

    pub fn mesh_count(&self) -> usize {
        self.scene.mesh_count()
    }

    pub fn camera(&self) -> Mat4 {
        self.camera
    }

    /// Uniforms for `mesh`, `None` if the index is out of range
    pub fn uniforms(&self, mesh: usize) -> Option<MeshUniforms> {
        let bones = self.state.bones.get(mesh)?;
        let model = *self.state.mesh_transforms.get(mesh)?;
        Some(MeshUniforms::new(bones, model, self.camera))
    }

    pub fn find_mesh(&self, name: &str) -> Option<usize> {
        self.scene.find_mesh(name)
    }

    pub fn mesh_data(&self, mesh: usize) -> Option<&'a MeshData> {
        self.scene.mesh_data(mesh)
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }
}

/// Consumer of evaluated frames
pub trait AnimRenderer {
    fn draw(&mut self, frame: &RenderFrame<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AnimationConfig;
    use crate::scene::SceneImport;
    use glam::Vec3;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<MeshUniforms>(), (MAX_BONES_PER_MESH + 2) * 64);
    }

    #[test]
    fn test_uniforms_from_frame() {
        let import = SceneImport::from_json(
            r#"{ "root": { "name": "root", "meshes": [0] },
                 "meshes": [ { "name": "m", "positions": [[0,0,0]] } ] }"#,
        )
        .unwrap();
        let scene = Scene::from_import(import, &AnimationConfig::default()).unwrap();
        let mut state = FrameState::for_scene(&scene);
        state.mesh_transforms[0] = Mat4::from_translation(Vec3::Y);

        let camera = Mat4::from_translation(Vec3::Z);
        let frame = RenderFrame::new(&scene, &state, camera);
        let uniforms = frame.uniforms(0).unwrap();

        assert_eq!(Mat4::from_cols_array_2d(&uniforms.model), state.mesh_transforms[0]);
        assert_eq!(Mat4::from_cols_array_2d(&uniforms.camera), camera);
        assert_eq!(uniforms.bone(0), Some(Mat4::IDENTITY));
        assert!(frame.uniforms(1).is_none());
        assert_eq!(frame.find_mesh("m"), Some(0));
        assert!(frame.mesh_data(0).is_some());
    }
}
