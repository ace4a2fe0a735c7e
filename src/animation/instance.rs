//! Animation instance: one clip bound to one scene
//!
//! The instance owns all per-evaluation state (time, bone matrix table, mesh
//! transforms, camera) and borrows the scene, so independent instances over
//! the same scene can be advanced on separate threads.

use glam::Mat4;
use rayon::prelude::*;

use super::clip::AnimationClip;
use super::evaluator::{evaluate, BoneMatrices, ClipBinding, FrameState};
use crate::core::{AnimationConfig, Error, Result, ScaleMode};
use crate::render::{AnimRenderer, RenderFrame};
use crate::scene::Scene;

pub struct AnimationInstance<'a> {
    scene: &'a Scene,
    clip: &'a AnimationClip,
    clip_index: usize,
    binding: ClipBinding,
    ticks_per_second: f32,
    scale_mode: ScaleMode,
    time_ticks: f32,
    camera: Mat4,
    frame: FrameState,
    scratch: FrameState,
}

impl<'a> AnimationInstance<'a> {
    /// Bind clip `clip_index`. An out of range index is an error.
    ///
    /// The instance is evaluated once at time 0 so its first frame is valid.
    pub fn new(
        scene: &'a Scene,
        clip_index: usize,
        camera: Mat4,
        config: &AnimationConfig,
    ) -> Result<Self> {
        let clip = scene.clip(clip_index).ok_or(Error::ClipIndexOutOfRange {
            index: clip_index,
            count: scene.clips().len(),
        })?;

        let binding = ClipBinding::new(scene.graph(), clip);
        let ticks_per_second = config.ticks_per_second(clip.ticks_per_second);
        log::debug!(
            "Binding clip '{}' ({} animated nodes, {} ticks/s)",
            clip.name,
            binding.animated_node_count(),
            ticks_per_second
        );

        let mut instance = Self {
            scene,
            clip,
            clip_index,
            binding,
            ticks_per_second,
            scale_mode: config.scale_mode,
            time_ticks: 0.0,
            camera,
            frame: FrameState::for_scene(scene),
            scratch: FrameState::for_scene(scene),
        };
        instance.advance(0.0)?;
        Ok(instance)
    }

    /// Bind a clip by name. `Ok(None)` when the scene has no clip of that name.
    pub fn by_name(
        scene: &'a Scene,
        name: &str,
        camera: Mat4,
        config: &AnimationConfig,
    ) -> Result<Option<Self>> {
        match scene.clip_index(name) {
            Some(index) => Self::new(scene, index, camera, config).map(Some),
            None => {
                log::debug!("No clip named '{}'", name);
                Ok(None)
            }
        }
    }

    /// Re-evaluate the whole scene at `seconds` of wall-clock time.
    ///
    /// The previous frame is replaced only if evaluation succeeds.
    pub fn advance(&mut self, seconds: f32) -> Result<()> {
        let t = seconds * self.ticks_per_second;
        log::trace!("Evaluating '{}' at tick {}", self.clip.name, t);
        evaluate(
            self.scene,
            self.clip,
            &self.binding,
            t,
            self.scale_mode,
            &mut self.scratch,
        )?;
        std::mem::swap(&mut self.frame, &mut self.scratch);
        self.time_ticks = t;
        Ok(())
    }

    /// Advance, then hand the frame to `renderer`
    pub fn render(&mut self, seconds: f32, renderer: &mut dyn AnimRenderer) -> Result<()> {
        self.advance(seconds)?;
        renderer.draw(&self.render_frame())
    }

    /// Camera handed to renderers; evaluation ignores it
    pub fn bind_camera(&mut self, camera: Mat4) {
        self.camera = camera;
    }

    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame::new(self.scene, &self.frame, self.camera)
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub fn clip(&self) -> &'a AnimationClip {
        self.clip
    }

    pub fn clip_index(&self) -> usize {
        self.clip_index
    }

    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    /// Time of the current frame in clip ticks
    pub fn time_ticks(&self) -> f32 {
        self.time_ticks
    }

    pub fn camera(&self) -> Mat4 {
        self.camera
    }

    pub fn bone_matrices(&self, mesh: usize) -> Option<&BoneMatrices> {
        self.frame.bones.get(mesh)
    }

    pub fn mesh_transform(&self, mesh: usize) -> Option<Mat4> {
        self.frame.mesh_transforms.get(mesh).copied()
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }
}

/// Advance independent instances to the same time in parallel
pub fn advance_all(instances: &mut [AnimationInstance<'_>], seconds: f32) -> Result<()> {
    instances
        .par_iter_mut()
        .try_for_each(|instance| instance.advance(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneImport;
    use glam::Vec3;

    const ROOT_CLIP: &str = r#"{
        "root": { "name": "Root", "meshes": [0] },
        "meshes": [ { "name": "body", "positions": [[0,0,0]],
                      "bones": [ { "name": "Root", "weights": [ { "vertex": 0, "weight": 1.0 } ] } ] } ],
        "animations": [
            { "name": "Slide", "duration": 10, "ticks_per_second": 10,
              "channels": [ { "node": "Root",
                "position_keys": [ { "time": 0, "value": [0,0,0] }, { "time": 10, "value": [10,0,0] } ],
                "rotation_keys": [ { "time": 0, "value": [0,0,0,1] } ],
                "scaling_keys": [ { "time": 0, "value": [1,1,1] } ] } ] },
            { "name": "Untimed",
              "channels": [ { "node": "Root",
                "position_keys": [ { "time": 0, "value": [0,0,0] }, { "time": 64, "value": [0,64,0] } ],
                "rotation_keys": [ { "time": 0, "value": [0,0,0,1] } ],
                "scaling_keys": [ { "time": 0, "value": [1,1,1] } ] } ] }
        ]
    }"#;

    fn scene() -> Scene {
        Scene::from_import(SceneImport::from_json(ROOT_CLIP).unwrap(), &AnimationConfig::default()).unwrap()
    }

    fn translation(instance: &AnimationInstance<'_>) -> Vec3 {
        instance.mesh_transform(0).unwrap().w_axis.truncate()
    }

    #[test]
    fn test_advance_interpolates() {
        let scene = scene();
        let mut instance = AnimationInstance::new(&scene, 0, Mat4::IDENTITY, &AnimationConfig::default()).unwrap();

        instance.advance(0.5).unwrap();
        assert_eq!(instance.time_ticks(), 5.0);
        assert!((translation(&instance) - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);

        let bone = instance.bone_matrices(0).unwrap()[0];
        assert!((bone.w_axis.truncate() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_advance_clamps_after_last_key() {
        let scene = scene();
        let mut instance = AnimationInstance::new(&scene, 0, Mat4::IDENTITY, &AnimationConfig::default()).unwrap();

        instance.advance(2.0).unwrap();
        assert_eq!(instance.time_ticks(), 20.0);
        assert_eq!(translation(&instance), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_default_tick_rate() {
        let scene = scene();
        let mut instance = AnimationInstance::by_name(&scene, "Untimed", Mat4::IDENTITY, &AnimationConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(instance.ticks_per_second(), 32.0);

        instance.advance(1.0).unwrap();
        assert_eq!(instance.time_ticks(), 32.0);
        assert!((translation(&instance) - Vec3::new(0.0, 32.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_binding_failures() {
        let scene = scene();
        let config = AnimationConfig::default();

        let result = AnimationInstance::new(&scene, 7, Mat4::IDENTITY, &config);
        assert!(matches!(result, Err(Error::ClipIndexOutOfRange { index: 7, count: 2 })));

        let result = AnimationInstance::by_name(&scene, "Missing", Mat4::IDENTITY, &config);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_initial_frame_is_evaluated() {
        let scene = scene();
        let instance = AnimationInstance::new(&scene, 0, Mat4::IDENTITY, &AnimationConfig::default()).unwrap();
        assert_eq!(instance.time_ticks(), 0.0);
        assert_eq!(translation(&instance), Vec3::ZERO);
        assert_eq!(instance.clip().name, "Slide");
    }

    #[test]
    fn test_failed_advance_keeps_previous_frame() {
        let scene = scene();
        let mut instance = AnimationInstance::new(&scene, 0, Mat4::IDENTITY, &AnimationConfig::default()).unwrap();
        instance.advance(0.5).unwrap();

        assert!(instance.advance(f32::NAN).is_err());
        assert_eq!(instance.time_ticks(), 5.0);
        assert!((translation(&instance) - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }

    struct Recorder {
        models: Vec<Mat4>,
        cameras: Vec<Mat4>,
    }

    impl AnimRenderer for Recorder {
        fn draw(&mut self, frame: &RenderFrame<'_>) -> Result<()> {
            for mesh in 0..frame.mesh_count() {
                if let Some(uniforms) = frame.uniforms(mesh) {
                    self.models.push(Mat4::from_cols_array_2d(&uniforms.model));
                }
            }
            self.cameras.push(frame.camera());
            Ok(())
        }
    }

    #[test]
    fn test_render_uses_bound_camera() {
        let scene = scene();
        let mut instance = AnimationInstance::new(&scene, 0, Mat4::IDENTITY, &AnimationConfig::default()).unwrap();
        let camera = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        instance.bind_camera(camera);

        let mut recorder = Recorder { models: Vec::new(), cameras: Vec::new() };
        instance.render(2.0, &mut recorder).unwrap();

        assert_eq!(recorder.cameras, vec![camera]);
        assert_eq!(recorder.models[0].w_axis.truncate(), Vec3::new(10.0, 0.0, 0.0));
        // Camera does not feed into evaluation
        assert_eq!(translation(&instance), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_advance_all_parallel() {
        let scene = scene();
        let config = AnimationConfig::default();
        let mut instances = vec![
            AnimationInstance::new(&scene, 0, Mat4::IDENTITY, &config).unwrap(),
            AnimationInstance::new(&scene, 1, Mat4::IDENTITY, &config).unwrap(),
        ];

        advance_all(&mut instances, 0.5).unwrap();
        assert_eq!(instances[0].time_ticks(), 5.0);
        assert_eq!(instances[1].time_ticks(), 16.0);
        assert!((translation(&instances[1]) - Vec3::new(0.0, 16.0, 0.0)).length() < 1e-4);
    }
}
