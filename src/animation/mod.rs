//! Skeletal animation: clips, interpolation, influence packing and evaluation

pub mod clip;
pub mod evaluator;
pub mod instance;
pub mod interpolate;
pub mod skin;

pub use clip::{AnimationClip, Key, NodeChannel, QuatKey, VectorKey};
pub use evaluator::{evaluate, BoneMatrices, BoneMatrixTable, ClipBinding, FrameState};
pub use instance::{advance_all, AnimationInstance};
pub use interpolate::{interpolate_rotation, interpolate_scale, interpolate_translation};
pub use skin::{pack_bone_influences, PackedInfluences, SkinVertex};
