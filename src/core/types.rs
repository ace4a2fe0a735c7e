//! Core type aliases, re-exports and fixed GPU limits

pub use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

/// Bone matrices per mesh. The shader declares a fixed-size uniform array,
/// so every mesh gets exactly this many slots.
pub const MAX_BONES_PER_MESH: usize = 32;

/// Bone influence slots per vertex (one `uvec4` + one `vec4` attribute)
pub const MAX_BONES_PER_VERTEX: usize = 4;

/// Hard upper bound on UV channels uploaded per mesh
pub const MAX_UV_CHANNELS: usize = 4;

/// Standard Result type for the crate
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
