//! Skinanim - skeletal animation evaluation for imported scenes
//!
//! Load a scene description, pack per-vertex bone influences, then evaluate
//! animation clips into per-mesh bone matrix tables ready for GPU upload.

pub mod core;
pub mod scene;
pub mod animation;
pub mod render;
pub mod inspect;
