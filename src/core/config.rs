//! Animation configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::MAX_UV_CHANNELS;
use super::{Error, Result};

/// How an animated node's local transform is composed from its channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// `translation * rotation`. The scale track is sampled but not applied.
    /// Matches the behaviour existing assets were authored against.
    #[default]
    Ignore,
    /// `translation * rotation * scale`
    Apply,
}

/// Settings shared by scene loading and animation evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Tick rate used when a clip declares 0 ticks per second
    pub default_ticks_per_second: f32,
    /// Local transform composition for animated nodes
    pub scale_mode: ScaleMode,
    /// UV channels kept per mesh (clamped to `MAX_UV_CHANNELS`)
    pub max_uv_channels: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_ticks_per_second: 32.0,
            scale_mode: ScaleMode::Ignore,
            max_uv_channels: MAX_UV_CHANNELS,
        }
    }
}

impl AnimationConfig {
    /// Effective tick rate for a clip declaring `ticks_per_second`
    pub fn ticks_per_second(&self, declared: f32) -> f32 {
        if declared != 0.0 {
            declared
        } else {
            self.default_ticks_per_second
        }
    }

    /// UV channel limit after clamping to the hard GPU limit
    pub fn uv_channel_limit(&self) -> usize {
        self.max_uv_channels.min(MAX_UV_CHANNELS)
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| Error::Import(format!("{}: {}", path.display(), e)))
    }
}
