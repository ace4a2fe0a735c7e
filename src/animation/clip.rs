//! Animation clips and keyframe channels

use glam::{Quat, Vec3};

use crate::core::{Error, Result};

/// A value at a point in time (clip ticks)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Key<T> {
    pub time: f32,
    pub value: T,
}

impl<T> Key<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

pub type VectorKey = Key<Vec3>;
pub type QuatKey = Key<Quat>;

/// Insert a key keeping the track sorted by time. Equal times keep insertion order.
fn insert_sorted<T>(track: &mut Vec<Key<T>>, key: Key<T>) {
    let pos = track.partition_point(|k| k.time <= key.time);
    track.insert(pos, key);
}

fn is_sorted<T>(track: &[Key<T>]) -> bool {
    track.windows(2).all(|w| w[0].time <= w[1].time)
}

/// Animated transform track of a single node
#[derive(Clone, Debug)]
pub struct NodeChannel {
    /// Name of the animated node
    pub node_name: String,
    pub positions: Vec<VectorKey>,
    pub rotations: Vec<QuatKey>,
    pub scalings: Vec<VectorKey>,
}

impl NodeChannel {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            positions: Vec::new(),
            rotations: Vec::new(),
            scalings: Vec::new(),
        }
    }

    pub fn add_position_key(&mut self, time: f32, value: Vec3) {
        insert_sorted(&mut self.positions, Key::new(time, value));
    }

    /// Rotations are stored normalized
    pub fn add_rotation_key(&mut self, time: f32, value: Quat) {
        insert_sorted(&mut self.rotations, Key::new(time, value.normalize()));
    }

    pub fn add_scaling_key(&mut self, time: f32, value: Vec3) {
        insert_sorted(&mut self.scalings, Key::new(time, value));
    }

    /// Check that every track has at least one key.
    pub fn validate(&self) -> Result<()> {
        let tracks = [
            ("position", self.positions.is_empty()),
            ("rotation", self.rotations.is_empty()),
            ("scaling", self.scalings.is_empty()),
        ];
        for (track, empty) in tracks {
            if empty {
                return Err(Error::EmptyChannel {
                    node: self.node_name.clone(),
                    track,
                });
            }
        }
        Ok(())
    }

    /// Sort tracks by time and renormalize rotations. Returns true if any
    /// track was out of order.
    pub fn normalize(&mut self) -> bool {
        let unsorted = !is_sorted(&self.positions)
            || !is_sorted(&self.rotations)
            || !is_sorted(&self.scalings);

        if unsorted {
            self.positions.sort_by(|a, b| a.time.total_cmp(&b.time));
            self.rotations.sort_by(|a, b| a.time.total_cmp(&b.time));
            self.scalings.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        for key in &mut self.rotations {
            key.value = key.value.normalize();
        }
        unsorted
    }

    /// Time of the last key across all tracks
    pub fn end_time(&self) -> f32 {
        [
            self.positions.last().map(|k| k.time),
            self.rotations.last().map(|k| k.time),
            self.scalings.last().map(|k| k.time),
        ]
        .into_iter()
        .flatten()
        .fold(0.0f32, f32::max)
    }
}

/// A named animation: a set of node channels sharing one timeline
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    /// Length in ticks
    pub duration: f32,
    /// 0 means "not specified"; see `AnimationConfig::ticks_per_second`
    pub ticks_per_second: f32,
    pub channels: Vec<NodeChannel>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32, ticks_per_second: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            ticks_per_second,
            channels: Vec::new(),
        }
    }

    pub fn add_channel(&mut self, channel: NodeChannel) {
        self.channels.push(channel);
    }

    /// First channel animating `node_name`
    pub fn channel(&self, node_name: &str) -> Option<&NodeChannel> {
        self.channels.iter().find(|c| c.node_name == node_name)
    }

    /// Validate every channel
    pub fn validate(&self) -> Result<()> {
        self.channels.iter().try_for_each(NodeChannel::validate)
    }

    /// Duration derived from the channels, for clips that declare none
    pub fn calculate_duration(&mut self) {
        self.duration = self
            .channels
            .iter()
            .map(NodeChannel::end_time)
            .fold(0.0f32, f32::max);
    }
}
