//! Keyframe interpolation
//!
//! Each track is sampled independently. Inside the key range the bracketing
//! pair is blended (component-wise lerp for vectors, shortest-arc slerp for
//! rotations). Outside it the first or last key is returned unchanged: there
//! is no extrapolation and no looping.

use glam::{Quat, Vec3};

use super::clip::{Key, NodeChannel};
use crate::core::{Error, Result};

/// A keyframe value that can be blended between two keys
pub trait KeyValue: Copy {
    fn blend(a: Self, b: Self, f: f32) -> Self;
}

impl KeyValue for Vec3 {
    fn blend(a: Self, b: Self, f: f32) -> Self {
        a.lerp(b, f)
    }
}

impl KeyValue for Quat {
    /// glam's slerp already takes the shortest arc; renormalize against drift.
    fn blend(a: Self, b: Self, f: f32) -> Self {
        a.slerp(b, f).normalize()
    }
}

/// Why a track could not be sampled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleMiss {
    Empty,
    NoBracket,
}

/// Sample a time-sorted key track at `t`.
pub fn sample_track<T: KeyValue>(keys: &[Key<T>], t: f32) -> std::result::Result<T, SampleMiss> {
    let (first, last) = match (keys.first(), keys.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(SampleMiss::Empty),
    };

    if keys.len() == 1 && !t.is_nan() {
        return Ok(first.value);
    }

    // First key with time >= t. Yields the same bracket as a front-to-back
    // scan for `key[i].time <= t <= key[i + 1].time`.
    let upper = keys.partition_point(|k| k.time < t);
    if upper < keys.len() && keys[upper].time >= t {
        if upper == 0 {
            if t == first.time {
                return Ok(first.value);
            }
        } else {
            return Ok(blend_pair(&keys[upper - 1], &keys[upper], t));
        }
    }

    if t < first.time {
        Ok(first.value)
    } else if t > last.time {
        Ok(last.value)
    } else {
        Err(SampleMiss::NoBracket)
    }
}

/// Blend inside a bracket. The endpoints return the stored key values exactly.
fn blend_pair<T: KeyValue>(a: &Key<T>, b: &Key<T>, t: f32) -> T {
    let span = b.time - a.time;
    if span <= 0.0 {
        return a.value;
    }
    let f = (t - a.time) / span;
    if f <= 0.0 {
        a.value
    } else if f >= 1.0 {
        b.value
    } else {
        T::blend(a.value, b.value, f)
    }
}

fn sample_channel<T: KeyValue>(
    channel: &NodeChannel,
    keys: &[Key<T>],
    track: &'static str,
    t: f32,
) -> Result<T> {
    sample_track(keys, t).map_err(|miss| match miss {
        SampleMiss::Empty => Error::EmptyChannel {
            node: channel.node_name.clone(),
            track,
        },
        SampleMiss::NoBracket => Error::KeyframeBracket {
            node: channel.node_name.clone(),
            track,
            time: t,
        },
    })
}

/// Interpolated translation of `channel` at tick `t`
pub fn interpolate_translation(channel: &NodeChannel, t: f32) -> Result<Vec3> {
    sample_channel(channel, &channel.positions, "position", t)
}

/// Interpolated scale of `channel` at tick `t`
pub fn interpolate_scale(channel: &NodeChannel, t: f32) -> Result<Vec3> {
    sample_channel(channel, &channel.scalings, "scaling", t)
}

/// Interpolated rotation of `channel` at tick `t`. Always a unit quaternion
/// for normalized keys.
pub fn interpolate_rotation(channel: &NodeChannel, t: f32) -> Result<Quat> {
    sample_channel(channel, &channel.rotations, "rotation", t)
}
