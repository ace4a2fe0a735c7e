//! Error types for skinanim

use thiserror::Error;

/// Main error type for scene loading and animation evaluation
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Mesh {mesh} has {count} bones (max {max})")]
    TooManyBones { mesh: usize, count: usize, max: usize },

    #[error("Vertex {vertex} of mesh {mesh} is influenced by {count} bones (max {max})")]
    TooManyInfluences {
        mesh: usize,
        vertex: usize,
        count: usize,
        max: usize,
    },

    #[error("Bone {bone} of mesh {mesh} weights vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        mesh: usize,
        bone: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("Channel for node '{node}' has an empty {track} track")]
    EmptyChannel { node: String, track: &'static str },

    #[error("No keyframe bracket for {track} of node '{node}' at tick {time}")]
    KeyframeBracket {
        node: String,
        track: &'static str,
        time: f32,
    },

    #[error("Animation clip index {index} out of range ({count} clips)")]
    ClipIndexOutOfRange { index: usize, count: usize },
}

impl Error {
    /// Whether this error is a fatal precondition violation on the input data
    /// (as opposed to an IO or parse failure).
    pub fn is_precondition(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Import(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::TooManyBones { mesh: 2, count: 40, max: 32 };
        assert_eq!(err.to_string(), "Mesh 2 has 40 bones (max 32)");

        let err = Error::ClipIndexOutOfRange { index: 3, count: 1 };
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_precondition_classification() {
        assert!(Error::ClipIndexOutOfRange { index: 0, count: 0 }.is_precondition());
        assert!(!Error::Import("bad json".into()).is_precondition());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!Error::from(io).is_precondition());
    }
}
