//! Scene inspection output

pub mod dot;

pub use dot::write_dot;
