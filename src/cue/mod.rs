//! Mouth cues, the shape weight table, and cue interpolation.

pub(crate) mod interpolate;
pub(crate) mod set;
pub(crate) mod shape;
pub(crate) mod weights;
