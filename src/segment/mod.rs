//! Animation segments: normalization, clip-time mapping, and composition.

pub(crate) mod compose;
pub(crate) mod model;
pub(crate) mod time;
