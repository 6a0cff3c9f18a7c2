//! Dense per-frame weight timelines.

pub(crate) mod builder;
