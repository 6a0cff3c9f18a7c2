//! Lip-sync timelines for avatar rendering.
//!
//! The crate turns the sparse mouth cues produced by audio analysis (e.g. Rhubarb Lip Sync) into a
//! dense per-frame timeline of morph-target weights, and maps body-animation segments onto the same
//! frame grid.
//!
//! # Pipeline overview
//!
//! 1. **Ingest**: [`CueSet`] from the analysis step (see [`CueSet::from_rhubarb_reader`])
//! 2. **Sample**: `CueSet + TimelineConfig -> FrameTimeline` via [`build_timeline`], cross-fading
//!    between shapes at cue boundaries with [`interpolate`]
//! 3. **Segments**: validate and [`normalize`] caller segments, then map each output frame to clip
//!    time with [`local_time`] / [`segment_local_time`]
//! 4. **Plan**: [`build_render_plan`] bundles both into a [`RenderPlan`] for the renderer
//!
//! Everything here is pure and deterministic. The shape table is static data, and timelines may be
//! sampled on a rayon pool without changing the output.
#![forbid(unsafe_code)]

mod cue;
mod foundation;
mod plan;
mod segment;
mod timeline;

pub use crate::cue::interpolate::{DEFAULT_BLEND_WINDOW, interpolate};
pub use crate::cue::set::{Cue, CueSet};
pub use crate::cue::shape::{SILENCE, Shape, ShapeId, silence};
pub use crate::cue::weights::{Lerp, WeightVector};
pub use crate::foundation::core::{Fps, FrameIndex, FrameRange};
pub use crate::foundation::error::{LipsyncError, LipsyncResult};
pub use crate::plan::render_plan::{FramePlan, PlanConfig, RenderPlan, build_render_plan};
pub use crate::segment::compose::{
    ActiveSegment, ClipDurations, CompositionPolicy, active_segments,
};
pub use crate::segment::model::{
    ClipSelector, NormalizedSegment, Segment, canonical_clip_name, normalize, normalize_all,
    validate_segment, validate_segments,
};
pub use crate::segment::time::{local_time, segment_local_time};
pub use crate::timeline::builder::{
    DEFAULT_TAIL_PADDING, FrameRecord, FrameTimeline, MAX_TIMELINE_FRAMES, TimelineConfig,
    build_timeline,
};
