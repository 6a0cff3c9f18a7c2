use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cue::set::CueSet;
use crate::cue::weights::WeightVector;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{LipsyncError, LipsyncResult};
use crate::segment::compose::{ActiveSegment, ClipDurations, CompositionPolicy, active_segments};
use crate::segment::model::{NormalizedSegment, Segment, normalize_all};
use crate::timeline::builder::{FrameRecord, TimelineConfig, build_thread_pool, build_timeline_on};

/// Options for [`build_render_plan`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Timeline sampling options (also controls plan parallelism).
    pub timeline: TimelineConfig,
    /// How overlapping segments are combined.
    pub policy: CompositionPolicy,
}

impl PlanConfig {
    /// Load a JSON config file; missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> LipsyncResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            LipsyncError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| LipsyncError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.timeline.validate()?;
        Ok(cfg)
    }
}

/// Everything the renderer needs for one output frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FramePlan {
    /// Output frame index.
    pub frame: FrameIndex,
    /// Mouth morph-target weights.
    pub weights: WeightVector,
    /// Body animation segments playing on this frame.
    pub segments: Vec<ActiveSegment>,
}

/// Per-frame render instructions handed to the rendering backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderPlan {
    /// Output frame rate.
    pub fps: Fps,
    /// Number of frames in [`RenderPlan::frames`].
    pub total_frames: u64,
    /// Composition policy that produced the per-frame segment lists.
    pub policy: CompositionPolicy,
    /// Normalized segments, indexed by [`ActiveSegment::index`].
    pub segments: Vec<NormalizedSegment>,
    /// One entry per output frame, in order.
    pub frames: Vec<FramePlan>,
}

impl RenderPlan {
    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> LipsyncResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LipsyncError::serde(format!("serialize render plan: {e}")))
    }

    /// Write pretty-printed JSON to `path`, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> LipsyncResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                LipsyncError::evaluation(format!(
                    "failed to create render plan directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|e| {
            LipsyncError::evaluation(format!(
                "failed to write render plan '{}': {e}",
                path.display()
            ))
        })
    }
}

/// Build the frame timeline and resolve segments on every frame.
#[tracing::instrument(skip(cue_set, segments, durations), fields(segments = segments.len()))]
pub fn build_render_plan<D>(
    cue_set: &CueSet,
    segments: &[Segment],
    durations: &D,
    config: &PlanConfig,
) -> LipsyncResult<RenderPlan>
where
    D: ClipDurations + Sync + ?Sized,
{
    let normalized = normalize_all(segments)?;
    let pool = if config.timeline.parallel {
        Some(build_thread_pool(config.timeline.threads)?)
    } else {
        None
    };
    let timeline = build_timeline_on(cue_set, &config.timeline, pool.as_ref())?;
    let fps = timeline.fps();
    let total_frames = timeline.len() as u64;

    let plan_frame = |rec: FrameRecord| -> LipsyncResult<FramePlan> {
        let active = active_segments(&normalized, rec.frame, fps, durations, config.policy)?;
        Ok(FramePlan {
            frame: rec.frame,
            weights: rec.weights,
            segments: active,
        })
    };

    let records = timeline.into_frames();
    let frames = match &pool {
        Some(pool) => pool.install(|| {
            records
                .into_par_iter()
                .map(plan_frame)
                .collect::<LipsyncResult<Vec<_>>>()
        })?,
        None => records
            .into_iter()
            .map(plan_frame)
            .collect::<LipsyncResult<Vec<_>>>()?,
    };

    tracing::debug!(frames = frames.len(), "built render plan");
    Ok(RenderPlan {
        fps,
        total_frames,
        policy: config.policy,
        segments: normalized,
        frames,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/plan/render_plan.rs"]
mod tests;
