use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cue::interpolate::{DEFAULT_BLEND_WINDOW, interpolate};
use crate::cue::set::{Cue, CueSet};
use crate::cue::weights::WeightVector;
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{LipsyncError, LipsyncResult};

/// Hold duration appended after the analysed audio, in seconds.
pub const DEFAULT_TAIL_PADDING: f64 = 0.5;

/// Upper bound on frames in one timeline (a bit over nine hours at 30 fps).
pub const MAX_TIMELINE_FRAMES: u64 = 1_000_000;

/// Options controlling how a cue set is sampled into frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Output frame rate.
    pub fps: Fps,
    /// Cross-fade length at the tail of each cue, in seconds.
    pub blend_window: f64,
    /// Extra time sampled past the analysed duration, in seconds.
    pub tail_padding: f64,
    /// Sample frames on a rayon thread pool.
    pub parallel: bool,
    /// Override rayon worker threads (parallel mode only). `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            blend_window: DEFAULT_BLEND_WINDOW,
            tail_padding: DEFAULT_TAIL_PADDING,
            parallel: false,
            threads: None,
        }
    }
}

impl TimelineConfig {
    /// Validate frame rate and time parameters.
    pub fn validate(&self) -> LipsyncResult<()> {
        self.fps.validate()?;
        if !self.blend_window.is_finite() || self.blend_window < 0.0 {
            return Err(LipsyncError::validation(format!(
                "blend_window must be finite and >= 0, got {}",
                self.blend_window
            )));
        }
        if !self.tail_padding.is_finite() || self.tail_padding < 0.0 {
            return Err(LipsyncError::validation(format!(
                "tail_padding must be finite and >= 0, got {}",
                self.tail_padding
            )));
        }
        if self.threads == Some(0) {
            return Err(LipsyncError::validation("threads must be >= 1 when set"));
        }
        Ok(())
    }

    /// `ceil((duration + tail_padding) * fps)`.
    pub fn total_frames(&self, duration: f64) -> u64 {
        self.fps.secs_to_frames_ceil(duration + self.tail_padding)
    }
}

/// Weights for one output frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameRecord {
    /// Output frame index.
    pub frame: FrameIndex,
    /// Blended morph-target weights at `frame / fps`.
    pub weights: WeightVector,
}

/// Dense, frame-ordered weight timeline covering `[0, len)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameTimeline {
    fps: Fps,
    frames: Vec<FrameRecord>,
}

impl FrameTimeline {
    /// Frame rate the timeline was sampled at.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when the timeline holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Covered frame range `[0, len)`.
    pub fn range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.frames.len() as u64),
        }
    }

    /// Timeline length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frames.len() as u64)
    }

    /// Record for `frame`, if it is inside the timeline.
    pub fn get(&self, frame: FrameIndex) -> Option<&FrameRecord> {
        usize::try_from(frame.0)
            .ok()
            .and_then(|i| self.frames.get(i))
    }

    /// Weights for `frame`, if it is inside the timeline.
    pub fn weights_at(&self, frame: FrameIndex) -> Option<&WeightVector> {
        self.get(frame).map(|r| &r.weights)
    }

    /// Iterate records in frame order.
    pub fn iter(&self) -> std::slice::Iter<'_, FrameRecord> {
        self.frames.iter()
    }

    /// All records in frame order.
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Consume the timeline, returning its records.
    pub fn into_frames(self) -> Vec<FrameRecord> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a FrameTimeline {
    type Item = &'a FrameRecord;
    type IntoIter = std::slice::Iter<'a, FrameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Sample `cue_set` at every output frame.
///
/// Produces `ceil((duration + tail_padding) * fps)` records; frame `i` is sampled at `i / fps`
/// seconds. The tail padding keeps the last cue's shape on screen instead of dropping to silence.
///
/// A duration needing more than [`MAX_TIMELINE_FRAMES`] frames is a validation error.
#[tracing::instrument(skip(cue_set), fields(cues = cue_set.len(), duration = cue_set.duration))]
pub fn build_timeline(cue_set: &CueSet, config: &TimelineConfig) -> LipsyncResult<FrameTimeline> {
    let pool = if config.parallel {
        Some(build_thread_pool(config.threads)?)
    } else {
        None
    };
    build_timeline_on(cue_set, config, pool.as_ref())
}

/// [`build_timeline`] sampling on `pool` when given, sequentially otherwise.
pub(crate) fn build_timeline_on(
    cue_set: &CueSet,
    config: &TimelineConfig,
    pool: Option<&rayon::ThreadPool>,
) -> LipsyncResult<FrameTimeline> {
    config.validate()?;
    cue_set.validate()?;

    let total_frames = config.total_frames(cue_set.duration);
    if total_frames > MAX_TIMELINE_FRAMES {
        return Err(LipsyncError::validation(format!(
            "timeline needs {total_frames} frames, limit is {MAX_TIMELINE_FRAMES}"
        )));
    }
    let total = usize::try_from(total_frames)
        .map_err(|_| LipsyncError::validation("timeline frame count does not fit in memory"))?;
    let fps = config.fps;
    let sample = |f: usize| sample_frame(&cue_set.cues, fps, config.blend_window, f as u64);

    let frames: Vec<FrameRecord> = match pool {
        Some(pool) => pool.install(|| (0..total).into_par_iter().map(sample).collect()),
        None => (0..total).map(sample).collect(),
    };

    tracing::debug!(frames = frames.len(), "built frame timeline");
    Ok(FrameTimeline { fps, frames })
}

fn sample_frame(cues: &[Cue], fps: Fps, blend_window: f64, frame: u64) -> FrameRecord {
    let t = fps.frames_to_secs(frame);
    FrameRecord {
        frame: FrameIndex(frame),
        weights: interpolate(cues, t, blend_window),
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> LipsyncResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LipsyncError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LipsyncError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
