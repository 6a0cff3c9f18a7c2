//! Resolving which segments play on a frame, and how overlapping segments combine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{LipsyncError, LipsyncResult};
use crate::segment::model::{ClipSelector, NormalizedSegment};
use crate::segment::time::segment_local_time;

/// Source of clip durations, owned by whoever loaded the animation files.
pub trait ClipDurations {
    /// Duration in seconds of `clip` inside `source`, if known.
    fn clip_duration(&self, source: &str, clip: &ClipSelector) -> Option<f64>;
}

/// Keys are either `"<source>/<clip>"` or a bare `"<source>"`.
///
/// A named clip is only found under its qualified key. The bare source key holds the duration of
/// the source's first clip and is used for [`ClipSelector::First`].
impl ClipDurations for BTreeMap<String, f64> {
    fn clip_duration(&self, source: &str, clip: &ClipSelector) -> Option<f64> {
        match clip {
            ClipSelector::Named(name) => self.get(&format!("{source}/{name}")).copied(),
            ClipSelector::First => self.get(source).copied(),
        }
    }
}

/// How concurrently active segments are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionPolicy {
    /// Only the earliest-listed active segment plays.
    FirstWins,
    /// Only the latest-listed active segment plays.
    LastWins,
    /// Every active segment plays; weights are scaled down when they sum past 1.
    #[default]
    Weighted,
}

/// A segment playing on a particular frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveSegment {
    /// Position in the caller's segment list.
    pub index: usize,
    /// Animation source identifier.
    pub source: String,
    /// Clip to sample.
    pub clip: ClipSelector,
    /// Clip-local playback time in seconds.
    pub local_time: f64,
    /// Effective blend weight after composition.
    pub weight: f64,
}

/// Segments playing at `frame`, combined according to `policy`, in list order.
///
/// Durations are only looked up for segments that are active; a missing or invalid duration for
/// one of them is an evaluation error naming the segment.
pub fn active_segments<D>(
    segments: &[NormalizedSegment],
    frame: FrameIndex,
    fps: Fps,
    durations: &D,
    policy: CompositionPolicy,
) -> LipsyncResult<Vec<ActiveSegment>>
where
    D: ClipDurations + ?Sized,
{
    let mut active = Vec::new();
    for (index, seg) in segments.iter().enumerate() {
        if !seg.frame_range(fps).contains(frame) {
            continue;
        }
        let duration = durations
            .clip_duration(seg.source(), seg.clip())
            .ok_or_else(|| {
                LipsyncError::evaluation(format!(
                    "segment #{index}: no duration for clip '{}' in '{}'",
                    seg.clip(),
                    seg.source()
                ))
            })?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(LipsyncError::evaluation(format!(
                "segment #{index}: clip duration must be finite and >= 0, got {duration}"
            )));
        }
        let Some(local_time) = segment_local_time(seg, frame, fps, duration) else {
            continue;
        };
        active.push(ActiveSegment {
            index,
            source: seg.source().to_owned(),
            clip: seg.clip().clone(),
            local_time,
            weight: seg.weight(),
        });
    }

    Ok(apply_policy(active, policy))
}

fn apply_policy(mut active: Vec<ActiveSegment>, policy: CompositionPolicy) -> Vec<ActiveSegment> {
    match policy {
        CompositionPolicy::FirstWins => {
            active.truncate(1);
            active
        }
        CompositionPolicy::LastWins => active.pop().into_iter().collect(),
        CompositionPolicy::Weighted => {
            let total: f64 = active.iter().map(|a| a.weight).sum();
            if total > 1.0 {
                for a in &mut active {
                    a.weight /= total;
                }
            }
            active
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/segment/compose.rs"]
mod tests;
