use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{LipsyncError, LipsyncResult};

/// Caller-supplied animation segment: play a clip from `source` over `[start, end)` seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Animation source (file or library identifier).
    #[serde(alias = "clip", alias = "file")]
    pub source: String,
    /// Clip inside the source; absent or empty means the source's first clip.
    #[serde(default, alias = "clipName", skip_serializing_if = "Option::is_none")]
    pub clip_name: Option<String>,
    /// Segment start on the output timeline, in seconds.
    #[serde(alias = "startTime")]
    pub start: f64,
    /// Segment end on the output timeline, in seconds.
    #[serde(alias = "endTime")]
    pub end: f64,
    /// Blend weight in `[0, 1]`, default `1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Loop the clip for the whole segment, default `false`.
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looped: Option<bool>,
}

/// Which clip of a source a segment plays.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipSelector {
    /// Whatever clip the source lists first; resolved by the renderer.
    First,
    /// A clip by canonical name.
    Named(String),
}

impl fmt::Display for ClipSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("<first>"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Segment with defaults materialized. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedSegment {
    source: String,
    clip: ClipSelector,
    start: f64,
    end: f64,
    weight: f64,
    looped: bool,
}

impl NormalizedSegment {
    /// Animation source identifier.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Clip selection inside the source.
    pub fn clip(&self) -> &ClipSelector {
        &self.clip
    }

    /// Start time in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End time in seconds.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Blend weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Whether the clip loops.
    pub fn looped(&self) -> bool {
        self.looped
    }

    /// First frame of the segment, `floor(start * fps)`.
    pub fn start_frame(&self, fps: Fps) -> FrameIndex {
        FrameIndex(fps.secs_to_frames_floor(self.start))
    }

    /// Exclusive end frame, `floor(end * fps)`.
    pub fn end_frame(&self, fps: Fps) -> FrameIndex {
        FrameIndex(fps.secs_to_frames_floor(self.end))
    }

    /// Frames during which the segment plays.
    pub fn frame_range(&self, fps: Fps) -> FrameRange {
        let start = self.start_frame(fps);
        let end = self.end_frame(fps).max(start);
        FrameRange { start, end }
    }
}

/// Reject a segment the time mapper cannot handle. `index` is echoed in the error.
pub fn validate_segment(index: usize, segment: &Segment) -> LipsyncResult<()> {
    if segment.source.trim().is_empty() {
        return Err(LipsyncError::invalid_segment(index, "source must be non-empty"));
    }
    if !segment.start.is_finite() || !segment.end.is_finite() {
        return Err(LipsyncError::invalid_segment(index, "start and end must be finite"));
    }
    if segment.end < segment.start {
        return Err(LipsyncError::invalid_segment(
            index,
            format!("end {} precedes start {}", segment.end, segment.start),
        ));
    }
    if let Some(w) = segment.weight
        && !(0.0..=1.0).contains(&w)
    {
        return Err(LipsyncError::invalid_segment(
            index,
            format!("weight must be in [0, 1], got {w}"),
        ));
    }
    Ok(())
}

/// Validate every segment, failing on the first bad one.
pub fn validate_segments(segments: &[Segment]) -> LipsyncResult<()> {
    segments
        .iter()
        .enumerate()
        .try_for_each(|(i, s)| validate_segment(i, s))
}

/// Fill in defaults: weight `1.0`, no looping, first clip when no clip name is given.
///
/// Performs no validation; see [`validate_segments`].
pub fn normalize(segment: &Segment) -> NormalizedSegment {
    let clip = segment
        .clip_name
        .as_deref()
        .and_then(canonical_clip_name)
        .map_or(ClipSelector::First, ClipSelector::Named);

    NormalizedSegment {
        source: segment.source.clone(),
        clip,
        start: segment.start,
        end: segment.end,
        weight: segment.weight.unwrap_or(1.0),
        looped: segment.looped.unwrap_or(false),
    }
}

/// Validate then normalize a caller's segment list.
pub fn normalize_all(segments: &[Segment]) -> LipsyncResult<Vec<NormalizedSegment>> {
    validate_segments(segments)?;
    Ok(segments.iter().map(normalize).collect())
}

/// Canonical clip name as stored in the merged avatar file.
///
/// Imported animation files become clips named after the file stem with spaces and hyphens
/// replaced by underscores, so `"Standing Arguing.fbx"` is stored as `"Standing_Arguing"`.
/// Returns `None` for blank input.
pub fn canonical_clip_name(name: &str) -> Option<String> {
    let name = name.trim();
    let stem = [".fbx", ".glb", ".gltf"]
        .iter()
        .find_map(|ext| strip_suffix_ignore_case(name, ext))
        .unwrap_or(name);
    if stem.is_empty() {
        return None;
    }
    Some(stem.replace([' ', '-'], "_"))
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    let (head, tail) = (s.get(..split)?, s.get(split..)?);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

#[cfg(test)]
#[path = "../../tests/unit/segment/model.rs"]
mod tests;
