use crate::foundation::core::{Fps, FrameIndex};
use crate::segment::model::NormalizedSegment;

/// Playback time inside a clip for an output frame.
///
/// The segment's first frame is `floor(segment_start * fps)`; the elapsed time since then is
/// `(frame - first) / fps`. Looping clips wrap that time into `[0, clip_duration)`, landing on
/// exactly `0` at whole multiples of the duration. Non-looping clips (and zero-length clips)
/// clamp it to at most `clip_duration`.
///
/// The lower bound is not clamped: frames before the segment start yield a negative time. Use
/// [`segment_local_time`] to skip those frames instead.
pub fn local_time(
    frame: FrameIndex,
    fps: Fps,
    segment_start: f64,
    clip_duration: f64,
    looped: bool,
) -> f64 {
    let rate = fps.as_f64();
    let segment_start_frame = (segment_start * rate).floor() as i64;
    let frame_in_segment = frame.0 as i64 - segment_start_frame;
    let time_in_segment = frame_in_segment as f64 / rate;

    if looped && clip_duration > 0.0 {
        let wrapped = time_in_segment.rem_euclid(clip_duration);
        // rem_euclid can round up to the divisor for tiny negative inputs.
        if wrapped >= clip_duration { 0.0 } else { wrapped }
    } else {
        time_in_segment.min(clip_duration)
    }
}

/// Clip time for `segment` at `frame`, or `None` when the segment is not playing.
///
/// A segment plays on frames `[floor(start * fps), floor(end * fps))`. Frames outside that range
/// are suppressed rather than mapped to a negative or past-the-end time.
pub fn segment_local_time(
    segment: &NormalizedSegment,
    frame: FrameIndex,
    fps: Fps,
    clip_duration: f64,
) -> Option<f64> {
    if !segment.frame_range(fps).contains(frame) {
        return None;
    }
    Some(local_time(
        frame,
        fps,
        segment.start(),
        clip_duration,
        segment.looped(),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/segment/time.rs"]
mod tests;
