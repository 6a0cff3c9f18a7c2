use crate::cue::set::Cue;
use crate::cue::shape::silence;
use crate::cue::weights::WeightVector;

/// Default cross-fade length at the tail of each cue, in seconds.
pub const DEFAULT_BLEND_WINDOW: f64 = 0.05;

/// Sample the blended mouth weights at time `t` (seconds).
///
/// Cues are scanned in input order. The latest cue starting at or before `t` is the current
/// cue and the cue right after it in the list is the next one. During the last `blend_window`
/// seconds of the current cue the result cross-fades linearly toward the next cue's weights.
/// Before the first cue (or with no cues) the result is silence; after the last cue it holds the
/// last cue's weights.
///
/// Correct results require cues in non-decreasing `start` order; the scan stops at the first cue
/// that starts after `t`.
pub fn interpolate(cues: &[Cue], t: f64, blend_window: f64) -> WeightVector {
    let mut current = None;
    for (i, cue) in cues.iter().enumerate() {
        if cue.start > t {
            break;
        }
        current = Some(i);
    }

    let Some(idx) = current else {
        return silence();
    };
    let cur = &cues[idx];
    let Some(next) = cues.get(idx + 1) else {
        return cur.weights();
    };
    if blend_window <= 0.0 {
        return cur.weights();
    }

    let frame_end = cur.end();
    let transition_start = frame_end - blend_window;
    if t >= transition_start && t < frame_end {
        let factor = (t - transition_start) / blend_window;
        WeightVector::blend(&cur.weights(), &next.weights(), factor)
    } else {
        cur.weights()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cue/interpolate.rs"]
mod tests;
