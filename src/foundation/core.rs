use crate::foundation::error::{LipsyncError, LipsyncResult};

/// Absolute 0-based frame index in output timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)` in timeline space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> LipsyncResult<Self> {
        if start.0 > end.0 {
            return Err(LipsyncError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
///
/// Deserializes from either a bare integer (`30`) or an object (`{"num": 30000, "den": 1001}`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

impl<'de> serde::Deserialize<'de> for Fps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Whole(u32),
            Ratio { num: u32, den: u32 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Whole(num) => Ok(Self { num, den: 1 }),
            Repr::Ratio { num, den } => Ok(Self { num, den }),
        }
    }
}

impl Fps {
    /// Create a validated frame rate (`num > 0`, `den > 0`).
    pub fn new(num: u32, den: u32) -> LipsyncResult<Self> {
        if den == 0 {
            return Err(LipsyncError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LipsyncError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Re-check the invariants enforced by [`Fps::new`] (deserialized values bypass it).
    pub fn validate(self) -> LipsyncResult<()> {
        Self::new(self.num, self.den).map(|_| ())
    }

    /// Frame rate as floating point frames per second.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timeline time of `frames`, computed as `frames / fps`.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) / self.as_f64()
    }

    /// Frame containing `secs`, floored and clamped at zero.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Number of frames needed to cover `secs` (`ceil(secs * fps)`), clamped at zero.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
