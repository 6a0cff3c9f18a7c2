use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cue::shape::ShapeId;
use crate::cue::weights::WeightVector;
use crate::foundation::error::{LipsyncError, LipsyncResult};

/// One timed mouth-shape event emitted by audio analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Start time in seconds (`>= 0`).
    #[serde(alias = "startTime")]
    pub start: f64,
    /// Shape shown from `start` onward.
    #[serde(alias = "value", alias = "shapeId")]
    pub shape: ShapeId,
    /// Duration in seconds (`>= 0`).
    #[serde(alias = "spanDuration", alias = "duration")]
    pub span: f64,
}

impl Cue {
    /// Build a cue from a start time, a shape reference and a span.
    pub fn new(start: f64, shape: impl Into<ShapeId>, span: f64) -> Self {
        Self {
            start,
            shape: shape.into(),
            span,
        }
    }

    /// `start + span`.
    pub fn end(&self) -> f64 {
        self.start + self.span
    }

    /// Resolved weight vector (unknown shapes give silence).
    pub fn weights(&self) -> WeightVector {
        self.shape.weights()
    }
}

/// Cue list plus total analysed duration, as produced by the analysis step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CueSet {
    /// Cues in non-decreasing `start` order.
    pub cues: Vec<Cue>,
    /// Total analysed duration in seconds.
    #[serde(alias = "totalDuration")]
    pub duration: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RhubarbDoc {
    #[serde(default)]
    metadata: Option<RhubarbMetadata>,
    mouth_cues: Vec<RhubarbCue>,
}

#[derive(Deserialize)]
struct RhubarbMetadata {
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Deserialize)]
struct RhubarbCue {
    start: f64,
    end: f64,
    value: String,
}

impl CueSet {
    /// Bundle cues with their total duration.
    pub fn new(cues: Vec<Cue>, duration: f64) -> Self {
        Self { cues, duration }
    }

    /// Number of cues.
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Return `true` when there are no cues.
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// End time of the last cue, or `0.0` for an empty set.
    pub fn last_end(&self) -> f64 {
        self.cues.last().map(Cue::end).unwrap_or(0.0)
    }

    /// Check the invariants the timeline builder relies on.
    ///
    /// Zero cues is [`LipsyncError::EmptyAnalysisResult`]; malformed cues are reported with their
    /// index.
    pub fn validate(&self) -> LipsyncResult<()> {
        if self.cues.is_empty() {
            return Err(LipsyncError::EmptyAnalysisResult);
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(LipsyncError::validation(format!(
                "cue set duration must be finite and >= 0, got {}",
                self.duration
            )));
        }
        for (i, cue) in self.cues.iter().enumerate() {
            if !cue.start.is_finite() || cue.start < 0.0 {
                return Err(LipsyncError::validation(format!(
                    "cue #{i}: start must be finite and >= 0, got {}",
                    cue.start
                )));
            }
            if !cue.span.is_finite() || cue.span < 0.0 {
                return Err(LipsyncError::validation(format!(
                    "cue #{i}: span must be finite and >= 0, got {}",
                    cue.span
                )));
            }
        }
        if let Some(i) = self.cues.windows(2).position(|w| w[0].start > w[1].start) {
            return Err(LipsyncError::validation(format!(
                "cue #{}: cues must be sorted by start time",
                i + 1
            )));
        }
        Ok(())
    }

    /// Parse Rhubarb Lip Sync JSON output (`{"metadata": {...}, "mouthCues": [...]}`).
    ///
    /// When the document carries no `metadata.duration`, the end of the last cue is used.
    pub fn from_rhubarb_reader<R: std::io::Read>(r: R) -> LipsyncResult<Self> {
        let doc: RhubarbDoc = serde_json::from_reader(r)
            .map_err(|e| LipsyncError::serde(format!("parse rhubarb JSON: {e}")))?;

        let mut cues = Vec::with_capacity(doc.mouth_cues.len());
        for (i, raw) in doc.mouth_cues.into_iter().enumerate() {
            if raw.end < raw.start {
                return Err(LipsyncError::validation(format!(
                    "cue #{i}: end {} precedes start {}",
                    raw.end, raw.start
                )));
            }
            let shape = ShapeId::from(raw.value);
            if let ShapeId::Unknown(label) = &shape {
                tracing::warn!(cue = i, label = %label, "unknown mouth shape, using silence");
            }
            cues.push(Cue {
                start: raw.start,
                shape,
                span: raw.end - raw.start,
            });
        }

        let last_end = cues.last().map(Cue::end).unwrap_or(0.0);
        let duration = doc
            .metadata
            .and_then(|m| m.duration)
            .unwrap_or(last_end);
        tracing::debug!(cues = cues.len(), duration, "parsed rhubarb cues");
        Ok(Self { cues, duration })
    }

    /// Parse Rhubarb Lip Sync JSON from a file on disk.
    pub fn from_rhubarb_path(path: impl AsRef<Path>) -> LipsyncResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LipsyncError::validation(format!("open cue JSON '{}': {e}", path.display()))
        })?;
        Self::from_rhubarb_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cue/set.rs"]
mod tests;
