/// Convenience result type used across the crate.
pub type LipsyncResult<T> = Result<T, LipsyncError>;

/// Top-level error taxonomy used by timeline and segment APIs.
#[derive(thiserror::Error, Debug)]
pub enum LipsyncError {
    /// The analysis step produced zero cues; there is nothing to build a timeline from.
    #[error("empty analysis result: cue list has no entries")]
    EmptyAnalysisResult,

    /// A caller-supplied segment failed validation before normalization.
    #[error("invalid segment #{index}: {reason}")]
    InvalidSegment {
        /// Position of the offending segment in the caller's list.
        index: usize,
        /// Human-readable rejection reason.
        reason: String,
    },

    /// Invalid user-provided cue data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while resolving per-frame state (e.g. a clip duration the renderer never reported).
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LipsyncError {
    /// Build a [`LipsyncError::InvalidSegment`] value.
    pub fn invalid_segment(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidSegment {
            index,
            reason: reason.into(),
        }
    }

    /// Build a [`LipsyncError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LipsyncError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`LipsyncError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
