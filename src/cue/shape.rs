//! Mouth shapes and their morph-target weights.
//!
//! The shape vocabulary follows the Rhubarb Lip Sync convention: six basic shapes `A`–`F`, three
//! extended shapes `G`, `H` and `X` (idle/silence). Each shape maps to a small, fixed set of
//! viseme morph targets on the avatar mesh. The table is plain `'static` data behind a `match`,
//! so it needs no initialization and is safe to read from any thread.

use std::fmt;

use crate::cue::weights::WeightVector;

/// Closed set of mouth shapes understood by the weight table.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Shape {
    /// Closed mouth (`M`, `B`, `P`).
    A,
    /// Slightly open, clenched teeth (`K`, `S`, `T`, `EE`).
    B,
    /// Open mouth (`EH`, `AE`).
    C,
    /// Wide open mouth (`AA`).
    D,
    /// Slightly rounded (`AO`, `ER`).
    E,
    /// Puckered lips (`UW`, `OW`, `W`).
    F,
    /// Upper teeth on lower lip (`F`, `V`).
    G,
    /// Tongue raised (`L`).
    H,
    /// Idle / silence.
    X,
}

/// Shape used before the first cue and for any label the table does not know.
pub const SILENCE: Shape = Shape::X;

impl Shape {
    /// Every shape, in label order.
    pub const ALL: [Shape; 9] = [
        Shape::A,
        Shape::B,
        Shape::C,
        Shape::D,
        Shape::E,
        Shape::F,
        Shape::G,
        Shape::H,
        Shape::X,
    ];

    /// Parse a single-letter shape label (case-insensitive, surrounding whitespace ignored).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            "G" => Some(Self::G),
            "H" => Some(Self::H),
            "X" => Some(Self::X),
            _ => None,
        }
    }

    /// Canonical single-letter label.
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::X => "X",
        }
    }

    /// Raw table row: morph-target controls driven by this shape.
    pub fn controls(self) -> &'static [(&'static str, f64)] {
        match self {
            Self::A => &[("viseme_PP", 1.0)],
            Self::B => &[("viseme_kk", 1.0), ("jawOpen", 0.1)],
            Self::C => &[("viseme_E", 1.0), ("jawOpen", 0.2)],
            Self::D => &[("viseme_AA", 1.0), ("jawOpen", 0.5)],
            Self::E => &[("viseme_O", 1.0), ("jawOpen", 0.3)],
            Self::F => &[("viseme_U", 1.0)],
            Self::G => &[("viseme_FF", 1.0)],
            Self::H => &[("viseme_TH", 0.6), ("viseme_nn", 0.4)],
            Self::X => &[("viseme_sil", 1.0)],
        }
    }

    /// Weight vector for this shape.
    pub fn weights(self) -> WeightVector {
        WeightVector::from_pairs(self.controls())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weight vector of the silence shape.
pub fn silence() -> WeightVector {
    SILENCE.weights()
}

/// Shape reference carried by a cue: either a known [`Shape`] or a label the table lacks.
///
/// Unknown labels are kept verbatim for diagnostics and resolve to [`SILENCE`].
/// Serializes to and from the plain label string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeId {
    /// A shape present in the weight table.
    Known(Shape),
    /// A label absent from the weight table.
    Unknown(String),
}

impl ShapeId {
    /// Classify a raw label.
    pub fn parse(label: &str) -> Self {
        match Shape::parse(label) {
            Some(shape) => Self::Known(shape),
            None => Self::Unknown(label.to_owned()),
        }
    }

    /// Shape used for weight lookup (unknown labels fall back to silence).
    pub fn resolve(&self) -> Shape {
        match self {
            Self::Known(shape) => *shape,
            Self::Unknown(_) => SILENCE,
        }
    }

    /// Return `true` when the label is present in the table.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Weight vector for this reference.
    pub fn weights(&self) -> WeightVector {
        self.resolve().weights()
    }
}

impl From<Shape> for ShapeId {
    fn from(shape: Shape) -> Self {
        Self::Known(shape)
    }
}

impl From<&str> for ShapeId {
    fn from(label: &str) -> Self {
        Self::parse(label)
    }
}

impl From<String> for ShapeId {
    fn from(label: String) -> Self {
        match Shape::parse(&label) {
            Some(shape) => Self::Known(shape),
            None => Self::Unknown(label),
        }
    }
}

impl From<ShapeId> for String {
    fn from(id: ShapeId) -> Self {
        match id {
            ShapeId::Known(shape) => shape.label().to_owned(),
            ShapeId::Unknown(label) => label,
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(shape) => f.write_str(shape.label()),
            Self::Unknown(label) => write!(f, "{label}?"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cue/shape.rs"]
mod tests;
