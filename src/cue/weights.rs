use std::cmp::Ordering;

use serde::ser::SerializeMap;
use smallvec::SmallVec;

/// Interpolation contract for blendable values.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Sparse mapping from morph-target control name to weight.
///
/// Entries are kept sorted by control name, so iteration and serialization order are stable.
/// A control that is not present reads as `0.0`. Weights are conventionally in `[0, 1]` but are
/// not clamped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeightVector {
    entries: SmallVec<[(&'static str, f64); 4]>, // sorted by name, unique
}

impl WeightVector {
    /// Empty vector (every control reads as zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(control, weight)` pairs. Later duplicates overwrite earlier ones.
    pub fn from_pairs(pairs: &[(&'static str, f64)]) -> Self {
        let mut out = Self::new();
        for &(name, value) in pairs {
            out.set(name, value);
        }
        out
    }

    /// Weight for `control`, if it is explicitly present.
    pub fn get(&self, control: &str) -> Option<f64> {
        self.position(control).ok().map(|i| self.entries[i].1)
    }

    /// Weight for `control`, treating absent controls as `0.0`.
    pub fn weight(&self, control: &str) -> f64 {
        self.get(control).unwrap_or(0.0)
    }

    /// Insert or overwrite one control.
    pub fn set(&mut self, control: &'static str, value: f64) {
        match self.position(control) {
            Ok(i) => self.entries[i].1 = value,
            Err(i) => self.entries.insert(i, (control, value)),
        }
    }

    /// Number of explicitly present controls.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no control is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(control, weight)` pairs in control-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Cross-fade from `a` to `b` by `factor`, over the union of both control sets.
    ///
    /// A control missing on one side blends against `0.0`.
    pub fn blend(a: &Self, b: &Self, factor: f64) -> Self {
        let mut entries = SmallVec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        loop {
            let step = match (a.entries.get(i), b.entries.get(j)) {
                (Some(&(ka, va)), Some(&(kb, vb))) => match ka.cmp(kb) {
                    Ordering::Less => {
                        i += 1;
                        (ka, <f64 as Lerp>::lerp(&va, &0.0, factor))
                    }
                    Ordering::Greater => {
                        j += 1;
                        (kb, <f64 as Lerp>::lerp(&0.0, &vb, factor))
                    }
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                        (ka, <f64 as Lerp>::lerp(&va, &vb, factor))
                    }
                },
                (Some(&(ka, va)), None) => {
                    i += 1;
                    (ka, <f64 as Lerp>::lerp(&va, &0.0, factor))
                }
                (None, Some(&(kb, vb))) => {
                    j += 1;
                    (kb, <f64 as Lerp>::lerp(&0.0, &vb, factor))
                }
                (None, None) => break,
            };
            entries.push(step);
        }
        Self { entries }
    }

    fn position(&self, control: &str) -> Result<usize, usize> {
        self.entries.binary_search_by(|(name, _)| (*name).cmp(control))
    }
}

impl Lerp for WeightVector {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self::blend(a, b, t)
    }
}

impl serde::Serialize for WeightVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cue/weights.rs"]
mod tests;
