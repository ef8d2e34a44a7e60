//! Blend-shape gaze classifier
//!
//! Uses the four horizontal `eyeLook*` scores of a face model's blend-shape
//! output. Every other category is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validate::BlendShapeCategory;

/// Maximum in/out score difference still considered centered
pub const CENTER_THRESHOLD: f64 = 0.2;

/// The blend-shape categories the classifier reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EyeSignal {
    LookInLeft,
    LookInRight,
    LookOutLeft,
    LookOutRight,
}

impl EyeSignal {
    pub const ALL: [EyeSignal; 4] = [
        EyeSignal::LookInLeft,
        EyeSignal::LookInRight,
        EyeSignal::LookOutLeft,
        EyeSignal::LookOutRight,
    ];

    /// Category name used by the face model
    pub fn as_str(&self) -> &'static str {
        match self {
            EyeSignal::LookInLeft => "eyeLookInLeft",
            EyeSignal::LookInRight => "eyeLookInRight",
            EyeSignal::LookOutLeft => "eyeLookOutLeft",
            EyeSignal::LookOutRight => "eyeLookOutRight",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

/// Scores of the recognized eye signals for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlendShapeScore {
    scores: BTreeMap<EyeSignal, f64>,
}

impl BlendShapeScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, signal: EyeSignal, score: f64) {
        self.scores.insert(signal, score);
    }

    pub fn get(&self, signal: EyeSignal) -> Option<f64> {
        self.scores.get(&signal).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate as `(category name, score)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.scores.iter().map(|(s, v)| (s.as_str(), *v))
    }
}

impl FromIterator<(EyeSignal, f64)> for BlendShapeScore {
    fn from_iter<I: IntoIterator<Item = (EyeSignal, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Single-label output of the blend-shape classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendShapeDirection {
    Left,
    Right,
    Center,
    Uncertain,
    #[serde(rename = "No eye detected")]
    NoEyeDetected,
}

impl BlendShapeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendShapeDirection::Left => "Left",
            BlendShapeDirection::Right => "Right",
            BlendShapeDirection::Center => "Center",
            BlendShapeDirection::Uncertain => "Uncertain",
            BlendShapeDirection::NoEyeDetected => "No eye detected",
        }
    }
}

impl std::fmt::Display for BlendShapeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep only the four recognized eye categories.
///
/// A repeated category keeps its last score.
pub fn extract_eye_signals<'a, I>(categories: I) -> BlendShapeScore
where
    I: IntoIterator<Item = &'a BlendShapeCategory>,
{
    categories
        .into_iter()
        .filter_map(|c| EyeSignal::from_name(c.category_name()).map(|s| (s, c.score())))
        .collect()
}

/// Classify a frame's eye signals. Rules are checked in order; first match wins.
pub fn determine_gaze_direction(signals: &BlendShapeScore) -> BlendShapeDirection {
    let (Some(in_left), Some(in_right), Some(out_left), Some(out_right)) = (
        signals.get(EyeSignal::LookInLeft),
        signals.get(EyeSignal::LookInRight),
        signals.get(EyeSignal::LookOutLeft),
        signals.get(EyeSignal::LookOutRight),
    ) else {
        debug!(present = signals.len(), "Eye signals incomplete");
        return BlendShapeDirection::NoEyeDetected;
    };

    if in_right > in_left && out_left > out_right {
        BlendShapeDirection::Right
    } else if in_left > in_right && out_right > out_left {
        BlendShapeDirection::Left
    } else if (in_left - in_right).abs() < CENTER_THRESHOLD
        && (out_left - out_right).abs() < CENTER_THRESHOLD
    {
        BlendShapeDirection::Center
    } else {
        BlendShapeDirection::Uncertain
    }
}
