//! Boundary validation for upstream inference payloads
//!
//! Inference results arrive as loosely shaped JSON. Each type here is
//! deserialized through a `Raw*` mirror and checked once, so everything past
//! this module can rely on finite coordinates and scores in `[0, 1]`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in upstream payloads
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Score outside of `[0, 1]` or not finite
    #[error("score for {category} is {score}, expected a finite value in [0, 1]")]
    ScoreOutOfRange { category: String, score: f64 },

    /// Coordinate is NaN or infinite
    #[error("landmark {index} has non-finite coordinates ({x}, {y})")]
    NonFiniteLandmark { index: usize, x: f64, y: f64 },

    /// Too few landmark points for the expected layout
    #[error("expected {expected} landmark points, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    /// Empty category name
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlendShapeCategory {
    category_name: String,
    score: f64,
}

/// One named blend-shape score produced by the face model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawBlendShapeCategory")]
pub struct BlendShapeCategory {
    category_name: String,
    score: f64,
}

impl BlendShapeCategory {
    /// Create a validated category score
    pub fn new(category_name: impl Into<String>, score: f64) -> Result<Self, ValidationError> {
        let category_name = category_name.into();
        if category_name.is_empty() {
            return Err(ValidationError::MissingField("categoryName"));
        }
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(ValidationError::ScoreOutOfRange {
                category: category_name,
                score,
            });
        }
        Ok(Self {
            category_name,
            score,
        })
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

impl TryFrom<RawBlendShapeCategory> for BlendShapeCategory {
    type Error = ValidationError;

    fn try_from(raw: RawBlendShapeCategory) -> Result<Self, Self::Error> {
        Self::new(raw.category_name, raw.score)
    }
}

/// Check that every point in a landmark payload has finite coordinates
pub(crate) fn check_finite(points: &[crate::Point]) -> Result<(), ValidationError> {
    match points
        .iter()
        .enumerate()
        .find(|(_, p)| !p.x.is_finite() || !p.y.is_finite())
    {
        Some((index, p)) => Err(ValidationError::NonFiniteLandmark {
            index,
            x: p.x,
            y: p.y,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_deserializes_camel_case() {
        let json = r#"{"categoryName":"eyeLookInLeft","score":0.42}"#;
        let category: BlendShapeCategory = serde_json::from_str(json).unwrap();
        assert_eq!(category.category_name(), "eyeLookInLeft");
        assert!((category.score() - 0.42).abs() < 1e-12);
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let json = r#"{"categoryName":"eyeLookInLeft","score":1.5}"#;
        assert!(serde_json::from_str::<BlendShapeCategory>(json).is_err());

        let err = BlendShapeCategory::new("eyeLookOutRight", -0.1).unwrap_err();
        assert!(matches!(err, ValidationError::ScoreOutOfRange { .. }));
    }

    #[test]
    fn test_nan_score_rejected() {
        assert!(BlendShapeCategory::new("eyeLookInRight", f64::NAN).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            BlendShapeCategory::new("", 0.5),
            Err(ValidationError::MissingField("categoryName"))
        );
    }

    #[test]
    fn test_unrecognized_category_is_valid() {
        // Unknown names are not an error here; the classifier drops them
        assert!(BlendShapeCategory::new("jawOpen", 0.3).is_ok());
    }
}
