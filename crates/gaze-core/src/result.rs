//! Tagged result of either estimator

use serde::{Deserialize, Serialize};

use crate::blendshape::BlendShapeDirection;
use crate::geometry::GeometricEstimate;

/// Output of one estimator for one frame.
///
/// The two estimators disagree in meaning and shape, so their fields are kept
/// apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "estimator", rename_all = "snake_case")]
pub enum GazeResult {
    Geometric(GeometricEstimate),
    BlendShape { direction: BlendShapeDirection },
}

impl GazeResult {
    /// Short label for logging
    pub fn label(&self) -> String {
        match self {
            GazeResult::Geometric(est) => {
                format!("{}/{}", est.horizontal.as_str(), est.vertical.as_str())
            }
            GazeResult::BlendShape { direction } => direction.as_str().to_string(),
        }
    }
}

impl From<GeometricEstimate> for GazeResult {
    fn from(est: GeometricEstimate) -> Self {
        GazeResult::Geometric(est)
    }
}

impl From<BlendShapeDirection> for GazeResult {
    fn from(direction: BlendShapeDirection) -> Self {
        GazeResult::BlendShape { direction }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Horizontal, Point, Vertical};

    #[test]
    fn test_labels() {
        let est = GeometricEstimate {
            left_eye_center: Point::new(1.0, 1.0),
            right_eye_center: Point::new(2.0, 2.0),
            horizontal: Horizontal::Left,
            vertical: Vertical::Up,
            gaze_center: Point::new(1.5, 1.5),
        };
        assert_eq!(GazeResult::from(est).label(), "left/up");
        assert_eq!(
            GazeResult::from(BlendShapeDirection::NoEyeDetected).label(),
            "No eye detected"
        );
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_value(GazeResult::from(BlendShapeDirection::Left)).unwrap();
        assert_eq!(json["estimator"], "blend_shape");
        assert_eq!(json["direction"], "Left");
    }
}
