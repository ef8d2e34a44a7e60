//! Exported record shapes

use gaze_core::{BlendShapeDirection, GazeResult, GeometricEstimate, Horizontal, Point, Vertical};
use serde::{Deserialize, Serialize};

/// Blend-shape result for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlendShapeRecord {
    pub timestamp: f64,
    pub gaze_direction: BlendShapeDirection,
}

/// Geometric result for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GeometricRecord {
    pub timestamp: f64,
    pub left_eye_center: Point,
    pub right_eye_center: Point,
    pub horizontal: Horizontal,
    pub vertical: Vertical,
    pub gaze_center: Point,
}

impl GeometricRecord {
    pub fn new(timestamp: f64, estimate: &GeometricEstimate) -> Self {
        Self {
            timestamp,
            left_eye_center: estimate.left_eye_center,
            right_eye_center: estimate.right_eye_center,
            horizontal: estimate.horizontal,
            vertical: estimate.vertical,
            gaze_center: estimate.gaze_center,
        }
    }
}

/// One timestamped entry of a run's result log.
///
/// Serialized without a tag; the two shapes share only `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GazeRecord {
    Geometric(GeometricRecord),
    BlendShape(BlendShapeRecord),
}

impl GazeRecord {
    pub fn new(timestamp: f64, result: GazeResult) -> Self {
        match result {
            GazeResult::Geometric(est) => GazeRecord::Geometric(GeometricRecord::new(timestamp, &est)),
            GazeResult::BlendShape { direction } => GazeRecord::BlendShape(BlendShapeRecord {
                timestamp,
                gaze_direction: direction,
            }),
        }
    }

    pub fn timestamp(&self) -> f64 {
        match self {
            GazeRecord::Geometric(r) => r.timestamp,
            GazeRecord::BlendShape(r) => r.timestamp,
        }
    }
}
