//! Gaze Estimation Core
//!
//! Turns per-frame output of an external face model into a gaze label:
//! - Eye-center geometry from eye outline landmarks
//! - Coarse left/right, up/down estimate by comparing eye centers
//! - Blend-shape classifier over the four `eyeLook*` scores
//!
//! Model inference itself lives outside this crate. Payloads crossing into it
//! are validated once on deserialization (see [`validate`]).

pub mod blendshape;
pub mod geometry;
pub mod result;
pub mod validate;

pub use blendshape::{
    determine_gaze_direction, extract_eye_signals, BlendShapeDirection, BlendShapeScore,
    EyeSignal, CENTER_THRESHOLD,
};
pub use geometry::{
    compute_eye_center, estimate_gaze_center, estimate_gaze_from_eyes, EyeLandmarkSet,
    FaceLandmarks68, GeometricEstimate, GeometricGaze, Horizontal, Point, Vertical,
};
pub use result::GazeResult;
pub use validate::{BlendShapeCategory, ValidationError};

use thiserror::Error;

/// Gaze estimation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GazeError {
    /// Caller passed input that violates an estimator contract
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
