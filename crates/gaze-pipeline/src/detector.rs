//! Seams to the external face model: frame source, detectors and the
//! per-frame estimation strategies built on them

use std::sync::Arc;

use async_trait::async_trait;
use eye_crop::VideoFrame;
use gaze_core::{
    determine_gaze_direction, extract_eye_signals, BlendShapeCategory, EyeLandmarkSet,
    FaceLandmarks68, GazeResult, GeometricEstimate,
};
use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// One frame handed to a detector
#[derive(Debug, Clone)]
pub struct Frame {
    /// Media time (seconds)
    pub timestamp: f64,
    /// Position in the source, starting at 0
    pub sequence: u64,
    /// Decoded pixels, when the source has them
    pub pixels: Option<Arc<VideoFrame>>,
}

impl Frame {
    pub fn new(timestamp: f64, sequence: u64) -> Self {
        Self {
            timestamp,
            sequence,
            pixels: None,
        }
    }

    pub fn with_pixels(mut self, pixels: VideoFrame) -> Self {
        self.pixels = Some(Arc::new(pixels));
        self
    }
}

/// Produces frames in order. `Ok(None)` means the media ended or paused.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<Frame>, PipelineError>;
}

/// Outline of both eyes in one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EyeLandmarks {
    pub left_eye: EyeLandmarkSet,
    pub right_eye: EyeLandmarkSet,
}

impl From<&FaceLandmarks68> for EyeLandmarks {
    fn from(face: &FaceLandmarks68) -> Self {
        Self {
            left_eye: face.left_eye(),
            right_eye: face.right_eye(),
        }
    }
}

/// Face model producing blend-shape scores.
///
/// `Ok(None)` when no face was found in the frame.
#[async_trait]
pub trait BlendShapeDetector: Send + Sync {
    async fn detect_blend_shapes(
        &self,
        frame: &Frame,
    ) -> Result<Option<Vec<BlendShapeCategory>>, PipelineError>;
}

/// Face model producing eye outline landmarks.
///
/// `Ok(None)` when no face was found in the frame.
#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    async fn detect_landmarks(&self, frame: &Frame) -> Result<Option<EyeLandmarks>, PipelineError>;
}

/// What one frame produced
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// No face in this frame; nothing is recorded
    Miss,
    /// A classified frame, with the landmarks it came from if any
    Detected {
        result: GazeResult,
        eyes: Option<EyeLandmarks>,
    },
}

/// Detect then classify a single frame
#[async_trait]
pub trait GazeStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn step(&self, frame: &Frame) -> Result<StepOutcome, PipelineError>;
}

/// Blend-shape classifier over a [`BlendShapeDetector`]
pub struct BlendShapeStrategy<D> {
    detector: D,
}

impl<D: BlendShapeDetector> BlendShapeStrategy<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }
}

#[async_trait]
impl<D: BlendShapeDetector> GazeStrategy for BlendShapeStrategy<D> {
    fn name(&self) -> &'static str {
        "blend_shape"
    }

    async fn step(&self, frame: &Frame) -> Result<StepOutcome, PipelineError> {
        let Some(categories) = self.detector.detect_blend_shapes(frame).await? else {
            return Ok(StepOutcome::Miss);
        };
        let direction = determine_gaze_direction(&extract_eye_signals(&categories));
        Ok(StepOutcome::Detected {
            result: direction.into(),
            eyes: None,
        })
    }
}

/// Eye-center estimator over a [`LandmarkDetector`]
pub struct GeometricStrategy<D> {
    detector: D,
}

impl<D: LandmarkDetector> GeometricStrategy<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }
}

#[async_trait]
impl<D: LandmarkDetector> GazeStrategy for GeometricStrategy<D> {
    fn name(&self) -> &'static str {
        "geometric"
    }

    async fn step(&self, frame: &Frame) -> Result<StepOutcome, PipelineError> {
        let Some(eyes) = self.detector.detect_landmarks(frame).await? else {
            return Ok(StepOutcome::Miss);
        };
        let estimate = GeometricEstimate::from_landmarks(&eyes.left_eye, &eyes.right_eye);
        Ok(StepOutcome::Detected {
            result: estimate.into(),
            eyes: Some(eyes),
        })
    }
}
