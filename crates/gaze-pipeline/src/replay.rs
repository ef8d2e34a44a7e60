//! Replay of recorded face model output
//!
//! A replay file is a JSON array with one entry per frame:
//!
//! ```json
//! [
//!   {
//!     "timestamp": 0.033,
//!     "image": "frames/0001.png",
//!     "blendShapes": [{ "categoryName": "eyeLookInLeft", "score": 0.12 }],
//!     "landmarks": { "leftEye": [{ "x": 90, "y": 80 }, ...], "rightEye": [...] }
//!   }
//! ]
//! ```
//!
//! Each eye needs at least six outline points; `landmarks` may instead be a
//! flat array of 68 face points. Missing `blendShapes` or `landmarks` means
//! the model found no face in that frame.
//! The whole file is validated when it is loaded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use eye_crop::VideoFrame;
use gaze_core::{BlendShapeCategory, EyeLandmarkSet, FaceLandmarks68, Point, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::detector::{BlendShapeDetector, EyeLandmarks, Frame, FrameSource, LandmarkDetector};
use crate::PipelineError;

/// Landmarks as recorded: either both eye outlines or the full face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "RawLandmarkPayload")]
pub enum LandmarkPayload {
    Eyes(EyeLandmarks),
    Face(FaceLandmarks68),
}

/// Payload shape before point counts are checked, so a bad outline reports
/// its [`ValidationError`] instead of a failed variant match
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLandmarkPayload {
    #[serde(rename_all = "camelCase")]
    Eyes {
        left_eye: Vec<Point>,
        right_eye: Vec<Point>,
    },
    Face(Vec<Point>),
}

impl TryFrom<RawLandmarkPayload> for LandmarkPayload {
    type Error = ValidationError;

    fn try_from(raw: RawLandmarkPayload) -> Result<Self, Self::Error> {
        match raw {
            RawLandmarkPayload::Eyes {
                left_eye,
                right_eye,
            } => Ok(LandmarkPayload::Eyes(EyeLandmarks {
                left_eye: EyeLandmarkSet::new(left_eye)?,
                right_eye: EyeLandmarkSet::new(right_eye)?,
            })),
            RawLandmarkPayload::Face(points) => {
                Ok(LandmarkPayload::Face(FaceLandmarks68::new(points)?))
            }
        }
    }
}

impl LandmarkPayload {
    pub fn eyes(&self) -> EyeLandmarks {
        match self {
            LandmarkPayload::Eyes(eyes) => eyes.clone(),
            LandmarkPayload::Face(face) => EyeLandmarks::from(face),
        }
    }
}

/// Recorded model output for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEntry {
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_shapes: Option<Vec<BlendShapeCategory>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<LandmarkPayload>,
}

/// A loaded replay file
#[derive(Debug, Clone)]
pub struct ReplaySource {
    entries: Arc<Vec<ReplayEntry>>,
    base_dir: PathBuf,
}

impl ReplaySource {
    /// Load and validate a replay file. Image paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let source = Self::from_json(&text, base_dir)?;
        info!(
            "Loaded {} recorded frames from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn from_json(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let entries: Vec<ReplayEntry> = serde_json::from_str(text)?;
        Self::from_entries(entries, base_dir)
    }

    pub fn from_entries(
        entries: Vec<ReplayEntry>,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Self, PipelineError> {
        if let Some((index, entry)) = entries
            .iter()
            .enumerate()
            .find(|(_, e)| !e.timestamp.is_finite() || e.timestamp < 0.0)
        {
            return Err(PipelineError::Source(format!(
                "entry {} has invalid timestamp {}",
                index, entry.timestamp
            )));
        }
        Ok(Self {
            entries: Arc::new(entries),
            base_dir: base_dir.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into a frame source and a detector over the same entries
    pub fn split(self, load_images: bool) -> (ReplayFrames, ReplayDetector) {
        let frames = ReplayFrames {
            entries: Arc::clone(&self.entries),
            base_dir: self.base_dir,
            next: 0,
            load_images,
        };
        let detector = ReplayDetector {
            entries: self.entries,
        };
        (frames, detector)
    }
}

/// Frames of a replay, in file order
pub struct ReplayFrames {
    entries: Arc<Vec<ReplayEntry>>,
    base_dir: PathBuf,
    next: usize,
    load_images: bool,
}

#[async_trait]
impl FrameSource for ReplayFrames {
    async fn next_frame(&mut self) -> Result<Option<Frame>, PipelineError> {
        let Some(entry) = self.entries.get(self.next) else {
            return Ok(None);
        };
        let sequence = self.next as u64;
        self.next += 1;

        let mut frame = Frame::new(entry.timestamp, sequence);
        if let (true, Some(image)) = (self.load_images, &entry.image) {
            let path = self.base_dir.join(image);
            debug!("Decoding frame {} from {}", sequence, path.display());
            frame = frame.with_pixels(VideoFrame::open(&path, entry.timestamp, sequence)?);
        }
        Ok(Some(frame))
    }
}

/// Answers detector calls from the recorded output
#[derive(Clone)]
pub struct ReplayDetector {
    entries: Arc<Vec<ReplayEntry>>,
}

impl ReplayDetector {
    fn entry(&self, frame: &Frame) -> Result<&ReplayEntry, PipelineError> {
        self.entries.get(frame.sequence as usize).ok_or_else(|| {
            PipelineError::Inference(format!("no recorded output for frame {}", frame.sequence))
        })
    }
}

#[async_trait]
impl BlendShapeDetector for ReplayDetector {
    async fn detect_blend_shapes(
        &self,
        frame: &Frame,
    ) -> Result<Option<Vec<BlendShapeCategory>>, PipelineError> {
        Ok(self.entry(frame)?.blend_shapes.clone())
    }
}

#[async_trait]
impl LandmarkDetector for ReplayDetector {
    async fn detect_landmarks(&self, frame: &Frame) -> Result<Option<EyeLandmarks>, PipelineError> {
        Ok(self.entry(frame)?.landmarks.as_ref().map(LandmarkPayload::eyes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EYES: &str = r#"{
        "leftEye": [{"x":90,"y":80},{"x":96,"y":76},{"x":104,"y":76},{"x":110,"y":80},{"x":104,"y":84},{"x":96,"y":84}],
        "rightEye": [{"x":150,"y":80},{"x":156,"y":76},{"x":164,"y":76},{"x":170,"y":80},{"x":164,"y":84},{"x":156,"y":84}]
    }"#;

    #[tokio::test]
    async fn test_frames_in_file_order() {
        let text = r#"[{"timestamp":0.0},{"timestamp":0.5},{"timestamp":0.25}]"#;
        let (mut frames, _) = ReplaySource::from_json(text, ".").unwrap().split(false);

        let mut stamps = Vec::new();
        while let Some(frame) = frames.next_frame().await.unwrap() {
            stamps.push((frame.sequence, frame.timestamp));
        }
        assert_eq!(stamps, vec![(0, 0.0), (1, 0.5), (2, 0.25)]);
    }

    #[tokio::test]
    async fn test_detector_returns_recorded_output() {
        let text = format!(
            r#"[{{"timestamp":0.0,"landmarks":{}}},
                {{"timestamp":0.1,"blendShapes":[{{"categoryName":"eyeLookInLeft","score":0.3}}]}}]"#,
            EYES
        );
        let (_, detector) = ReplaySource::from_json(&text, ".").unwrap().split(false);

        let first = Frame::new(0.0, 0);
        let second = Frame::new(0.1, 1);

        let eyes = detector.detect_landmarks(&first).await.unwrap().unwrap();
        assert_eq!(eyes.left_eye.leftmost().x, 90.0);
        assert!(detector.detect_blend_shapes(&first).await.unwrap().is_none());

        let shapes = detector.detect_blend_shapes(&second).await.unwrap().unwrap();
        assert_eq!(shapes.len(), 1);
        assert!(detector.detect_landmarks(&second).await.unwrap().is_none());

        let missing = Frame::new(0.2, 7);
        assert!(matches!(
            detector.detect_landmarks(&missing).await,
            Err(PipelineError::Inference(_))
        ));
    }

    #[tokio::test]
    async fn test_replay_drives_blend_shape_run() {
        let text = r#"[
            {"timestamp":0.0,"blendShapes":[
                {"categoryName":"eyeLookInLeft","score":0.1},{"categoryName":"eyeLookInRight","score":0.8},
                {"categoryName":"eyeLookOutLeft","score":0.7},{"categoryName":"eyeLookOutRight","score":0.1},
                {"categoryName":"browInnerUp","score":0.4}]},
            {"timestamp":0.1},
            {"timestamp":0.2,"blendShapes":[]}
        ]"#;
        let (frames, detector) = ReplaySource::from_json(text, ".").unwrap().split(false);
        let output = crate::GazeRun::new(frames, crate::BlendShapeStrategy::new(detector), 30.0)
            .execute()
            .await
            .unwrap();

        let json = output.log.to_json().unwrap();
        let parsed = gaze_export::parse_json(&json).unwrap();
        assert_eq!(parsed, output.log.records());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["gazeDirection"], "Right");
        assert_eq!(value[1]["gazeDirection"], "No eye detected");
        assert_eq!(value[1]["timestamp"], 0.2);
        assert_eq!(output.summary.detection_misses, 1);
    }

    #[test]
    fn test_face68_payload() {
        let points: Vec<String> = (0..68)
            .map(|i| format!(r#"{{"x":{},"y":1}}"#, i))
            .collect();
        let text = format!(r#"[{{"timestamp":0.0,"landmarks":[{}]}}]"#, points.join(","));
        let source = ReplaySource::from_json(&text, ".").unwrap();
        let payload = source.entries[0].landmarks.as_ref().unwrap();
        assert_eq!(payload.eyes().right_eye.leftmost().x, 42.0);
    }

    #[test]
    fn test_invalid_score_rejected_at_load() {
        let text = r#"[{"timestamp":0.0,"blendShapes":[{"categoryName":"eyeLookInLeft","score":3.0}]}]"#;
        assert!(matches!(
            ReplaySource::from_json(text, "."),
            Err(PipelineError::Replay(_))
        ));
    }

    #[test]
    fn test_short_eye_outline_rejected_at_load() {
        let text = r#"[{"timestamp":0.0,"landmarks":{"leftEye":[{"x":1,"y":1}],"rightEye":[{"x":1,"y":1}]}}]"#;
        let err = ReplaySource::from_json(text, ".").unwrap_err();
        assert!(matches!(err, PipelineError::Replay(_)));
        assert!(
            err.to_string().contains("expected 6 landmark points, got 1"),
            "unexpected error: {}",
            err
        );
    }

    #[test]
    fn test_short_face_rejected_with_count() {
        let points: Vec<String> = (0..67)
            .map(|i| format!(r#"{{"x":{},"y":1}}"#, i))
            .collect();
        let text = format!(r#"[{{"timestamp":0.0,"landmarks":[{}]}}]"#, points.join(","));
        let err = ReplaySource::from_json(&text, ".").unwrap_err();
        assert!(err.to_string().contains("expected 68 landmark points, got 67"));
    }

    #[test]
    fn test_landmark_payload_serializes_untagged() {
        let payload: LandmarkPayload = serde_json::from_str(EYES).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["leftEye"][0]["x"], 90.0);
        assert_eq!(serde_json::from_value::<LandmarkPayload>(value).unwrap(), payload);
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let text = r#"[{"timestamp":-1.0}]"#;
        assert!(matches!(
            ReplaySource::from_json(text, "."),
            Err(PipelineError::Source(_))
        ));
    }
}
