//! Gaze Estimation Pipeline
//!
//! Drives one run over a sequence of frames: pull a frame, gate it by frame
//! rate, await the (mockable) detector, classify synchronously and append to
//! the run's own result log.

pub mod config;
pub mod detector;
pub mod gate;
pub mod replay;
pub mod run;

pub use self::config::{GazeMode, PipelineConfig};
pub use detector::{
    BlendShapeDetector, BlendShapeStrategy, EyeLandmarks, Frame, FrameSource, GazeStrategy,
    GeometricStrategy, LandmarkDetector, StepOutcome,
};
pub use gate::FrameGate;
pub use replay::{LandmarkPayload, ReplayDetector, ReplayEntry, ReplayFrames, ReplaySource};
pub use run::{GazeRun, RunOutput, RunSummary, StopHandle};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Frame source failed: {0}")]
    Source(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed replay payload: {0}")]
    Replay(#[from] serde_json::Error),

    #[error(transparent)]
    Crop(#[from] eye_crop::CropError),

    #[error(transparent)]
    Export(#[from] gaze_export::ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
