//! Pipeline configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::PipelineError;

/// Which estimator a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GazeMode {
    /// Blend-shape score classifier
    BlendShape,
    /// Eye-center coordinate comparison
    Geometric,
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum frames submitted for inference per second of media time
    pub fps: f64,

    /// Estimator used by the run
    pub mode: GazeMode,

    /// Padding around each eye crop (pixels)
    pub crop_padding: f64,

    /// Save eye crops for frames that carry pixels
    pub write_crops: bool,

    /// Recorded inference output to replay
    pub input: Option<PathBuf>,

    /// Directory for exports and crops
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            mode: GazeMode::BlendShape,
            crop_padding: eye_crop::DEFAULT_PADDING,
            write_crops: false,
            input: None,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl PipelineConfig {
    /// Geometric estimator with eye crops enabled
    pub fn geometric() -> Self {
        Self {
            mode: GazeMode::Geometric,
            write_crops: true,
            ..Default::default()
        }
    }

    /// Defaults, then an optional config file, then `GAZE_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder =
            ::config::Config::builder().add_source(::config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(::config::File::from(path));
        }

        let config: Self = builder
            .add_source(::config::Environment::with_prefix("GAZE").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if !self.crop_padding.is_finite() || self.crop_padding < 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "crop_padding must be non-negative, got {}",
                self.crop_padding
            )));
        }
        Ok(())
    }

    pub fn json_output(&self) -> PathBuf {
        self.output_dir.join("gaze_results.json")
    }

    pub fn csv_output(&self) -> PathBuf {
        self.output_dir.join("gaze-data.csv")
    }
}
