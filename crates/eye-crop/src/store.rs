//! On-disk storage for cropped eye images

use std::fs;
use std::path::PathBuf;

use gaze_core::EyeLandmarkSet;
use image::RgbImage;
use tracing::{debug, info};

use crate::frame::{encode_png, VideoFrame};
use crate::region::crop_region;
use crate::CropError;

/// Which eye a crop belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            EyeSide::Left => "left",
            EyeSide::Right => "right",
        }
    }

    /// Sub-directory holding this side's crops
    pub fn dir_name(&self) -> &'static str {
        match self {
            EyeSide::Left => "left-eye",
            EyeSide::Right => "right-eye",
        }
    }
}

/// `{side}_eye_{seconds}.png`, seconds with two decimals and `.` as `-`
pub fn crop_filename(side: EyeSide, timestamp: f64) -> String {
    let stamp = format!("{:.2}", timestamp).replace('.', "-");
    format!("{}_eye_{}.png", side.as_str(), stamp)
}

/// Writes eye crops under `left-eye/` and `right-eye/` of a root directory
pub struct CropStore {
    root: PathBuf,
    padding: f64,
}

impl CropStore {
    pub fn new(root: impl Into<PathBuf>, padding: f64) -> Self {
        Self {
            root: root.into(),
            padding,
        }
    }

    /// Remove earlier crops and recreate both eye directories
    pub fn reset(&self) -> Result<(), CropError> {
        for side in [EyeSide::Left, EyeSide::Right] {
            let dir = self.root.join(side.dir_name());
            if dir.exists() {
                fs::remove_dir_all(&dir)?;
            }
            fs::create_dir_all(&dir)?;
        }
        info!("Crop directories reset under {}", self.root.display());
        Ok(())
    }

    /// Crop one eye out of a frame and save it as PNG
    pub fn save_eye(
        &self,
        frame: &VideoFrame,
        eye: &EyeLandmarkSet,
        side: EyeSide,
    ) -> Result<PathBuf, CropError> {
        let rect = crop_region(eye, self.padding).clamp_to(frame.width(), frame.height())?;
        let crop = frame.crop(rect);
        self.save(side, frame.timestamp, &crop)
    }

    /// Save an already cropped image
    pub fn save(&self, side: EyeSide, timestamp: f64, crop: &RgbImage) -> Result<PathBuf, CropError> {
        let dir = self.root.join(side.dir_name());
        fs::create_dir_all(&dir)?;

        let path = dir.join(crop_filename(side, timestamp));
        fs::write(&path, encode_png(crop)?)?;
        debug!("Saved {} eye crop to {}", side.as_str(), path.display());
        Ok(path)
    }
}
