//! Eye Crop Library
//!
//! Cuts padded eye regions out of RGB frames using eye outline landmarks:
//! - Crop region from outline points 0, 1, 3, 4 plus padding
//! - Clamping to the frame bounds
//! - PNG encoding and `left-eye/` / `right-eye/` storage

pub mod frame;
pub mod region;
pub mod store;

pub use frame::{encode_png, VideoFrame};
pub use region::{crop_region, CropRegion, PixelRect, DEFAULT_PADDING};
pub use store::{crop_filename, CropStore, EyeSide};

use thiserror::Error;

/// Crop error types
#[derive(Error, Debug)]
pub enum CropError {
    #[error("Crop region {region:?} lies outside the {width}x{height} frame")]
    OutOfFrame {
        region: CropRegion,
        width: u32,
        height: u32,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
