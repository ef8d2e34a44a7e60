//! Padded eye crop regions

use gaze_core::EyeLandmarkSet;

use crate::CropError;

/// Padding around the eye outline, in pixels
pub const DEFAULT_PADDING: f64 = 55.0;

/// Crop rectangle in frame coordinates, before clamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer rectangle fully inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Region spanned by outline points 0..3 horizontally and 1..4 vertically,
/// grown by `padding` on every side
pub fn crop_region(eye: &EyeLandmarkSet, padding: f64) -> CropRegion {
    let left = eye.leftmost();
    let top = eye.top();
    CropRegion {
        x: left.x - padding,
        y: top.y - padding,
        width: eye.rightmost().x - left.x + padding * 2.0,
        height: eye.bottom().y - top.y + padding * 2.0,
    }
}

impl CropRegion {
    /// Intersect with a `width` x `height` frame, rounding outward
    pub fn clamp_to(&self, width: u32, height: u32) -> Result<PixelRect, CropError> {
        let x0 = self.x.max(0.0).floor();
        let y0 = self.y.max(0.0).floor();
        let x1 = (self.x + self.width).min(width as f64).ceil();
        let y1 = (self.y + self.height).min(height as f64).ceil();

        if !(x1 > x0 && y1 > y0) {
            return Err(CropError::OutOfFrame {
                region: *self,
                width,
                height,
            });
        }

        Ok(PixelRect {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}
