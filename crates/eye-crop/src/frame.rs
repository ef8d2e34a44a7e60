//! RGB frame type and crop extraction

use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::region::PixelRect;
use crate::CropError;

/// Decoded RGB frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixels
    pub image: RgbImage,
    /// Media time (seconds)
    pub timestamp: f64,
    /// Frame sequence number
    pub sequence: u64,
}

impl VideoFrame {
    /// Wrap a decoded image
    pub fn from_image(image: RgbImage, timestamp: f64, sequence: u64) -> Self {
        Self {
            image,
            timestamp,
            sequence,
        }
    }

    /// Decode a still image from disk
    pub fn open(path: impl AsRef<Path>, timestamp: f64, sequence: u64) -> Result<Self, CropError> {
        let image = image::open(path)?.to_rgb8();
        Ok(Self::from_image(image, timestamp, sequence))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Copy a rectangle of the frame into a new image. Parts of `rect` past
    /// the frame edge are cut off.
    pub fn crop(&self, rect: PixelRect) -> RgbImage {
        image::imageops::crop_imm(&self.image, rect.x, rect.y, rect.width, rect.height).to_image()
    }
}

/// Encode an RGB image as PNG bytes
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, CropError> {
    let mut bytes = Vec::new();
    image.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> VideoFrame {
        let image = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]));
        VideoFrame::from_image(image, 0.0, 0)
    }

    #[test]
    fn test_crop_copies_region() {
        let frame = gradient(16, 16);
        let rect = PixelRect {
            x: 4,
            y: 6,
            width: 5,
            height: 3,
        };
        let crop = frame.crop(rect);
        assert_eq!(crop.dimensions(), (5, 3));
        assert_eq!(crop.get_pixel(0, 0), &Rgb([4, 6, 0]));
        assert_eq!(crop.get_pixel(4, 2), &Rgb([8, 8, 0]));
    }

    #[test]
    fn test_crop_cut_at_frame_edge() {
        let frame = gradient(8, 8);
        let crop = frame.crop(PixelRect {
            x: 6,
            y: 0,
            width: 4,
            height: 2,
        });
        assert_eq!(crop.dimensions(), (2, 2));
        assert_eq!(crop.get_pixel(1, 1), &Rgb([7, 1, 0]));
    }

    #[test]
    fn test_png_signature() {
        let frame = gradient(4, 4);
        let crop = frame
            .crop(PixelRect {
                x: 0,
                y: 0,
                width: 2,
                height: 2,
            });
        let png = encode_png(&crop).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
