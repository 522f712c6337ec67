use crate::config::CropRect;
use crate::error::FrameError;
use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;

/// Pixel layout of a frame's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameFormat {
    /// Packed 8-bit RGB, `width * height * 3` bytes
    Rgb24,
    /// Still-compressed image file (png, jpeg, bmp); dimensions are known after decoding
    Encoded,
}

/// One captured frame. The payload is shared so frames can be queued cheaply.
#[derive(Debug, Clone)]
pub struct FrameData {
    pub id: u64,
    pub captured_at: SystemTime,
    pub payload: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    pub format: FrameFormat,
    /// Where the frame came from, for log messages
    pub origin: Option<String>,
}

impl FrameData {
    pub fn from_rgb_image(id: u64, image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            id,
            captured_at: SystemTime::now(),
            payload: Arc::new(image.into_raw()),
            width,
            height,
            format: FrameFormat::Rgb24,
            origin: None,
        }
    }

    /// Wrap the raw bytes of an image file
    pub fn encoded(id: u64, bytes: Vec<u8>, origin: impl Into<String>) -> Self {
        Self {
            id,
            captured_at: SystemTime::now(),
            payload: Arc::new(bytes),
            width: 0,
            height: 0,
            format: FrameFormat::Encoded,
            origin: Some(origin.into()),
        }
    }

    fn label(&self) -> String {
        self.origin
            .clone()
            .unwrap_or_else(|| format!("frame {}", self.id))
    }

    /// Decode into an RGB image
    pub fn to_rgb_image(&self) -> Result<RgbImage, FrameError> {
        match self.format {
            FrameFormat::Rgb24 => {
                let expected = self.width as usize * self.height as usize * 3;
                if self.payload.len() != expected {
                    return Err(FrameError::SizeMismatch {
                        expected,
                        actual: self.payload.len(),
                    });
                }
                RgbImage::from_raw(self.width, self.height, self.payload.to_vec()).ok_or(
                    FrameError::SizeMismatch {
                        expected,
                        actual: self.payload.len(),
                    },
                )
            }
            FrameFormat::Encoded => image::load_from_memory(&self.payload)
                .map(|img| img.to_rgb8())
                .map_err(|source| FrameError::Decode {
                    path: self.label(),
                    source,
                }),
        }
    }
}

/// Cut the region of interest out of a frame, clamped to the frame bounds.
/// An empty intersection is a processing error.
pub fn crop_region(image: &RgbImage, crop: &CropRect) -> Result<RgbImage, FrameError> {
    let (width, height) = image.dimensions();
    let x = crop.x.min(width);
    let y = crop.y.min(height);
    let w = crop.width.min(width - x);
    let h = crop.height.min(height - y);

    if w == 0 || h == 0 {
        return Err(FrameError::Processing {
            details: format!(
                "crop {}x{}+{}+{} lies outside the {}x{} frame",
                crop.width, crop.height, crop.x, crop.y, width, height
            ),
        });
    }

    Ok(imageops::crop_imm(image, x, y, w, h).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb};
    use std::io::Cursor;

    #[test]
    fn test_rgb_payload_size_is_checked() {
        let mut frame = FrameData::from_rgb_image(1, RgbImage::new(4, 3));
        assert!(frame.to_rgb_image().is_ok());

        frame.payload = Arc::new(vec![0u8; 10]);
        assert!(matches!(
            frame.to_rgb_image(),
            Err(FrameError::SizeMismatch {
                expected: 36,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_encoded_frame_decodes() {
        let mut img = RgbImage::new(6, 5);
        img.put_pixel(2, 3, Rgb([10, 20, 30]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageOutputFormat::Png).unwrap();

        let frame = FrameData::encoded(4, bytes.into_inner(), "a.png");
        assert_eq!(frame.format, FrameFormat::Encoded);
        assert_eq!(frame.to_rgb_image().unwrap(), img);
    }

    #[test]
    fn test_undecodable_frame_names_its_origin() {
        let frame = FrameData::encoded(7, vec![1, 2, 3], "broken.jpg");
        match frame.to_rgb_image() {
            Err(FrameError::Decode { path, .. }) => assert_eq!(path, "broken.jpg"),
            other => panic!("Expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_crop_region_clamps_to_frame() {
        let mut img = RgbImage::new(100, 80);
        img.put_pixel(60, 50, Rgb([1, 2, 3]));

        let crop = CropRect {
            x: 50,
            y: 40,
            width: 500,
            height: 500,
        };
        let cropped = crop_region(&img, &crop).unwrap();
        assert_eq!(cropped.dimensions(), (50, 40));
        assert_eq!(cropped.get_pixel(10, 10).0, [1, 2, 3]);

        let outside = CropRect {
            x: 200,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(crop_region(&img, &outside).is_err());
    }
}
