use super::{BannerAnchor, OverlayCommand, OverlayFrame};
use crate::config::OverlayConfig;
use crate::error::{CubecamError, Result};
use crate::vision::PixelPoint;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut, text_size};
use rusttype::{Font, Scale};
use std::fs;
use tracing::{debug, warn};

const OUTLINE_RGB: [u8; 3] = [255, 0, 255];
const TIP_RATIO: f32 = 0.1;

/// Rasterizes overlay commands with imageproc
pub struct OverlayRenderer {
    font: Option<Font<'static>>,
    font_size: f32,
    arrow_thickness: u32,
}

impl OverlayRenderer {
    /// Renderer without text support
    pub fn new(font_size: f32, arrow_thickness: u32) -> Self {
        Self {
            font: None,
            font_size,
            arrow_thickness,
        }
    }

    /// Build from configuration; a missing font disables banners with a warning
    pub fn from_config(config: &OverlayConfig) -> Self {
        let mut renderer = Self::new(config.font_size, config.arrow_thickness);
        match load_font(&config.font_path) {
            Ok(font) => renderer.font = Some(font),
            Err(e) => warn!("Banner text disabled: {}", e),
        }
        renderer
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw every command onto a copy of the frame
    pub fn render(&self, image: &RgbImage, overlay: &OverlayFrame) -> RgbImage {
        let mut canvas = image.clone();
        let (ox, oy) = overlay.crop_origin;
        let shift = |p: &PixelPoint| ((p.x + ox) as f32, (p.y + oy) as f32);

        for command in &overlay.commands {
            match command {
                OverlayCommand::Outline { corners } => {
                    for i in 0..4 {
                        let a = shift(&corners[i]);
                        let b = shift(&corners[(i + 1) % 4]);
                        self.thick_line(&mut canvas, a, b, 2, Rgb(OUTLINE_RGB));
                    }
                }
                OverlayCommand::Arrow { from, to, color } => {
                    self.arrow(&mut canvas, shift(from), shift(to), Rgb(color.display_rgb()));
                }
                OverlayCommand::Banner {
                    text,
                    color,
                    anchor,
                    scale,
                } => self.banner(&mut canvas, text, Rgb(color.display_rgb()), *anchor, *scale),
            }
        }
        canvas
    }

    fn thick_line(
        &self,
        canvas: &mut RgbImage,
        from: (f32, f32),
        to: (f32, f32),
        thickness: u32,
        color: Rgb<u8>,
    ) {
        let half = (thickness / 2) as i32;
        for dy in -half..=half {
            for dx in -half..=half {
                draw_line_segment_mut(
                    canvas,
                    (from.0 + dx as f32, from.1 + dy as f32),
                    (to.0 + dx as f32, to.1 + dy as f32),
                    color,
                );
            }
        }
    }

    /// Line with a two-stroke head whose size is a fraction of the shaft
    fn arrow(&self, canvas: &mut RgbImage, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
        self.thick_line(canvas, from, to, self.arrow_thickness, color);

        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length < f32::EPSILON {
            return;
        }
        let tip = length * TIP_RATIO;
        let angle = dy.atan2(dx);
        for side in [-1.0f32, 1.0] {
            let a = angle + std::f32::consts::PI + side * std::f32::consts::FRAC_PI_4;
            let end = (to.0 + tip * a.cos(), to.1 + tip * a.sin());
            self.thick_line(canvas, to, end, self.arrow_thickness, color);
        }
    }

    fn banner(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        color: Rgb<u8>,
        anchor: BannerAnchor,
        scale: f32,
    ) {
        let font = match &self.font {
            Some(font) => font,
            None => {
                debug!("Skipping banner '{}': no font loaded", text);
                return;
            }
        };

        let size = self.font_size * scale;
        let font_scale = Scale::uniform(size);
        let (text_width, text_height) = text_size(font_scale, font, text);
        let x = (canvas.width() as i32 - text_width).max(0) / 2;
        let y = match anchor {
            BannerAnchor::Center => (canvas.height() as i32 - text_height).max(0) / 2,
            BannerAnchor::Line(line) => 10 + (line as f32 * size * 1.2) as i32,
        };

        draw_text_mut(canvas, color, x, y, font_scale, font, text);
    }
}

fn load_font(path: &str) -> Result<Font<'static>> {
    let font_data = fs::read(path).map_err(|e| {
        CubecamError::component(
            "overlay",
            &format!("Failed to read font file '{}': {}", path, e),
        )
    })?;

    Font::try_from_vec(font_data).ok_or_else(|| {
        CubecamError::component("overlay", &format!("Failed to parse font file '{}'", path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayCommand;
    use crate::vision::ColorLabel;

    #[test]
    fn test_arrow_is_drawn_with_crop_offset() {
        let renderer = OverlayRenderer::new(20.0, 3);
        let image = RgbImage::new(200, 200);
        let mut overlay = OverlayFrame::new(1, (50, 20));
        overlay.push(OverlayCommand::Arrow {
            from: PixelPoint::new(10, 10),
            to: PixelPoint::new(90, 10),
            color: ColorLabel::Green,
        });

        let out = renderer.render(&image, &overlay);
        assert_eq!(out.get_pixel(100, 30).0, [0, 255, 0]);
        assert_eq!(out.get_pixel(100, 60).0, [0, 0, 0]);
        // The source image is left untouched
        assert_eq!(image.get_pixel(100, 30).0, [0, 0, 0]);
    }

    #[test]
    fn test_outline_and_missing_font() {
        let mut config = OverlayConfig::default();
        config.font_path = "/nonexistent/font.ttf".to_string();
        let renderer = OverlayRenderer::from_config(&config);
        assert!(!renderer.has_font());

        let mut overlay = OverlayFrame::new(2, (0, 0));
        overlay.push(OverlayCommand::Outline {
            corners: [
                PixelPoint::new(10, 10),
                PixelPoint::new(40, 10),
                PixelPoint::new(40, 40),
                PixelPoint::new(10, 40),
            ],
        });
        overlay.banner("READY?", ColorLabel::Red, BannerAnchor::Center, 2.0);

        let out = renderer.render(&RgbImage::new(60, 60), &overlay);
        assert_eq!(out.get_pixel(25, 10).0, OUTLINE_RGB);
        assert_eq!(out.get_pixel(25, 25).0, [0, 0, 0]);
    }
}
