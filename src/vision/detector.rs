use super::color::{ColorBands, HsvImage};
use super::grid::PixelPoint;
use super::region::DetectedRegion;
use crate::config::DetectionConfig;

use image::{GrayImage, Luma};
use imageproc::{
    contours::find_contours,
    distance_transform::Norm,
    geometry::{approximate_polygon_dp, arc_length},
    morphology::open,
    point::Point,
};
use tracing::debug;

/// Finds sticker-shaped quadrilaterals in an HSV frame
pub struct RegionDetector {
    bands: ColorBands,
    config: DetectionConfig,
}

impl RegionDetector {
    pub fn new(config: DetectionConfig, bands: ColorBands) -> Self {
        Self { bands, config }
    }

    /// Binary mask of every pixel inside any calibrated band
    pub fn color_mask(&self, hsv: &HsvImage) -> GrayImage {
        let mask = GrayImage::from_fn(hsv.width(), hsv.height(), |x, y| {
            match hsv.get(x, y) {
                Some(pixel) if self.bands.matches_any(pixel) => Luma([255u8]),
                _ => Luma([0u8]),
            }
        });

        if self.config.smoothing_radius > 0 {
            let radius = self.config.smoothing_radius.min(u8::MAX as u32) as u8;
            open(&mask, Norm::LInf, radius)
        } else {
            mask
        }
    }

    /// Detect candidate facelet regions: contours whose area lies strictly
    /// inside the configured band and whose polygon approximation has four corners
    pub fn detect(&self, hsv: &HsvImage) -> Vec<DetectedRegion> {
        let mask = self.color_mask(hsv);
        let contours = find_contours::<i32>(&mask);
        let total = contours.len();

        let regions: Vec<DetectedRegion> = contours
            .iter()
            .filter_map(|contour| self.quadrilateral(&contour.points))
            .collect();

        debug!(
            "Region detection: {} contours, {} quadrilaterals",
            total,
            regions.len()
        );
        regions
    }

    fn quadrilateral(&self, points: &[Point<i32>]) -> Option<DetectedRegion> {
        if points.len() < 4 {
            return None;
        }

        let area = contour_area(points);
        if area <= self.config.min_area || area >= self.config.max_area {
            return None;
        }

        let epsilon = self.config.epsilon_factor * arc_length(points, true);
        if epsilon <= 0.0 {
            return None;
        }

        let approx = approximate_closed(points, epsilon);
        if approx.len() != 4 {
            return None;
        }

        let mut corners = [PixelPoint::new(0, 0); 4];
        for (slot, p) in corners.iter_mut().zip(approx.iter()) {
            *slot = PixelPoint::new(p.x, p.y);
        }
        Some(DetectedRegion::new(corners))
    }

    pub fn bands(&self) -> &ColorBands {
        &self.bands
    }
}

/// Douglas-Peucker over a closed contour. The curve is split at the point
/// farthest from its start so neither half has coincident endpoints.
fn approximate_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let start = points[0];
    let far = points
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| {
            let dx = (p.x - start.x) as i64;
            let dy = (p.y - start.y) as i64;
            dx * dx + dy * dy
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    if far == 0 {
        return vec![start];
    }

    let mut second_half = points[far..].to_vec();
    second_half.push(start);

    let mut approx = approximate_polygon_dp(&points[..=far], epsilon, false);
    let second = approximate_polygon_dp(&second_half, epsilon, false);
    // Both halves share the split point, and the second closes back on the start
    approx.extend(second.iter().skip(1).take(second.len().saturating_sub(2)));
    approx.dedup();
    approx
}

/// Shoelace area of a closed contour
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    (acc / 2.0).abs()
}
