use super::color::{ColorBands, ColorLabel, HsvImage};
use super::grid::{FaceGrid, Facelet, PixelPoint};
use super::region::DetectedRegion;
use crate::error::CalibrationError;
use tracing::debug;

/// Turns nine detected regions into a geometrically ordered face grid
pub struct FaceletClassifier {
    bands: ColorBands,
}

impl FaceletClassifier {
    pub fn new(bands: ColorBands) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &ColorBands {
        &self.bands
    }

    /// Classify every region and lay the facelets out as `grid[row][col]`.
    ///
    /// Centroids are sorted by x (ties by y) into three column clusters, and
    /// each cluster is sorted by y (ties by x). The result is therefore
    /// independent of the order in which regions were detected.
    pub fn classify(
        &self,
        regions: &[DetectedRegion],
        hsv: &HsvImage,
    ) -> Result<FaceGrid, CalibrationError> {
        if regions.len() != 9 {
            return Err(CalibrationError::RegionCount {
                found: regions.len(),
            });
        }

        let mut centers: Vec<PixelPoint> = regions.iter().map(|r| r.centroid()).collect();
        centers.sort_by_key(|p| (p.x, p.y));

        let mut facelets = [[Facelet {
            color: ColorLabel::Unknown,
            center: PixelPoint::new(0, 0),
        }; 3]; 3];

        for (col, cluster) in centers.chunks_mut(3).enumerate() {
            cluster.sort_by_key(|p| (p.y, p.x));
            for (row, center) in cluster.iter().enumerate() {
                facelets[row][col] = self.sample(*center, hsv)?;
            }
        }

        let grid = FaceGrid::from_classified(facelets);
        debug!("Classified face {}", grid);
        Ok(grid)
    }

    fn sample(&self, center: PixelPoint, hsv: &HsvImage) -> Result<Facelet, CalibrationError> {
        let out_of_frame = || CalibrationError::OutOfFrame {
            x: center.x,
            y: center.y,
            width: hsv.width(),
            height: hsv.height(),
        };
        if center.x < 0 || center.y < 0 {
            return Err(out_of_frame());
        }
        let pixel = hsv
            .get(center.x as u32, center.y as u32)
            .ok_or_else(out_of_frame)?;

        let color = self.bands.classify(pixel);
        if !color.is_known() {
            return Err(CalibrationError::UnknownColor {
                x: center.x,
                y: center.y,
                hsv: pixel,
            });
        }
        Ok(Facelet { color, center })
    }
}
