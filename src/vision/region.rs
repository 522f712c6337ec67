use super::grid::PixelPoint;

/// Quadrilateral sticker outline that passed the area and corner filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedRegion {
    pub corners: [PixelPoint; 4],
}

impl DetectedRegion {
    pub fn new(corners: [PixelPoint; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned square region, mostly useful for synthetic frames
    pub fn square(top_left: PixelPoint, side: i32) -> Self {
        Self::new([
            top_left,
            PixelPoint::new(top_left.x + side, top_left.y),
            PixelPoint::new(top_left.x + side, top_left.y + side),
            PixelPoint::new(top_left.x, top_left.y + side),
        ])
    }

    /// Signed shoelace area of the outline
    fn signed_area(&self) -> f64 {
        let mut acc = 0.0;
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            acc += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        }
        acc / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Polygon centroid from first-order moments, truncated to whole pixels.
    /// Degenerate outlines fall back to the corner mean.
    pub fn centroid(&self) -> PixelPoint {
        let area = self.signed_area();
        if area.abs() < f64::EPSILON {
            let sx: i32 = self.corners.iter().map(|p| p.x).sum();
            let sy: i32 = self.corners.iter().map(|p| p.y).sum();
            return PixelPoint::new(sx / 4, sy / 4);
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..4 {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let cross = a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
            cx += (a.x + b.x) as f64 * cross;
            cy += (a.y + b.y) as f64 * cross;
        }

        PixelPoint::new(
            (cx / (6.0 * area)) as i32,
            (cy / (6.0 * area)) as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_centroid_and_area() {
        let region = DetectedRegion::square(PixelPoint::new(10, 20), 40);
        assert_eq!(region.area(), 1600.0);
        assert_eq!(region.centroid(), PixelPoint::new(30, 40));
    }

    #[test]
    fn test_centroid_is_winding_independent() {
        let mut region = DetectedRegion::square(PixelPoint::new(0, 0), 9);
        region.corners.reverse();
        assert_eq!(region.centroid(), PixelPoint::new(4, 4));
    }

    #[test]
    fn test_degenerate_region_uses_corner_mean() {
        let p = PixelPoint::new(7, 7);
        let region = DetectedRegion::new([p, p, p, p]);
        assert_eq!(region.centroid(), p);
    }
}
