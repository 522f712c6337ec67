use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sticker color as classified from a sampled pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    White,
    Unknown,
}

impl ColorLabel {
    /// Every classifiable color, excluding `Unknown`
    pub const ALL: [ColorLabel; 6] = [
        ColorLabel::Yellow,
        ColorLabel::Blue,
        ColorLabel::Red,
        ColorLabel::Green,
        ColorLabel::Orange,
        ColorLabel::White,
    ];

    /// Single-letter code used in the cube string
    pub fn letter(&self) -> char {
        match self {
            ColorLabel::Red => 'r',
            ColorLabel::Orange => 'o',
            ColorLabel::Yellow => 'y',
            ColorLabel::Green => 'g',
            ColorLabel::Blue => 'b',
            ColorLabel::White => 'w',
            ColorLabel::Unknown => 'z',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'r' => Some(ColorLabel::Red),
            'o' => Some(ColorLabel::Orange),
            'y' => Some(ColorLabel::Yellow),
            'g' => Some(ColorLabel::Green),
            'b' => Some(ColorLabel::Blue),
            'w' => Some(ColorLabel::White),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ColorLabel::Unknown)
    }

    /// Display color for overlays (RGB)
    pub fn display_rgb(&self) -> [u8; 3] {
        match self {
            ColorLabel::Red => [255, 0, 0],
            ColorLabel::Orange => [255, 165, 0],
            ColorLabel::Yellow => [255, 255, 0],
            ColorLabel::Green => [0, 255, 0],
            ColorLabel::Blue => [0, 0, 255],
            ColorLabel::White => [255, 255, 255],
            ColorLabel::Unknown => [255, 0, 255],
        }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorLabel::Red => "red",
            ColorLabel::Orange => "orange",
            ColorLabel::Yellow => "yellow",
            ColorLabel::Green => "green",
            ColorLabel::Blue => "blue",
            ColorLabel::White => "white",
            ColorLabel::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Inclusive HSV box on the 8-bit scale (hue 0..=180, saturation and value 0..=255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }

    pub fn is_well_formed(&self) -> bool {
        (0..3).all(|i| self.lower[i] <= self.upper[i])
    }

    /// Common box of two ranges, if they share any value
    pub fn intersection(&self, other: &HsvRange) -> Option<HsvRange> {
        let mut lower = [0u8; 3];
        let mut upper = [0u8; 3];
        for i in 0..3 {
            lower[i] = self.lower[i].max(other.lower[i]);
            upper[i] = self.upper[i].min(other.upper[i]);
            if lower[i] > upper[i] {
                return None;
            }
        }
        Some(HsvRange { lower, upper })
    }

    /// Holds some achromatic pixel (hue 0, saturation 0)
    pub fn contains_neutral(&self) -> bool {
        self.lower[0] == 0 && self.lower[1] == 0
    }
}

/// Calibrated color bands. Bands are consulted in a fixed priority order
/// (blue, green, yellow, orange, red, white) so overlapping calibrations
/// classify deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBands {
    #[serde(default = "default_blue")]
    pub blue: HsvRange,
    #[serde(default = "default_green")]
    pub green: HsvRange,
    #[serde(default = "default_yellow")]
    pub yellow: HsvRange,
    #[serde(default = "default_orange")]
    pub orange: HsvRange,
    #[serde(default = "default_red")]
    pub red: HsvRange,
    /// White is modelled as a union of bands to cover lighting-dependent saturation
    #[serde(default = "default_white")]
    pub white: Vec<HsvRange>,
}

impl ColorBands {
    pub fn classify(&self, hsv: [u8; 3]) -> ColorLabel {
        if self.blue.contains(hsv) {
            ColorLabel::Blue
        } else if self.green.contains(hsv) {
            ColorLabel::Green
        } else if self.yellow.contains(hsv) {
            ColorLabel::Yellow
        } else if self.orange.contains(hsv) {
            ColorLabel::Orange
        } else if self.red.contains(hsv) {
            ColorLabel::Red
        } else if self.white.iter().any(|band| band.contains(hsv)) {
            ColorLabel::White
        } else {
            ColorLabel::Unknown
        }
    }

    /// True when the pixel falls inside any band
    pub fn matches_any(&self, hsv: [u8; 3]) -> bool {
        self.classify(hsv).is_known()
    }

    /// Colored bands that are consulted before white and would take
    /// neutral white or grey pixels away from it
    pub fn shadowed_whites(&self) -> Vec<(String, HsvRange)> {
        self.colored_ranges()
            .into_iter()
            .filter(|(_, band)| {
                self.white.iter().any(|white| {
                    band.intersection(white)
                        .map_or(false, |shared| shared.contains_neutral())
                })
            })
            .collect()
    }

    /// Pairs of bands that share some HSV value; priority decides those pixels
    pub fn overlapping_pairs(&self) -> Vec<(String, String)> {
        let ranges = self.named_ranges();
        let mut pairs = Vec::new();
        for (i, (a, range_a)) in ranges.iter().enumerate() {
            for (b, range_b) in &ranges[i + 1..] {
                let both_white = a.starts_with("white") && b.starts_with("white");
                if !both_white && range_a.intersection(range_b).is_some() {
                    pairs.push((a.clone(), b.clone()));
                }
            }
        }
        pairs
    }

    fn colored_ranges(&self) -> Vec<(String, HsvRange)> {
        vec![
            ("blue".to_string(), self.blue),
            ("green".to_string(), self.green),
            ("yellow".to_string(), self.yellow),
            ("orange".to_string(), self.orange),
            ("red".to_string(), self.red),
        ]
    }

    pub fn named_ranges(&self) -> Vec<(String, HsvRange)> {
        let mut ranges = self.colored_ranges();
        for (i, band) in self.white.iter().enumerate() {
            ranges.push((format!("white[{}]", i), *band));
        }
        ranges
    }
}

impl Default for ColorBands {
    fn default() -> Self {
        Self {
            blue: default_blue(),
            green: default_green(),
            yellow: default_yellow(),
            orange: default_orange(),
            red: default_red(),
            white: default_white(),
        }
    }
}

fn default_blue() -> HsvRange {
    HsvRange::new([93, 137, 114], [118, 255, 255])
}
fn default_green() -> HsvRange {
    HsvRange::new([52, 90, 105], [87, 255, 255])
}
fn default_yellow() -> HsvRange {
    HsvRange::new([28, 46, 126], [65, 255, 255])
}
// Saturation floor sits above the first white band's ceiling
fn default_orange() -> HsvRange {
    HsvRange::new([0, 22, 228], [27, 255, 255])
}
fn default_red() -> HsvRange {
    HsvRange::new([146, 60, 126], [178, 255, 255])
}
fn default_white() -> Vec<HsvRange> {
    vec![
        HsvRange::new([0, 0, 172], [0, 21, 255]),
        HsvRange::new([71, 0, 132], [109, 170, 255]),
    ]
}

/// Convert one RGB pixel to 8-bit HSV with hue halved into 0..=180
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32;
    let g = rgb[1] as f32;
    let b = rgb[2] as f32;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta * 255.0 / max } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    [
        (h / 2.0).round().min(180.0) as u8,
        s.round().min(255.0) as u8,
        v.round() as u8,
    ]
}

/// HSV view of a frame, one `[h, s, v]` triple per pixel
#[derive(Debug, Clone)]
pub struct HsvImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl HsvImage {
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| rgb_to_hsv(p.0)).collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
    }

    #[test]
    fn test_default_bands_classify_sample_values() {
        let bands = ColorBands::default();
        assert_eq!(bands.classify([105, 200, 200]), ColorLabel::Blue);
        assert_eq!(bands.classify([70, 200, 200]), ColorLabel::Green);
        assert_eq!(bands.classify([40, 200, 200]), ColorLabel::Yellow);
        assert_eq!(bands.classify([10, 200, 240]), ColorLabel::Orange);
        assert_eq!(bands.classify([160, 200, 200]), ColorLabel::Red);
        assert_eq!(bands.classify([0, 10, 200]), ColorLabel::White);
        assert_eq!(bands.classify([90, 100, 140]), ColorLabel::White);
        assert_eq!(bands.classify([130, 200, 50]), ColorLabel::Unknown);
    }

    #[test]
    fn test_overlapping_bands_follow_priority() {
        let bands = ColorBands::default();
        // Inside both the blue band and the second white band
        assert_eq!(bands.classify([100, 150, 200]), ColorLabel::Blue);
    }

    #[test]
    fn test_bright_white_stickers_read_white() {
        let bands = ColorBands::default();
        for rgb in [[255, 255, 255], [240, 240, 240], [235, 232, 232]] {
            assert_eq!(
                bands.classify(rgb_to_hsv(rgb)),
                ColorLabel::White,
                "rgb {:?}",
                rgb
            );
        }
        assert_eq!(bands.classify(rgb_to_hsv([255, 120, 0])), ColorLabel::Orange);
        assert!(bands.shadowed_whites().is_empty());
    }

    #[test]
    fn test_band_that_covers_grey_shadows_white() {
        let mut bands = ColorBands::default();
        bands.orange = HsvRange::new([0, 0, 228], [28, 255, 255]);
        assert_eq!(bands.classify([0, 10, 240]), ColorLabel::Orange);

        let shadowed = bands.shadowed_whites();
        assert_eq!(shadowed.len(), 1);
        assert_eq!(shadowed[0].0, "orange");
    }

    #[test]
    fn test_overlapping_pairs_are_reported() {
        let bands = ColorBands::default();
        let pairs = bands.overlapping_pairs();
        assert!(pairs.contains(&("blue".to_string(), "white[1]".to_string())));
        assert!(!pairs.iter().any(|(a, b)| a == "yellow" && b == "orange"));
        assert!(!pairs.iter().any(|(a, b)| a.starts_with("white") && b.starts_with("white")));
    }

    #[test]
    fn test_letters_round_trip_for_known_colors() {
        for color in ColorLabel::ALL {
            assert_eq!(ColorLabel::from_letter(color.letter()), Some(color));
        }
        assert_eq!(ColorLabel::from_letter('z'), None);
    }
}
