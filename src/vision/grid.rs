use super::color::ColorLabel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel coordinate inside the (cropped) frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One classified sticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facelet {
    pub color: ColorLabel,
    pub center: PixelPoint,
}

/// A grid cell address, `[row][col]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Portion of a face grid compared across frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subset {
    Row(usize),
    Column(usize),
    Full,
}

impl Subset {
    pub fn cells(&self) -> Vec<Cell> {
        match *self {
            Subset::Row(row) => (0..3).map(|col| Cell::new(row, col)).collect(),
            Subset::Column(col) => (0..3).map(|row| Cell::new(row, col)).collect(),
            Subset::Full => (0..3)
                .flat_map(|row| (0..3).map(move |col| Cell::new(row, col)))
                .collect(),
        }
    }
}

/// Colors of a grid subset captured at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    subset: Subset,
    colors: Vec<ColorLabel>,
}

impl Snapshot {
    pub fn subset(&self) -> Subset {
        self.subset
    }

    pub fn colors(&self) -> &[ColorLabel] {
        &self.colors
    }
}

/// Geometrically ordered 3x3 face, `facelets[row][col]`.
/// Construction through the classifier guarantees no facelet is `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFaceGrid")]
pub struct FaceGrid {
    facelets: [[Facelet; 3]; 3],
}

#[derive(Deserialize)]
struct RawFaceGrid {
    facelets: [[Facelet; 3]; 3],
}

impl TryFrom<RawFaceGrid> for FaceGrid {
    type Error = String;

    fn try_from(raw: RawFaceGrid) -> Result<Self, Self::Error> {
        FaceGrid::new(raw.facelets)
            .ok_or_else(|| "face grid contains an unknown facelet".to_string())
    }
}

impl FaceGrid {
    /// Build a grid, rejecting any unknown facelet
    pub fn new(facelets: [[Facelet; 3]; 3]) -> Option<Self> {
        if facelets.iter().flatten().all(|f| f.color.is_known()) {
            Some(Self { facelets })
        } else {
            None
        }
    }

    /// Every facelet has already been checked against the bands
    pub(crate) fn from_classified(facelets: [[Facelet; 3]; 3]) -> Self {
        debug_assert!(facelets.iter().flatten().all(|f| f.color.is_known()));
        Self { facelets }
    }

    /// Build a grid from colors alone, laying centers out on a regular lattice.
    /// Used for synthetic faces and tests.
    pub fn from_colors(colors: [[ColorLabel; 3]; 3], origin: PixelPoint, pitch: i32) -> Option<Self> {
        let mut facelets = [[Facelet {
            color: ColorLabel::Unknown,
            center: origin,
        }; 3]; 3];
        for (row, line) in colors.iter().enumerate() {
            for (col, color) in line.iter().enumerate() {
                facelets[row][col] = Facelet {
                    color: *color,
                    center: PixelPoint::new(
                        origin.x + col as i32 * pitch,
                        origin.y + row as i32 * pitch,
                    ),
                };
            }
        }
        Self::new(facelets)
    }

    pub fn facelet(&self, cell: Cell) -> &Facelet {
        &self.facelets[cell.row][cell.col]
    }

    pub fn color(&self, row: usize, col: usize) -> ColorLabel {
        self.facelets[row][col].color
    }

    pub fn center_point(&self, cell: Cell) -> PixelPoint {
        self.facelets[cell.row][cell.col].center
    }

    /// Color of the middle facelet, which identifies the face
    pub fn center_color(&self) -> ColorLabel {
        self.facelets[1][1].color
    }

    pub fn colors(&self) -> [[ColorLabel; 3]; 3] {
        let mut colors = [[ColorLabel::Unknown; 3]; 3];
        for (row, line) in self.facelets.iter().enumerate() {
            for (col, facelet) in line.iter().enumerate() {
                colors[row][col] = facelet.color;
            }
        }
        colors
    }

    /// Color pattern rotated a quarter turn clockwise
    pub fn rotated_colors_clockwise(&self) -> [[ColorLabel; 3]; 3] {
        let colors = self.colors();
        let mut rotated = [[ColorLabel::Unknown; 3]; 3];
        for (row, line) in rotated.iter_mut().enumerate() {
            for (col, slot) in line.iter_mut().enumerate() {
                *slot = colors[2 - col][row];
            }
        }
        rotated
    }

    /// True when a quarter turn leaves the color pattern unchanged
    pub fn is_rotationally_symmetric(&self) -> bool {
        self.colors() == self.rotated_colors_clockwise()
    }

    pub fn snapshot(&self, subset: Subset) -> Snapshot {
        Snapshot {
            subset,
            colors: subset
                .cells()
                .into_iter()
                .map(|cell| self.facelet(cell).color)
                .collect(),
        }
    }

    /// Row-major color letters, as used in the cube string
    pub fn letters(&self) -> String {
        self.facelets
            .iter()
            .flatten()
            .map(|f| f.color.letter())
            .collect()
    }
}

impl fmt::Display for FaceGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = self.letters();
        write!(f, "{}/{}/{}", &letters[0..3], &letters[3..6], &letters[6..9])
    }
}
