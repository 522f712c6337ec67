use crate::vision::ColorLabel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Face identity, bound by the color of its center facelet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceId {
    Up,
    Down,
    Front,
    Back,
    Left,
    Right,
}

impl FaceId {
    /// Face order of the flattened cube string
    pub const STRING_ORDER: [FaceId; 6] = [
        FaceId::Up,
        FaceId::Left,
        FaceId::Front,
        FaceId::Right,
        FaceId::Back,
        FaceId::Down,
    ];

    pub fn center_color(&self) -> ColorLabel {
        match self {
            FaceId::Up => ColorLabel::Yellow,
            FaceId::Down => ColorLabel::White,
            FaceId::Front => ColorLabel::Red,
            FaceId::Back => ColorLabel::Orange,
            FaceId::Left => ColorLabel::Blue,
            FaceId::Right => ColorLabel::Green,
        }
    }

    pub fn from_center_color(color: ColorLabel) -> Option<Self> {
        match color {
            ColorLabel::Yellow => Some(FaceId::Up),
            ColorLabel::White => Some(FaceId::Down),
            ColorLabel::Red => Some(FaceId::Front),
            ColorLabel::Orange => Some(FaceId::Back),
            ColorLabel::Blue => Some(FaceId::Left),
            ColorLabel::Green => Some(FaceId::Right),
            ColorLabel::Unknown => None,
        }
    }

    /// Move notation letter
    pub fn letter(&self) -> char {
        match self {
            FaceId::Up => 'U',
            FaceId::Down => 'D',
            FaceId::Front => 'F',
            FaceId::Back => 'B',
            FaceId::Left => 'L',
            FaceId::Right => 'R',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'U' => Some(FaceId::Up),
            'D' => Some(FaceId::Down),
            'F' => Some(FaceId::Front),
            'B' => Some(FaceId::Back),
            'L' => Some(FaceId::Left),
            'R' => Some(FaceId::Right),
            _ => None,
        }
    }

    /// Position of this face in the cube string
    pub fn string_index(&self) -> usize {
        match self {
            FaceId::Up => 0,
            FaceId::Left => 1,
            FaceId::Front => 2,
            FaceId::Right => 3,
            FaceId::Back => 4,
            FaceId::Down => 5,
        }
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaceId::Up => "up",
            FaceId::Down => "down",
            FaceId::Front => "front",
            FaceId::Back => "back",
            FaceId::Left => "left",
            FaceId::Right => "right",
        };
        f.write_str(name)
    }
}
