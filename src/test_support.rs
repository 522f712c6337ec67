//! Synthetic faces shared by unit tests

use crate::vision::{ColorLabel, FaceGrid, PixelPoint};
use image::{Rgb, RgbImage};
use ColorLabel::*;

pub const SIDE: u32 = 40;
pub const PITCH: u32 = 60;
pub const ORIGIN: u32 = 20;

pub fn sticker_rgb(color: ColorLabel) -> [u8; 3] {
    match color {
        Red => [200, 30, 90],
        Orange => [255, 120, 0],
        Yellow => [230, 230, 0],
        Green => [0, 200, 60],
        Blue => [0, 60, 220],
        White => [255, 255, 255],
        Unknown => [0, 0, 0],
    }
}

/// Render a face as nine solid squares on a black background
pub fn render_face(colors: [[ColorLabel; 3]; 3]) -> RgbImage {
    let size = ORIGIN * 2 + PITCH * 2 + SIDE;
    let mut img = RgbImage::from_pixel(size, size, Rgb([0, 0, 0]));
    for (row, line) in colors.iter().enumerate() {
        for (col, color) in line.iter().enumerate() {
            let x0 = ORIGIN + col as u32 * PITCH;
            let y0 = ORIGIN + row as u32 * PITCH;
            for y in y0..y0 + SIDE {
                for x in x0..x0 + SIDE {
                    img.put_pixel(x, y, Rgb(sticker_rgb(*color)));
                }
            }
        }
    }
    img
}

/// Same frame size as [`render_face`], nothing to detect
pub fn blank_frame() -> RgbImage {
    let size = ORIGIN * 2 + PITCH * 2 + SIDE;
    RgbImage::from_pixel(size, size, Rgb([0, 0, 0]))
}

pub fn grid(colors: [[ColorLabel; 3]; 3]) -> FaceGrid {
    FaceGrid::from_colors(colors, PixelPoint::new(40, 40), 60).unwrap()
}

pub fn solid(color: ColorLabel) -> FaceGrid {
    grid([[color; 3]; 3])
}

/// Every face of a solved cube
pub fn solved_faces() -> Vec<FaceGrid> {
    vec![
        solid(Yellow),
        solid(Blue),
        solid(Red),
        solid(Green),
        solid(Orange),
        solid(White),
    ]
}

/// Front face (red center, yellow up) after a single R turn from solved
pub fn front_after_r() -> FaceGrid {
    grid([[Red, Red, White], [Red, Red, White], [Red, Red, White]])
}

/// Every face of a cube one R turn away from solved, in U L F R B D order
pub fn one_r_turn_faces() -> Vec<FaceGrid> {
    vec![
        grid([
            [Yellow, Yellow, Red],
            [Yellow, Yellow, Red],
            [Yellow, Yellow, Red],
        ]),
        solid(Blue),
        front_after_r(),
        solid(Green),
        grid([
            [Yellow, Orange, Orange],
            [Yellow, Orange, Orange],
            [Yellow, Orange, Orange],
        ]),
        grid([
            [White, White, Orange],
            [White, White, Orange],
            [White, White, Orange],
        ]),
    ]
}
