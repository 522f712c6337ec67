pub mod render;
pub mod sink;

use crate::vision::{ColorLabel, PixelPoint};

pub use render::OverlayRenderer;
pub use sink::{ImageDirectorySink, NullOverlaySink, OverlaySink};

/// Where a banner is placed on the full frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerAnchor {
    /// Centered in the frame
    Center,
    /// Horizontally centered text line counted from the top
    Line(u32),
}

/// Drawing primitive, independent of any rendering backend
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    /// Outline of a detected facelet region (crop coordinates)
    Outline { corners: [PixelPoint; 4] },
    /// Guidance arrow between facelet centers (crop coordinates)
    Arrow {
        from: PixelPoint,
        to: PixelPoint,
        color: ColorLabel,
    },
    /// Notice or prompt text (frame coordinates)
    Banner {
        text: String,
        color: ColorLabel,
        anchor: BannerAnchor,
        scale: f32,
    },
}

/// Everything to draw on one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayFrame {
    pub frame_id: u64,
    /// Top-left corner of the detection crop inside the full frame
    pub crop_origin: (i32, i32),
    pub commands: Vec<OverlayCommand>,
}

impl OverlayFrame {
    pub fn new(frame_id: u64, crop_origin: (i32, i32)) -> Self {
        Self {
            frame_id,
            crop_origin,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: OverlayCommand) {
        self.commands.push(command);
    }

    pub fn banner(&mut self, text: impl Into<String>, color: ColorLabel, anchor: BannerAnchor, scale: f32) {
        self.push(OverlayCommand::Banner {
            text: text.into(),
            color,
            anchor,
            scale,
        });
    }

    pub fn arrows(&self) -> impl Iterator<Item = (&PixelPoint, &PixelPoint)> {
        self.commands.iter().filter_map(|c| match c {
            OverlayCommand::Arrow { from, to, .. } => Some((from, to)),
            _ => None,
        })
    }

    pub fn banners(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            OverlayCommand::Banner { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
