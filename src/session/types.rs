use crate::overlay::BannerAnchor;
use crate::vision::ColorLabel;
use serde::{Deserialize, Serialize};

/// Session lifecycle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Collecting the six faces
    Scanning,
    /// Cube string handed to the solver, waiting for moves
    Solving,
    /// Waiting for the red center to face the camera
    Positioning,
    /// "READY?" shown before tracking starts
    ReadyCountdown,
    /// Coaching the solution move by move
    Tracking,
    /// Every move confirmed
    Solved,
}

/// Session shutdown reason
#[derive(Debug, Clone, PartialEq)]
pub enum ShutdownReason {
    Signal(String),
    EndOfStream,
    Solved,
    Error(String),
}

/// Final result recorded in the session report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    Solved,
    /// Frames ran out before the cube was solved
    Incomplete,
    Interrupted,
    Failed { reason: String },
}

/// Banner shown for a fixed number of frames
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub color: ColorLabel,
    pub anchor: BannerAnchor,
    pub scale: f32,
    pub frames_left: u32,
}

impl Notice {
    pub fn centered(text: impl Into<String>, color: ColorLabel, scale: f32, frames: u32) -> Self {
        Self {
            text: text.into(),
            color,
            anchor: BannerAnchor::Center,
            scale,
            frames_left: frames,
        }
    }
}
