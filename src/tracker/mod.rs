pub mod machine;
pub mod profile;
pub mod progress;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

pub use machine::{MoveTracker, TrackerEvent, TrackerOutput};
pub use profile::{CueLine, StagePlan};
pub use progress::MoveProgress;

/// When a Back move uses the three-stage whole-cube protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagingMode {
    /// Only when the face pattern is symmetric under a quarter turn
    #[default]
    Gated,
    /// For every Back move
    Always,
}
