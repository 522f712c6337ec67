pub mod config;
pub mod cube;
pub mod error;
pub mod events;
pub mod frame;
pub mod overlay;
pub mod session;
pub mod solver;
pub mod stability;
pub mod tracker;
pub mod vision;

#[cfg(test)]
mod test_support;

pub use config::CubecamConfig;
pub use cube::{FaceId, Move, ScanOrchestrator, SolutionQueue};
pub use error::{CubecamError, Result};
pub use events::{CubeEvent, EventBus};
pub use frame::{FrameData, FrameFormat};
pub use overlay::{ImageDirectorySink, NullOverlaySink, OverlayFrame, OverlayRenderer, OverlaySink};
pub use session::{
    DirectoryFrameSource, FrameSource, MemoryFrameSource, SessionOutcome, SessionReport,
    SessionRunner, SolveSession,
};
pub use solver::{CubeSolver, SolverGateway};
pub use stability::StabilityGate;
pub use tracker::{MoveTracker, StagingMode};
pub use vision::{ColorBands, ColorLabel, FaceGrid, FaceletClassifier, RegionDetector};
