pub mod alert;
pub mod orchestrator;
pub mod report;
pub mod runtime;
pub mod source;
pub mod stats;
pub mod types;

pub use alert::{AlertSink, LogAlertSink};
pub use orchestrator::{Detection, FrameOutcome, SolveSession};
pub use report::SessionReport;
pub use runtime::SessionRunner;
pub use source::{DirectoryFrameSource, FrameSource, MemoryFrameSource};
pub use stats::SessionStats;
pub use types::{Notice, SessionOutcome, SessionPhase, ShutdownReason};
