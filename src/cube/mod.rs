pub mod face;
pub mod moves;
pub mod scan;


pub use face::FaceId;
pub use moves::{Move, SolutionQueue};
pub use scan::ScanOrchestrator;
