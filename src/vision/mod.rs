pub mod classifier;
pub mod color;
pub mod detector;
pub mod grid;
pub mod region;


pub use classifier::FaceletClassifier;
pub use color::{rgb_to_hsv, ColorBands, ColorLabel, HsvImage, HsvRange};
pub use detector::RegionDetector;
pub use grid::{Cell, FaceGrid, Facelet, PixelPoint, Snapshot, Subset};
pub use region::DetectedRegion;
