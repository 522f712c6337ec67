use crate::cube::FaceId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CubecamError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Event bus error: {0}")]
    EventBus(#[from] EventBusError),

    #[error("System error: {message}")]
    System { message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

impl CubecamError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn component(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Errors that end the scan-and-solve session and must be shown to the user
    pub fn is_fatal_for_session(&self) -> bool {
        matches!(
            self,
            CubecamError::Calibration(CalibrationError::Persistent { .. })
                | CubecamError::Solver(_)
        )
    }
}

/// Facelet classification failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("expected 9 facelet regions, got {found}")]
    RegionCount { found: usize },

    #[error("facelet at ({x}, {y}) has unclassifiable color (hsv {hsv:?})")]
    UnknownColor { x: i32, y: i32, hsv: [u8; 3] },

    #[error("facelet center ({x}, {y}) lies outside the {width}x{height} frame")]
    OutOfFrame {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("classification failed for {frames} consecutive stable frames, color calibration is required")]
    Persistent { frames: u32 },
}

/// Solving collaborator failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("invalid cube string: {reason}")]
    InvalidCubeString { reason: String },

    #[error("unknown move token '{token}'")]
    UnknownMove { token: String },

    #[error("no solution exists for this configuration: {details}")]
    Unsolvable { details: String },

    #[error("solver did not answer within {millis} ms")]
    Timeout { millis: u64 },

    #[error("failed to launch solver '{command}': {details}")]
    Launch { command: String, details: String },

    #[error("no solver configured: {details}")]
    NotConfigured { details: String },
}

/// Cube scan assembly failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("cube scan incomplete, missing faces: {missing:?}")]
    Incomplete { missing: Vec<FaceId> },
}

/// Frame source failures
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("failed to decode frame {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("frame data size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("frame processing failed: {details}")]
    Processing { details: String },

    #[error("frame directory '{path}' not found")]
    MissingDirectory { path: String },
}

/// Event bus failures
#[derive(Error, Debug)]
pub enum EventBusError {
    #[error("failed to publish event: {details}")]
    PublishFailed { details: String },
}

pub type Result<T> = std::result::Result<T, CubecamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_fatal_errors() {
        let persistent: CubecamError = CalibrationError::Persistent { frames: 30 }.into();
        assert!(persistent.is_fatal_for_session());

        let single: CubecamError = CalibrationError::RegionCount { found: 7 }.into();
        assert!(!single.is_fatal_for_session());

        let solver: CubecamError = SolverError::Timeout { millis: 5000 }.into();
        assert!(solver.is_fatal_for_session());
        assert!(!CubecamError::system("boom").is_fatal_for_session());
    }

    #[test]
    fn test_scan_error_lists_missing_faces() {
        let error = ScanError::Incomplete {
            missing: vec![FaceId::Up, FaceId::Back],
        };
        let text = error.to_string();
        assert!(text.contains("Up"), "{}", text);
        assert!(text.contains("Back"), "{}", text);
    }
}
