use crate::solver::CubeNotation;
use crate::tracker::StagingMode;
use crate::vision::ColorBands;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CubecamConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub colors: ColorBands,
    #[serde(default)]
    pub stability: StabilityConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Directory holding recorded frames (png, jpg, bmp), read in file name order
    #[serde(default = "default_frames_dir")]
    pub frames_dir: String,

    /// Playback rate for recorded frames, 0 replays as fast as possible
    #[serde(default = "default_camera_fps")]
    pub fps: u32,

    /// Region of interest applied to every frame before detection
    #[serde(default = "default_crop")]
    pub crop: CropRect,

    /// Detect on the whole frame when false
    #[serde(default = "default_crop_enabled")]
    pub crop_enabled: bool,
}

impl CameraConfig {
    /// The crop to apply, if cropping is enabled
    pub fn active_crop(&self) -> Option<&CropRect> {
        self.crop_enabled.then_some(&self.crop)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DetectionConfig {
    /// Smallest accepted facelet contour area in pixels
    #[serde(default = "default_min_area")]
    pub min_area: f64,

    /// Largest accepted facelet contour area in pixels
    #[serde(default = "default_max_area")]
    pub max_area: f64,

    /// Polygon approximation tolerance as a fraction of the contour perimeter
    #[serde(default = "default_epsilon_factor")]
    pub epsilon_factor: f64,

    /// Morphological opening radius applied to the color mask (0 disables smoothing)
    #[serde(default = "default_smoothing_radius")]
    pub smoothing_radius: u32,

    /// Consecutive stable frames with unclassifiable facelets before giving up
    #[serde(default = "default_max_calibration_failures")]
    pub max_calibration_failures: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct StabilityConfig {
    /// Stable frames before the "before" snapshot of a move is taken
    #[serde(default = "default_arm_frames")]
    pub arm: u32,

    /// Stable frames after which guidance is drawn and the comparison snapshot refreshed
    #[serde(default = "default_guide_frames")]
    pub guide: u32,

    /// Stable frames before a move is judged complete
    #[serde(default = "default_confirm_frames")]
    pub confirm: u32,

    /// Stable frames before a face is captured during scanning
    #[serde(default = "default_scan_frames")]
    pub scan: u32,

    /// Stable frames before the cube position check runs
    #[serde(default = "default_position_frames")]
    pub position: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Whether Back moves use the ambiguity check or always take the staged path
    #[serde(default)]
    pub back_staging: StagingMode,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SolverConfig {
    /// External solver executable, receives the cube string as its last argument
    pub command: Option<String>,

    /// Extra arguments passed before the cube string
    #[serde(default)]
    pub args: Vec<String>,

    /// Cube string notation expected by the solver
    #[serde(default)]
    pub notation: CubeNotation,

    /// Seconds to wait for the solver before giving up
    #[serde(default = "default_solver_timeout")]
    pub timeout_seconds: u64,

    /// Fixed move list used instead of an external solver
    pub moves: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OverlayConfig {
    /// Directory where annotated frames are written (disabled when unset)
    pub output_dir: Option<String>,

    /// Path to TrueType font file for banner text
    #[serde(default = "default_font_path")]
    pub font_path: String,

    /// Font size for banner text
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Cue arrow line thickness in pixels
    #[serde(default = "default_arrow_thickness")]
    pub arrow_thickness: u32,

    /// Outline detected facelet regions
    #[serde(default = "default_draw_regions")]
    pub draw_regions: bool,

    /// Frames a "face ready" notice stays on screen
    #[serde(default = "default_notice_frames")]
    pub notice_frames: u32,

    /// Frames the "READY?" notice stays on screen before tracking starts
    #[serde(default = "default_ready_frames")]
    pub ready_frames: u32,

    /// Frames the "CUBE SOLVED!" notice stays on screen before the session ends
    #[serde(default = "default_solved_frames")]
    pub solved_frames: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

impl CubecamConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("cubecam.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            // Start with default values
            .set_default("camera.frames_dir", default_frames_dir())?
            .set_default("camera.fps", default_camera_fps())?
            .set_default("camera.crop_enabled", default_crop_enabled())?
            .set_default("detection.min_area", default_min_area())?
            .set_default("detection.max_area", default_max_area())?
            .set_default("detection.epsilon_factor", default_epsilon_factor())?
            .set_default("detection.smoothing_radius", default_smoothing_radius())?
            .set_default(
                "detection.max_calibration_failures",
                default_max_calibration_failures(),
            )?
            .set_default("stability.arm", default_arm_frames())?
            .set_default("stability.guide", default_guide_frames())?
            .set_default("stability.confirm", default_confirm_frames())?
            .set_default("stability.scan", default_scan_frames())?
            .set_default("stability.position", default_position_frames())?
            .set_default("solver.timeout_seconds", default_solver_timeout())?
            .set_default("overlay.font_path", default_font_path())?
            .set_default("overlay.font_size", default_font_size() as f64)?
            .set_default("overlay.arrow_thickness", default_arrow_thickness())?
            .set_default("overlay.draw_regions", default_draw_regions())?
            .set_default("overlay.notice_frames", default_notice_frames())?
            .set_default("overlay.ready_frames", default_ready_frames())?
            .set_default("overlay.solved_frames", default_solved_frames())?
            .set_default(
                "system.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables with CUBECAM_ prefix, e.g. CUBECAM_STABILITY__CONFIRM
            .add_source(
                Environment::with_prefix("CUBECAM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: CubecamConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Serialize the configuration as TOML
    pub fn to_toml(&self) -> crate::error::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(crop) = self.camera.active_crop() {
            if crop.width == 0 || crop.height == 0 {
                return Err(ConfigError::Message(
                    "Camera crop width and height must be greater than 0".to_string(),
                ));
            }
        }

        // Validate detection settings
        if self.detection.min_area <= 0.0 || self.detection.min_area >= self.detection.max_area {
            return Err(ConfigError::Message(format!(
                "Detection area band is invalid: min {} must be positive and below max {}",
                self.detection.min_area, self.detection.max_area
            )));
        }

        if !(0.0..1.0).contains(&self.detection.epsilon_factor) || self.detection.epsilon_factor == 0.0
        {
            return Err(ConfigError::Message(
                "Detection epsilon_factor must be within (0, 1)".to_string(),
            ));
        }

        if self.detection.max_calibration_failures == 0 {
            return Err(ConfigError::Message(
                "Detection max_calibration_failures must be greater than 0".to_string(),
            ));
        }

        // Validate color bands
        for (name, range) in self.colors.named_ranges() {
            if !range.is_well_formed() {
                return Err(ConfigError::Message(format!(
                    "Color band '{}' has a lower bound above its upper bound: {:?}",
                    name, range
                )));
            }
        }

        if self.colors.white.is_empty() {
            return Err(ConfigError::Message(
                "At least one white color band is required".to_string(),
            ));
        }

        if let Some((name, band)) = self.colors.shadowed_whites().first() {
            return Err(ConfigError::Message(format!(
                "Color band '{}' {:?} covers neutral pixels of a white band and would read white stickers as {}",
                name, band, name
            )));
        }

        for (a, b) in self.colors.overlapping_pairs() {
            warn!("Color bands '{}' and '{}' overlap; '{}' wins", a, b, a);
        }

        // Validate stability thresholds
        let s = &self.stability;
        if s.arm == 0 {
            return Err(ConfigError::Message(
                "Stability arm threshold must be greater than 0".to_string(),
            ));
        }

        if s.arm > s.guide || s.guide >= s.confirm {
            return Err(ConfigError::Message(format!(
                "Stability thresholds must satisfy arm <= guide < confirm (got {} / {} / {})",
                s.arm, s.guide, s.confirm
            )));
        }

        if s.scan == 0 || s.position == 0 {
            return Err(ConfigError::Message(
                "Stability scan and position thresholds must be greater than 0".to_string(),
            ));
        }

        // Validate solver settings
        if self.solver.command.is_none() && self.solver.moves.is_none() {
            debug!("No solver command or fixed moves configured yet");
        }

        if self.solver.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Solver timeout_seconds must be greater than 0".to_string(),
            ));
        }

        // Validate overlay settings
        if self.overlay.font_size <= 0.0 {
            return Err(ConfigError::Message(
                "Overlay font_size must be greater than 0".to_string(),
            ));
        }

        if self.overlay.arrow_thickness == 0 {
            return Err(ConfigError::Message(
                "Overlay arrow_thickness must be greater than 0".to_string(),
            ));
        }

        // Validate system settings
        if self.system.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            frames_dir: default_frames_dir(),
            fps: default_camera_fps(),
            crop: default_crop(),
            crop_enabled: default_crop_enabled(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_area: default_min_area(),
            max_area: default_max_area(),
            epsilon_factor: default_epsilon_factor(),
            smoothing_radius: default_smoothing_radius(),
            max_calibration_failures: default_max_calibration_failures(),
        }
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            arm: default_arm_frames(),
            guide: default_guide_frames(),
            confirm: default_confirm_frames(),
            scan: default_scan_frames(),
            position: default_position_frames(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            back_staging: StagingMode::Gated,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            notation: CubeNotation::default(),
            timeout_seconds: default_solver_timeout(),
            moves: None,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            font_path: default_font_path(),
            font_size: default_font_size(),
            arrow_thickness: default_arrow_thickness(),
            draw_regions: default_draw_regions(),
            notice_frames: default_notice_frames(),
            ready_frames: default_ready_frames(),
            solved_frames: default_solved_frames(),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            event_bus_capacity: default_event_bus_capacity(),
        }
    }
}

// Default value functions
fn default_frames_dir() -> String {
    "./frames".to_string()
}
fn default_camera_fps() -> u32 {
    30
}
fn default_crop() -> CropRect {
    CropRect {
        x: 150,
        y: 100,
        width: 350,
        height: 250,
    }
}
fn default_crop_enabled() -> bool {
    true
}

fn default_min_area() -> f64 {
    1117.0
}
fn default_max_area() -> f64 {
    2441.0
}
fn default_epsilon_factor() -> f64 {
    0.11
}
fn default_smoothing_radius() -> u32 {
    0
}
fn default_max_calibration_failures() -> u32 {
    30
}

fn default_arm_frames() -> u32 {
    5
}
fn default_guide_frames() -> u32 {
    10
}
fn default_confirm_frames() -> u32 {
    40
}
fn default_scan_frames() -> u32 {
    25
}
fn default_position_frames() -> u32 {
    20
}

fn default_solver_timeout() -> u64 {
    30
}

fn default_font_path() -> String {
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string()
}
fn default_font_size() -> f32 {
    28.0
}
fn default_arrow_thickness() -> u32 {
    5
}
fn default_draw_regions() -> bool {
    true
}
fn default_notice_frames() -> u32 {
    50
}
fn default_ready_frames() -> u32 {
    100
}
fn default_solved_frames() -> u32 {
    200
}

fn default_event_bus_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::HsvRange;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CubecamConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stability.confirm, 40);
        assert_eq!(config.stability.scan, 25);
        assert_eq!(config.detection.min_area, 1117.0);
        assert_eq!(config.colors.white.len(), 2);
    }

    #[test]
    fn test_config_validation() {
        let mut config = CubecamConfig::default();

        // Guide must come before confirm
        config.stability.guide = 40;
        assert!(config.validate().is_err());

        config.stability.guide = 10;
        assert!(config.validate().is_ok());

        config.detection.min_area = 3000.0;
        assert!(config.validate().is_err());

        config.detection.min_area = 1117.0;
        config.colors.red = HsvRange::new([178, 60, 126], [146, 255, 255]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_band_that_swallows_white() {
        let mut config = CubecamConfig::default();
        config.colors.orange = HsvRange::new([0, 0, 228], [28, 255, 255]);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("orange"), "{}", err);

        config.colors.orange = HsvRange::new([0, 22, 228], [27, 255, 255]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_crop_can_be_disabled_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[camera]
crop_enabled = false
"#
        )
        .unwrap();

        let config = CubecamConfig::load_from_file(file.path()).unwrap();
        assert!(!config.camera.crop_enabled);
        assert_eq!(config.camera.active_crop(), None);
        assert!(config.validate().is_ok());

        let defaults = CubecamConfig::default();
        assert_eq!(defaults.camera.active_crop(), Some(&default_crop()));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[stability]
confirm = 60

[solver]
moves = ["R'", "U2"]

[colors.red]
lower = [150, 70, 120]
upper = [179, 255, 255]
"#
        )
        .unwrap();

        let config = CubecamConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.stability.confirm, 60);
        assert_eq!(config.stability.guide, 10);
        assert_eq!(
            config.solver.moves,
            Some(vec!["R'".to_string(), "U2".to_string()])
        );
        assert_eq!(config.colors.red.lower, [150, 70, 120]);
        assert_eq!(config.colors.blue, ColorBands::default().blue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = CubecamConfig::load_from_file("/nonexistent/cubecam.toml").unwrap();
        assert_eq!(config.stability.arm, default_arm_frames());
        assert_eq!(config.overlay.notice_frames, 50);
    }

    #[test]
    fn test_default_config_serializes_to_toml() {
        let toml = CubecamConfig::default().to_toml().unwrap();
        assert!(toml.contains("[stability]"));
        assert!(toml.contains("confirm = 40"));
    }
}
