use super::report::SessionReport;
use super::stats::SessionStats;
use super::types::{Notice, SessionOutcome, SessionPhase};
use crate::config::CubecamConfig;
use crate::cube::{Move, ScanOrchestrator, SolutionQueue};
use crate::error::{CalibrationError, CubecamError, Result};
use crate::events::CubeEvent;
use crate::frame::crop_region;
use crate::overlay::{BannerAnchor, OverlayCommand, OverlayFrame};
use crate::stability::StabilityGate;
use crate::tracker::{MoveTracker, TrackerEvent};
use crate::vision::{
    ColorLabel, DetectedRegion, FaceGrid, FaceletClassifier, HsvImage, RegionDetector,
};
use chrono::{DateTime, Utc};
use image::RgbImage;
use std::time::SystemTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const POSITION_PROMPT: [&str; 2] = [
    "POSITION THE RED CENTRE TOWARDS THE CAMERA AND",
    "VERIFY THE YELLOW CENTRE IS FACING UPWARD",
];

/// What the detector made of one frame
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Fewer or more than nine facelet regions
    Partial,
    /// Nine regions, all classified
    Face(FaceGrid),
    /// Nine regions, but at least one could not be classified
    Unreadable(CalibrationError),
}

/// Result of feeding one frame to the session
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    pub overlay: OverlayFrame,
    pub events: Vec<CubeEvent>,
    /// Complete cube string, present on the frame that finished scanning
    pub solve_request: Option<String>,
}

/// Frame-driven session state: scanning, positioning and move coaching.
///
/// The solver call is not made here; a frame that completes the scan
/// returns a `solve_request` and the caller answers with
/// [`SolveSession::install_solution`].
pub struct SolveSession {
    config: CubecamConfig,
    detector: RegionDetector,
    classifier: FaceletClassifier,
    gate: StabilityGate,
    scan: ScanOrchestrator,
    tracker: MoveTracker,
    queue: SolutionQueue,
    phase: SessionPhase,
    notice: Option<Notice>,
    cube_string: Option<String>,
    solution: Vec<Move>,
    calibration_failures: u32,
    stats: SessionStats,
}

impl SolveSession {
    pub fn new(config: CubecamConfig) -> Self {
        Self {
            detector: RegionDetector::new(config.detection.clone(), config.colors.clone()),
            classifier: FaceletClassifier::new(config.colors.clone()),
            gate: StabilityGate::new(config.stability),
            scan: ScanOrchestrator::new(),
            tracker: MoveTracker::new(config.tracker.back_staging),
            queue: SolutionQueue::new(Vec::new()),
            phase: SessionPhase::Scanning,
            notice: None,
            cube_string: None,
            solution: Vec::new(),
            calibration_failures: 0,
            stats: SessionStats::default(),
            config,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn scan(&self) -> &ScanOrchestrator {
        &self.scan
    }

    pub fn queue(&self) -> &SolutionQueue {
        &self.queue
    }

    pub fn gate(&self) -> &StabilityGate {
        &self.gate
    }

    pub fn cube_string(&self) -> Option<&str> {
        self.cube_string.as_deref()
    }

    pub fn config(&self) -> &CubecamConfig {
        &self.config
    }

    /// Solved and the final notice has been shown
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Solved && self.notice.is_none()
    }

    /// Crop, detect and classify a full camera frame, then advance the session
    pub fn process_image(&mut self, frame_id: u64, image: &RgbImage) -> Result<FrameOutcome> {
        let (view, origin) = match self.config.camera.active_crop() {
            Some(crop) => (crop_region(image, crop)?, (crop.x as i32, crop.y as i32)),
            None => (image.clone(), (0, 0)),
        };

        let hsv = HsvImage::from_rgb(&view);
        let regions = self.detector.detect(&hsv);
        let detection = self.classify(&regions, &hsv);

        let mut overlay = OverlayFrame::new(frame_id, origin);
        if self.config.overlay.draw_regions {
            for region in &regions {
                overlay.push(OverlayCommand::Outline {
                    corners: region.corners,
                });
            }
        }

        self.observe(detection, overlay)
    }

    fn classify(&self, regions: &[DetectedRegion], hsv: &HsvImage) -> Detection {
        if regions.len() != 9 {
            return Detection::Partial;
        }
        match self.classifier.classify(regions, hsv) {
            Ok(grid) => Detection::Face(grid),
            Err(e) => Detection::Unreadable(e),
        }
    }

    /// Advance the session by one frame's detection result.
    ///
    /// Fails only when facelets stay unclassifiable for
    /// `detection.max_calibration_failures` consecutive nine-region frames.
    pub fn observe(&mut self, detection: Detection, overlay: OverlayFrame) -> Result<FrameOutcome> {
        let mut outcome = FrameOutcome {
            overlay,
            ..FrameOutcome::default()
        };

        let grid = match detection {
            Detection::Partial => {
                self.stats.record_frame(false);
                self.gate.observe(false);
                None
            }
            Detection::Face(grid) => {
                self.stats.record_frame(true);
                self.gate.observe(true);
                self.calibration_failures = 0;
                Some(grid)
            }
            Detection::Unreadable(e) => {
                self.stats.record_frame(true);
                self.stats.record_calibration_failure();
                self.gate.reset();
                self.calibration_failures += 1;
                debug!(
                    "Unreadable face ({} in a row): {}",
                    self.calibration_failures, e
                );
                if self.calibration_failures >= self.config.detection.max_calibration_failures {
                    warn!("Facelet colors keep falling outside every calibrated band");
                    return Err(CalibrationError::Persistent {
                        frames: self.calibration_failures,
                    }
                    .into());
                }
                None
            }
        };

        match self.phase {
            SessionPhase::Scanning => self.scan_step(grid.as_ref(), &mut outcome)?,
            SessionPhase::Solving | SessionPhase::Solved => {}
            SessionPhase::Positioning => self.position_step(grid.as_ref(), &mut outcome),
            SessionPhase::ReadyCountdown => {
                if self.notice.is_none() {
                    info!("Tracking {} moves", self.queue.len());
                    self.tracker.reset();
                    self.phase = SessionPhase::Tracking;
                }
            }
            SessionPhase::Tracking => self.track_step(grid.as_ref(), &mut outcome),
        }

        self.draw_notice(&mut outcome.overlay);
        Ok(outcome)
    }

    fn scan_step(&mut self, grid: Option<&FaceGrid>, outcome: &mut FrameOutcome) -> Result<()> {
        let grid = match grid {
            Some(grid) if self.gate.at_scan() => grid,
            _ => return Ok(()),
        };

        let face = match self.scan.observe(grid) {
            Some(face) => face,
            None => return Ok(()),
        };

        self.stats.record_face_scanned();
        let color = face.center_color();
        let remaining = 6 - self.scan.scanned_count();
        outcome.events.push(CubeEvent::FaceScanned {
            face,
            remaining,
            timestamp: SystemTime::now(),
        });
        self.notice = Some(Notice::centered(
            format!("{} READY!", color.to_string().to_uppercase()),
            color,
            1.5,
            self.config.overlay.notice_frames,
        ));

        if self.scan.is_complete() {
            let cube = self.scan.to_cube_string()?;
            info!("Scan complete: {}", cube);
            outcome.events.push(CubeEvent::ScanCompleted {
                cube: cube.clone(),
                timestamp: SystemTime::now(),
            });
            self.cube_string = Some(cube.clone());
            outcome.solve_request = Some(cube);
            self.phase = SessionPhase::Solving;
        }
        Ok(())
    }

    /// Accept the solver's quarter turns. An empty solution means the cube
    /// was already solved.
    pub fn install_solution(&mut self, moves: Vec<Move>) -> Result<Vec<CubeEvent>> {
        if self.phase != SessionPhase::Solving {
            return Err(CubecamError::component(
                "session",
                format!("solution received while {:?}", self.phase),
            ));
        }

        let mut events = vec![CubeEvent::SolutionReady {
            moves: moves.clone(),
            timestamp: SystemTime::now(),
        }];

        self.solution = moves.clone();
        self.queue = SolutionQueue::new(moves);
        self.tracker.reset();
        self.gate.reset();

        if self.queue.is_empty() {
            info!("Cube already solved");
            events.push(self.finish());
        } else {
            info!("Waiting for the cube to be positioned");
            self.phase = SessionPhase::Positioning;
        }
        Ok(events)
    }

    fn position_step(&mut self, grid: Option<&FaceGrid>, outcome: &mut FrameOutcome) {
        for (line, text) in POSITION_PROMPT.iter().enumerate() {
            outcome
                .overlay
                .banner(*text, ColorLabel::Red, BannerAnchor::Line(line as u32), 1.0);
        }

        let grid = match grid {
            Some(grid) if self.gate.at_position() => grid,
            _ => return,
        };

        if grid.center_color() != ColorLabel::Red {
            debug!("Positioning: {} center facing the camera", grid.center_color());
            return;
        }

        info!("Cube positioned");
        outcome.events.push(CubeEvent::CubePositioned {
            timestamp: SystemTime::now(),
        });
        self.notice = Some(Notice::centered(
            "READY?",
            ColorLabel::Red,
            2.0,
            self.config.overlay.ready_frames,
        ));
        self.phase = SessionPhase::ReadyCountdown;
    }

    fn track_step(&mut self, grid: Option<&FaceGrid>, outcome: &mut FrameOutcome) {
        let output = self.tracker.step(grid, &self.gate, &mut self.queue);

        for cue in output.cues {
            outcome.overlay.push(OverlayCommand::Arrow {
                from: cue.from,
                to: cue.to,
                color: ColorLabel::Green,
            });
        }

        match output.event {
            Some(TrackerEvent::Armed {
                mv,
                rotate_ambiguous,
                stages,
            }) => outcome.events.push(CubeEvent::MoveArmed {
                mv,
                rotate_ambiguous,
                stages,
            }),
            Some(TrackerEvent::StageAdvanced { mv, stage }) => {
                outcome.events.push(CubeEvent::StageAdvanced { mv, stage })
            }
            Some(TrackerEvent::Completed { mv, remaining }) => {
                self.stats.record_move_completed();
                outcome.events.push(CubeEvent::MoveCompleted {
                    mv,
                    remaining,
                    timestamp: SystemTime::now(),
                });
                if self.queue.is_empty() {
                    let solved = self.finish();
                    outcome.events.push(solved);
                }
            }
            None => {}
        }
    }

    fn finish(&mut self) -> CubeEvent {
        info!("Cube solved after {} moves", self.queue.completed());
        self.phase = SessionPhase::Solved;
        self.notice = Some(Notice::centered(
            "CUBE SOLVED!",
            ColorLabel::Unknown,
            1.5,
            self.config.overlay.solved_frames,
        ));
        CubeEvent::CubeSolved {
            moves: self.queue.completed(),
            timestamp: SystemTime::now(),
        }
    }

    fn draw_notice(&mut self, overlay: &mut OverlayFrame) {
        let expired = match self.notice.as_mut() {
            Some(notice) => {
                overlay.banner(notice.text.clone(), notice.color, notice.anchor, notice.scale);
                notice.frames_left = notice.frames_left.saturating_sub(1);
                notice.frames_left == 0
            }
            None => false,
        };
        if expired {
            self.notice = None;
        }
    }

    pub fn report(
        &self,
        session_id: Uuid,
        started_at: DateTime<Utc>,
        outcome: SessionOutcome,
    ) -> SessionReport {
        SessionReport {
            session_id,
            started_at,
            finished_at: Utc::now(),
            frames_processed: self.stats.frames_processed,
            faces_scanned: self.stats.faces_scanned,
            cube_string: self.cube_string.clone(),
            solution: self.solution.iter().map(|m| m.to_string()).collect(),
            moves_completed: self.stats.moves_completed,
            outcome,
        }
    }
}
