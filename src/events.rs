use crate::cube::{FaceId, Move};
use crate::error::EventBusError;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Events emitted during a scan-and-solve session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CubeEvent {
    /// A face was bound by its center color
    FaceScanned {
        face: FaceId,
        remaining: usize,
        timestamp: SystemTime,
    },
    /// All six faces are known
    ScanCompleted {
        cube: String,
        timestamp: SystemTime,
    },
    /// The solver answered with a move sequence (quarter turns)
    SolutionReady {
        moves: Vec<Move>,
        timestamp: SystemTime,
    },
    /// Front face is in view with the expected orientation
    CubePositioned { timestamp: SystemTime },
    /// Tracking started for the head move
    MoveArmed {
        mv: Move,
        rotate_ambiguous: bool,
        stages: usize,
    },
    /// An ambiguous Front/Back move passed an intermediate stage
    StageAdvanced { mv: Move, stage: usize },
    /// The head move was confirmed and popped
    MoveCompleted {
        mv: Move,
        remaining: usize,
        timestamp: SystemTime,
    },
    /// Every move of the solution was performed
    CubeSolved {
        moves: usize,
        timestamp: SystemTime,
    },
    /// A system error occurred in a component
    SystemError { component: String, error: String },
    /// Session shutdown requested
    ShutdownRequested {
        timestamp: SystemTime,
        reason: String,
    },
}

impl CubeEvent {
    /// Get the timestamp of the event
    pub fn timestamp(&self) -> SystemTime {
        match self {
            CubeEvent::FaceScanned { timestamp, .. } => *timestamp,
            CubeEvent::ScanCompleted { timestamp, .. } => *timestamp,
            CubeEvent::SolutionReady { timestamp, .. } => *timestamp,
            CubeEvent::CubePositioned { timestamp } => *timestamp,
            CubeEvent::MoveArmed { .. } => SystemTime::now(),
            CubeEvent::StageAdvanced { .. } => SystemTime::now(),
            CubeEvent::MoveCompleted { timestamp, .. } => *timestamp,
            CubeEvent::CubeSolved { timestamp, .. } => *timestamp,
            CubeEvent::SystemError { .. } => SystemTime::now(),
            CubeEvent::ShutdownRequested { timestamp, .. } => *timestamp,
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            CubeEvent::FaceScanned {
                face, remaining, ..
            } => format!("Face {} scanned ({} remaining)", face, remaining),
            CubeEvent::ScanCompleted { cube, .. } => format!("Scan completed: {}", cube),
            CubeEvent::SolutionReady { moves, .. } => {
                let text: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                format!("Solution ready ({} moves): {}", moves.len(), text.join(" "))
            }
            CubeEvent::CubePositioned { .. } => "Cube positioned".to_string(),
            CubeEvent::MoveArmed {
                mv,
                rotate_ambiguous,
                stages,
            } => format!(
                "Move {} armed ({} stages{})",
                mv,
                stages,
                if *rotate_ambiguous { ", ambiguous" } else { "" }
            ),
            CubeEvent::StageAdvanced { mv, stage } => {
                format!("Move {} reached stage {}", mv, stage)
            }
            CubeEvent::MoveCompleted { mv, remaining, .. } => {
                format!("Move {} completed ({} remaining)", mv, remaining)
            }
            CubeEvent::CubeSolved { moves, .. } => format!("Cube solved in {} moves", moves),
            CubeEvent::SystemError { component, error } => {
                format!("Error in {}: {}", component, error)
            }
            CubeEvent::ShutdownRequested { reason, .. } => {
                format!("Shutdown requested: {}", reason)
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            CubeEvent::FaceScanned { .. } => "face_scanned",
            CubeEvent::ScanCompleted { .. } => "scan_completed",
            CubeEvent::SolutionReady { .. } => "solution_ready",
            CubeEvent::CubePositioned { .. } => "cube_positioned",
            CubeEvent::MoveArmed { .. } => "move_armed",
            CubeEvent::StageAdvanced { .. } => "stage_advanced",
            CubeEvent::MoveCompleted { .. } => "move_completed",
            CubeEvent::CubeSolved { .. } => "cube_solved",
            CubeEvent::SystemError { .. } => "system_error",
            CubeEvent::ShutdownRequested { .. } => "shutdown_requested",
        }
    }
}

/// Broadcast channel fanning session events out to observers.
///
/// Publishing never blocks the frame loop; slow subscribers lag and lose
/// the oldest events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CubeEvent>,
    debug_logging: bool,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            debug_logging: false,
        }
    }

    /// Log every event at debug level as it is published
    pub fn with_debug_logging(capacity: usize) -> Self {
        Self {
            debug_logging: true,
            ..Self::new(capacity)
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CubeEvent> {
        self.sender.subscribe()
    }

    /// Log and broadcast an event, returning how many subscribers received it.
    /// Fails when nobody is subscribed.
    pub fn publish(&self, event: CubeEvent) -> Result<usize, EventBusError> {
        match &event {
            CubeEvent::ScanCompleted { .. }
            | CubeEvent::SolutionReady { .. }
            | CubeEvent::CubePositioned { .. }
            | CubeEvent::MoveCompleted { .. }
            | CubeEvent::CubeSolved { .. } => info!("{}", event.description()),
            CubeEvent::SystemError { component, error } => {
                error!("System error in {}: {}", component, error)
            }
            CubeEvent::ShutdownRequested { reason, .. } => {
                warn!("Shutdown requested: {}", reason)
            }
            _ if self.debug_logging => debug!("Event: {}", event.description()),
            _ => {}
        }

        self.sender
            .send(event)
            .map_err(|e| EventBusError::PublishFailed {
                details: e.to_string(),
            })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}
