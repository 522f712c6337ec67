use super::alert::{AlertSink, LogAlertSink, CALIBRATION_ALERT, UNSOLVABLE_ALERT};
use super::orchestrator::SolveSession;
use super::report::SessionReport;
use super::source::FrameSource;
use super::types::{SessionOutcome, SessionPhase, ShutdownReason};
use crate::error::{CubecamError, Result, SolverError};
use crate::events::{CubeEvent, EventBus};
use crate::overlay::{NullOverlaySink, OverlaySink};
use crate::solver::SolverGateway;
use chrono::Utc;
use std::sync::Arc;
use std::time::SystemTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const ALERT_TITLE: &str = "Error";

/// Drives a [`SolveSession`] from a frame source until the cube is solved,
/// the frames run out, a fatal error occurs or the session is cancelled
pub struct SessionRunner {
    session: SolveSession,
    solver: SolverGateway,
    source: Box<dyn FrameSource>,
    sink: Box<dyn OverlaySink>,
    alerts: Box<dyn AlertSink>,
    event_bus: Arc<EventBus>,
    cancel: CancellationToken,
    handle_signals: bool,
}

impl SessionRunner {
    pub fn new(session: SolveSession, solver: SolverGateway, source: Box<dyn FrameSource>) -> Self {
        let event_bus = Arc::new(EventBus::new(session.config().system.event_bus_capacity));
        Self {
            session,
            solver,
            source,
            sink: Box::new(NullOverlaySink),
            alerts: Box::new(LogAlertSink),
            event_bus,
            cancel: CancellationToken::new(),
            handle_signals: false,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn OverlaySink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_alerts(mut self, alerts: Box<dyn AlertSink>) -> Self {
        self.alerts = alerts;
        self
    }

    /// Cancel the session on SIGINT / SIGTERM
    pub fn with_signal_handling(mut self) -> Self {
        self.handle_signals = true;
        self
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    /// Token that stops the loop before the next frame when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn session(&self) -> &SolveSession {
        &self.session
    }

    /// Run the frame loop to completion and summarize the session
    pub async fn run(mut self) -> Result<SessionReport> {
        let session_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "Session {} started: frames from '{}', solver '{}'",
            session_id,
            self.source.name(),
            self.solver.solver_name()
        );

        if self.handle_signals {
            self.setup_signal_handlers();
        }

        let reason = self.frame_loop().await;
        info!("Session ending: {:?}", reason);

        self.publish(CubeEvent::ShutdownRequested {
            timestamp: SystemTime::now(),
            reason: format!("{:?}", reason),
        });

        let outcome = match reason {
            ShutdownReason::Solved => SessionOutcome::Solved,
            ShutdownReason::EndOfStream if self.session.phase() == SessionPhase::Solved => {
                SessionOutcome::Solved
            }
            ShutdownReason::EndOfStream => SessionOutcome::Incomplete,
            ShutdownReason::Signal(_) => SessionOutcome::Interrupted,
            ShutdownReason::Error(reason) => SessionOutcome::Failed { reason },
        };

        let report = self.session.report(session_id, started_at, outcome);
        let stats = self.session.stats();
        info!(
            "Session {} finished: {:?}, {} frames ({:.0}% full faces), {} moves completed",
            session_id,
            report.outcome,
            stats.frames_processed,
            stats.detection_rate() * 100.0,
            stats.moves_completed
        );
        Ok(report)
    }

    async fn frame_loop(&mut self) -> ShutdownReason {
        loop {
            let next = tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    return ShutdownReason::Signal("cancelled".to_string());
                }
                next = self.source.next_frame() => next,
            };

            let frame = match next {
                Ok(Some(frame)) => frame,
                Ok(None) => return ShutdownReason::EndOfStream,
                Err(e) => {
                    error!("Frame source failed: {}", e);
                    self.publish_error("frame_source", &e);
                    return ShutdownReason::Error(e.to_string());
                }
            };

            let image = match frame.to_rgb_image() {
                Ok(image) => image,
                Err(e) => {
                    warn!("Dropping frame {}: {}", frame.id, e);
                    continue;
                }
            };

            let outcome = match self.session.process_image(frame.id, &image) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.raise(&e);
                    self.publish_error("session", &e);
                    return ShutdownReason::Error(e.to_string());
                }
            };

            if let Err(e) = self.sink.present(&image, &outcome.overlay) {
                warn!("Overlay output failed for frame {}: {}", frame.id, e);
            }

            for event in outcome.events {
                self.publish(event);
            }

            if let Some(cube) = outcome.solve_request {
                if let Err(e) = self.solve(&cube).await {
                    return ShutdownReason::Error(e.to_string());
                }
            }

            if self.session.is_finished() {
                return ShutdownReason::Solved;
            }
        }
    }

    async fn solve(&mut self, cube: &str) -> Result<()> {
        let moves = match self.solver.solve(cube).await {
            Ok(moves) => moves,
            Err(e) => {
                let e = CubecamError::from(e);
                self.raise(&e);
                self.publish_error("solver", &e);
                return Err(e);
            }
        };

        for event in self.session.install_solution(moves)? {
            self.publish(event);
        }
        Ok(())
    }

    /// Show session-ending errors to the user
    fn raise(&self, error: &CubecamError) {
        if !error.is_fatal_for_session() {
            return;
        }
        let message = match error {
            CubecamError::Calibration(_) => CALIBRATION_ALERT.to_string(),
            CubecamError::Solver(
                SolverError::Unsolvable { .. } | SolverError::InvalidCubeString { .. },
            ) => UNSOLVABLE_ALERT.to_string(),
            other => other.to_string(),
        };
        self.alerts.alert(ALERT_TITLE, &message);
    }

    /// Undelivered events (no subscribers) are only logged at debug level
    fn publish(&self, event: CubeEvent) {
        if let Err(e) = self.event_bus.publish(event) {
            debug!("Event not delivered: {}", e);
        }
    }

    fn publish_error(&self, component: &str, error: &CubecamError) {
        self.publish(CubeEvent::SystemError {
            component: component.to_string(),
            error: error.to_string(),
        });
    }

    fn setup_signal_handlers(&self) {
        #[cfg(unix)]
        {
            let cancel = self.cancel.clone();
            tokio::spawn(async move {
                use tokio::signal::unix::{signal, SignalKind};
                match signal(SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        if sigterm.recv().await.is_some() {
                            info!("Received SIGTERM signal");
                            cancel.cancel();
                        }
                    }
                    Err(e) => warn!("Failed to register SIGTERM handler: {}", e),
                }
            });
        }

        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            if let Ok(()) = tokio::signal::ctrl_c().await {
                info!("Received SIGINT signal (Ctrl+C)");
                cancel.cancel();
            }
        });
    }
}
