use super::profile::{plan_for, CueLine};
use super::progress::MoveProgress;
use super::StagingMode;
use crate::cube::{Move, SolutionQueue};
use crate::stability::StabilityGate;
use crate::vision::FaceGrid;
use tracing::{debug, info};

/// Notable transitions produced while tracking the queue head
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Armed {
        mv: Move,
        rotate_ambiguous: bool,
        stages: usize,
    },
    StageAdvanced {
        mv: Move,
        stage: usize,
    },
    Completed {
        mv: Move,
        remaining: usize,
    },
}

/// Per-frame tracker result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerOutput {
    pub cues: Vec<CueLine>,
    pub event: Option<TrackerEvent>,
}

/// Follows the head of the solution queue across frames and pops it once the
/// physical turn is confirmed by a changed color pattern
#[derive(Debug, Clone, Default)]
pub struct MoveTracker {
    back_staging: StagingMode,
    progress: Option<MoveProgress>,
}

impl MoveTracker {
    pub fn new(back_staging: StagingMode) -> Self {
        Self {
            back_staging,
            progress: None,
        }
    }

    pub fn progress(&self) -> Option<&MoveProgress> {
        self.progress.as_ref()
    }

    pub fn reset(&mut self) {
        self.progress = None;
    }

    /// Advance the tracker by one frame.
    ///
    /// `grid` is `None` when the frame did not produce a valid face; the
    /// tracker then holds its state and never advances.
    pub fn step(
        &mut self,
        grid: Option<&FaceGrid>,
        gate: &StabilityGate,
        queue: &mut SolutionQueue,
    ) -> TrackerOutput {
        let mut output = TrackerOutput::default();

        let head = match queue.head() {
            Some(head) => head,
            None => {
                self.progress = None;
                return output;
            }
        };

        if self.progress.as_ref().map(|p| p.mv != head).unwrap_or(false) {
            debug!("Queue head changed to {}, dropping progress", head);
            self.progress = None;
        }

        let grid = match grid {
            Some(grid) => grid,
            None => return output,
        };

        if self.progress.is_none() {
            if gate.is_armed() {
                let (stages, ambiguous) = plan_for(head, grid, self.back_staging);
                let progress = MoveProgress::new(head, stages, ambiguous, grid);
                info!(
                    "Tracking move {} ({} stage{}{})",
                    head,
                    progress.stages.len(),
                    if progress.stages.len() == 1 { "" } else { "s" },
                    if ambiguous { ", rotation ambiguous" } else { "" }
                );
                output.event = Some(TrackerEvent::Armed {
                    mv: head,
                    rotate_ambiguous: ambiguous,
                    stages: progress.stages.len(),
                });
                self.progress = Some(progress);
            }
            return output;
        }

        let progress = match self.progress.as_mut() {
            Some(progress) => progress,
            None => return output,
        };

        if !gate.is_guiding() {
            return output;
        }

        progress.refresh(grid);
        if !progress.has_changed() {
            output.cues = progress.plan().cue_lines(grid, head.inverted);
        }

        if gate.is_confirming() && progress.has_changed() {
            if progress.is_last_stage() {
                queue.pop();
                info!("Move {} complete, {} remaining", head, queue.len());
                output.event = Some(TrackerEvent::Completed {
                    mv: head,
                    remaining: queue.len(),
                });
                self.progress = None;
            } else {
                progress.advance_stage(grid);
                info!("Move {} advanced to stage {}", head, progress.stage);
                output.event = Some(TrackerEvent::StageAdvanced {
                    mv: head,
                    stage: progress.stage,
                });
            }
        }

        output
    }
}
