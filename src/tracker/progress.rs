use super::profile::StagePlan;
use crate::cube::Move;
use crate::vision::{FaceGrid, Snapshot};

/// Per-move tracking state, created when a move is armed and dropped on completion
#[derive(Debug, Clone)]
pub struct MoveProgress {
    pub mv: Move,
    pub stages: Vec<StagePlan>,
    pub stage: usize,
    pub rotate_ambiguous: bool,
    pub initial: Snapshot,
    pub current: Option<Snapshot>,
}

impl MoveProgress {
    pub fn new(mv: Move, stages: Vec<StagePlan>, rotate_ambiguous: bool, grid: &FaceGrid) -> Self {
        let initial = grid.snapshot(stages[0].subset);
        Self {
            mv,
            stages,
            stage: 0,
            rotate_ambiguous,
            initial,
            current: None,
        }
    }

    pub fn plan(&self) -> &StagePlan {
        &self.stages[self.stage]
    }

    pub fn is_last_stage(&self) -> bool {
        self.stage + 1 >= self.stages.len()
    }

    /// Re-sample the comparison snapshot from the live grid
    pub fn refresh(&mut self, grid: &FaceGrid) {
        self.current = Some(grid.snapshot(self.plan().subset));
    }

    /// True once a refreshed snapshot differs from the armed one
    pub fn has_changed(&self) -> bool {
        self.current
            .as_ref()
            .map(|current| *current != self.initial)
            .unwrap_or(false)
    }

    /// Move to the next stage, re-arming on the grid currently in view
    pub fn advance_stage(&mut self, grid: &FaceGrid) {
        self.stage += 1;
        self.initial = grid.snapshot(self.plan().subset);
        self.current = None;
    }
}
