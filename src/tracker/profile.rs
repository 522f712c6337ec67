use super::StagingMode;
use crate::cube::{FaceId, Move};
use crate::vision::{Cell, FaceGrid, PixelPoint, Subset};

/// Guidance arrow between two live facelet centers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueLine {
    pub from: PixelPoint,
    pub to: PixelPoint,
}

/// One confirmation stage: which part of the face is compared and which
/// arrows are drawn while it is unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub subset: Subset,
    cues: Vec<(Cell, Cell)>,
    /// Whether an inverted move reverses the arrows
    follows_inversion: bool,
}

impl StagePlan {
    fn new(subset: Subset, cues: Vec<(Cell, Cell)>, follows_inversion: bool) -> Self {
        Self {
            subset,
            cues,
            follows_inversion,
        }
    }

    /// Resolve the cue cells against the live grid
    pub fn cue_lines(&self, grid: &FaceGrid, inverted: bool) -> Vec<CueLine> {
        let swap = inverted && self.follows_inversion;
        self.cues
            .iter()
            .map(|&(from, to)| {
                let (from, to) = if swap { (to, from) } else { (from, to) };
                CueLine {
                    from: grid.center_point(from),
                    to: grid.center_point(to),
                }
            })
            .collect()
    }
}

fn c(row: usize, col: usize) -> Cell {
    Cell::new(row, col)
}

fn right_layer() -> StagePlan {
    StagePlan::new(Subset::Column(2), vec![(c(2, 2), c(0, 2))], true)
}

fn left_layer() -> StagePlan {
    StagePlan::new(Subset::Column(0), vec![(c(0, 0), c(2, 0))], true)
}

fn up_layer() -> StagePlan {
    StagePlan::new(Subset::Row(0), vec![(c(0, 2), c(0, 0))], true)
}

fn down_layer() -> StagePlan {
    StagePlan::new(Subset::Row(2), vec![(c(2, 0), c(2, 2))], true)
}

/// Clockwise ring around the visible face
fn front_ring() -> StagePlan {
    StagePlan::new(
        Subset::Full,
        vec![
            (c(0, 0), c(0, 2)),
            (c(0, 2), c(2, 2)),
            (c(2, 2), c(2, 0)),
            (c(2, 0), c(0, 0)),
        ],
        true,
    )
}

/// Counter-clockwise ring, a Back turn seen from the front
fn back_ring() -> StagePlan {
    StagePlan::new(
        Subset::Full,
        vec![
            (c(0, 0), c(2, 0)),
            (c(2, 0), c(2, 2)),
            (c(2, 2), c(0, 2)),
            (c(0, 2), c(0, 0)),
        ],
        true,
    )
}

/// Whole-cube turn with every row swept in the same direction
fn sweep_rows(left_to_right: bool) -> StagePlan {
    let cues = (0..3)
        .map(|row| {
            if left_to_right {
                (c(row, 0), c(row, 2))
            } else {
                (c(row, 2), c(row, 0))
            }
        })
        .collect();
    StagePlan::new(Subset::Full, cues, false)
}

/// Whole-cube turn with every column swept in the same direction
fn sweep_columns(bottom_to_top: bool) -> StagePlan {
    let cues = (0..3)
        .map(|col| {
            if bottom_to_top {
                (c(2, col), c(0, col))
            } else {
                (c(0, col), c(2, col))
            }
        })
        .collect();
    StagePlan::new(Subset::Full, cues, false)
}

/// Stage plan for a move given the face visible when it was armed.
/// Returns the stages and whether the rotation-ambiguity protocol applies.
pub fn plan_for(mv: Move, grid: &FaceGrid, back_staging: StagingMode) -> (Vec<StagePlan>, bool) {
    match mv.face {
        FaceId::Right => (vec![right_layer()], false),
        FaceId::Left => (vec![left_layer()], false),
        FaceId::Up => (vec![up_layer()], false),
        FaceId::Down => (vec![down_layer()], false),
        FaceId::Front => {
            if grid.is_rotationally_symmetric() {
                (
                    vec![sweep_rows(true), right_layer(), sweep_rows(false)],
                    true,
                )
            } else {
                (vec![front_ring()], false)
            }
        }
        FaceId::Back => {
            let staged = back_staging == StagingMode::Always || grid.is_rotationally_symmetric();
            if staged {
                (
                    vec![sweep_columns(true), down_layer(), sweep_columns(false)],
                    true,
                )
            } else {
                (vec![back_ring()], false)
            }
        }
    }
}
