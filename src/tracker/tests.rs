use super::*;
use crate::config::StabilityConfig;
use crate::cube::{FaceId, Move, SolutionQueue};
use crate::stability::StabilityGate;
use crate::test_support::{front_after_r, grid, solid};
use crate::vision::{ColorLabel::*, FaceGrid, PixelPoint};

/// Feed the same observation for several frames, counting the gate like the session does
fn feed(
    tracker: &mut MoveTracker,
    gate: &mut StabilityGate,
    queue: &mut SolutionQueue,
    face: Option<&FaceGrid>,
    frames: u32,
) -> Vec<TrackerOutput> {
    (0..frames)
        .map(|_| {
            gate.observe(face.is_some());
            tracker.step(face, gate, queue)
        })
        .collect()
}

fn events(outputs: &[TrackerOutput]) -> Vec<TrackerEvent> {
    outputs.iter().filter_map(|o| o.event.clone()).collect()
}

fn setup(moves: &[&str]) -> (MoveTracker, StabilityGate, SolutionQueue) {
    (
        MoveTracker::new(StagingMode::Gated),
        StabilityGate::new(StabilityConfig::default()),
        SolutionQueue::new(Move::expand_all(moves).unwrap()),
    )
}

fn p(x: i32, y: i32) -> PixelPoint {
    PixelPoint::new(x, y)
}

#[test]
fn test_layer_move_never_confirms_while_unchanged() {
    let (mut tracker, mut gate, mut queue) = setup(&["R"]);
    let face = front_after_r();

    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&face), 120);

    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::Armed {
            mv: Move::new(FaceId::Right, false),
            rotate_ambiguous: false,
            stages: 1,
        }]
    );
    assert_eq!(queue.len(), 1);

    // No guidance until the gate passes the guide threshold
    assert!(outputs[9].cues.is_empty());
    assert_eq!(
        outputs[10].cues,
        vec![CueLine {
            from: p(160, 160),
            to: p(160, 40)
        }]
    );
    assert_eq!(outputs[119].cues.len(), 1);
}

#[test]
fn test_inverted_layer_move_completes_after_change() {
    let (mut tracker, mut gate, mut queue) = setup(&["R'"]);
    let before = front_after_r();
    let after = solid(Red);

    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&before), 50);
    // Inverted R points down the right column
    assert_eq!(
        outputs[20].cues,
        vec![CueLine {
            from: p(160, 40),
            to: p(160, 160)
        }]
    );

    // Hand in front of the cube while turning
    feed(&mut tracker, &mut gate, &mut queue, None, 4);
    assert_eq!(gate.count(), 0);
    assert_eq!(queue.len(), 1);

    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&after), 45);
    assert!(outputs.iter().all(|o| o.cues.is_empty()));
    assert!(outputs[38].event.is_none());
    assert_eq!(
        outputs[39].event,
        Some(TrackerEvent::Completed {
            mv: Move::new(FaceId::Right, true),
            remaining: 0,
        })
    );
    assert!(queue.is_empty());
    assert!(tracker.progress().is_none());
}

#[test]
fn test_missing_grid_never_advances() {
    let (mut tracker, mut gate, mut queue) = setup(&["U"]);
    let face = front_after_r();
    feed(&mut tracker, &mut gate, &mut queue, Some(&face), 45);
    assert!(tracker.progress().is_some());

    // Gate still high but no classified grid this frame
    let output = tracker.step(None, &gate, &mut queue);
    assert_eq!(output, TrackerOutput::default());
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_up_and_down_cue_directions() {
    let face = front_after_r();

    let (mut tracker, mut gate, mut queue) = setup(&["U"]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&face), 12);
    assert_eq!(outputs[11].cues[0], CueLine { from: p(160, 40), to: p(40, 40) });

    let (mut tracker, mut gate, mut queue) = setup(&["D"]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&face), 12);
    assert_eq!(outputs[11].cues[0], CueLine { from: p(40, 160), to: p(160, 160) });

    let (mut tracker, mut gate, mut queue) = setup(&["L"]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&face), 12);
    assert_eq!(outputs[11].cues[0], CueLine { from: p(40, 40), to: p(40, 160) });
}

#[test]
fn test_front_ring_on_asymmetric_face() {
    let (mut tracker, mut gate, mut queue) = setup(&["F"]);
    let before = front_after_r();
    let after = grid([[Red, Red, Red], [Red, Red, Red], [White, White, White]]);

    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&before), 20);
    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::Armed {
            mv: Move::new(FaceId::Front, false),
            rotate_ambiguous: false,
            stages: 1,
        }]
    );
    assert_eq!(
        outputs[15].cues,
        vec![
            CueLine { from: p(40, 40), to: p(160, 40) },
            CueLine { from: p(160, 40), to: p(160, 160) },
            CueLine { from: p(160, 160), to: p(40, 160) },
            CueLine { from: p(40, 160), to: p(40, 40) },
        ]
    );

    feed(&mut tracker, &mut gate, &mut queue, None, 2);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&after), 40);
    assert!(matches!(
        outputs[39].event,
        Some(TrackerEvent::Completed { .. })
    ));
    assert!(queue.is_empty());
}

#[test]
fn test_ambiguous_front_passes_three_stages() {
    let (mut tracker, mut gate, mut queue) = setup(&["F"]);
    let front = Move::new(FaceId::Front, false);

    // Stage 0: a solid face looks the same after a quarter turn
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&solid(Red)), 45);
    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::Armed {
            mv: front,
            rotate_ambiguous: true,
            stages: 3,
        }]
    );
    assert_eq!(
        outputs[20].cues,
        vec![
            CueLine { from: p(40, 40), to: p(160, 40) },
            CueLine { from: p(40, 100), to: p(160, 100) },
            CueLine { from: p(40, 160), to: p(160, 160) },
        ]
    );

    // Whole cube turned y': the left face comes round to the camera and the
    // old front becomes the right layer
    feed(&mut tracker, &mut gate, &mut queue, None, 3);
    let left = solid(Blue);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&left), 45);
    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::StageAdvanced { mv: front, stage: 1 }]
    );
    assert_eq!(queue.len(), 1);
    assert_eq!(
        outputs[44].cues,
        vec![CueLine { from: p(160, 160), to: p(160, 40) }]
    );

    // Stage 1: the right layer (the old front) is turned
    feed(&mut tracker, &mut gate, &mut queue, None, 3);
    let turned = grid([
        [Blue, Blue, White],
        [Blue, Blue, White],
        [Blue, Blue, White],
    ]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&turned), 45);
    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::StageAdvanced { mv: front, stage: 2 }]
    );
    assert_eq!(queue.len(), 1);
    assert_eq!(
        outputs[44].cues,
        vec![
            CueLine { from: p(160, 40), to: p(40, 40) },
            CueLine { from: p(160, 100), to: p(40, 100) },
            CueLine { from: p(160, 160), to: p(40, 160) },
        ]
    );

    // Stage 2: the cube is turned back, only now the move is done
    feed(&mut tracker, &mut gate, &mut queue, None, 3);
    let restored = grid([
        [Red, Red, Red],
        [Red, Red, Red],
        [Yellow, Yellow, Yellow],
    ]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&restored), 45);
    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::Completed {
            mv: front,
            remaining: 0
        }]
    );
    assert!(queue.is_empty());
    assert!(tracker.progress().is_none());
}

#[test]
fn test_inverted_ambiguous_stage_one_flips_only_the_layer_cue() {
    let (mut tracker, mut gate, mut queue) = setup(&["F'"]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&solid(Red)), 45);
    assert_eq!(outputs[20].cues[0], CueLine { from: p(40, 40), to: p(160, 40) });

    feed(&mut tracker, &mut gate, &mut queue, None, 3);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&solid(Green)), 45);
    assert_eq!(
        outputs[44].cues,
        vec![CueLine { from: p(160, 40), to: p(160, 160) }]
    );
}

#[test]
fn test_back_staging_modes() {
    let face = front_after_r();
    let back = Move::new(FaceId::Back, false);

    let (mut tracker, mut gate, mut queue) = setup(&["B"]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&face), 15);
    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::Armed {
            mv: back,
            rotate_ambiguous: false,
            stages: 1,
        }]
    );
    // Counter-clockwise ring
    assert_eq!(outputs[14].cues[0], CueLine { from: p(40, 40), to: p(40, 160) });

    let mut tracker = MoveTracker::new(StagingMode::Always);
    let mut gate = StabilityGate::new(StabilityConfig::default());
    let mut queue = SolutionQueue::new(vec![back]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&face), 15);
    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::Armed {
            mv: back,
            rotate_ambiguous: true,
            stages: 3,
        }]
    );
    // Columns swept bottom to top
    assert_eq!(
        outputs[14].cues,
        vec![
            CueLine { from: p(40, 160), to: p(40, 40) },
            CueLine { from: p(100, 160), to: p(100, 40) },
            CueLine { from: p(160, 160), to: p(160, 40) },
        ]
    );
}

#[test]
fn test_ambiguous_back_stage_one_uses_bottom_row() {
    let (mut tracker, mut gate, mut queue) = setup(&["B"]);
    feed(&mut tracker, &mut gate, &mut queue, Some(&solid(Red)), 45);
    feed(&mut tracker, &mut gate, &mut queue, None, 3);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&solid(White)), 45);

    assert_eq!(
        events(&outputs),
        vec![TrackerEvent::StageAdvanced {
            mv: Move::new(FaceId::Back, false),
            stage: 1
        }]
    );
    assert_eq!(
        outputs[44].cues,
        vec![CueLine { from: p(40, 160), to: p(160, 160) }]
    );
}

#[test]
fn test_repeated_move_rearms_on_next_frame() {
    let (mut tracker, mut gate, mut queue) = setup(&["R", "R"]);
    let start = solid(Red);
    let once = front_after_r();

    feed(&mut tracker, &mut gate, &mut queue, Some(&start), 45);
    feed(&mut tracker, &mut gate, &mut queue, None, 2);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&once), 50);

    let seen = events(&outputs);
    assert_eq!(seen.len(), 2);
    assert!(matches!(seen[0], TrackerEvent::Completed { remaining: 1, .. }));
    assert!(matches!(seen[1], TrackerEvent::Armed { .. }));
    // The second R is armed on the new layout and waits for another change
    assert_eq!(queue.len(), 1);
    assert!(!outputs[49].cues.is_empty());
}

#[test]
fn test_empty_queue_is_idle() {
    let (mut tracker, mut gate, mut queue) = setup(&[]);
    let outputs = feed(&mut tracker, &mut gate, &mut queue, Some(&solid(Red)), 50);
    assert!(outputs.iter().all(|o| *o == TrackerOutput::default()));
}
