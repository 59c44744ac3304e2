//! Property-style invariants for the sequence editor.
//!
//! Random gesture streams are driven against the public API with a simple
//! row layout (100px blocks starting at x=100) and the anchor, placeholder,
//! cancellation and ordering guarantees are asserted after every step.

use cobot_core::Span;
use cobot_editor::{
    BlockId, BlockTemplate, CommandKind, DragState, DropOutcome, SequenceEditor, Slot, TrackLayout,
};
use proptest::prelude::*;

const BLOCK_WIDTH: f64 = 100.0;

struct Row(Vec<BlockId>);

impl TrackLayout for Row {
    fn block_span(&self, id: BlockId) -> Option<Span> {
        let index = self.0.iter().position(|candidate| *candidate == id)?;
        Some(Span::new(BLOCK_WIDTH * (index as f64 + 1.0), BLOCK_WIDTH))
    }
}

fn row(editor: &SequenceEditor) -> Row {
    Row(editor.blocks().iter().map(|block| block.id).collect())
}

fn ids(editor: &SequenceEditor) -> Vec<BlockId> {
    editor.blocks().iter().map(|block| block.id).collect()
}

#[derive(Debug, Clone)]
enum Op {
    Insert { kind: usize, x: f64 },
    Relocate { pick: usize, x: f64 },
    Delete { pick: usize },
    Cancel { kind: usize, x: f64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let x = -50.0f64..1_500.0;
    prop_oneof![
        (0usize..3, x.clone()).prop_map(|(kind, x)| Op::Insert { kind, x }),
        (any::<usize>(), x.clone()).prop_map(|(pick, x)| Op::Relocate { pick, x }),
        any::<usize>().prop_map(|pick| Op::Delete { pick }),
        (0usize..3, x).prop_map(|(kind, x)| Op::Cancel { kind, x }),
    ]
}

fn apply(editor: &mut SequenceEditor, op: &Op) {
    match *op {
        Op::Insert { kind, x } => {
            let layout = row(editor);
            editor.begin_palette_drag(BlockTemplate::for_kind(CommandKind::ALL[kind]));
            editor.update_insertion_point(x, &layout);
            editor.commit_drop(&layout);
        }
        Op::Relocate { pick, x } => {
            if editor.is_empty() {
                return;
            }
            let layout = row(editor);
            let id = editor.blocks()[pick % editor.len()].id;
            editor.begin_relocate_drag(id);
            editor.update_insertion_point(x, &layout);
            editor.commit_drop(&layout);
        }
        Op::Delete { pick } => {
            if editor.is_empty() {
                return;
            }
            let id = editor.blocks()[pick % editor.len()].id;
            editor.delete_block(id).expect("picked block exists");
        }
        Op::Cancel { kind, x } => {
            let layout = row(editor);
            editor.begin_palette_drag(BlockTemplate::for_kind(CommandKind::ALL[kind]));
            editor.update_insertion_point(x, &layout);
            editor.cancel_drag();
        }
    }
}

fn assert_projection_framed(editor: &SequenceEditor) {
    let slots = editor.slots();
    assert_eq!(slots.first(), Some(&Slot::Start));
    assert_eq!(slots.last(), Some(&Slot::End));
    let anchors = slots
        .iter()
        .filter(|slot| matches!(slot, Slot::Start | Slot::End))
        .count();
    assert_eq!(anchors, 2, "anchors appear exactly once each");
    if editor.state() == DragState::Idle {
        assert!(!slots.contains(&Slot::Placeholder));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn anchors_stay_first_and_last(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut editor = SequenceEditor::new();
        for op in &ops {
            apply(&mut editor, op);
            assert_projection_framed(&editor);
            prop_assert_eq!(editor.state(), DragState::Idle);
        }
        let mut seen = ids(&editor);
        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), editor.len());
    }

    #[test]
    fn cancelled_gesture_leaves_sequence_unchanged(
        seed in prop::collection::vec(0usize..3, 0..12),
        relocate in any::<bool>(),
        pick in any::<usize>(),
        xs in prop::collection::vec(-50.0f64..1_500.0, 1..10),
    ) {
        let mut editor = SequenceEditor::new();
        for kind in seed {
            editor.begin_palette_drag(BlockTemplate::for_kind(CommandKind::ALL[kind]));
            let layout = row(&editor);
            editor.commit_drop(&layout);
        }
        let before = editor.blocks().to_vec();
        editor.change_signal().take();

        let layout = row(&editor);
        if relocate && !before.is_empty() {
            editor.begin_relocate_drag(before[pick % before.len()].id);
        } else {
            editor.begin_palette_drag(BlockTemplate::for_kind(CommandKind::Move));
        }
        for x in xs {
            editor.update_insertion_point(x, &layout);
        }
        editor.cancel_drag();

        prop_assert_eq!(editor.blocks(), before.as_slice());
        prop_assert_eq!(editor.placeholder(), None);
        prop_assert!(!editor.change_signal().is_raised());
    }

    #[test]
    fn insertion_point_is_idempotent(
        count in 0usize..10,
        x in -50.0f64..1_500.0,
    ) {
        let mut editor = SequenceEditor::new();
        for _ in 0..count {
            editor.begin_palette_drag(BlockTemplate::for_kind(CommandKind::Delay));
            let layout = row(&editor);
            editor.commit_drop(&layout);
        }
        let layout = row(&editor);
        editor.begin_palette_drag(BlockTemplate::for_kind(CommandKind::Move));
        editor.update_insertion_point(x, &layout);
        let once = editor.placeholder();
        editor.update_insertion_point(x, &layout);
        prop_assert_eq!(editor.placeholder(), once);
        prop_assert!(once.is_some());
    }

    #[test]
    fn relocation_preserves_relative_order_of_others(
        count in 2usize..12,
        pick in any::<usize>(),
        x in -50.0f64..1_500.0,
    ) {
        let mut editor = SequenceEditor::new();
        for index in 0..count {
            editor.begin_palette_drag(BlockTemplate::for_kind(CommandKind::ALL[index % 3]));
            let layout = row(&editor);
            editor.commit_drop(&layout);
        }
        let before = ids(&editor);
        let moving = before[pick % before.len()];
        let layout = row(&editor);
        editor.begin_relocate_drag(moving);
        editor.update_insertion_point(x, &layout);
        let outcome = editor.commit_drop(&layout);
        let handled = match outcome {
            DropOutcome::Moved { id, .. } | DropOutcome::Returned { id, .. } => id == moving,
            _ => false,
        };
        prop_assert!(handled, "unexpected outcome {:?}", outcome);

        let after = ids(&editor);
        prop_assert_eq!(after.len(), before.len());
        prop_assert_eq!(outcome.is_mutation(), after != before);
        let others_before: Vec<_> = before.iter().filter(|id| **id != moving).collect();
        let others_after: Vec<_> = after.iter().filter(|id| **id != moving).collect();
        prop_assert_eq!(others_before, others_after);
    }
}

#[test]
fn drop_between_neighbours_lands_between_them() {
    let mut editor = SequenceEditor::new();
    for kind in [CommandKind::Move, CommandKind::Gripper, CommandKind::Delay] {
        editor.begin_palette_drag(BlockTemplate::for_kind(kind));
        let layout = row(&editor);
        editor.commit_drop(&layout);
    }
    let layout = row(&editor);
    let b = editor.blocks()[1].id;
    let a = editor.blocks()[2].id;
    // B centered at 250, A at 350.
    editor.begin_palette_drag(BlockTemplate::for_kind(CommandKind::Move));
    editor.update_insertion_point(301.0, &layout);
    let DropOutcome::Inserted { id, index } = editor.commit_drop(&layout) else {
        panic!("palette drop should insert");
    };
    assert_eq!(index, 2);
    let order = ids(&editor);
    assert_eq!(&order[1..4], &[b, id, a]);
}
