//! Property tests for the node store and the gesture reducer.
//!
//! Covers:
//! - Id uniqueness and growth under repeated adds
//! - Position updates only touching the target node
//! - Single selection under arbitrary click sequences

use std::collections::HashSet;

use flow_core::{
    FlowchartState, InteractionEvent, NodeId, NodeStore, Outcome, Position, ShapeKind,
};
use proptest::prelude::*;

fn shape_kind() -> impl Strategy<Value = ShapeKind> {
    prop::sample::select(ShapeKind::ALL.to_vec())
}

fn position() -> impl Strategy<Value = Position> {
    (0.0f32..2000.0, 0.0f32..2000.0).prop_map(|(top, left)| Position::new(top, left))
}

proptest! {
    #[test]
    fn add_node_grows_by_one_with_unique_ids(
        adds in prop::collection::vec((shape_kind(), position()), 1..64)
    ) {
        let mut store = NodeStore::new();
        let mut seen = HashSet::new();

        for (i, (kind, pos)) in adds.iter().enumerate() {
            let id = store.add_node(*kind, *pos).expect("add");
            prop_assert_eq!(store.len(), i + 1);
            prop_assert!(seen.insert(id), "duplicate id returned");
        }
    }

    #[test]
    fn update_position_reads_back_and_leaves_others(
        initial in prop::collection::vec(position(), 2..16),
        target in any::<prop::sample::Index>(),
        moved in position(),
    ) {
        let mut store = NodeStore::new();
        let ids: Vec<NodeId> = initial
            .iter()
            .map(|p| store.add_node(ShapeKind::Rectangle, *p).expect("add"))
            .collect();
        let before: Vec<Position> = store.nodes().iter().map(|n| n.position).collect();

        let idx = target.index(ids.len());
        store.update_position(&ids[idx], moved).expect("move");

        for (i, node) in store.nodes().iter().enumerate() {
            if i == idx {
                prop_assert_eq!(node.position, moved);
            } else {
                prop_assert_eq!(node.position, before[i]);
            }
        }
    }

    #[test]
    fn at_most_one_node_is_selected(
        count in 1usize..8,
        clicks in prop::collection::vec(any::<prop::sample::Index>(), 1..32),
    ) {
        let mut state = FlowchartState::default();
        let mut ids = Vec::new();
        for _ in 0..count {
            match state.apply(&InteractionEvent::PaletteAdd { kind: ShapeKind::Circle }) {
                Ok(Outcome::Added(id)) => ids.push(id),
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        for click in clicks {
            let id = ids[click.index(ids.len())].clone();
            state.apply(&InteractionEvent::NodeClick { id: id.clone() }).expect("click");

            let selected: Vec<_> = ids.iter().filter(|i| state.is_selected(i)).collect();
            prop_assert_eq!(selected, vec![&id]);
        }
    }
}

#[test]
fn drop_flow_builds_a_diagram() {
    let mut state = FlowchartState::default();
    let steps = [
        (ShapeKind::Circle, 20.0, 300.0),
        (ShapeKind::Parallelogram, 140.0, 300.0),
        (ShapeKind::Diamond, 260.0, 300.0),
        (ShapeKind::Rectangle, 380.0, 300.0),
    ];

    for (kind, y, x) in steps {
        state
            .apply(&InteractionEvent::PaletteDragStart { kind })
            .expect("drag");
        state
            .apply(&InteractionEvent::CanvasDrop {
                client_x: x,
                client_y: y,
            })
            .expect("drop");
    }

    let kinds: Vec<_> = state.store().nodes().iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ShapeKind::Circle,
            ShapeKind::Parallelogram,
            ShapeKind::Diamond,
            ShapeKind::Rectangle
        ]
    );
    assert_eq!(state.store().nodes()[2].position, Position::new(260.0, 300.0));
}
