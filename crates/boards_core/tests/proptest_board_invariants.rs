//! Property tests for board mutations.
//!
//! Random sequences of create, move, item resize, size toggle, grid resize
//! and trash run against one board tree at a fixed column count.
//!
//! Invariants checked after every step:
//! 1. No board has overlapping footprints (`Occupancy::conflicts` is empty).
//! 2. Every anchored footprint fits the grid without wrapping.
//! 3. Every slot reference resolves to a live board or item.
//! 4. A refused operation leaves the whole state unchanged.

use boards_core::grid::{footprint_cells, FootprintLookup, Occupancy};
use boards_core::ops::{
    create_board, create_item, move_tile, resize_grid, resize_item, step_grid, toggle_item_size,
    trash_tile, GridStep, OpResult,
};
use boards_core::{BoardState, BoardsConfig, ItemKind, MovePolicy, SlotRef};
use proptest::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone)]
enum Op {
    CreateNote,
    CreateLink,
    CreateBoard,
    Enter(usize),
    Move { from: usize, to: usize },
    MoveAnchor { from: usize, to: usize },
    Resize { anchor: usize, target: usize },
    Toggle(usize),
    Grow,
    Shrink,
    ResizeGrid(usize),
    Trash(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::CreateNote),
        2 => Just(Op::CreateLink),
        2 => Just(Op::CreateBoard),
        1 => any::<usize>().prop_map(Op::Enter),
        1 => (0usize..120, 0usize..120).prop_map(|(from, to)| Op::Move { from, to }),
        3 => (any::<usize>(), 0usize..120).prop_map(|(from, to)| Op::MoveAnchor { from, to }),
        2 => (any::<usize>(), 0usize..120).prop_map(|(anchor, target)| Op::Resize { anchor, target }),
        2 => any::<usize>().prop_map(Op::Toggle),
        1 => Just(Op::Grow),
        1 => Just(Op::Shrink),
        1 => (0usize..500).prop_map(Op::ResizeGrid),
        2 => any::<usize>().prop_map(Op::Trash),
    ]
}

fn policy_strategy() -> impl Strategy<Value = MovePolicy> {
    prop_oneof![Just(MovePolicy::EmptyOnly), Just(MovePolicy::Swap)]
}

fn cols_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(3usize), Just(7usize), Just(10usize)]
}

struct Session {
    state: BoardState,
    config: BoardsConfig,
    current: Uuid,
    cols: usize,
}

impl Session {
    fn new(policy: MovePolicy, cols: usize) -> Self {
        let mut config = BoardsConfig::default();
        config.move_policy = policy;
        let state = BoardState::bootstrap(&config.grid);
        let current = state.root_board().map(|board| board.id).unwrap();
        Self {
            state,
            config,
            current,
            cols,
        }
    }

    fn anchors(&self) -> Vec<usize> {
        self.state.boards[&self.current]
            .anchors()
            .map(|(index, _)| index)
            .collect()
    }

    fn item_anchors(&self) -> Vec<usize> {
        self.state.boards[&self.current]
            .anchors()
            .filter(|(_, slot_ref)| !slot_ref.is_board())
            .map(|(index, _)| index)
            .collect()
    }

    /// Applies `op`; `None` means the op had no target and was skipped.
    fn apply(&mut self, op: &Op) -> Option<OpResult<()>> {
        let anchors = self.anchors();
        let item_anchors = self.item_anchors();
        let pick = |list: &[usize], raw: &usize| (!list.is_empty()).then(|| list[raw % list.len()]);
        let (state, config, board, cols) = (&mut self.state, &self.config, self.current, self.cols);

        let result = match op {
            Op::CreateNote => {
                create_item(state, config, board, ItemKind::Note, None, "note", cols).map(drop)
            }
            Op::CreateLink => create_item(
                state,
                config,
                board,
                ItemKind::Link,
                Some("site"),
                "example.com",
                cols,
            )
            .map(drop),
            Op::CreateBoard => create_board(state, config, board, None, cols).map(drop),
            Op::Enter(index) => {
                let mut ids: Vec<Uuid> = state.boards.keys().copied().collect();
                ids.sort();
                self.current = ids[index % ids.len()];
                return None;
            }
            Op::Move { from, to } => move_tile(state, config, board, *from, *to, cols).map(drop),
            Op::MoveAnchor { from, to } => {
                let from = pick(&anchors, from)?;
                move_tile(state, config, board, from, *to, cols).map(drop)
            }
            Op::Resize { anchor, target } => {
                let anchor = pick(&item_anchors, anchor)?;
                resize_item(state, board, anchor, *target, cols).map(drop)
            }
            Op::Toggle(index) => {
                let anchor = pick(&item_anchors, index)?;
                toggle_item_size(state, config, board, anchor, cols).map(drop)
            }
            Op::Grow => step_grid(state, config, board, GridStep::Grow, cols).map(drop),
            Op::Shrink => step_grid(state, config, board, GridStep::Shrink, cols).map(drop),
            Op::ResizeGrid(requested) => {
                resize_grid(state, config, board, *requested, cols).map(drop)
            }
            Op::Trash(index) => {
                let anchor = pick(&anchors, index)?;
                trash_tile(state, board, anchor).map(drop)
            }
        };

        if !self.state.boards.contains_key(&self.current) {
            self.current = self.state.root_board().map(|root| root.id).unwrap();
        }
        Some(result)
    }
}

fn check_layout(state: &BoardState, cols: usize) -> Result<(), TestCaseError> {
    for board in state.boards.values() {
        let occupancy = Occupancy::build(&board.slots, &state.items, cols);
        prop_assert!(
            occupancy.conflicts().is_empty(),
            "board {} has overlapping tiles: {:?}",
            board.id,
            occupancy.conflicts()
        );
        for (anchor, slot_ref) in board.anchors() {
            let size = state.items.footprint(&slot_ref);
            prop_assert_eq!(
                footprint_cells(anchor, size, cols, board.slot_count()).len(),
                size.area(),
                "tile at {} does not fit",
                anchor
            );
            let live = match slot_ref {
                SlotRef::Board { id } => state.boards.contains_key(&id),
                SlotRef::Item { id } => state.items.contains_key(&id),
            };
            prop_assert!(live, "slot {} on board {} dangles", anchor, board.id);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_edits_keep_boards_consistent(
        policy in policy_strategy(),
        cols in cols_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut session = Session::new(policy, cols);
        for op in &ops {
            let before = session.state.clone();
            if let Some(Err(err)) = session.apply(op) {
                prop_assert!(
                    session.state == before,
                    "{:?} failed with `{}` but changed the state",
                    op,
                    err
                );
            }
            check_layout(&session.state, session.cols)?;
        }
    }
}

#[test]
fn scripted_session_stays_consistent_under_both_policies() {
    let script = [
        Op::CreateNote,
        Op::CreateLink,
        Op::CreateBoard,
        Op::CreateNote,
        Op::Toggle((0usize)),
        Op::Move { from: 0, to: 1 },
        Op::MoveAnchor {
            from: (usize::MAX / 2),
            to: 0,
        },
        Op::Resize {
            anchor: (0usize),
            target: 25,
        },
        Op::Shrink,
        Op::Shrink,
        Op::Shrink,
        Op::ResizeGrid(0),
        Op::Grow,
        Op::Enter((usize::MAX)),
        Op::CreateNote,
        Op::Trash((0usize)),
        Op::ResizeGrid(1_000),
        Op::Trash((usize::MAX / 3)),
    ];

    for policy in [MovePolicy::EmptyOnly, MovePolicy::Swap] {
        for cols in [3, 7, 10] {
            let mut session = Session::new(policy, cols);
            for op in &script {
                let before = session.state.clone();
                if let Some(Err(err)) = session.apply(op) {
                    assert_eq!(session.state, before, "{op:?} failed with `{err}`");
                }
                check_layout(&session.state, cols).unwrap();
            }
        }
    }
}
