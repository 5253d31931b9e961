use boards_core::grid::{
    check_placement, footprint_cells, index_to_row_col, row_col_to_index, Occupancy,
};
use boards_core::ops::{
    create_board, create_item, move_tile, resize_grid, trash_tile, MoveOutcome, OpError,
};
use boards_core::{
    BoardState, BoardsConfig, GridResize, Item, ItemKind, PlacementError, SlotRef, TileSize,
};
use uuid::Uuid;

const COLS: usize = 10;

fn fresh() -> (BoardState, BoardsConfig, Uuid) {
    let config = BoardsConfig::default();
    let state = BoardState::bootstrap(&config.grid);
    let root = state.root_board().map(|board| board.id).unwrap();
    (state, config, root)
}

fn claimed(state: &BoardState, board_id: Uuid) -> Vec<usize> {
    let board = &state.boards[&board_id];
    Occupancy::build(&board.slots, &state.items, COLS)
        .claimed_cells()
        .map(|(cell, _)| cell)
        .collect()
}

#[test]
fn wide_tile_near_the_right_edge_does_not_wrap() {
    let pos = index_to_row_col(8, COLS);
    assert_eq!((pos.row, pos.col), (1, 9));
    assert!(footprint_cells(8, TileSize::new(3, 1), COLS, 80).is_empty());

    let (state, _, root) = fresh();
    let slots = &state.boards[&root].slots;
    assert!(matches!(
        check_placement(slots, &state.items, 8, TileSize::new(3, 1), COLS, None),
        Err(PlacementError::Wraps { .. })
    ));
}

#[test]
fn first_note_on_an_empty_board_claims_the_top_left_square() {
    let (mut state, config, root) = fresh();
    let (_, anchor) =
        create_item(&mut state, &config, root, ItemKind::Note, None, "hello", COLS).unwrap();

    assert_eq!(anchor, 0);
    assert_eq!(claimed(&state, root), vec![0, 1, 10, 11]);
}

#[test]
fn second_note_skips_cells_covered_by_the_first() {
    let (mut state, config, root) = fresh();
    create_item(&mut state, &config, root, ItemKind::Note, None, "a", COLS).unwrap();

    let slots = &state.boards[&root].slots;
    assert!(matches!(
        check_placement(slots, &state.items, 1, TileSize::new(2, 2), COLS, None),
        Err(PlacementError::Conflict { cell: 1, owner: 0 })
    ));

    let (_, anchor) =
        create_item(&mut state, &config, root, ItemKind::Note, None, "b", COLS).unwrap();
    assert_eq!(anchor, 2);
    assert_eq!(claimed(&state, root), vec![0, 1, 2, 3, 10, 11, 12, 13]);
}

#[test]
fn shrink_is_refused_while_a_tile_sits_in_the_removed_tail() {
    let (mut state, config, root) = fresh();
    let item = Item::new(root, ItemKind::Note, None, "tail", TileSize::UNIT);
    let item_id = item.id;
    state.items.insert(item_id, item);
    state.boards.get_mut(&root).unwrap().slots[75] = Some(SlotRef::Item { id: item_id });
    let before = state.clone();

    let err = resize_grid(&mut state, &config, root, 60, COLS).unwrap_err();
    assert!(matches!(err, OpError::Resize(_)));
    assert_eq!(state, before);

    let resize = resize_grid(&mut state, &config, root, 76, COLS).unwrap();
    assert_eq!(resize, GridResize::Shrunk { from: 80, to: 76 });
    assert_eq!(state.boards[&root].slot_count(), 76);
}

#[test]
fn shrink_never_cuts_a_covered_cell() {
    let (mut state, config, root) = fresh();
    create_item(&mut state, &config, root, ItemKind::Note, None, "a", COLS).unwrap();
    let mut slots = state.boards[&root].slots.clone();
    let item_id = state.items.keys().next().copied().unwrap();
    slots[0] = None;
    slots[48] = Some(SlotRef::Item { id: item_id });
    state.boards.get_mut(&root).unwrap().slots = slots;

    // The 2x2 tile at 48 covers 48, 49, 58, 59.
    for requested in [40, 50, 59] {
        assert!(resize_grid(&mut state, &config, root, requested, COLS).is_err());
    }
    assert!(resize_grid(&mut state, &config, root, 60, COLS).is_ok());
    assert_eq!(claimed(&state, root), vec![48, 49, 58, 59]);
}

#[test]
fn deleting_a_board_removes_its_whole_subtree() {
    let (mut state, config, root) = fresh();
    let child = create_board(&mut state, &config, root, Some("Child"), COLS).unwrap();
    let grandchild = create_board(&mut state, &config, child, Some("Nested"), COLS).unwrap();
    let (note, _) =
        create_item(&mut state, &config, grandchild, ItemKind::Note, None, "deep", COLS).unwrap();

    let outcome = trash_tile(&mut state, root, 0).unwrap();

    assert!(outcome.removed_board(child));
    assert!(outcome.removed_board(grandchild));
    assert_eq!(outcome.removed_items, vec![note]);
    assert_eq!(state.boards.len(), 1);
    assert!(state.items.is_empty());
    assert!(state.boards[&root].slots.iter().all(Option::is_none));
}

#[test]
fn refused_move_leaves_state_untouched() {
    let (mut state, config, root) = fresh();
    create_item(&mut state, &config, root, ItemKind::Note, None, "a", COLS).unwrap();
    create_item(&mut state, &config, root, ItemKind::Link, None, "x.io", COLS).unwrap();
    let before = state.clone();

    // Link (2x1) at 2 onto 1 would overlap the note at 0.
    let err = move_tile(&mut state, &config, root, 2, 1, COLS).unwrap_err();
    assert!(matches!(err, OpError::Placement(_)));
    assert_eq!(state, before);

    let outcome = move_tile(&mut state, &config, root, 2, 30, COLS).unwrap();
    assert_eq!(outcome, MoveOutcome::Moved { from: 2, to: 30 });
    assert_eq!(claimed(&state, root), vec![0, 1, 10, 11, 30, 31]);
}

#[test]
fn footprints_are_rectangles_inside_the_grid() {
    let size = TileSize::new(3, 2);
    for anchor in 0..80 {
        let cells = footprint_cells(anchor, size, COLS, 80);
        if cells.is_empty() {
            continue;
        }
        let origin = index_to_row_col(anchor, COLS);
        for (offset, cell) in cells.iter().enumerate() {
            let pos = index_to_row_col(*cell, COLS);
            assert_eq!(pos.row, origin.row + offset / size.w);
            assert_eq!(pos.col, origin.col + offset % size.w);
            assert_eq!(row_col_to_index(pos, COLS), *cell);
        }
    }
}
