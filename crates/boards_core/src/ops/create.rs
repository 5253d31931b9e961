//! Tile creation at the first free cell.

use super::{board_ref, OpError, OpResult};
use crate::config::BoardsConfig;
use crate::grid::{first_fit, first_free_cell, Occupancy, TileSize};
use crate::model::board::{Board, BoardId, SlotRef};
use crate::model::item::{normalize_item_input, Item, ItemId, ItemKind};
use crate::model::state::BoardState;

/// Title used when a board is created without one.
pub const NEW_BOARD_TITLE: &str = "New Board";

/// Creates an empty child board in the first free cell of `parent_id`.
///
/// # Errors
/// - `BoardNotFound` when the parent is missing.
/// - `NoSpace` when every cell is covered.
pub fn create_board(
    state: &mut BoardState,
    config: &BoardsConfig,
    parent_id: BoardId,
    title: Option<&str>,
    cols: usize,
) -> OpResult<BoardId> {
    let parent = board_ref(state, parent_id)?;
    let occupancy = Occupancy::build(&parent.slots, &state.items, cols);
    let anchor = first_free_cell(&parent.slots, &occupancy).ok_or(OpError::NoSpace(parent_id))?;

    let title = title
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(NEW_BOARD_TITLE);
    let child = Board::new(title, Some(parent_id), config.grid.default_slots);
    let child_id = child.id;

    state.boards.insert(child_id, child);
    if let Some(parent) = state.boards.get_mut(&parent_id) {
        parent.slots[anchor] = Some(SlotRef::Board { id: child_id });
    }
    Ok(child_id)
}

/// Creates a note or link with its kind default footprint.
///
/// The item goes to the first cell where the default footprint fits. When
/// no cell fits it but a free cell exists, the item is placed there as 1x1.
///
/// # Errors
/// - `Input` when content is blank.
/// - `BoardNotFound` / `NoSpace` as for [`create_board`].
pub fn create_item(
    state: &mut BoardState,
    config: &BoardsConfig,
    board_id: BoardId,
    kind: ItemKind,
    title: Option<&str>,
    content: &str,
    cols: usize,
) -> OpResult<(ItemId, usize)> {
    let input = normalize_item_input(kind, title, content)?;
    let board = board_ref(state, board_id)?;
    let default_size = config.tile_sizes.for_kind(kind);

    let (anchor, size) = match first_fit(&board.slots, &state.items, default_size, cols) {
        Some(anchor) => (anchor, default_size),
        None => {
            let occupancy = Occupancy::build(&board.slots, &state.items, cols);
            let anchor =
                first_free_cell(&board.slots, &occupancy).ok_or(OpError::NoSpace(board_id))?;
            (anchor, TileSize::UNIT)
        }
    };

    let item = Item::new(board_id, kind, input.title, input.content, size);
    let item_id = item.id;
    state.items.insert(item_id, item);
    if let Some(board) = state.boards.get_mut(&board_id) {
        board.slots[anchor] = Some(SlotRef::Item { id: item_id });
    }
    Ok((item_id, anchor))
}

#[cfg(test)]
mod tests {
    use super::{create_board, create_item, NEW_BOARD_TITLE};
    use crate::config::BoardsConfig;
    use crate::grid::{Occupancy, TileSize};
    use crate::model::item::ItemKind;
    use crate::model::state::BoardState;
    use crate::ops::OpError;

    fn fixture(slots: usize) -> (BoardState, BoardsConfig, uuid::Uuid) {
        let config = BoardsConfig::default();
        let mut state = BoardState::bootstrap(&config.grid);
        let root_id = state.root_board().unwrap().id;
        state.boards.get_mut(&root_id).unwrap().slots = vec![None; slots];
        (state, config, root_id)
    }

    #[test]
    fn note_lands_at_first_cell_with_default_size() {
        let (mut state, config, root_id) = fixture(80);
        let (item_id, anchor) =
            create_item(&mut state, &config, root_id, ItemKind::Note, None, "hello", 10).unwrap();
        assert_eq!(anchor, 0);
        assert_eq!(state.items[&item_id].size(), TileSize::new(2, 2));

        let board = &state.boards[&root_id];
        let occupancy = Occupancy::build(&board.slots, &state.items, 10);
        let cells: Vec<usize> = occupancy.claimed_cells().map(|(cell, _)| cell).collect();
        assert_eq!(cells, vec![0, 1, 10, 11]);
    }

    #[test]
    fn second_note_skips_covered_cells() {
        let (mut state, config, root_id) = fixture(80);
        create_item(&mut state, &config, root_id, ItemKind::Note, None, "a", 10).unwrap();
        let (_, anchor) =
            create_item(&mut state, &config, root_id, ItemKind::Note, None, "b", 10).unwrap();
        assert_eq!(anchor, 2);
    }

    #[test]
    fn falls_back_to_unit_size_when_default_does_not_fit() {
        let (mut state, config, root_id) = fixture(4);
        let (item_id, anchor) =
            create_item(&mut state, &config, root_id, ItemKind::Note, None, "x", 4).unwrap();
        assert_eq!(anchor, 0);
        assert_eq!(state.items[&item_id].size(), TileSize::UNIT);
    }

    #[test]
    fn full_board_reports_no_space_without_mutation() {
        let (mut state, config, root_id) = fixture(2);
        create_board(&mut state, &config, root_id, None, 2).unwrap();
        create_board(&mut state, &config, root_id, None, 2).unwrap();
        let before = state.clone();

        let err = create_item(&mut state, &config, root_id, ItemKind::Link, None, "a.b", 2)
            .unwrap_err();
        assert_eq!(err, OpError::NoSpace(root_id));
        assert_eq!(state, before);
    }

    #[test]
    fn child_board_links_back_to_parent() {
        let (mut state, config, root_id) = fixture(20);
        let child_id = create_board(&mut state, &config, root_id, Some("  "), 10).unwrap();
        let child = &state.boards[&child_id];
        assert_eq!(child.parent_id, Some(root_id));
        assert_eq!(child.title, NEW_BOARD_TITLE);
        assert_eq!(child.slot_count(), config.grid.default_slots);
    }
}
