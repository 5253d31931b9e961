//! Tile deletion and recursive board removal.

use super::{anchored_ref, board_ref, OpResult};
use crate::model::board::{BoardId, SlotRef};
use crate::model::item::ItemId;
use crate::model::state::BoardState;
use std::collections::HashSet;

/// Records removed by one trash operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrashOutcome {
    /// Removed boards, children before parents.
    pub removed_boards: Vec<BoardId>,
    /// Removed items.
    pub removed_items: Vec<ItemId>,
}

impl TrashOutcome {
    /// Returns whether `board_id` was removed.
    pub fn removed_board(&self, board_id: BoardId) -> bool {
        self.removed_boards.contains(&board_id)
    }
}

/// Deletes the tile anchored at `index` on `board_id`.
///
/// Items are removed from the item table; boards are removed recursively
/// with [`delete_board_recursive`]. The originating slot is cleared when
/// its board still exists afterwards.
///
/// # Errors
/// - `BoardNotFound`, `SlotOutOfRange`, `EmptySlot` for bad targets.
pub fn trash_tile(state: &mut BoardState, board_id: BoardId, index: usize) -> OpResult<TrashOutcome> {
    let slot_ref = anchored_ref(board_ref(state, board_id)?, index)?;

    let outcome = match slot_ref {
        SlotRef::Item { id } => {
            let mut outcome = TrashOutcome::default();
            if state.items.remove(&id).is_some() {
                outcome.removed_items.push(id);
            }
            outcome
        }
        SlotRef::Board { id } => delete_board_recursive(state, id),
    };

    if let Some(board) = state.boards.get_mut(&board_id) {
        board.slots[index] = None;
    }
    Ok(outcome)
}

/// Removes `board_id`, every board and item reachable through its slots,
/// and every reference to a removed record left in the remaining boards.
///
/// Missing boards are tolerated and yield an empty outcome.
pub fn delete_board_recursive(state: &mut BoardState, board_id: BoardId) -> TrashOutcome {
    let mut outcome = TrashOutcome::default();
    let mut visited = HashSet::new();
    remove_subtree(state, board_id, &mut visited, &mut outcome);

    let removed_boards: HashSet<BoardId> = outcome.removed_boards.iter().copied().collect();

    // Items owned by a removed board but not anchored in its slots.
    let orphans: Vec<ItemId> = state
        .items
        .values()
        .filter(|item| removed_boards.contains(&item.board_id))
        .map(|item| item.id)
        .collect();
    for id in orphans {
        state.items.remove(&id);
        outcome.removed_items.push(id);
    }

    let removed_items: HashSet<ItemId> = outcome.removed_items.iter().copied().collect();
    for board in state.boards.values_mut() {
        for slot in board.slots.iter_mut() {
            let dangling = match slot {
                Some(SlotRef::Board { id }) => removed_boards.contains(id),
                Some(SlotRef::Item { id }) => removed_items.contains(id),
                None => false,
            };
            if dangling {
                *slot = None;
            }
        }
    }

    outcome
}

fn remove_subtree(
    state: &mut BoardState,
    board_id: BoardId,
    visited: &mut HashSet<BoardId>,
    outcome: &mut TrashOutcome,
) {
    if !visited.insert(board_id) {
        return;
    }
    let Some(board) = state.boards.get(&board_id) else {
        return;
    };
    let refs: Vec<SlotRef> = board.anchors().map(|(_, slot_ref)| slot_ref).collect();

    for slot_ref in refs {
        match slot_ref {
            SlotRef::Board { id } => remove_subtree(state, id, visited, outcome),
            SlotRef::Item { id } => {
                if state.items.remove(&id).is_some() {
                    outcome.removed_items.push(id);
                }
            }
        }
    }

    if state.boards.remove(&board_id).is_some() {
        outcome.removed_boards.push(board_id);
    }
}

#[cfg(test)]
mod tests {
    use super::{delete_board_recursive, trash_tile};
    use crate::config::BoardsConfig;
    use crate::model::board::SlotRef;
    use crate::model::item::ItemKind;
    use crate::model::state::BoardState;
    use crate::ops::{create_board, create_item, OpError};

    #[test]
    fn trash_item_clears_slot_and_table() {
        let config = BoardsConfig::default();
        let mut state = BoardState::bootstrap(&config.grid);
        let root_id = state.root_board().unwrap().id;
        let (item_id, anchor) =
            create_item(&mut state, &config, root_id, ItemKind::Note, None, "a", 10).unwrap();

        let outcome = trash_tile(&mut state, root_id, anchor).unwrap();
        assert_eq!(outcome.removed_items, vec![item_id]);
        assert!(state.items.is_empty());
        assert!(state.boards[&root_id].slots[anchor].is_none());
    }

    #[test]
    fn trash_empty_slot_is_refused() {
        let config = BoardsConfig::default();
        let mut state = BoardState::bootstrap(&config.grid);
        let root_id = state.root_board().unwrap().id;
        assert_eq!(
            trash_tile(&mut state, root_id, 3).unwrap_err(),
            OpError::EmptySlot(3)
        );
    }

    #[test]
    fn recursive_delete_survives_cycles_and_sweeps_stray_refs() {
        let config = BoardsConfig::default();
        let mut state = BoardState::bootstrap(&config.grid);
        let root_id = state.root_board().unwrap().id;
        let a = create_board(&mut state, &config, root_id, Some("A"), 10).unwrap();
        let b = create_board(&mut state, &config, a, Some("B"), 10).unwrap();
        // Corrupt: B also points back at A, and root holds a second ref to B.
        state.boards.get_mut(&b).unwrap().slots[0] = Some(SlotRef::Board { id: a });
        state.boards.get_mut(&root_id).unwrap().slots[5] = Some(SlotRef::Board { id: b });

        let outcome = delete_board_recursive(&mut state, a);
        assert!(outcome.removed_board(a));
        assert!(outcome.removed_board(b));
        assert_eq!(state.boards.len(), 1);
        let root = &state.boards[&root_id];
        assert!(root.slots.iter().all(Option::is_none));
    }
}
