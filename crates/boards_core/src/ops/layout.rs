//! Move, item resize and grid resize operations.

use super::{anchored_ref, board_ref, ensure_in_range, OpError, OpResult};
use crate::config::{BoardsConfig, MovePolicy};
use crate::grid::{
    check_placement, index_to_row_col, resize_slots, FootprintLookup, GridResize, TileSize,
};
use crate::model::board::{BoardId, SlotRef};
use crate::model::item::ItemId;
use crate::model::state::BoardState;

/// Applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Drop target equals the source anchor.
    Unchanged,
    /// Tile now anchored at `to`; `from` is empty.
    Moved {
        /// Previous anchor.
        from: usize,
        /// New anchor.
        to: usize,
    },
    /// Two 1x1 tiles exchanged anchors.
    Swapped {
        /// First anchor.
        a: usize,
        /// Second anchor.
        b: usize,
    },
}

/// Moves the tile anchored at `from` so it is anchored at `to`.
///
/// # Errors
/// - `EmptySlot` when `from` holds no anchor.
/// - `SlotOutOfRange` for indices past the slot array.
/// - `Placement` when the footprint does not fit at `to`.
pub fn move_tile(
    state: &mut BoardState,
    config: &BoardsConfig,
    board_id: BoardId,
    from: usize,
    to: usize,
    cols: usize,
) -> OpResult<MoveOutcome> {
    let board = board_ref(state, board_id)?;
    let moving = anchored_ref(board, from)?;
    ensure_in_range(board, to)?;
    if from == to {
        return Ok(MoveOutcome::Unchanged);
    }

    let size = state.items.footprint(&moving);
    let swap_with = match (config.move_policy, board.slot(to)) {
        (MovePolicy::Swap, Some(other))
            if size.is_unit() && state.items.footprint(&other).is_unit() =>
        {
            Some(other)
        }
        _ => None,
    };

    if swap_with.is_none() {
        check_placement(&board.slots, &state.items, to, size, cols, Some(from))?;
    }

    let board = state
        .boards
        .get_mut(&board_id)
        .ok_or(OpError::BoardNotFound(board_id))?;
    match swap_with {
        Some(other) => {
            board.slots[from] = Some(other);
            board.slots[to] = Some(moving);
            Ok(MoveOutcome::Swapped { a: from, b: to })
        }
        None => {
            board.slots[from] = None;
            board.slots[to] = Some(moving);
            Ok(MoveOutcome::Moved { from, to })
        }
    }
}

fn item_at(state: &BoardState, board_id: BoardId, anchor: usize) -> OpResult<ItemId> {
    let board = board_ref(state, board_id)?;
    match anchored_ref(board, anchor)? {
        SlotRef::Board { .. } => Err(OpError::NotResizable(anchor)),
        SlotRef::Item { id } if state.items.contains_key(&id) => Ok(id),
        SlotRef::Item { id } => Err(OpError::ItemNotFound(id)),
    }
}

fn apply_item_size(
    state: &mut BoardState,
    board_id: BoardId,
    anchor: usize,
    item_id: ItemId,
    size: TileSize,
    cols: usize,
) -> OpResult<TileSize> {
    let board = board_ref(state, board_id)?;
    check_placement(&board.slots, &state.items, anchor, size, cols, Some(anchor))?;
    let item = state
        .items
        .get_mut(&item_id)
        .ok_or(OpError::ItemNotFound(item_id))?;
    item.set_size(size);
    Ok(item.size())
}

/// Resizes the item anchored at `anchor` so its bottom-right cell is `target`.
///
/// # Errors
/// - `NotResizable` for board tiles.
/// - `ResizeBehindAnchor` when `target` is above or left of the anchor.
/// - `Placement` when the new footprint wraps, overflows or overlaps.
pub fn resize_item(
    state: &mut BoardState,
    board_id: BoardId,
    anchor: usize,
    target: usize,
    cols: usize,
) -> OpResult<TileSize> {
    let item_id = item_at(state, board_id, anchor)?;
    ensure_in_range(board_ref(state, board_id)?, target)?;

    let from = index_to_row_col(anchor, cols);
    let to = index_to_row_col(target, cols);
    if to.row < from.row || to.col < from.col {
        return Err(OpError::ResizeBehindAnchor { anchor, target });
    }
    let size = TileSize::new(to.col - from.col + 1, to.row - from.row + 1);
    apply_item_size(state, board_id, anchor, item_id, size, cols)
}

/// Toggles an item between 1x1 and its kind default footprint.
///
/// # Errors
/// - Same as [`resize_item`] when the toggled size does not fit.
pub fn toggle_item_size(
    state: &mut BoardState,
    config: &BoardsConfig,
    board_id: BoardId,
    anchor: usize,
    cols: usize,
) -> OpResult<TileSize> {
    let item_id = item_at(state, board_id, anchor)?;
    let item = state.items.get(&item_id).ok_or(OpError::ItemNotFound(item_id))?;
    let size = if item.size().is_unit() {
        config.tile_sizes.for_kind(item.kind)
    } else {
        TileSize::UNIT
    };
    apply_item_size(state, board_id, anchor, item_id, size, cols)
}

/// Resizes a board's grid to `requested` slots (clamped to config bounds).
///
/// # Errors
/// - `Resize` when shrinking would cut a placed tile.
pub fn resize_grid(
    state: &mut BoardState,
    config: &BoardsConfig,
    board_id: BoardId,
    requested: usize,
    cols: usize,
) -> OpResult<GridResize> {
    let board = state
        .boards
        .get_mut(&board_id)
        .ok_or(OpError::BoardNotFound(board_id))?;
    resize_slots(&mut board.slots, &state.items, requested, cols, &config.grid).map_err(Into::into)
}

/// Direction of a one-step grid change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridStep {
    /// Add `step` slots.
    Grow,
    /// Remove `step` slots.
    Shrink,
}

/// Grows or shrinks a board by one configured step.
pub fn step_grid(
    state: &mut BoardState,
    config: &BoardsConfig,
    board_id: BoardId,
    direction: GridStep,
    cols: usize,
) -> OpResult<GridResize> {
    let current = board_ref(state, board_id)?.slot_count();
    let requested = match direction {
        GridStep::Grow => current.saturating_add(config.grid.step),
        GridStep::Shrink => current.saturating_sub(config.grid.step),
    };
    resize_grid(state, config, board_id, requested, cols)
}
