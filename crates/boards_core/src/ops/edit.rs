//! Title/content edits that do not touch the grid.

use super::{OpError, OpResult};
use crate::model::board::BoardId;
use crate::model::item::{normalize_item_input, ItemId};
use crate::model::state::BoardState;

/// Renames a board. The title is trimmed and must not be blank.
pub fn rename_board(state: &mut BoardState, board_id: BoardId, title: &str) -> OpResult<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(OpError::InvalidTitle);
    }
    let board = state
        .boards
        .get_mut(&board_id)
        .ok_or(OpError::BoardNotFound(board_id))?;
    board.title = title.to_string();
    Ok(())
}

/// Replaces an item's title and content, normalized for its kind.
pub fn update_item(
    state: &mut BoardState,
    item_id: ItemId,
    title: Option<&str>,
    content: &str,
) -> OpResult<()> {
    let item = state
        .items
        .get_mut(&item_id)
        .ok_or(OpError::ItemNotFound(item_id))?;
    let input = normalize_item_input(item.kind, title, content)?;
    item.title = input.title;
    item.content = input.content;
    Ok(())
}
