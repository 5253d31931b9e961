//! UI tool modes and click dispatch.
//!
//! # Responsibility
//! - Model the active tool and the pending pick as a value owned by the
//!   presentation layer.
//! - Route one cell click to the matching board operation.
//!
//! # Invariants
//! - A pending pick never survives a mode switch or navigation.
//! - A pick recorded on another board, or whose anchor is gone, is dropped
//!   before dispatch.
//! - A refused drop/resize keeps the pick so another target can be chosen.
//! - In move mode, clicking a different tile re-picks it unless the swap
//!   policy applies to two 1x1 tiles.

use crate::config::{BoardsConfig, MovePolicy};
use crate::grid::{FootprintLookup, Occupancy, TileSize};
use crate::model::board::{BoardId, SlotRef};
use crate::model::item::ItemId;
use crate::model::state::BoardState;
use crate::ops::{
    move_tile, resize_item, toggle_item_size, trash_tile, MoveOutcome, OpError, OpResult,
    TrashOutcome,
};

/// Active tool. Modes are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolMode {
    /// Plain clicks open boards and edit items.
    #[default]
    None,
    /// Pick a tile, then a destination cell.
    Move,
    /// Pick an item, then its new bottom-right cell.
    Size,
    /// Click a tile to delete it.
    Trash,
}

impl ToolMode {
    /// Parses a lowercase mode label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(Self::None),
            "move" => Some(Self::Move),
            "size" | "resize" => Some(Self::Size),
            "trash" => Some(Self::Trash),
            _ => None,
        }
    }

    /// Stable lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Move => "move",
            Self::Size => "size",
            Self::Trash => "trash",
        }
    }
}

/// Tile selected by the first click of a two-step operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    /// Board the pick was made on.
    pub board_id: BoardId,
    /// Anchor index of the picked tile.
    pub slot_index: usize,
}

/// Mode plus pending pick, passed into every click dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interaction {
    mode: ToolMode,
    pick: Option<Pick>,
}

impl Interaction {
    /// Starts in `mode` with no pick.
    pub fn new(mode: ToolMode) -> Self {
        Self { mode, pick: None }
    }

    /// Restores an interaction, e.g. from FFI arguments.
    pub fn with_pick(mode: ToolMode, pick: Option<Pick>) -> Self {
        Self { mode, pick }
    }

    /// Active tool.
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Pending pick, if any.
    pub fn pick(&self) -> Option<Pick> {
        self.pick
    }

    /// Switches tool and discards the pending pick.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
        self.pick = None;
    }

    /// Discards the pending pick after the viewed board changes.
    pub fn on_navigate(&mut self) {
        self.pick = None;
    }

    /// Discards the pending pick.
    pub fn cancel(&mut self) {
        self.pick = None;
    }
}

/// Result of one dispatched click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing to do for this cell in this mode.
    Ignored,
    /// Navigate into a child board.
    OpenBoard(BoardId),
    /// Open the editor for an item.
    EditItem(ItemId),
    /// First click of move/size recorded a pick.
    Picked {
        /// Picked anchor.
        anchor: usize,
    },
    /// The picked tile was clicked again; pick discarded.
    PickCleared,
    /// Move applied.
    Moved(MoveOutcome),
    /// Item footprint changed.
    Resized {
        /// Item anchor.
        anchor: usize,
        /// New footprint.
        size: TileSize,
    },
    /// Tile deleted.
    Trashed(TrashOutcome),
}

impl ClickOutcome {
    /// Returns whether the state was changed and must be persisted.
    pub fn is_mutation(&self) -> bool {
        match self {
            Self::Moved(outcome) => *outcome != MoveOutcome::Unchanged,
            Self::Resized { .. } | Self::Trashed(_) => true,
            Self::Ignored
            | Self::OpenBoard(_)
            | Self::EditItem(_)
            | Self::Picked { .. }
            | Self::PickCleared => false,
        }
    }
}

/// Dispatches a click on `cell` of `board_id` for the active mode.
///
/// A click on any cell of a tile's footprint addresses that tile's anchor,
/// except for drop/resize targets, which use the clicked cell itself.
///
/// # Errors
/// - Any `OpError` from the underlying operation; the state is unchanged.
pub fn dispatch_click(
    state: &mut BoardState,
    config: &BoardsConfig,
    interaction: &mut Interaction,
    board_id: BoardId,
    cell: usize,
    cols: usize,
) -> OpResult<ClickOutcome> {
    let board = state
        .boards
        .get(&board_id)
        .ok_or(OpError::BoardNotFound(board_id))?;
    if cell >= board.slot_count() {
        return Err(OpError::SlotOutOfRange {
            index: cell,
            slot_count: board.slot_count(),
        });
    }

    let occupancy = Occupancy::build(&board.slots, &state.items, cols);
    let owner = occupancy.owner(cell);
    let owner_ref = owner.and_then(|anchor| board.slot(anchor));

    if let Some(pick) = interaction.pick {
        if pick.board_id != board_id || board.slot(pick.slot_index).is_none() {
            interaction.pick = None;
        }
    }
    let pending = interaction.pick.map(|pick| pick.slot_index);
    let repick = match (pending, owner) {
        (Some(from), Some(other)) if other != from => {
            let unit = |index: usize| {
                board
                    .slot(index)
                    .is_some_and(|slot_ref| state.items.footprint(&slot_ref).is_unit())
            };
            let swaps =
                config.move_policy == MovePolicy::Swap && other == cell && unit(from) && unit(other);
            !swaps
        }
        _ => false,
    };

    match interaction.mode {
        ToolMode::None => Ok(match owner_ref {
            Some(SlotRef::Board { id }) if state.boards.contains_key(&id) => {
                ClickOutcome::OpenBoard(id)
            }
            Some(SlotRef::Item { id }) if state.items.contains_key(&id) => {
                ClickOutcome::EditItem(id)
            }
            _ => ClickOutcome::Ignored,
        }),
        ToolMode::Trash => match owner {
            Some(anchor) => Ok(ClickOutcome::Trashed(trash_tile(state, board_id, anchor)?)),
            None => Ok(ClickOutcome::Ignored),
        },
        ToolMode::Move => match (pending, owner) {
            (None, Some(anchor)) => Ok(pick(interaction, board_id, anchor)),
            (None, None) => Ok(ClickOutcome::Ignored),
            (Some(_), Some(other)) if repick => Ok(pick(interaction, board_id, other)),
            (Some(from), _) if from == cell => {
                interaction.pick = None;
                Ok(ClickOutcome::PickCleared)
            }
            (Some(from), _) => {
                let outcome = move_tile(state, config, board_id, from, cell, cols)?;
                interaction.pick = None;
                Ok(ClickOutcome::Moved(outcome))
            }
        },
        ToolMode::Size => match (pending, owner_ref) {
            (None, Some(SlotRef::Board { .. })) => {
                Err(OpError::NotResizable(owner.unwrap_or(cell)))
            }
            (None, Some(SlotRef::Item { .. })) => {
                Ok(pick(interaction, board_id, owner.unwrap_or(cell)))
            }
            (None, None) => Ok(ClickOutcome::Ignored),
            (Some(anchor), _) => {
                let size = if anchor == cell {
                    toggle_item_size(state, config, board_id, anchor, cols)?
                } else {
                    resize_item(state, board_id, anchor, cell, cols)?
                };
                interaction.pick = None;
                Ok(ClickOutcome::Resized { anchor, size })
            }
        },
    }
}

fn pick(interaction: &mut Interaction, board_id: BoardId, anchor: usize) -> ClickOutcome {
    interaction.pick = Some(Pick {
        board_id,
        slot_index: anchor,
    });
    ClickOutcome::Picked { anchor }
}
