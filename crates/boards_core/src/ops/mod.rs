//! Board mutation operations.
//!
//! # Responsibility
//! - Apply one user-level change (create, move, resize, trash, edit) to a
//!   `BoardState` using the grid engine for every placement decision.
//!
//! # Invariants
//! - Every operation validates fully before its first write; a returned
//!   error means the state is unchanged.
//! - Operations are stateless between calls; pending picks live in
//!   `interaction::Interaction`, never here.

mod create;
mod edit;
mod layout;
mod trash;

pub use create::{create_board, create_item, NEW_BOARD_TITLE};
pub use edit::{rename_board, update_item};
pub use layout::{move_tile, resize_grid, resize_item, step_grid, toggle_item_size, GridStep, MoveOutcome};
pub use trash::{delete_board_recursive, trash_tile, TrashOutcome};

use crate::grid::{GridResizeError, PlacementError};
use crate::model::board::{Board, BoardId, SlotRef};
use crate::model::item::{ItemId, ItemInputError};
use crate::model::state::BoardState;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for board operations.
pub type OpResult<T> = Result<T, OpError>;

/// Refusal reasons for board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    /// Target board does not exist.
    BoardNotFound(BoardId),
    /// Target item does not exist.
    ItemNotFound(ItemId),
    /// Slot index is outside the board's slot array.
    SlotOutOfRange {
        /// Requested index.
        index: usize,
        /// Board slot count.
        slot_count: usize,
    },
    /// Slot holds no anchor.
    EmptySlot(usize),
    /// No free cell left on the board.
    NoSpace(BoardId),
    /// Footprint does not fit at the destination.
    Placement(PlacementError),
    /// Shrinking would remove placed tiles.
    Resize(GridResizeError),
    /// Board tiles always stay 1x1.
    NotResizable(usize),
    /// Resize target lies above or left of the anchor.
    ResizeBehindAnchor {
        /// Item anchor.
        anchor: usize,
        /// Clicked cell.
        target: usize,
    },
    /// Board title is blank after trim.
    InvalidTitle,
    /// Item title/content failed normalization.
    Input(ItemInputError),
}

impl Display for OpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::SlotOutOfRange { index, slot_count } => write!(
                f,
                "slot {} is outside the grid of {slot_count} slots",
                index + 1
            ),
            Self::EmptySlot(index) => write!(f, "slot {} is empty", index + 1),
            Self::NoSpace(_) => write!(f, "no empty slots left in this board"),
            Self::Placement(err) => write!(f, "{err}"),
            Self::Resize(err) => write!(f, "{err}"),
            Self::NotResizable(index) => {
                write!(f, "the board tile at slot {} cannot be resized", index + 1)
            }
            Self::ResizeBehindAnchor { anchor, target } => write!(
                f,
                "slot {} lies above or left of the tile at slot {}",
                target + 1,
                anchor + 1
            ),
            Self::InvalidTitle => write!(f, "board title must not be blank"),
            Self::Input(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Placement(err) => Some(err),
            Self::Resize(err) => Some(err),
            Self::Input(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlacementError> for OpError {
    fn from(value: PlacementError) -> Self {
        Self::Placement(value)
    }
}

impl From<GridResizeError> for OpError {
    fn from(value: GridResizeError) -> Self {
        Self::Resize(value)
    }
}

impl From<ItemInputError> for OpError {
    fn from(value: ItemInputError) -> Self {
        Self::Input(value)
    }
}

fn board_ref(state: &BoardState, board_id: BoardId) -> OpResult<&Board> {
    state
        .boards
        .get(&board_id)
        .ok_or(OpError::BoardNotFound(board_id))
}

fn ensure_in_range(board: &Board, index: usize) -> OpResult<()> {
    if index >= board.slot_count() {
        return Err(OpError::SlotOutOfRange {
            index,
            slot_count: board.slot_count(),
        });
    }
    Ok(())
}

fn anchored_ref(board: &Board, index: usize) -> OpResult<SlotRef> {
    ensure_in_range(board, index)?;
    board.slot(index).ok_or(OpError::EmptySlot(index))
}
