//! Whole-application state: board arena plus item table.
//!
//! # Responsibility
//! - Own every board and item record keyed by stable id.
//! - Resolve navigation targets (root fallback, breadcrumb chain).
//!
//! # Invariants
//! - Normal operation keeps exactly one root board, but zero or several
//!   roots are tolerated; lookups fall back to the first root found.
//! - Breadcrumb walks never loop, even on corrupted parent links.

use crate::config::GridLimits;
use crate::model::board::{Board, BoardId};
use crate::model::item::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Title given to the board created at bootstrap.
pub const ROOT_BOARD_TITLE: &str = "My Board";

/// Id-indexed item table.
pub type ItemTable = HashMap<ItemId, Item>;

/// Persisted application state: `{ boards: {id: Board}, items: {id: Item} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// Board arena.
    pub boards: HashMap<BoardId, Board>,
    /// Item table shared by all boards.
    pub items: ItemTable,
}

impl BoardState {
    /// Creates a state holding one empty root board.
    pub fn bootstrap(limits: &GridLimits) -> Self {
        let root = Board::new(ROOT_BOARD_TITLE, None, limits.default_slots);
        let mut boards = HashMap::new();
        boards.insert(root.id, root);
        Self {
            boards,
            items: HashMap::new(),
        }
    }

    /// Loads one board by id.
    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.get(&id)
    }

    /// Loads one item by id.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Returns the first root board.
    ///
    /// Several roots can only appear through imported data; the one with the
    /// smallest id wins so the choice is stable across loads.
    pub fn root_board(&self) -> Option<&Board> {
        self.boards
            .values()
            .filter(|board| board.is_root())
            .min_by_key(|board| board.id)
    }

    /// Resolves a navigation target, redirecting to the root when the
    /// requested board is absent.
    pub fn resolve_board(&self, requested: Option<BoardId>) -> Option<BoardId> {
        requested
            .filter(|id| self.boards.contains_key(id))
            .or_else(|| self.root_board().map(|board| board.id))
    }

    /// Returns the root-to-board chain for `board_id`.
    ///
    /// Stops at a missing parent or a revisited id.
    pub fn breadcrumb(&self, board_id: BoardId) -> Vec<&Board> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor = self.boards.get(&board_id);
        while let Some(board) = cursor {
            if !visited.insert(board.id) {
                break;
            }
            chain.push(board);
            cursor = board.parent_id.and_then(|parent| self.boards.get(&parent));
        }
        chain.reverse();
        chain
    }
}
