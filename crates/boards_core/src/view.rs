//! Presentation projection of one board.
//!
//! # Responsibility
//! - Hand the renderer everything it needs for one board: slots, owner per
//!   cell, resolved tile footprints and the breadcrumb chain.
//!
//! # Invariants
//! - Dangling slot refs are projected as `TileContent::Missing`, never dropped.
//! - Tiles are listed in anchor order.

use crate::grid::{index_to_row_col, FootprintLookup, GridPos, Occupancy, TileSize};
use crate::model::board::{BoardId, SlotRef};
use crate::model::item::{ItemId, ItemKind};
use crate::model::state::BoardState;

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    /// Board id.
    pub board_id: BoardId,
    /// Board title.
    pub title: String,
}

/// What a tile shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileContent {
    /// Nested board tile.
    Board {
        /// Child board id.
        id: BoardId,
        /// Child board title.
        title: String,
    },
    /// Note or link tile.
    Item {
        /// Item id.
        id: ItemId,
        /// Item kind.
        kind: ItemKind,
        /// Optional title.
        title: Option<String>,
        /// Note text or URL.
        content: String,
    },
    /// Slot points at a record that no longer exists.
    Missing(SlotRef),
}

/// One anchored tile with its resolved footprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    /// Anchor slot index.
    pub anchor: usize,
    /// Anchor position.
    pub pos: GridPos,
    /// Footprint size.
    pub size: TileSize,
    /// Displayed record.
    pub content: TileContent,
}

/// Render-ready snapshot of one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Board id.
    pub board_id: BoardId,
    /// Board title.
    pub title: String,
    /// Column count the view was computed for.
    pub cols: usize,
    /// Total slot count.
    pub slot_count: usize,
    /// Root-to-board chain.
    pub breadcrumb: Vec<Crumb>,
    /// Anchored tiles.
    pub tiles: Vec<TileView>,
    /// Owner anchor per cell (`None` for free cells).
    pub occupancy: Vec<Option<usize>>,
}

impl BoardView {
    /// Cells inside a footprint that are not the footprint's anchor.
    pub fn covered_cells(&self) -> Vec<usize> {
        self.occupancy
            .iter()
            .enumerate()
            .filter_map(|(cell, owner)| owner.filter(|anchor| *anchor != cell).map(|_| cell))
            .collect()
    }

    /// Free cells (empty and uncovered).
    pub fn free_cells(&self) -> Vec<usize> {
        self.occupancy
            .iter()
            .enumerate()
            .filter_map(|(cell, owner)| owner.is_none().then_some(cell))
            .collect()
    }
}

/// Builds the view of `board_id`, or `None` when the board does not exist.
pub fn board_view(state: &BoardState, board_id: BoardId, cols: usize) -> Option<BoardView> {
    let board = state.board(board_id)?;
    let occupancy = Occupancy::build(&board.slots, state, cols);

    let tiles = board
        .anchors()
        .map(|(anchor, slot_ref)| TileView {
            anchor,
            pos: index_to_row_col(anchor, cols),
            size: state.footprint(&slot_ref),
            content: tile_content(state, slot_ref),
        })
        .collect();

    let breadcrumb = state
        .breadcrumb(board_id)
        .into_iter()
        .map(|crumb| Crumb {
            board_id: crumb.id,
            title: crumb.title.clone(),
        })
        .collect();

    Some(BoardView {
        board_id,
        title: board.title.clone(),
        cols: cols.max(1),
        slot_count: board.slot_count(),
        breadcrumb,
        tiles,
        occupancy: occupancy.owners().to_vec(),
    })
}

fn tile_content(state: &BoardState, slot_ref: SlotRef) -> TileContent {
    match slot_ref {
        SlotRef::Board { id } => match state.board(id) {
            Some(board) => TileContent::Board {
                id,
                title: board.title.clone(),
            },
            None => TileContent::Missing(slot_ref),
        },
        SlotRef::Item { id } => match state.item(id) {
            Some(item) => TileContent::Item {
                id,
                kind: item.kind,
                title: item.title.clone(),
                content: item.content.clone(),
            },
            None => TileContent::Missing(slot_ref),
        },
    }
}
