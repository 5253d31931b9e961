//! Grid occupancy and layout engine.
//!
//! # Responsibility
//! - Map linear slot indices to 1-based row/column positions.
//! - Derive which cells every anchored tile covers.
//! - Validate placements and grid resizes without mutating on refusal.
//!
//! # Invariants
//! - The column count is always supplied by the caller (layout-derived).
//! - Footprints never wrap past the right edge or run off the slot array.
//! - Shrinking never drops a cell covered by a placed tile.

mod geometry;
mod occupancy;
mod placement;
mod resize;

pub use geometry::{index_to_row_col, row_col_to_index, GridPos, TileSize};
pub use occupancy::{
    first_fit, first_free_cell, footprint_cells, FootprintLookup, Occupancy, OccupancyConflict,
};
pub use placement::{can_place, check_placement, PlacementError};
pub use resize::{resize_slots, GridResize, GridResizeError};
