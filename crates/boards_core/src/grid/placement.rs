//! Placement validation for anchored footprints.

use super::geometry::{index_to_row_col, TileSize};
use super::occupancy::{FootprintLookup, Occupancy};
use crate::model::board::Slot;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a footprint cannot be placed at an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// Footprint would continue past the last column.
    Wraps {
        /// Requested anchor.
        anchor: usize,
        /// Requested footprint.
        size: TileSize,
        /// Current column count.
        cols: usize,
    },
    /// Footprint would leave the slot array.
    OutOfBounds {
        /// Requested anchor.
        anchor: usize,
        /// Requested footprint.
        size: TileSize,
        /// Board slot count.
        total_slots: usize,
    },
    /// A cell is already covered by another anchor.
    Conflict {
        /// First contested cell.
        cell: usize,
        /// Anchor that owns it.
        owner: usize,
    },
}

impl Display for PlacementError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wraps { anchor, size, cols } => write!(
                f,
                "a {}x{} tile at slot {} would wrap past column {cols}",
                size.w,
                size.h,
                anchor + 1
            ),
            Self::OutOfBounds {
                anchor,
                size,
                total_slots,
            } => write!(
                f,
                "a {}x{} tile at slot {} does not fit in {total_slots} slots",
                size.w,
                size.h,
                anchor + 1
            ),
            Self::Conflict { cell, owner } => write!(
                f,
                "slot {} is already covered by the tile at slot {}",
                cell + 1,
                owner + 1
            ),
        }
    }
}

impl Error for PlacementError {}

/// Validates bounds and returns the row-major footprint cells.
pub(crate) fn bounded_footprint(
    anchor: usize,
    size: TileSize,
    cols: usize,
    total_slots: usize,
) -> Result<Vec<usize>, PlacementError> {
    let cols = cols.max(1);
    let size = TileSize::new(size.w, size.h);
    let pos = index_to_row_col(anchor, cols);
    if pos.col + size.w - 1 > cols {
        return Err(PlacementError::Wraps { anchor, size, cols });
    }

    let last = anchor + (size.h - 1) * cols + (size.w - 1);
    if last >= total_slots {
        return Err(PlacementError::OutOfBounds {
            anchor,
            size,
            total_slots,
        });
    }

    let mut cells = Vec::with_capacity(size.area());
    for dy in 0..size.h {
        let row_start = anchor + dy * cols;
        cells.extend(row_start..row_start + size.w);
    }
    Ok(cells)
}

/// Validates a footprint against an already-built occupancy map.
pub(crate) fn check_against(
    occupancy: &Occupancy,
    anchor: usize,
    size: TileSize,
    cols: usize,
    total_slots: usize,
    exclude_anchor: Option<usize>,
) -> Result<(), PlacementError> {
    for cell in bounded_footprint(anchor, size, cols, total_slots)? {
        if let Some(owner) = occupancy.owner(cell) {
            if Some(owner) != exclude_anchor {
                return Err(PlacementError::Conflict { cell, owner });
            }
        }
    }
    Ok(())
}

/// Checks whether a `size` footprint can be anchored at `anchor`.
///
/// Cells owned by `exclude_anchor` count as free, so a tile can be
/// resized in place or moved over its own previous footprint.
///
/// # Errors
/// - `Wraps` / `OutOfBounds` when the rectangle leaves the grid.
/// - `Conflict` when a cell belongs to a different anchor.
pub fn check_placement<L>(
    slots: &[Slot],
    lookup: &L,
    anchor: usize,
    size: TileSize,
    cols: usize,
    exclude_anchor: Option<usize>,
) -> Result<(), PlacementError>
where
    L: FootprintLookup + ?Sized,
{
    bounded_footprint(anchor, size, cols, slots.len())?;
    let occupancy = Occupancy::build(slots, lookup, cols);
    check_against(&occupancy, anchor, size, cols, slots.len(), exclude_anchor)
}

/// Boolean form of [`check_placement`].
pub fn can_place<L>(
    slots: &[Slot],
    lookup: &L,
    anchor: usize,
    size: TileSize,
    cols: usize,
    exclude_anchor: Option<usize>,
) -> bool
where
    L: FootprintLookup + ?Sized,
{
    check_placement(slots, lookup, anchor, size, cols, exclude_anchor).is_ok()
}
