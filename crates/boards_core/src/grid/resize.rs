//! Safe grow/shrink of a board's slot array.

use super::occupancy::{FootprintLookup, Occupancy};
use crate::config::GridLimits;
use crate::model::board::Slot;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Applied grid size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridResize {
    /// Clamped target equals the current size.
    Unchanged {
        /// Current slot count.
        size: usize,
    },
    /// Empty slots were appended.
    Grown {
        /// Previous slot count.
        from: usize,
        /// New slot count.
        to: usize,
    },
    /// Trailing empty slots were dropped.
    Shrunk {
        /// Previous slot count.
        from: usize,
        /// New slot count.
        to: usize,
    },
}

impl GridResize {
    /// Slot count after the change.
    pub fn new_size(&self) -> usize {
        match self {
            Self::Unchanged { size } => *size,
            Self::Grown { to, .. } | Self::Shrunk { to, .. } => *to,
        }
    }
}

/// Refused grid size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridResizeError {
    /// A covered cell lies at or beyond the new size.
    WouldTruncate {
        /// Clamped target size.
        requested: usize,
        /// Highest covered cell that would be cut off.
        blocking_cell: usize,
    },
}

impl Display for GridResizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WouldTruncate {
                requested,
                blocking_cell,
            } => write!(
                f,
                "cannot shrink to {requested} slots: slot {} holds a tile that would be removed; move or resize it first",
                blocking_cell + 1
            ),
        }
    }
}

impl Error for GridResizeError {}

/// Grows or shrinks `slots` to `requested`, clamped to `limits`.
///
/// Leaves `slots` untouched when shrinking would cut a covered cell.
///
/// # Errors
/// - `WouldTruncate` when any covered cell index is `>=` the clamped size.
pub fn resize_slots<L>(
    slots: &mut Vec<Slot>,
    lookup: &L,
    requested: usize,
    cols: usize,
    limits: &GridLimits,
) -> Result<GridResize, GridResizeError>
where
    L: FootprintLookup + ?Sized,
{
    let target = limits.clamp(requested);
    let current = slots.len();

    if target < current {
        let occupancy = Occupancy::build(slots, lookup, cols);
        if let Some(blocking_cell) = occupancy.last_claimed().filter(|cell| *cell >= target) {
            return Err(GridResizeError::WouldTruncate {
                requested: target,
                blocking_cell,
            });
        }
        slots.truncate(target);
        return Ok(GridResize::Shrunk {
            from: current,
            to: target,
        });
    }

    if target > current {
        slots.resize(target, None);
        return Ok(GridResize::Grown {
            from: current,
            to: target,
        });
    }

    Ok(GridResize::Unchanged { size: current })
}
