//! Index <-> row/column conversion.
//!
//! Rows and columns are 1-based; slot indices are 0-based. A column count
//! of zero is treated as one so callers never divide by zero.

use serde::{Deserialize, Serialize};

/// 1-based grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    /// 1-based row.
    pub row: usize,
    /// 1-based column.
    pub col: usize,
}

/// Width/height of a tile in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSize {
    /// Columns covered.
    pub w: usize,
    /// Rows covered.
    pub h: usize,
}

impl TileSize {
    /// Single-cell footprint.
    pub const UNIT: Self = Self { w: 1, h: 1 };

    /// Creates a size floored at 1x1.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w: w.max(1),
            h: h.max(1),
        }
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.w * self.h
    }

    /// Returns whether this is a 1x1 footprint.
    pub fn is_unit(&self) -> bool {
        self.w <= 1 && self.h <= 1
    }
}

/// Converts a slot index to its 1-based row/column.
pub fn index_to_row_col(index: usize, cols: usize) -> GridPos {
    let cols = cols.max(1);
    GridPos {
        row: index / cols + 1,
        col: index % cols + 1,
    }
}

/// Converts a 1-based row/column back to a slot index.
///
/// Row/column `0` is treated as `1`.
pub fn row_col_to_index(pos: GridPos, cols: usize) -> usize {
    let cols = cols.max(1);
    (pos.row.max(1) - 1) * cols + (pos.col.max(1) - 1)
}
