//! Occupancy map: which anchor owns each covered cell.
//!
//! # Invariants
//! - Every non-empty slot claims at least its own anchor cell.
//! - On conflicting claims the first anchor in slot order keeps the cell;
//!   later claims are recorded in `conflicts()` instead of failing.

use super::geometry::TileSize;
use super::placement::{bounded_footprint, check_against};
use crate::model::board::{Slot, SlotRef};
use crate::model::state::{BoardState, ItemTable};
use log::warn;

/// Resolves the footprint size of a slot reference.
pub trait FootprintLookup {
    /// Returns the size covered by `slot_ref`, floored at 1x1.
    fn footprint(&self, slot_ref: &SlotRef) -> TileSize;
}

impl FootprintLookup for ItemTable {
    fn footprint(&self, slot_ref: &SlotRef) -> TileSize {
        match slot_ref {
            SlotRef::Board { .. } => TileSize::UNIT,
            // Dangling item refs render as a 1x1 placeholder.
            SlotRef::Item { id } => self.get(id).map_or(TileSize::UNIT, |item| item.size()),
        }
    }
}

impl FootprintLookup for BoardState {
    fn footprint(&self, slot_ref: &SlotRef) -> TileSize {
        self.items.footprint(slot_ref)
    }
}

/// Returns every cell of a `size` rectangle anchored at `anchor`, row-major.
///
/// Returns an empty list when the rectangle would wrap past column `cols`
/// or leave `[0, total_slots)`.
pub fn footprint_cells(anchor: usize, size: TileSize, cols: usize, total_slots: usize) -> Vec<usize> {
    bounded_footprint(anchor, size, cols, total_slots).unwrap_or_default()
}

/// A claim dropped because another anchor already owned the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupancyConflict {
    /// Contested cell.
    pub cell: usize,
    /// Anchor that kept the cell.
    pub owner: usize,
    /// Anchor whose claim was dropped.
    pub rejected: usize,
}

/// Computed cell -> anchor mapping for one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    owners: Vec<Option<usize>>,
    conflicts: Vec<OccupancyConflict>,
}

impl Occupancy {
    /// Builds the occupancy map for `slots` at the given column count.
    pub fn build<L>(slots: &[Slot], lookup: &L, cols: usize) -> Self
    where
        L: FootprintLookup + ?Sized,
    {
        let total = slots.len();
        let mut owners = vec![None; total];
        let mut conflicts = Vec::new();

        for (anchor, slot_ref) in slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|slot_ref| (index, slot_ref)))
        {
            let mut cells = footprint_cells(anchor, lookup.footprint(slot_ref), cols, total);
            if cells.is_empty() {
                // Footprint no longer fits (columns shrank or data was
                // imported); keep the anchor cell so it is never overwritten.
                cells.push(anchor);
            }
            for cell in cells {
                match owners[cell] {
                    None => owners[cell] = Some(anchor),
                    Some(owner) if owner == anchor => {}
                    Some(owner) => conflicts.push(OccupancyConflict {
                        cell,
                        owner,
                        rejected: anchor,
                    }),
                }
            }
        }

        if !conflicts.is_empty() {
            warn!(
                "event=occupancy_conflict module=grid status=tolerated conflicts={} total_slots={}",
                conflicts.len(),
                total
            );
        }

        Self { owners, conflicts }
    }

    /// Returns the anchor owning `cell`.
    pub fn owner(&self, cell: usize) -> Option<usize> {
        self.owners.get(cell).copied().flatten()
    }

    /// Returns whether `cell` is covered by any tile.
    pub fn is_claimed(&self, cell: usize) -> bool {
        self.owner(cell).is_some()
    }

    /// Iterates `(cell, anchor)` for every covered cell in ascending order.
    pub fn claimed_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.owners
            .iter()
            .enumerate()
            .filter_map(|(cell, owner)| owner.map(|anchor| (cell, anchor)))
    }

    /// Returns the highest covered cell index.
    pub fn last_claimed(&self) -> Option<usize> {
        self.owners.iter().rposition(Option::is_some)
    }

    /// Returns the per-cell owner table, indexed by cell.
    pub fn owners(&self) -> &[Option<usize>] {
        &self.owners
    }

    /// Claims dropped by first-writer-wins resolution.
    pub fn conflicts(&self) -> &[OccupancyConflict] {
        &self.conflicts
    }

    /// Total cells tracked (the board's slot count).
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns whether the board has no slots.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// First cell whose slot is empty and not inside another tile's footprint.
pub fn first_free_cell(slots: &[Slot], occupancy: &Occupancy) -> Option<usize> {
    slots
        .iter()
        .enumerate()
        .position(|(cell, slot)| slot.is_none() && !occupancy.is_claimed(cell))
}

/// First free cell at which a `size` footprint fits.
pub fn first_fit<L>(slots: &[Slot], lookup: &L, size: TileSize, cols: usize) -> Option<usize>
where
    L: FootprintLookup + ?Sized,
{
    let occupancy = Occupancy::build(slots, lookup, cols);
    (0..slots.len()).find(|&anchor| {
        slots[anchor].is_none()
            && check_against(&occupancy, anchor, size, cols, slots.len(), None).is_ok()
    })
}
