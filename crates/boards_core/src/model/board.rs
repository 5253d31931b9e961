//! Board and slot reference model.
//!
//! # Responsibility
//! - Define the board record and the tagged slot reference stored in it.
//!
//! # Invariants
//! - `slots.len()` is the board's total slot count.
//! - An empty slot is `None`; an occupied slot holds exactly one anchor ref.

use crate::model::item::ItemId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable board identifier.
pub type BoardId = Uuid;

/// One addressable grid position. `None` means the slot holds no anchor.
pub type Slot = Option<SlotRef>;

/// Reference stored at an anchor slot.
///
/// Serialized as `{ "type": "board" | "item", "id": "<uuid>" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlotRef {
    /// Nested board tile. Always a 1x1 footprint.
    Board {
        /// Child board id.
        id: BoardId,
    },
    /// Note or link tile with its own footprint.
    Item {
        /// Item id in the item table.
        id: ItemId,
    },
}

impl SlotRef {
    /// Returns whether this reference points at a nested board.
    pub fn is_board(&self) -> bool {
        matches!(self, Self::Board { .. })
    }

    /// Returns the item id when this is an item reference.
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            Self::Item { id } => Some(*id),
            Self::Board { .. } => None,
        }
    }

    /// Returns the board id when this is a board reference.
    pub fn board_id(&self) -> Option<BoardId> {
        match self {
            Self::Board { id } => Some(*id),
            Self::Item { .. } => None,
        }
    }
}

fn default_title() -> String {
    "Untitled".to_string()
}

/// Grid-based board record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Stable board id.
    pub id: BoardId,
    /// Containing board. `None` marks a root board.
    #[serde(default)]
    pub parent_id: Option<BoardId>,
    /// User-facing board name.
    #[serde(default = "default_title")]
    pub title: String,
    /// Fixed-length slot array. Only anchors are recorded here.
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl Board {
    /// Creates an empty board with a generated id and `slot_count` empty slots.
    pub fn new(title: impl Into<String>, parent_id: Option<BoardId>, slot_count: usize) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            default_title()
        } else {
            title
        };
        Self {
            id: Uuid::new_v4(),
            parent_id,
            title,
            slots: vec![None; slot_count],
        }
    }

    /// Returns the total slot count.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the reference anchored at `index`, if any.
    pub fn slot(&self, index: usize) -> Option<SlotRef> {
        self.slots.get(index).copied().flatten()
    }

    /// Iterates `(anchor_index, ref)` pairs in slot order.
    pub fn anchors(&self) -> impl Iterator<Item = (usize, SlotRef)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|slot_ref| (index, slot_ref)))
    }

    /// Returns whether this board is a root (has no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
