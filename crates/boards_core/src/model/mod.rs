//! Board/item domain model.
//!
//! # Responsibility
//! - Define the persisted shape of boards, items and slot references.
//! - Provide tree-level helpers (root lookup, breadcrumb) over the board arena.
//!
//! # Invariants
//! - Every board and item is identified by a stable UUID.
//! - A slot stores only the anchor reference; footprints are derived.
//! - Boards are kept in an id-indexed arena; nesting is expressed through
//!   `parent_id` plus `SlotRef::Board` entries in the parent's slots.

pub mod board;
pub mod item;
pub mod state;
