//! Storage collaborator: state load/save contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract the service layer persists through.
//! - Isolate SQLite and JSON document details from board operations.
//!
//! # Invariants
//! - `load` always returns a structurally valid, default-filled state.
//! - `save` writes the whole state document in one statement.

pub mod state_repo;
