//! Flutter-facing bindings for the boards core.

pub mod api;
