//! Core domain logic for nested boards.
//! Grid geometry, tile placement and every board mutation live here; UI
//! shells only render `BoardView` and forward clicks.

pub mod config;
pub mod db;
pub mod grid;
pub mod interaction;
pub mod logging;
pub mod model;
pub mod ops;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{BoardsConfig, ConfigError, GridLimits, MovePolicy, TileSizes};
pub use grid::{GridPos, GridResize, Occupancy, PlacementError, TileSize};
pub use interaction::{dispatch_click, ClickOutcome, Interaction, Pick, ToolMode};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Board, BoardId, Slot, SlotRef};
pub use model::item::{Item, ItemId, ItemKind};
pub use model::state::BoardState;
pub use ops::{MoveOutcome, OpError, OpResult, TrashOutcome};
pub use repo::state_repo::{RepoError, RepoResult, SqliteStateRepository, StateRepository};
pub use service::board_service::{BoardService, ServiceError, ServiceResult, TrashReport};
pub use view::{board_view, BoardView, Crumb, TileContent, TileView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
