//! Board use-case service.
//!
//! # Responsibility
//! - Run one board operation per call as load, apply, save.
//! - Translate repository and operation failures into one error type.
//!
//! # Invariants
//! - A refused operation never reaches `save`.
//! - Clicks that only record or clear a pick are not persisted.
//! - Log lines carry ids and counts only, never titles or content.

use crate::config::{BoardsConfig, ConfigError};
use crate::grid::{GridResize, TileSize};
use crate::interaction::{dispatch_click, ClickOutcome, Interaction};
use crate::model::board::BoardId;
use crate::model::item::{ItemId, ItemKind};
use crate::model::state::BoardState;
use crate::ops::{self, GridStep, MoveOutcome, OpError, OpResult, TrashOutcome};
use crate::repo::state_repo::{export_state_json, import_state_json, RepoError, StateRepository};
use crate::view::{board_view, BoardView};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from board service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Operation refused; stored state unchanged.
    Op(OpError),
    /// Storage failure.
    Repo(RepoError),
    /// Service was built with an inconsistent config.
    Config(ConfigError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Op(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Op(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<OpError> for ServiceError {
    fn from(value: OpError) -> Self {
        Self::Op(value)
    }
}

impl From<ConfigError> for ServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result type for board service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome of trashing one tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashReport {
    /// Removed records.
    pub outcome: TrashOutcome,
    /// Board the caller should display next. Differs from `current`
    /// when the current board was part of the removed subtree.
    pub redirect_to: Option<BoardId>,
}

/// Board service facade.
pub struct BoardService<R: StateRepository> {
    repo: R,
    config: BoardsConfig,
}

impl<R: StateRepository> BoardService<R> {
    /// Creates service with default configuration.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            config: BoardsConfig::default(),
        }
    }

    /// Creates service with explicit configuration.
    ///
    /// # Errors
    /// - `Config` when `config` fails validation.
    pub fn with_config(repo: R, config: BoardsConfig) -> ServiceResult<Self> {
        config.validate()?;
        Ok(Self { repo, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &BoardsConfig {
        &self.config
    }

    /// Loads the full state, bootstrapping a root board when storage is empty.
    pub fn load_state(&self) -> ServiceResult<BoardState> {
        Ok(self.repo.load()?)
    }

    /// Resolves a requested board id, falling back to the root board.
    pub fn resolve_board(&self, requested: Option<BoardId>) -> ServiceResult<BoardId> {
        let state = self.repo.load()?;
        state
            .resolve_board(requested)
            .ok_or_else(|| RepoError::InvalidData("state has no root board".to_string()).into())
    }

    /// Builds the render projection of `board_id`.
    pub fn board_view(&self, board_id: BoardId, cols: usize) -> ServiceResult<BoardView> {
        let state = self.repo.load()?;
        board_view(&state, board_id, cols).ok_or_else(|| OpError::BoardNotFound(board_id).into())
    }

    /// Creates a child board tile on `parent_id`.
    pub fn create_board(
        &self,
        parent_id: BoardId,
        title: Option<&str>,
        cols: usize,
    ) -> ServiceResult<BoardId> {
        let board_id = self.mutate("board_create", |state, config| {
            ops::create_board(state, config, parent_id, title, cols)
        })?;
        info!("event=board_create module=service status=ok parent={parent_id} board={board_id}");
        Ok(board_id)
    }

    /// Creates a note or link tile on `board_id`; returns the id and anchor.
    pub fn create_item(
        &self,
        board_id: BoardId,
        kind: ItemKind,
        title: Option<&str>,
        content: &str,
        cols: usize,
    ) -> ServiceResult<(ItemId, usize)> {
        let (item_id, anchor) = self.mutate("item_create", |state, config| {
            ops::create_item(state, config, board_id, kind, title, content, cols)
        })?;
        info!(
            "event=item_create module=service status=ok board={board_id} item={item_id} kind={} anchor={anchor}",
            kind.as_str()
        );
        Ok((item_id, anchor))
    }

    /// Moves the tile anchored at `from` to `to`.
    pub fn move_tile(
        &self,
        board_id: BoardId,
        from: usize,
        to: usize,
        cols: usize,
    ) -> ServiceResult<MoveOutcome> {
        let outcome = self.mutate("tile_move", |state, config| {
            ops::move_tile(state, config, board_id, from, to, cols)
        })?;
        info!("event=tile_move module=service status=ok board={board_id} from={from} to={to}");
        Ok(outcome)
    }

    /// Resizes the item at `anchor` so `target` becomes its bottom-right cell.
    pub fn resize_item(
        &self,
        board_id: BoardId,
        anchor: usize,
        target: usize,
        cols: usize,
    ) -> ServiceResult<TileSize> {
        let size = self.mutate("item_resize", |state, _| {
            ops::resize_item(state, board_id, anchor, target, cols)
        })?;
        info!(
            "event=item_resize module=service status=ok board={board_id} anchor={anchor} w={} h={}",
            size.w, size.h
        );
        Ok(size)
    }

    /// Toggles the item at `anchor` between 1x1 and its kind default.
    pub fn toggle_item_size(
        &self,
        board_id: BoardId,
        anchor: usize,
        cols: usize,
    ) -> ServiceResult<TileSize> {
        let size = self.mutate("item_resize", |state, config| {
            ops::toggle_item_size(state, config, board_id, anchor, cols)
        })?;
        info!(
            "event=item_resize module=service status=ok board={board_id} anchor={anchor} w={} h={}",
            size.w, size.h
        );
        Ok(size)
    }

    /// Deletes the tile anchored at `index`.
    ///
    /// Board tiles are removed with their whole subtree. When `current`
    /// is among the removed boards, `redirect_to` names the root board.
    pub fn trash_tile(
        &self,
        board_id: BoardId,
        index: usize,
        current: BoardId,
    ) -> ServiceResult<TrashReport> {
        let mut state = self.repo.load()?;
        let outcome = ops::trash_tile(&mut state, board_id, index)
            .map_err(|err| self.refused("tile_trash", err))?;
        self.repo.save(&state)?;
        let redirect_to = self.redirect_after_trash(&state, &outcome, current);
        info!(
            "event=tile_trash module=service status=ok board={board_id} index={index} removed_boards={} removed_items={}",
            outcome.removed_boards.len(),
            outcome.removed_items.len()
        );
        Ok(TrashReport {
            outcome,
            redirect_to,
        })
    }

    /// Grows the slot array by one step.
    pub fn grow_grid(&self, board_id: BoardId, cols: usize) -> ServiceResult<GridResize> {
        self.step_grid(board_id, GridStep::Grow, cols)
    }

    /// Shrinks the slot array by one step; refused when tiles would be cut.
    pub fn shrink_grid(&self, board_id: BoardId, cols: usize) -> ServiceResult<GridResize> {
        self.step_grid(board_id, GridStep::Shrink, cols)
    }

    /// Resizes the slot array to `requested`, clamped to the grid limits.
    pub fn resize_grid(
        &self,
        board_id: BoardId,
        requested: usize,
        cols: usize,
    ) -> ServiceResult<GridResize> {
        let resize = self.mutate("grid_resize", |state, config| {
            ops::resize_grid(state, config, board_id, requested, cols)
        })?;
        info!(
            "event=grid_resize module=service status=ok board={board_id} slots={}",
            resize.new_size()
        );
        Ok(resize)
    }

    /// Renames a board.
    pub fn rename_board(&self, board_id: BoardId, title: &str) -> ServiceResult<()> {
        self.mutate("board_rename", |state, _| {
            ops::rename_board(state, board_id, title)
        })?;
        info!("event=board_rename module=service status=ok board={board_id}");
        Ok(())
    }

    /// Replaces an item's title and content.
    pub fn update_item(
        &self,
        item_id: ItemId,
        title: Option<&str>,
        content: &str,
    ) -> ServiceResult<()> {
        self.mutate("item_update", |state, _| {
            ops::update_item(state, item_id, title, content)
        })?;
        info!("event=item_update module=service status=ok item={item_id}");
        Ok(())
    }

    /// Dispatches one grid click for the active tool.
    ///
    /// The state is saved only when the click changed it.
    pub fn handle_slot_click(
        &self,
        interaction: &mut Interaction,
        board_id: BoardId,
        cell: usize,
        cols: usize,
    ) -> ServiceResult<ClickOutcome> {
        let mut state = self.repo.load()?;
        let outcome = dispatch_click(&mut state, &self.config, interaction, board_id, cell, cols)
            .map_err(|err| self.refused("slot_click", err))?;
        if outcome.is_mutation() {
            self.repo.save(&state)?;
        }
        info!(
            "event=slot_click module=service status=ok board={board_id} cell={cell} mode={} mutated={}",
            interaction.mode().as_str(),
            outcome.is_mutation()
        );
        Ok(outcome)
    }

    /// Serializes the stored state as a JSON backup.
    pub fn export_json(&self) -> ServiceResult<String> {
        let state = self.repo.load()?;
        let raw = export_state_json(&state)?;
        info!(
            "event=state_export module=service status=ok boards={} items={}",
            state.boards.len(),
            state.items.len()
        );
        Ok(raw)
    }

    /// Replaces the stored state with a JSON backup.
    ///
    /// Nothing is written when the backup does not decode.
    pub fn import_json(&self, raw: &str) -> ServiceResult<BoardState> {
        let state = import_state_json(raw, &self.config).map_err(|err| {
            warn!("event=state_import module=service status=error error={err}");
            err
        })?;
        self.repo.save(&state)?;
        info!(
            "event=state_import module=service status=ok boards={} items={}",
            state.boards.len(),
            state.items.len()
        );
        Ok(state)
    }

    fn step_grid(
        &self,
        board_id: BoardId,
        direction: GridStep,
        cols: usize,
    ) -> ServiceResult<GridResize> {
        let resize = self.mutate("grid_resize", |state, config| {
            ops::step_grid(state, config, board_id, direction, cols)
        })?;
        info!(
            "event=grid_resize module=service status=ok board={board_id} slots={}",
            resize.new_size()
        );
        Ok(resize)
    }

    fn mutate<T>(
        &self,
        event: &str,
        apply: impl FnOnce(&mut BoardState, &BoardsConfig) -> OpResult<T>,
    ) -> ServiceResult<T> {
        let mut state = self.repo.load()?;
        let value = apply(&mut state, &self.config).map_err(|err| self.refused(event, err))?;
        self.repo.save(&state)?;
        Ok(value)
    }

    fn refused(&self, event: &str, err: OpError) -> ServiceError {
        warn!("event={event} module=service status=refused error={err}");
        ServiceError::Op(err)
    }

    fn redirect_after_trash(
        &self,
        state: &BoardState,
        outcome: &TrashOutcome,
        current: BoardId,
    ) -> Option<BoardId> {
        if outcome.removed_board(current) {
            state.root_board().map(|root| root.id)
        } else {
            Some(current)
        }
    }
}
