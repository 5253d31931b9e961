//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board use cases to Dart via FRB as flat, string-keyed envelopes.
//! - Own the process-wide database path and board config.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every failure is reported through `ok=false` plus `message`.
//! - Interaction state (mode, pick) is passed in by the caller on every
//!   click and handed back in the response; nothing is kept here.

use boards_core::db::open_db;
use boards_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    BoardService, BoardView, BoardsConfig, ClickOutcome, Interaction, ItemKind, MoveOutcome,
    Pick, ServiceError, SqliteStateRepository, TileContent, ToolMode,
};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const BOARDS_DB_FILE_NAME: &str = "boards.sqlite3";
static BOARDS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BOARDS_CONFIG: OnceLock<BoardsConfig> = OnceLock::new();

/// Database location and board config used by one FFI call.
#[derive(Debug, Clone)]
struct StoreEnv {
    db_path: PathBuf,
    config: BoardsConfig,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Sets the board config from JSON once per process.
///
/// Input semantics:
/// - `json`: `BoardsConfig` document; missing fields keep defaults.
///
/// # FFI contract
/// - Must run before the first board call; afterwards the config is fixed.
/// - Repeating the same config is accepted; a different one is rejected.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_config(json: String) -> String {
    match install_config(&BOARDS_CONFIG, &json) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCrumbItem {
    /// Board id in string form.
    pub board_id: String,
    /// Board title.
    pub title: String,
}

/// One anchored tile, ready for absolute positioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTileItem {
    /// Anchor slot index (0-based).
    pub anchor: u32,
    /// Anchor row (1-based).
    pub row: u32,
    /// Anchor column (1-based).
    pub col: u32,
    /// Footprint width in cells.
    pub w: u32,
    /// Footprint height in cells.
    pub h: u32,
    /// `board|note|link|missing`.
    pub kind: String,
    /// Referenced board or item id.
    pub ref_id: String,
    /// Board title or item title (empty when unset).
    pub title: String,
    /// Note text or URL (empty for boards).
    pub content: String,
}

/// Board projection envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardViewResponse {
    /// Whether the view was built.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Resolved board id (root fallback applied).
    pub board_id: Option<String>,
    /// Board title.
    pub title: String,
    /// Total slot count.
    pub slot_count: u32,
    /// Root-to-board chain.
    pub breadcrumb: Vec<BoardCrumbItem>,
    /// Anchored tiles.
    pub tiles: Vec<BoardTileItem>,
    /// Non-anchor cells inside a footprint; render no empty cell there.
    pub covered_cells: Vec<u32>,
}

impl BoardViewResponse {
    fn from_view(view: BoardView) -> Self {
        let covered_cells = view.covered_cells().into_iter().map(to_u32).collect();
        Self {
            ok: true,
            message: "ok".to_string(),
            board_id: Some(view.board_id.to_string()),
            title: view.title,
            slot_count: to_u32(view.slot_count),
            breadcrumb: view
                .breadcrumb
                .into_iter()
                .map(|crumb| BoardCrumbItem {
                    board_id: crumb.board_id.to_string(),
                    title: crumb.title,
                })
                .collect(),
            tiles: view.tiles.into_iter().map(to_tile_item).collect(),
            covered_cells,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            board_id: None,
            title: String::new(),
            slot_count: 0,
            breadcrumb: Vec::new(),
            tiles: Vec::new(),
            covered_cells: Vec::new(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected or created record id, or the board to show next.
    pub target_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>, target_id: Option<String>) -> Self {
        Self {
            ok: true,
            target_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            target_id: None,
            message: message.into(),
        }
    }
}

/// Click response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardClickResponse {
    /// Whether the click was applied (a refused drop reports `false`).
    pub ok: bool,
    /// `ignored|open_board|edit_item|picked|pick_cleared|moved|resized|trashed`.
    pub outcome: String,
    /// Pick to pass into the next click.
    pub pick: Option<u32>,
    /// Board to open or item to edit.
    pub target_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// JSON backup envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardExportResponse {
    /// Whether export succeeded.
    pub ok: bool,
    /// Pretty-printed state document.
    pub json: String,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Builds the view of `board_id`, or of the root board when absent/unknown.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `cols` below 1 is treated as 1.
#[flutter_rust_bridge::frb(sync)]
pub fn board_view(board_id: Option<String>, cols: u32) -> BoardViewResponse {
    board_view_in(&resolve_store_env(), board_id, cols)
}

/// Creates a child board tile on `parent_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_board(
    parent_id: String,
    title: Option<String>,
    cols: u32,
) -> BoardActionResponse {
    board_create_board_in(&resolve_store_env(), parent_id, title, cols)
}

/// Creates a `note` or `link` tile on `board_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_item(
    board_id: String,
    kind: String,
    title: Option<String>,
    content: String,
    cols: u32,
) -> BoardActionResponse {
    board_create_item_in(&resolve_store_env(), board_id, kind, title, content, cols)
}

/// Dispatches one grid click.
///
/// Input semantics:
/// - `mode`: `none|move|size|trash` (empty means `none`).
/// - `pick`: the `pick` returned by the previous click on this board.
#[flutter_rust_bridge::frb(sync)]
pub fn board_click(
    board_id: String,
    cell: u32,
    cols: u32,
    mode: String,
    pick: Option<u32>,
) -> BoardClickResponse {
    board_click_in(&resolve_store_env(), board_id, cell, cols, mode, pick)
}

/// Deletes the tile anchored at `index`; `target_id` is the board to show next.
#[flutter_rust_bridge::frb(sync)]
pub fn board_trash(board_id: String, index: u32, current_board_id: String) -> BoardActionResponse {
    board_trash_in(&resolve_store_env(), board_id, index, current_board_id)
}

/// Adds one step of slots.
#[flutter_rust_bridge::frb(sync)]
pub fn board_grid_grow(board_id: String, cols: u32) -> BoardActionResponse {
    board_grid_step_in(&resolve_store_env(), board_id, cols, true)
}

/// Removes one step of slots; refused while tiles sit in the removed tail.
#[flutter_rust_bridge::frb(sync)]
pub fn board_grid_shrink(board_id: String, cols: u32) -> BoardActionResponse {
    board_grid_step_in(&resolve_store_env(), board_id, cols, false)
}

/// Renames a board.
#[flutter_rust_bridge::frb(sync)]
pub fn board_rename(board_id: String, title: String) -> BoardActionResponse {
    board_rename_in(&resolve_store_env(), board_id, title)
}

/// Replaces an item's title and content.
#[flutter_rust_bridge::frb(sync)]
pub fn item_update(item_id: String, title: Option<String>, content: String) -> BoardActionResponse {
    item_update_in(&resolve_store_env(), item_id, title, content)
}

/// Exports the whole state as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn boards_export() -> BoardExportResponse {
    boards_export_in(&resolve_store_env())
}

/// Replaces the whole state with a JSON backup.
#[flutter_rust_bridge::frb(sync)]
pub fn boards_import(json: String) -> BoardActionResponse {
    boards_import_in(&resolve_store_env(), json)
}

fn board_view_in(env: &StoreEnv, board_id: Option<String>, cols: u32) -> BoardViewResponse {
    let requested = board_id.as_deref().and_then(|raw| Uuid::parse_str(raw.trim()).ok());
    let result = with_board_service(env, |service| {
        let resolved = service.resolve_board(requested)?;
        service.board_view(resolved, cols as usize)
    });
    match result {
        Ok(view) => BoardViewResponse::from_view(view),
        Err(err) => BoardViewResponse::failure(format!("board_view failed: {err}")),
    }
}

fn board_create_board_in(
    env: &StoreEnv,
    parent_id: String,
    title: Option<String>,
    cols: u32,
) -> BoardActionResponse {
    let parent_id = match parse_id("parent_id", &parent_id) {
        Ok(id) => id,
        Err(message) => return BoardActionResponse::failure(message),
    };
    match with_board_service(env, |service| {
        service.create_board(parent_id, title.as_deref(), cols as usize)
    }) {
        Ok(board_id) => BoardActionResponse::success("board created", Some(board_id.to_string())),
        Err(err) => BoardActionResponse::failure(format!("board_create_board failed: {err}")),
    }
}

fn board_create_item_in(
    env: &StoreEnv,
    board_id: String,
    kind: String,
    title: Option<String>,
    content: String,
    cols: u32,
) -> BoardActionResponse {
    let board_id = match parse_id("board_id", &board_id) {
        Ok(id) => id,
        Err(message) => return BoardActionResponse::failure(message),
    };
    let Some(kind) = ItemKind::parse(&kind) else {
        return BoardActionResponse::failure(format!(
            "unsupported item kind `{}`; expected note|link",
            kind.trim()
        ));
    };
    match with_board_service(env, |service| {
        service.create_item(board_id, kind, title.as_deref(), &content, cols as usize)
    }) {
        Ok((item_id, _)) => BoardActionResponse::success("item created", Some(item_id.to_string())),
        Err(err) => BoardActionResponse::failure(format!("board_create_item failed: {err}")),
    }
}

fn board_click_in(
    env: &StoreEnv,
    board_id: String,
    cell: u32,
    cols: u32,
    mode: String,
    pick: Option<u32>,
) -> BoardClickResponse {
    let refused = |message: String, pick: Option<u32>| BoardClickResponse {
        ok: false,
        outcome: "refused".to_string(),
        pick,
        target_id: None,
        message,
    };

    let board_id = match parse_id("board_id", &board_id) {
        Ok(id) => id,
        Err(message) => return refused(message, None),
    };
    let Some(mode) = ToolMode::parse(&mode) else {
        return refused(format!("unsupported tool mode `{}`", mode.trim()), None);
    };
    let pick = pick.map(|slot_index| Pick {
        board_id,
        slot_index: slot_index as usize,
    });
    let mut interaction = Interaction::with_pick(mode, pick);

    let result = with_board_service(env, |service| {
        let outcome =
            service.handle_slot_click(&mut interaction, board_id, cell as usize, cols as usize)?;
        let redirect = match &outcome {
            ClickOutcome::Trashed(trash) if trash.removed_board(board_id) => {
                Some(service.resolve_board(None)?)
            }
            _ => None,
        };
        Ok((outcome, redirect))
    });
    let next_pick = interaction.pick().map(|pick| to_u32(pick.slot_index));
    match result {
        Ok((outcome, redirect)) => {
            let (label, target_id) = click_label(&outcome);
            let target_id = redirect.map(|id| id.to_string()).or(target_id);
            BoardClickResponse {
                ok: true,
                outcome: label.to_string(),
                pick: next_pick,
                target_id,
                message: "ok".to_string(),
            }
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=refused call=board_click");
            refused(err.to_string(), next_pick)
        }
    }
}

fn board_trash_in(
    env: &StoreEnv,
    board_id: String,
    index: u32,
    current_board_id: String,
) -> BoardActionResponse {
    let ids = parse_id("board_id", &board_id)
        .and_then(|board_id| Ok((board_id, parse_id("current_board_id", &current_board_id)?)));
    let (board_id, current) = match ids {
        Ok(ids) => ids,
        Err(message) => return BoardActionResponse::failure(message),
    };
    match with_board_service(env, |service| {
        service.trash_tile(board_id, index as usize, current)
    }) {
        Ok(report) => BoardActionResponse::success(
            format!(
                "removed {} board(s) and {} item(s)",
                report.outcome.removed_boards.len(),
                report.outcome.removed_items.len()
            ),
            report.redirect_to.map(|id| id.to_string()),
        ),
        Err(err) => BoardActionResponse::failure(format!("board_trash failed: {err}")),
    }
}

fn board_grid_step_in(env: &StoreEnv, board_id: String, cols: u32, grow: bool) -> BoardActionResponse {
    let board_id = match parse_id("board_id", &board_id) {
        Ok(id) => id,
        Err(message) => return BoardActionResponse::failure(message),
    };
    let result = with_board_service(env, |service| {
        if grow {
            service.grow_grid(board_id, cols as usize)
        } else {
            service.shrink_grid(board_id, cols as usize)
        }
    });
    match result {
        Ok(resize) => BoardActionResponse::success(
            format!("{} slots", resize.new_size()),
            Some(board_id.to_string()),
        ),
        Err(err) => BoardActionResponse::failure(err.to_string()),
    }
}

fn board_rename_in(env: &StoreEnv, board_id: String, title: String) -> BoardActionResponse {
    let board_id = match parse_id("board_id", &board_id) {
        Ok(id) => id,
        Err(message) => return BoardActionResponse::failure(message),
    };
    match with_board_service(env, |service| service.rename_board(board_id, &title)) {
        Ok(()) => BoardActionResponse::success("board renamed", Some(board_id.to_string())),
        Err(err) => BoardActionResponse::failure(format!("board_rename failed: {err}")),
    }
}

fn item_update_in(
    env: &StoreEnv,
    item_id: String,
    title: Option<String>,
    content: String,
) -> BoardActionResponse {
    let item_id = match parse_id("item_id", &item_id) {
        Ok(id) => id,
        Err(message) => return BoardActionResponse::failure(message),
    };
    match with_board_service(env, |service| {
        service.update_item(item_id, title.as_deref(), &content)
    }) {
        Ok(()) => BoardActionResponse::success("item updated", Some(item_id.to_string())),
        Err(err) => BoardActionResponse::failure(format!("item_update failed: {err}")),
    }
}

fn boards_export_in(env: &StoreEnv) -> BoardExportResponse {
    match with_board_service(env, |service| service.export_json()) {
        Ok(json) => BoardExportResponse {
            ok: true,
            json,
            message: "ok".to_string(),
        },
        Err(err) => BoardExportResponse {
            ok: false,
            json: String::new(),
            message: format!("boards_export failed: {err}"),
        },
    }
}

fn boards_import_in(env: &StoreEnv, json: String) -> BoardActionResponse {
    match with_board_service(env, |service| service.import_json(&json)) {
        Ok(state) => BoardActionResponse::success(
            format!("imported {} board(s)", state.boards.len()),
            state.root_board().map(|root| root.id.to_string()),
        ),
        Err(err) => BoardActionResponse::failure(err.to_string()),
    }
}

fn resolve_store_env() -> StoreEnv {
    StoreEnv {
        db_path: resolve_boards_db_path(),
        config: *BOARDS_CONFIG.get_or_init(config_from_env),
    }
}

fn resolve_boards_db_path() -> PathBuf {
    BOARDS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("BOARDS_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARDS_DB_FILE_NAME)
        })
        .clone()
}

fn config_from_env() -> BoardsConfig {
    let Ok(raw) = std::env::var("BOARDS_CONFIG") else {
        return BoardsConfig::default();
    };
    if raw.trim().is_empty() {
        return BoardsConfig::default();
    }
    BoardsConfig::from_json_str(&raw).unwrap_or_else(|err| {
        warn!("event=config_load module=ffi status=fallback source=env error={err}");
        BoardsConfig::default()
    })
}

fn install_config(slot: &OnceLock<BoardsConfig>, json: &str) -> Result<(), String> {
    let config = BoardsConfig::from_json_str(json).map_err(|err| err.to_string())?;
    let active = slot.get_or_init(|| config);
    if *active != config {
        return Err("board config already initialized; refusing to switch".to_string());
    }
    info!(
        "event=config_load module=ffi status=ok source=init move_policy={:?}",
        active.move_policy
    );
    Ok(())
}

fn with_board_service<T>(
    env: &StoreEnv,
    f: impl FnOnce(&BoardService<SqliteStateRepository<'_>>) -> Result<T, ServiceError>,
) -> Result<T, String> {
    let conn = open_db(&env.db_path).map_err(|err| err.to_string())?;
    let repo = SqliteStateRepository::with_config(&conn, env.config).map_err(|err| err.to_string())?;
    let service = BoardService::with_config(repo, env.config).map_err(|err| err.to_string())?;
    f(&service).map_err(|err| err.to_string())
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("{field} is not a valid id: `{}`", raw.trim()))
}

fn click_label(outcome: &ClickOutcome) -> (&'static str, Option<String>) {
    match outcome {
        ClickOutcome::Ignored => ("ignored", None),
        ClickOutcome::OpenBoard(id) => ("open_board", Some(id.to_string())),
        ClickOutcome::EditItem(id) => ("edit_item", Some(id.to_string())),
        ClickOutcome::Picked { .. } => ("picked", None),
        ClickOutcome::PickCleared => ("pick_cleared", None),
        ClickOutcome::Moved(MoveOutcome::Unchanged) => ("pick_cleared", None),
        ClickOutcome::Moved(_) => ("moved", None),
        ClickOutcome::Resized { .. } => ("resized", None),
        ClickOutcome::Trashed(_) => ("trashed", None),
    }
}

fn to_tile_item(tile: boards_core::TileView) -> BoardTileItem {
    let (kind, ref_id, title, content) = match tile.content {
        TileContent::Board { id, title } => ("board", id.to_string(), title, String::new()),
        TileContent::Item {
            id,
            kind,
            title,
            content,
        } => (kind.as_str(), id.to_string(), title.unwrap_or_default(), content),
        TileContent::Missing(slot_ref) => {
            let id = slot_ref.board_id().or(slot_ref.item_id()).unwrap_or_default();
            ("missing", id.to_string(), String::new(), String::new())
        }
    };
    BoardTileItem {
        anchor: to_u32(tile.anchor),
        row: to_u32(tile.pos.row),
        col: to_u32(tile.pos.col),
        w: to_u32(tile.size.w),
        h: to_u32(tile.size.h),
        kind: kind.to_string(),
        ref_id,
        title,
        content,
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        board_click_in, board_create_board_in, board_create_item_in, board_grid_step_in,
        board_trash_in, board_view_in, boards_export_in, boards_import_in, core_version,
        init_logging, install_config, ping, StoreEnv,
    };
    use boards_core::{BoardsConfig, MovePolicy};
    use std::sync::OnceLock;

    fn temp_db() -> (tempfile::TempDir, StoreEnv) {
        temp_db_with(BoardsConfig::default())
    }

    fn temp_db_with(config: BoardsConfig) -> (tempfile::TempDir, StoreEnv) {
        let dir = tempfile::tempdir().unwrap();
        let env = StoreEnv {
            db_path: dir.path().join("boards.sqlite3"),
            config,
        };
        (dir, env)
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_log_dir() {
        let error = init_logging("info".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn view_falls_back_to_root_for_unknown_board() {
        let (_dir, db) = temp_db();
        let view = board_view_in(&db, Some("nope".to_string()), 10);
        assert!(view.ok, "{}", view.message);
        assert_eq!(view.slot_count, 80);
        assert_eq!(view.breadcrumb.len(), 1);
    }

    #[test]
    fn created_note_reports_footprint_and_covered_cells() {
        let (_dir, db) = temp_db();
        let root = board_view_in(&db, None, 10).board_id.unwrap();
        let created = board_create_item_in(
            &db,
            root.clone(),
            "note".to_string(),
            None,
            "hello".to_string(),
            10,
        );
        assert!(created.ok, "{}", created.message);

        let view = board_view_in(&db, Some(root), 10);
        assert_eq!(view.tiles.len(), 1);
        let tile = &view.tiles[0];
        assert_eq!((tile.row, tile.col, tile.w, tile.h), (1, 1, 2, 2));
        assert_eq!(tile.kind, "note");
        assert_eq!(view.covered_cells, vec![1, 10, 11]);
    }

    #[test]
    fn unknown_kind_and_blank_content_are_refused() {
        let (_dir, db) = temp_db();
        let root = board_view_in(&db, None, 10).board_id.unwrap();
        let kind = board_create_item_in(&db, root.clone(), "task".into(), None, "x".into(), 10);
        assert!(!kind.ok);
        let blank = board_create_item_in(&db, root, "link".into(), None, "  ".into(), 10);
        assert!(!blank.ok);
    }

    #[test]
    fn click_round_trip_hands_the_pick_back() {
        let (_dir, db) = temp_db();
        let root = board_view_in(&db, None, 10).board_id.unwrap();
        board_create_item_in(&db, root.clone(), "link".into(), None, "a.io".into(), 10);

        let picked = board_click_in(&db, root.clone(), 1, 10, "move".into(), None);
        assert!(picked.ok, "{}", picked.message);
        assert_eq!(picked.outcome, "picked");
        assert_eq!(picked.pick, Some(0));

        let moved = board_click_in(&db, root.clone(), 20, 10, "move".into(), picked.pick);
        assert_eq!(moved.outcome, "moved");
        assert_eq!(moved.pick, None);
        assert_eq!(board_view_in(&db, Some(root), 10).tiles[0].anchor, 20);
    }

    #[test]
    fn trashing_current_board_returns_root_as_target() {
        let (_dir, db) = temp_db();
        let root = board_view_in(&db, None, 10).board_id.unwrap();
        let child = board_create_board_in(&db, root.clone(), Some("Sub".into()), 10)
            .target_id
            .unwrap();

        let trashed = board_trash_in(&db, root.clone(), 0, child);
        assert!(trashed.ok, "{}", trashed.message);
        assert_eq!(trashed.target_id, Some(root));
    }

    #[test]
    fn shrink_below_minimum_is_clamped() {
        let (_dir, db) = temp_db();
        let root = board_view_in(&db, None, 10).board_id.unwrap();
        for _ in 0..4 {
            assert!(board_grid_step_in(&db, root.clone(), 10, false).ok);
        }
        assert_eq!(board_view_in(&db, Some(root), 10).slot_count, 20);
    }

    #[test]
    fn import_rejects_garbage_and_accepts_export() {
        let (_dir, db) = temp_db();
        board_view_in(&db, None, 10);
        let exported = boards_export_in(&db);
        assert!(exported.ok);

        assert!(!boards_import_in(&db, "{oops".into()).ok);
        assert!(boards_import_in(&db, exported.json).ok);
    }

    #[test]
    fn config_is_installed_once() {
        let slot = OnceLock::new();
        assert!(install_config(&slot, r#"{ "move_policy": "swap" }"#).is_ok());
        assert!(install_config(&slot, r#"{ "move_policy": "swap" }"#).is_ok());
        assert!(!install_config(&slot, "{}").unwrap_err().is_empty());
        assert!(install_config(&OnceLock::new(), r#"{ "grid": { "min": 0 } }"#).is_err());
        assert_eq!(slot.get().map(|config| config.move_policy), Some(MovePolicy::Swap));
    }

    #[test]
    fn swap_config_reaches_click_dispatch() {
        let mut config = BoardsConfig::default();
        config.move_policy = MovePolicy::Swap;
        let (_dir, db) = temp_db_with(config);
        let root = board_view_in(&db, None, 10).board_id.unwrap();
        let first = board_create_board_in(&db, root.clone(), Some("A".into()), 10).target_id;
        board_create_board_in(&db, root.clone(), Some("B".into()), 10);

        let picked = board_click_in(&db, root.clone(), 0, 10, "move".into(), None);
        let swapped = board_click_in(&db, root.clone(), 1, 10, "move".into(), picked.pick);
        assert_eq!(swapped.outcome, "moved", "{}", swapped.message);
        let view = board_view_in(&db, Some(root), 10);
        assert_eq!(Some(view.tiles[1].ref_id.clone()), first);
    }

    #[test]
    fn trash_click_that_removes_the_clicked_board_redirects() {
        let (_dir, db) = temp_db();
        let root = uuid::Uuid::new_v4();
        let child = uuid::Uuid::new_v4();
        let tail = vec!["null"; 19].join(", ");
        let json = format!(
            r#"{{ "boards": {{
                "{root}": {{ "id": "{root}", "title": "Home",
                    "slots": [{{ "type": "board", "id": "{child}" }}, {tail}] }},
                "{child}": {{ "id": "{child}", "parentId": "{root}", "title": "Loop",
                    "slots": [{{ "type": "board", "id": "{root}" }}, {tail}] }}
            }}, "items": {{}} }}"#
        );
        assert!(boards_import_in(&db, json).ok);

        let trashed = board_click_in(&db, root.to_string(), 0, 10, "trash".into(), None);
        assert_eq!(trashed.outcome, "trashed", "{}", trashed.message);
        let target = trashed.target_id.unwrap();
        assert_ne!(target, root.to_string());

        let view = board_view_in(&db, Some(target.clone()), 10);
        assert!(view.ok, "{}", view.message);
        assert_eq!(view.board_id, Some(target));
    }

    #[test]
    fn empty_import_leaves_a_usable_root() {
        let (_dir, db) = temp_db();
        assert!(boards_import_in(&db, "{}".into()).ok);
        let root = board_view_in(&db, None, 10).board_id.unwrap();
        let created =
            board_create_item_in(&db, root.clone(), "note".into(), None, "still here".into(), 10);
        assert!(created.ok, "{}", created.message);
        assert_eq!(board_view_in(&db, Some(root), 10).tiles.len(), 1);
    }
}
