//! Board state repository over a SQLite key/value table.
//!
//! # Responsibility
//! - Persist the whole `BoardState` as one JSON document under a fixed key.
//! - Default-fill loaded documents (missing slots, sizes, root board).
//! - Export/import the same document as a JSON backup.
//!
//! # Invariants
//! - A missing or unparseable document is replaced by a fresh root state.
//! - A parseable document with `boards`/`items` that fails to decode is an
//!   error, never silently discarded.

use crate::config::{BoardsConfig, ConfigError};
use crate::db::migrations::latest_version;
use crate::db::{schema_version, DbError};
use crate::model::state::BoardState;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key holding the serialized state document.
pub const STATE_KEY: &str = "boards_state_v3";

/// Result type for state repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from state repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        /// Version this build requires.
        expected_version: u32,
        /// Version found on the connection.
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        /// Table name.
        table: &'static str,
        /// Column name.
        column: &'static str,
    },
    /// Stored or imported document cannot be decoded.
    InvalidData(String),
    /// Repository was built with an inconsistent config.
    InvalidConfig(ConfigError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "state repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "state repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "state repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid board state data: {message}"),
            Self::InvalidConfig(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract consumed by the board service.
pub trait StateRepository {
    /// Loads the current state, bootstrapping a fresh one when absent.
    fn load(&self) -> RepoResult<BoardState>;
    /// Replaces the stored state.
    fn save(&self, state: &BoardState) -> RepoResult<()>;
}

/// SQLite-backed state repository.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
    config: BoardsConfig,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Creates repository from migrated connection with default config.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_config(conn, BoardsConfig::default())
    }

    /// Creates repository using `config` for default-filling loaded state.
    ///
    /// # Errors
    /// - `InvalidConfig` when `config` fails validation.
    /// - Schema readiness errors as for [`Self::try_new`].
    pub fn with_config(conn: &'conn Connection, config: BoardsConfig) -> RepoResult<Self> {
        config.validate().map_err(RepoError::InvalidConfig)?;
        ensure_state_connection_ready(conn)?;
        Ok(Self { conn, config })
    }

    fn read_document(&self) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [STATE_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load(&self) -> RepoResult<BoardState> {
        let raw = self.read_document()?;
        let parsed = raw.as_deref().and_then(|raw| {
            serde_json::from_str::<serde_json::Value>(raw)
                .map_err(|err| {
                    warn!("event=state_load module=repo status=reset reason=unparseable error={err}");
                })
                .ok()
        });

        match parsed {
            Some(document) => {
                let (state, filled) = decode_state(document, &self.config)?;
                if filled {
                    self.save(&state)?;
                    info!(
                        "event=state_normalize module=repo status=ok boards={} items={}",
                        state.boards.len(),
                        state.items.len()
                    );
                }
                Ok(state)
            }
            None => {
                let state = BoardState::bootstrap(&self.config.grid);
                self.save(&state)?;
                info!(
                    "event=state_bootstrap module=repo status=ok boards={}",
                    state.boards.len()
                );
                Ok(state)
            }
        }
    }

    fn save(&self, state: &BoardState) -> RepoResult<()> {
        let document = serde_json::to_string(state)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode state: {err}")))?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![STATE_KEY, document],
        )?;
        Ok(())
    }
}

/// Decodes a parsed document, bootstrapping when it lacks the state shape.
///
/// The flag is `true` when the returned state differs from the stored one
/// and must be written back.
fn decode_state(
    document: serde_json::Value,
    config: &BoardsConfig,
) -> RepoResult<(BoardState, bool)> {
    let shaped = document.get("boards").is_some_and(serde_json::Value::is_object)
        && document.get("items").is_some_and(serde_json::Value::is_object);
    if !shaped {
        return Ok((BoardState::bootstrap(&config.grid), true));
    }
    let mut state: BoardState = serde_json::from_value(document)
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    let filled = normalize_state(&mut state, config);
    Ok((state, filled))
}

/// Default-fills a decoded state in place; returns whether anything changed.
///
/// - Empty slot arrays get `default_slots` slots; short ones are padded to `min`.
/// - Arrays longer than `max` lose trailing slots only when those are empty.
/// - Items with `w`/`h` of zero get their kind default.
/// - A state without boards gets a fresh root.
pub fn normalize_state(state: &mut BoardState, config: &BoardsConfig) -> bool {
    let limits = &config.grid;
    if state.boards.is_empty() {
        *state = BoardState::bootstrap(limits);
        return true;
    }

    let mut changed = false;
    for board in state.boards.values_mut() {
        let before = board.slots.len();
        if board.slots.is_empty() {
            board.slots = vec![None; limits.default_slots];
        } else if board.slots.len() < limits.min {
            board.slots.resize(limits.min, None);
        } else if board.slots.len() > limits.max
            && board.slots[limits.max..].iter().all(Option::is_none)
        {
            board.slots.truncate(limits.max);
        }
        changed |= board.slots.len() != before;
    }

    for item in state.items.values_mut() {
        let default = config.tile_sizes.for_kind(item.kind);
        if item.w == 0 {
            item.w = default.w;
            changed = true;
        }
        if item.h == 0 {
            item.h = default.h;
            changed = true;
        }
    }
    changed
}

/// Serializes `state` as a pretty-printed JSON backup.
pub fn export_state_json(state: &BoardState) -> RepoResult<String> {
    serde_json::to_string_pretty(state)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode state: {err}")))
}

/// Parses and default-fills a JSON backup.
///
/// # Errors
/// - `InvalidData` when the text is not JSON or does not decode as state.
pub fn import_state_json(raw: &str, config: &BoardsConfig) -> RepoResult<BoardState> {
    let document: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| RepoError::InvalidData(format!("import failed: invalid JSON: {err}")))?;
    decode_state(document, config).map(|(state, _)| state)
}

fn ensure_state_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "kv_store")? {
        return Err(RepoError::MissingRequiredTable("kv_store"));
    }
    for column in ["key", "value", "updated_at"] {
        if !table_has_column(conn, "kv_store", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "kv_store",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
