//! SQLite file behind the board store.
//!
//! A board database holds one table, `kv_store`, whose `boards_state` row
//! carries the whole serialized tree. This module owns opening that file
//! and bringing its schema up to date; reading and writing the document is
//! left to `repo::state_repo`.
//!
//! The schema revision lives in `PRAGMA user_version`. A connection handed
//! out by [`open_db`] or [`open_db_in_memory`] is always at
//! [`migrations::latest_version`].

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Result alias for opening and upgrading a board database.
pub type DbResult<T> = Result<T, DbError>;

/// Why a board database could not be opened or upgraded.
#[derive(Debug)]
pub enum DbError {
    /// SQLite refused a statement outside any schema step.
    Sqlite(rusqlite::Error),
    /// One schema step failed; the whole upgrade was rolled back.
    MigrationFailed {
        /// Revision of the failing step.
        version: u32,
        /// Short label of the failing step.
        name: &'static str,
        /// SQLite error raised by the step.
        source: rusqlite::Error,
    },
    /// The file carries a schema revision this build cannot read.
    SchemaTooNew {
        /// Revision stored in the file.
        found: u32,
        /// Newest revision known to this build.
        readable: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "board database error: {err}"),
            Self::MigrationFailed {
                version,
                name,
                source,
            } => write!(f, "schema step {version} ({name}) failed: {source}"),
            Self::SchemaTooNew { found, readable } => write!(
                f,
                "board database is at schema {found} but this build reads up to {readable}; update the app"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::MigrationFailed { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Reads the schema revision stamped on `conn`.
pub fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}
