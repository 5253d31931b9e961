//! Schema steps for the board database.
//!
//! Steps are plain SQL files next to this module, applied in revision
//! order inside one transaction. After each step the connection's
//! `user_version` is set to that step's revision, so a crash mid-upgrade
//! leaves the file at its previous revision.

use super::{schema_version, DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_kv_store.sql"),
}];

/// Newest schema revision this build can write.
pub fn latest_version() -> u32 {
    STEPS.iter().map(|step| step.version).max().unwrap_or(0)
}

fn pending(applied: u32) -> impl Iterator<Item = &'static SchemaStep> {
    STEPS.iter().filter(move |step| step.version > applied)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the file is newer than this build.
/// - `MigrationFailed` naming the first step that did not apply.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let applied = schema_version(conn)?;
    let latest = latest_version();
    match applied.cmp(&latest) {
        Ordering::Greater => {
            return Err(DbError::SchemaTooNew {
                found: applied,
                readable: latest,
            })
        }
        Ordering::Equal => {
            debug!("event=db_migrate module=db status=skipped version={applied}");
            return Ok(());
        }
        Ordering::Less => {}
    }

    let tx = conn.transaction()?;
    for step in pending(applied) {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| DbError::MigrationFailed {
                version: step.version,
                name: step.name,
                source,
            })?;
        debug!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={applied} to_version={latest}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, pending, STEPS};
    use crate::db::schema_version;
    use rusqlite::Connection;

    #[test]
    fn revisions_start_at_one_and_have_no_gaps() {
        for (offset, step) in STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, offset + 1, "step {}", step.name);
        }
        assert_eq!(latest_version() as usize, STEPS.len());
    }

    #[test]
    fn pending_skips_applied_revisions() {
        assert_eq!(pending(0).count(), STEPS.len());
        assert_eq!(pending(latest_version()).count(), 0);
    }

    #[test]
    fn second_upgrade_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute("INSERT INTO kv_store (key, value) VALUES ('boards_state', '{}');", [])
            .unwrap();

        apply_migrations(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), latest_version());
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
