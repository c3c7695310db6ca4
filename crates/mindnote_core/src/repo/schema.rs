//! Connection readiness checks shared by store constructors.

use super::{RepoError, RepoResult};
use rusqlite::Connection;

const REQUIRED_TABLES: &[&str] = &[
    "categories",
    "tags",
    "notes",
    "note_tags",
    "tasks",
    "task_tags",
];

/// Fails with `MissingRequiredTable` when the connection is not migrated.
pub(super) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
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
