//! Versioned schema upgrades.
//!
//! The applied version lives in the `metadata` table under
//! `schema_version`. Each step runs in its own transaction together with
//! the version bump, so an interrupted upgrade resumes at the failed step.

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// One schema upgrade.
#[derive(Debug, Clone, Copy)]
struct Migration {
    version: i32,
    name: &'static str,
    sql: &'static str,
}

/// Upgrades in ascending version order.
const MIGRATIONS: &[Migration] = &[
    // The base tables come from SCHEMA_STATEMENTS.
    Migration {
        version: 1,
        name: "key-value store",
        sql: "",
    },
    Migration {
        version: 2,
        name: "index keys by last write",
        sql: "CREATE INDEX IF NOT EXISTS idx_kv_updated ON kv_store(updated_at DESC)",
    },
];

/// Schema version this build writes.
pub const CURRENT_VERSION: i32 = 2;

const VERSION_KEY: &str = "schema_version";

/// Create missing tables and apply pending upgrades.
///
/// # Errors
///
/// Returns an error if a statement fails, the stored version is not a
/// number, or the database was written by a newer schema.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute_batch(statement)?;
    }

    let stored = stored_version(conn)?;
    if stored > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {stored} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > stored) {
        apply(conn, migration)?;
    }
    Ok(())
}

/// Applied schema version, 0 for a fresh database.
fn stored_version(conn: &Connection) -> Result<i32> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match raw {
        None => Ok(0),
        Some(value) => value.trim().parse().map_err(|_| Error::DatabaseMigration {
            message: format!("stored schema version is not a number: {value:?}"),
        }),
    }
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    if !migration.sql.is_empty() {
        tx.execute_batch(migration.sql)?;
    }
    tx.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (VERSION_KEY, migration.version.to_string()),
    )?;
    tx.commit()?;

    info!(
        version = migration.version,
        name = migration.name,
        "Applied schema migration"
    );
    Ok(())
}
