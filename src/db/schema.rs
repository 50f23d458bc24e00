//! Versioned schema migrations.
//!
//! Each migration runs in its own transaction together with the row that
//! records it in `schema_version`, so a failed migration leaves neither.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "experiments",
    sql: include_str!("migrations/001_initial.sql"),
}];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )
    .context("Failed to create schema_version table")?;

    let current = current_version(conn)?;
    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > current).collect();
    if pending.is_empty() {
        tracing::debug!("Schema up to date at version {}", current);
        return Ok(());
    }

    for migration in pending {
        apply_migration(conn, migration)?;
    }
    Ok(())
}

/// Highest applied migration, or 0 for a fresh store.
fn current_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn apply_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    tracing::info!(
        "Applying migration {:03} ({})",
        migration.version,
        migration.name
    );

    // Dropped without commit on any error, which rolls the migration back.
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql).with_context(|| {
        format!(
            "Failed to apply migration {:03} ({})",
            migration.version, migration.name
        )
    })?;
    tx.execute(
        "INSERT INTO schema_version (version, name, applied_at) VALUES (?1, ?2, ?3)",
        params![migration.version, migration.name, chrono::Utc::now().to_rfc3339()],
    )?;
    tx.commit()?;

    Ok(())
}
