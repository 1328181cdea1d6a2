//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::config::DbConfig;
use crate::errors::{from_rusqlite, Result};

/// Open a SQLite database at the given path with default settings
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    open_with(&DbConfig::file(path.as_ref()))
}

/// Open an in-memory SQLite database with default settings
pub fn open_in_memory() -> Result<Connection> {
    open_with(&DbConfig::in_memory())
}

/// Open and configure a connection as described by `config`
pub fn open_with(config: &DbConfig) -> Result<Connection> {
    let conn = match &config.path {
        Some(path) => Connection::open(path),
        None => Connection::open_in_memory(),
    }
    .map_err(|e| from_rusqlite("open", e))?;

    configure(&conn, config)?;
    Ok(conn)
}

/// Apply connection PRAGMAs
pub fn configure(conn: &Connection, config: &DbConfig) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", config.foreign_keys)
        .map_err(|e| from_rusqlite("configure", e))?;

    if let Some(mode) = config.effective_journal_mode() {
        let applied: String = conn
            .pragma_update_and_check(None, "journal_mode", mode.as_str(), |row| row.get(0))
            .map_err(|e| from_rusqlite("configure", e))?;
        tracing::debug!(requested = mode.as_str(), applied = %applied, "journal mode set");
    }

    if let Some(ms) = config.busy_timeout_ms {
        conn.busy_timeout(Duration::from_millis(ms))
            .map_err(|e| from_rusqlite("configure", e))?;
    }

    Ok(())
}
