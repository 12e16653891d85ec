use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Open (or create) the database file at `path` and make sure both tables
/// exist. A file created from scratch starts with empty tables; seeding is a
/// separate step.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    tracing::info!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Create the `rooms` and `bookings` tables when they are missing. Existing
/// tables are left untouched so a pre-populated database keeps its rows.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS rooms (
            room_number INTEGER NOT NULL UNIQUE,
            type TEXT NOT NULL,
            available BOOLEAN NOT NULL DEFAULT 1,
            price NUMERIC NOT NULL
        )",
        [],
    )
    .context("failed to create rooms table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS bookings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_name TEXT,
            contact TEXT,
            address TEXT,
            email TEXT,
            room_number INTEGER NOT NULL
        )",
        [],
    )
    .context("failed to create bookings table")?;

    Ok(())
}
