use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::{Price, Room};

/// Catalogue written into an empty `rooms` table so a fresh install has
/// something to book.
const DEFAULT_ROOMS: &[(i64, &str, i64)] = &[
    (101, "Single", 10_000),
    (102, "Single", 10_000),
    (103, "Double", 15_000),
    (104, "Double", 15_000),
    (201, "Twin", 7_550),
    (202, "Deluxe", 22_000),
    (203, "Deluxe", 22_000),
    (301, "Suite", 35_000),
];

/// Load every room row in storage order. The store keeps this order for the
/// table, so there is deliberately no sort on room number here.
pub fn fetch_rooms(conn: &Connection) -> Result<Vec<Room>> {
    let mut stmt = conn
        .prepare("SELECT room_number, type, available, price FROM rooms ORDER BY rowid")
        .context("failed to prepare room query")?;

    let rooms = stmt
        .query_map([], |row| {
            Ok(Room {
                number: row.get(0)?,
                kind: row.get(1)?,
                available: row.get(2)?,
                price: Price::from_decimal(row.get(3)?),
            })
        })
        .context("failed to load rooms")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect rooms")?;

    Ok(rooms)
}

/// Flip the stored availability flag for a single room. Only a failing
/// statement is an error; a room number that matches no row is logged and
/// otherwise ignored.
pub fn mark_room_unavailable(conn: &Connection, room_number: i64) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE rooms SET available = FALSE WHERE room_number = ?1",
            params![room_number],
        )
        .context("failed to update room availability")?;

    if updated == 0 {
        tracing::warn!(room = room_number, "availability update matched no room row");
    }
    Ok(())
}

/// Insert a room row. Used for seeding and by tests that need a specific
/// catalogue.
pub fn insert_room(conn: &Connection, room: &Room) -> Result<()> {
    conn.execute(
        "INSERT INTO rooms (room_number, type, available, price) VALUES (?1, ?2, ?3, ?4)",
        params![room.number, room.kind, room.available, room.price.as_decimal()],
    )
    .with_context(|| format!("failed to insert room {}", room.number))?;
    Ok(())
}

/// Populate the default catalogue when the `rooms` table is empty. Returns the
/// number of rows written (zero when rooms already existed).
pub fn seed_rooms_if_empty(conn: &Connection) -> Result<usize> {
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM rooms", [], |row| row.get(0))
        .context("failed to count rooms")?;
    if existing > 0 {
        return Ok(0);
    }

    for &(number, kind, cents) in DEFAULT_ROOMS {
        insert_room(
            conn,
            &Room {
                number,
                kind: kind.to_string(),
                available: true,
                price: Price::from_cents(cents),
            },
        )?;
    }

    tracing::info!(count = DEFAULT_ROOMS.len(), "seeded default rooms");
    Ok(DEFAULT_ROOMS.len())
}
