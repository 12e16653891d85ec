use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::CustomerDetails;

/// One stored row of the `bookings` table.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    pub id: i64,
    pub customer: CustomerDetails,
    pub room_number: i64,
}

/// Write one booking row for a single room. Multi-room bookings call this once
/// per room; the rows share the same customer fields.
pub fn insert_booking(
    conn: &Connection,
    customer: &CustomerDetails,
    room_number: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO bookings (customer_name, contact, address, email, room_number)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            customer.name,
            customer.contact,
            customer.address,
            customer.email,
            room_number
        ],
    )
    .context("failed to insert booking")?;

    Ok(conn.last_insert_rowid())
}

/// Read back every booking row in insertion order.
#[cfg(test)]
pub fn fetch_bookings(conn: &Connection) -> Result<Vec<BookingRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, customer_name, contact, address, email, room_number
             FROM bookings
             ORDER BY id",
        )
        .context("failed to prepare bookings query")?;

    let bookings = stmt
        .query_map([], |row| {
            Ok(BookingRecord {
                id: row.get(0)?,
                customer: CustomerDetails {
                    name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    contact: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    address: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    email: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                },
                room_number: row.get(5)?,
            })
        })
        .context("failed to iterate bookings")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect bookings")?;

    Ok(bookings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    #[test]
    fn stores_raw_customer_text() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        let customer = CustomerDetails {
            name: "Robert'); DROP TABLE rooms;--".into(),
            contact: "".into(),
            address: "12 Harbour Road".into(),
            email: "not-an-email".into(),
        };
        let first = insert_booking(&conn, &customer, 101).unwrap();
        let second = insert_booking(&conn, &customer, 202).unwrap();
        assert!(second > first);

        let rows = fetch_bookings(&conn).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].customer, customer);
        assert_eq!(rows[0].room_number, 101);
        assert_eq!(rows[1].room_number, 202);

        let rooms_table: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'rooms'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rooms_table, 1);
    }
}
