//! In-memory room collection the booking workflow reads and mutates. It is
//! filled once from storage at startup and afterwards only its availability
//! flags change; writing those changes back is the workflow's job, not the
//! store's.

use std::collections::HashSet;

use rusqlite::Connection;

use crate::db::fetch_rooms;
use crate::errors::BookingError;
use crate::models::Room;

#[derive(Debug, Clone, Default)]
pub struct RoomStore {
    rooms: Vec<Room>,
}

impl RoomStore {
    /// Build a store from rows in load order. Later rows that reuse a room
    /// number are dropped so lookups by number stay unambiguous.
    pub fn from_rooms(rooms: Vec<Room>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(rooms.len());
        for room in rooms {
            if seen.insert(room.number) {
                unique.push(room);
            } else {
                tracing::warn!(room = room.number, "duplicate room number in storage, skipped");
            }
        }
        Self { rooms: unique }
    }

    /// Load every room from the database.
    pub fn load_all(conn: &Connection) -> Result<Self, BookingError> {
        let rooms =
            fetch_rooms(conn).map_err(|err| BookingError::storage("Error loading rooms", err))?;
        let store = Self::from_rooms(rooms);
        tracing::info!(
            total = store.len(),
            available = store.available_rooms().count(),
            "rooms loaded"
        );
        Ok(store)
    }

    /// Look up a room that can still be booked. Unknown numbers and rooms that
    /// are already taken produce the same error.
    pub fn find_available(&self, number: i64) -> Result<&Room, BookingError> {
        self.rooms
            .iter()
            .find(|room| room.number == number && room.available)
            .ok_or(BookingError::NotAvailable(number))
    }

    /// Clear the in-memory availability flag. Returns whether a room with that
    /// number exists.
    pub fn mark_unavailable(&mut self, number: i64) -> bool {
        self.set_available(number, false)
    }

    /// Put a room back into the pool, used when a booking is abandoned before
    /// anything was written.
    pub fn release(&mut self, number: i64) -> bool {
        self.set_available(number, true)
    }

    fn set_available(&mut self, number: i64, available: bool) -> bool {
        match self.rooms.iter_mut().find(|room| room.number == number) {
            Some(room) => {
                room.available = available;
                true
            }
            None => false,
        }
    }

    /// Rooms that may be booked, in load order.
    pub fn available_rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().filter(|room| room.available)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
