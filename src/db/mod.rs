//! Persistence module split across logical submodules.

mod bookings;
mod connection;
mod rooms;

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::models::CustomerDetails;

#[cfg(test)]
pub use bookings::{fetch_bookings, BookingRecord};
pub use bookings::insert_booking;
pub use connection::{ensure_schema, open_database};
pub use rooms::{fetch_rooms, insert_room, mark_room_unavailable, seed_rooms_if_empty};

/// The two writes a booking commit performs for every selected room. The
/// workflow only talks to storage through this trait so commits can be
/// exercised against a recording fake.
pub trait BookingGateway {
    fn insert_booking(&mut self, customer: &CustomerDetails, room_number: i64) -> Result<()>;
    fn mark_room_unavailable(&mut self, room_number: i64) -> Result<()>;
}

impl BookingGateway for Connection {
    fn insert_booking(&mut self, customer: &CustomerDetails, room_number: i64) -> Result<()> {
        bookings::insert_booking(self, customer, room_number).map(|_| ())
    }

    fn mark_room_unavailable(&mut self, room_number: i64) -> Result<()> {
        rooms::mark_room_unavailable(self, room_number)
    }
}

/// Gateway used when the database never opened. Every write fails, so a
/// commit reports one storage error per operation instead of crashing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Disconnected;

impl BookingGateway for Disconnected {
    fn insert_booking(&mut self, _customer: &CustomerDetails, _room_number: i64) -> Result<()> {
        Err(anyhow!("no database connection"))
    }

    fn mark_room_unavailable(&mut self, _room_number: i64) -> Result<()> {
        Err(anyhow!("no database connection"))
    }
}
