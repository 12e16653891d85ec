//! Core library surface for the Serenity Suites booking terminal.
//!
//! Rooms live in an in-memory [`RoomStore`] loaded from SQLite at startup; the
//! booking [`workflow`] is a state machine over that store that commits
//! through the [`BookingGateway`] trait; the `ui` module drives it from the
//! keyboard.
pub mod config;
pub mod db;
pub mod errors;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;
pub mod workflow;

/// Persistence entry points used by `main.rs` to open and seed the database.
pub use db::{open_database, seed_rooms_if_empty, BookingGateway};

pub use config::AppConfig;
pub use errors::BookingError;
pub use models::{Booking, CustomerDetails, Price, Room};
pub use store::RoomStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
