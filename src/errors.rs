//! Error kinds the booking workflow needs to tell apart. Persistence helpers
//! keep returning `anyhow::Error`; these variants are what the workflow and the
//! TUI match on when deciding whether to retry a prompt or abort.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    /// Storage unreachable or a query failed.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("Invalid room number format: '{input}'.")]
    Format { input: String },
    #[error("Room {0} is not available or is an invalid room number.")]
    NotAvailable(i64),
    #[error("No rooms booked. Please book at least one room.")]
    NoSelection,
}

impl BookingError {
    pub fn storage(context: &'static str, source: anyhow::Error) -> Self {
        BookingError::Storage { context, source }
    }
}
