//! Booking workflow expressed as an explicit state machine.
//!
//! A booking moves through `CollectingCustomerInfo -> SelectingRooms ->
//! Committing -> Done`, or ends in `Cancelled` from either of the first two
//! states. [`step`] decides every transition from the current state and one
//! piece of clerk input, touching nothing but the [`RoomStore`]. Storage is
//! only reached from [`run_commit`], through the [`BookingGateway`] seam.
//!
//! Commits are not atomic. Each selected room gets an insert followed by an
//! availability update, every write is attempted even after an earlier one
//! failed, and nothing already flipped in memory is rolled back. A failure
//! part way through therefore leaves storage and the in-memory store out of
//! step until the next restart reloads the rooms.

use crate::db::BookingGateway;
use crate::errors::BookingError;
use crate::models::{Booking, CustomerDetails, Price};
use crate::store::RoomStore;

/// Rooms picked so far for one customer, with the total accumulated as each
/// room was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub customer: CustomerDetails,
    pub rooms: Vec<i64>,
    pub total: Price,
}

impl Selection {
    fn new(customer: CustomerDetails) -> Self {
        Self {
            customer,
            rooms: Vec::new(),
            total: Price::ZERO,
        }
    }

    fn into_booking(self) -> Booking {
        Booking {
            customer: self.customer,
            rooms: self.rooms,
            total: self.total,
        }
    }
}

#[derive(Debug)]
pub enum WorkflowState {
    CollectingCustomerInfo,
    SelectingRooms(Selection),
    Committing(Booking),
    Done(Outcome),
    Cancelled,
}

impl Default for WorkflowState {
    fn default() -> Self {
        WorkflowState::CollectingCustomerInfo
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The booking went through the commit step. Individual writes may still
    /// have failed; see `report`.
    Booked {
        booking: Booking,
        report: CommitReport,
    },
    /// Selection ended before any room was chosen; nothing was written.
    NothingBooked,
}

/// Input the clerk can feed into the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowInput {
    /// The customer form was confirmed.
    Customer(CustomerDetails),
    /// Raw text from the room-number prompt. Blank text ends the selection.
    RoomNumber(String),
    Cancel,
}

/// What the clerk should be told after a transition.
#[derive(Debug)]
pub enum Notice {
    RoomSelected { number: i64, running_total: Price },
    Rejected(BookingError),
}

#[derive(Debug)]
pub struct Transition {
    pub state: WorkflowState,
    pub notice: Option<Notice>,
}

impl Transition {
    fn quiet(state: WorkflowState) -> Self {
        Self {
            state,
            notice: None,
        }
    }

    fn with(state: WorkflowState, notice: Notice) -> Self {
        Self {
            state,
            notice: Some(notice),
        }
    }
}

/// Advance the workflow by one input.
///
/// Accepting a room flips its availability in `store` straight away so the
/// same room cannot be picked twice in one session. Abandoning a selection
/// with `Cancel` hands the picked rooms back since nothing was written yet.
/// Inputs that do not apply to the current state leave it unchanged.
pub fn step(state: WorkflowState, input: WorkflowInput, store: &mut RoomStore) -> Transition {
    match (state, input) {
        (WorkflowState::CollectingCustomerInfo, WorkflowInput::Customer(customer)) => {
            Transition::quiet(WorkflowState::SelectingRooms(Selection::new(customer)))
        }
        (WorkflowState::CollectingCustomerInfo, WorkflowInput::Cancel) => {
            tracing::info!("booking cancelled before room selection");
            Transition::quiet(WorkflowState::Cancelled)
        }
        (WorkflowState::SelectingRooms(selection), WorkflowInput::Cancel) => {
            for number in &selection.rooms {
                store.release(*number);
            }
            tracing::info!(
                released = selection.rooms.len(),
                "booking cancelled during room selection"
            );
            Transition::quiet(WorkflowState::Cancelled)
        }
        (WorkflowState::SelectingRooms(selection), WorkflowInput::RoomNumber(raw)) => {
            select_room(selection, &raw, store)
        }
        (state, input) => {
            tracing::debug!(?input, "input ignored in current booking state");
            Transition::quiet(state)
        }
    }
}

fn select_room(mut selection: Selection, raw: &str, store: &mut RoomStore) -> Transition {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return if selection.rooms.is_empty() {
            Transition::with(
                WorkflowState::Done(Outcome::NothingBooked),
                Notice::Rejected(BookingError::NoSelection),
            )
        } else {
            tracing::info!(
                rooms = ?selection.rooms,
                total = %selection.total,
                "room selection finished"
            );
            Transition::quiet(WorkflowState::Committing(selection.into_booking()))
        };
    }

    let number = match trimmed.parse::<i64>() {
        Ok(number) => number,
        Err(_) => {
            return Transition::with(
                WorkflowState::SelectingRooms(selection),
                Notice::Rejected(BookingError::Format {
                    input: raw.to_string(),
                }),
            )
        }
    };

    let price = match store.find_available(number) {
        Ok(room) => room.price,
        Err(err) => {
            return Transition::with(
                WorkflowState::SelectingRooms(selection),
                Notice::Rejected(err),
            )
        }
    };

    store.mark_unavailable(number);
    selection.rooms.push(number);
    selection.total += price;
    tracing::info!(room = number, running_total = %selection.total, "room selected");

    let running_total = selection.total;
    Transition::with(
        WorkflowState::SelectingRooms(selection),
        Notice::RoomSelected {
            number,
            running_total,
        },
    )
}

/// Which of the two per-room writes failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    InsertBooking,
    MarkUnavailable,
}

#[derive(Debug)]
pub struct CommitFailure {
    pub room: i64,
    pub op: WriteOp,
    pub error: BookingError,
}

/// Result of writing a booking out room by room.
#[derive(Debug, Default)]
pub struct CommitReport {
    /// Writes that succeeded, across both operations.
    pub completed: usize,
    pub failures: Vec<CommitFailure>,
}

/// Write every selected room in selection order: booking row first, then the
/// availability update. A failed write is recorded and the loop carries on.
pub fn commit<G: BookingGateway + ?Sized>(booking: &Booking, gateway: &mut G) -> CommitReport {
    let mut report = CommitReport::default();

    for &room in &booking.rooms {
        match gateway.insert_booking(&booking.customer, room) {
            Ok(()) => report.completed += 1,
            Err(err) => {
                tracing::error!(room, error = %err, "failed to insert booking row");
                report.failures.push(CommitFailure {
                    room,
                    op: WriteOp::InsertBooking,
                    error: BookingError::storage("Error saving booking", err),
                });
            }
        }

        match gateway.mark_room_unavailable(room) {
            Ok(()) => report.completed += 1,
            Err(err) => {
                tracing::error!(room, error = %err, "failed to mark room unavailable");
                report.failures.push(CommitFailure {
                    room,
                    op: WriteOp::MarkUnavailable,
                    error: BookingError::storage("Error updating room", err),
                });
            }
        }
    }

    tracing::info!(
        rooms = booking.rooms.len(),
        completed = report.completed,
        failed = report.failures.len(),
        "booking committed"
    );
    report
}

/// Run the commit step when the workflow is in `Committing`; any other state
/// is returned untouched.
pub fn run_commit<G: BookingGateway + ?Sized>(
    state: WorkflowState,
    gateway: &mut G,
) -> WorkflowState {
    match state {
        WorkflowState::Committing(booking) => {
            let report = commit(&booking, gateway);
            WorkflowState::Done(Outcome::Booked { booking, report })
        }
        other => other,
    }
}
