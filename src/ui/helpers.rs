use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Cell, Row};

use crate::errors::BookingError;
use crate::models::Room;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error. SQLite's
/// own message lives on the `rusqlite::Error`; its ffi source only carries a
/// generic code description, so the walk stops there when one is present.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<rusqlite::Error>())
        .map(|sqlite| sqlite.to_string())
        .or_else(|| err.chain().last().map(|cause| cause.to_string()))
        .unwrap_or_else(|| err.to_string())
}

/// Notification text for a workflow error. Storage failures show their
/// heading plus the innermost cause, e.g. `Error loading rooms: no such table`.
pub(crate) fn describe(err: &BookingError) -> String {
    match err {
        BookingError::Storage { context, source } => {
            format!("{context}: {}", surface_error(source))
        }
        other => other.to_string(),
    }
}

/// One table row: Room Number, Type, Available, Price.
pub(crate) fn room_row(room: &Room) -> Row<'static> {
    Row::new(vec![
        Cell::from(room.number.to_string()),
        Cell::from(room.kind.clone()),
        Cell::from(room.availability_label()),
        Cell::from(room.price.to_string()),
    ])
}
