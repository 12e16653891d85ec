//! Ratatui front-end: the room table, the booking dialogs, and the blocking
//! notifications that sit on top of them. All decisions about bookings are
//! delegated to the workflow; this layer only turns key presses into workflow
//! inputs and draws whatever state comes back.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
