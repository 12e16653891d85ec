use std::collections::VecDeque;
use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::Disconnected;
use crate::errors::BookingError;
use crate::models::Room;
use crate::store::RoomStore;
use crate::workflow::{run_commit, step, Notice, Outcome, Transition, WorkflowInput, WorkflowState};

use super::forms::{CustomerField, CustomerForm, RoomPrompt};
use super::helpers::{centered_rect, describe, room_row};

/// Banner shown above the room table.
const TITLE: &str = "Welcome to Serenity Suites Hotel";
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const TABLE_HEADERS: [&str; 4] = ["Room Number", "Type", "Available", "Price"];

/// Which dialog, if any, is open over the room table.
enum Mode {
    Normal,
    EnteringCustomer(CustomerForm),
    /// `workflow` is always `WorkflowState::SelectingRooms` here.
    SelectingRooms {
        workflow: WorkflowState,
        prompt: RoomPrompt,
    },
}

/// Severity levels shown in notifications and the footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            StatusKind::Info => "Notice",
            StatusKind::Error => "Error",
        }
    }
}

#[derive(Clone, Debug)]
struct Notification {
    text: String,
    kind: StatusKind,
}

/// Central application state shared across the TUI.
pub struct App {
    /// `None` when the database could not be opened at startup.
    conn: Option<Connection>,
    store: RoomStore,
    /// Rows currently in the table. Only rebuilt on refresh or after a
    /// booking, so it can lag behind rooms flipped mid-selection.
    visible: Vec<Room>,
    selected: usize,
    mode: Mode,
    /// Blocking messages; the front one must be acknowledged before any other
    /// key is handled.
    notifications: VecDeque<Notification>,
    status: Option<Notification>,
}

impl App {
    /// Load rooms from `conn` and show the available ones. A failed load is
    /// reported to the clerk and leaves the table empty.
    pub fn new(conn: Connection) -> Self {
        let loaded = RoomStore::load_all(&conn);
        Self::start(Some(conn), loaded)
    }

    /// Start with an empty table after the database itself failed to open.
    /// The clerk sees the reason; any later commit fails room by room.
    pub fn without_database(err: anyhow::Error) -> Self {
        Self::start(None, Err(BookingError::storage("Error loading rooms", err)))
    }

    fn start(conn: Option<Connection>, loaded: Result<RoomStore, BookingError>) -> Self {
        let mut app = Self {
            conn,
            store: RoomStore::default(),
            visible: Vec::new(),
            selected: 0,
            mode: Mode::Normal,
            notifications: VecDeque::new(),
            status: None,
        };

        match loaded {
            Ok(store) => {
                if store.is_empty() {
                    tracing::warn!("rooms table is empty, nothing can be booked");
                }
                app.store = store;
            }
            Err(err) => {
                tracing::error!(error = %err, "room load failed at startup");
                app.notify(describe(&err), StatusKind::Error);
            }
        }
        app.refresh_visible();
        app
    }

    /// Route a key press. Returns `true` when the clerk asked to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if !self.notifications.is_empty() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notifications.pop_front();
            }
            return false;
        }

        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::EnteringCustomer(form) => self.handle_customer_form(code, form),
            Mode::SelectingRooms { workflow, prompt } => {
                self.handle_room_prompt(code, workflow, prompt)
            }
        };

        exit
    }

    /// Abandon the booking in progress without writing anything.
    pub(crate) fn handle_ctrl_x(&mut self) {
        if !self.notifications.is_empty() {
            return;
        }

        self.mode = match mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => Mode::Normal,
            Mode::EnteringCustomer(_) => {
                self.drive(WorkflowState::CollectingCustomerInfo, WorkflowInput::Cancel)
            }
            Mode::SelectingRooms { workflow, .. } => self.drive(workflow, WorkflowInput::Cancel),
        };
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                self.clear_status();
                return Mode::EnteringCustomer(CustomerForm::default());
            }
            KeyCode::Char('v') | KeyCode::Char('V') => {
                self.refresh_visible();
                self.set_status(
                    format!("Showing {} available room(s).", self.visible.len()),
                    StatusKind::Info,
                );
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.visible.len() {
                    self.selected += 1;
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_customer_form(&mut self, code: KeyCode, mut form: CustomerForm) -> Mode {
        match code {
            KeyCode::Esc => {
                return self.drive(WorkflowState::CollectingCustomerInfo, WorkflowInput::Cancel)
            }
            KeyCode::Enter => {
                let details = form.into_details();
                return self.drive(
                    WorkflowState::CollectingCustomerInfo,
                    WorkflowInput::Customer(details),
                );
            }
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Mode::EnteringCustomer(form)
    }

    fn handle_room_prompt(
        &mut self,
        code: KeyCode,
        workflow: WorkflowState,
        mut prompt: RoomPrompt,
    ) -> Mode {
        match code {
            KeyCode::Enter => {
                let raw = prompt.take();
                return self.drive(workflow, WorkflowInput::RoomNumber(raw));
            }
            // Closing the prompt finishes selection, same as a blank entry.
            KeyCode::Esc => {
                return self.drive(workflow, WorkflowInput::RoomNumber(String::new()))
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Char(ch) => {
                prompt.push_char(ch);
            }
            _ => {}
        }
        Mode::SelectingRooms { workflow, prompt }
    }

    /// Feed one input into the workflow, queue whatever it wants the clerk to
    /// see, and work out which dialog comes next.
    fn drive(&mut self, state: WorkflowState, input: WorkflowInput) -> Mode {
        let Transition { state, notice } = step(state, input, &mut self.store);
        match notice {
            Some(Notice::RoomSelected { number, .. }) => {
                self.notify(format!("Room {number} booked successfully."), StatusKind::Info)
            }
            Some(Notice::Rejected(err)) => self.notify(describe(&err), StatusKind::Error),
            None => {}
        }
        self.settle(state)
    }

    fn settle(&mut self, state: WorkflowState) -> Mode {
        match state {
            WorkflowState::CollectingCustomerInfo => {
                Mode::EnteringCustomer(CustomerForm::default())
            }
            WorkflowState::SelectingRooms(_) => Mode::SelectingRooms {
                workflow: state,
                prompt: RoomPrompt::default(),
            },
            WorkflowState::Committing(_) => {
                let done = match self.conn.as_mut() {
                    Some(conn) => run_commit(state, conn),
                    None => run_commit(state, &mut Disconnected),
                };
                self.settle(done)
            }
            WorkflowState::Done(Outcome::Booked { booking, report }) => {
                for failure in &report.failures {
                    self.notify(
                        format!("Room {}: {}", failure.room, describe(&failure.error)),
                        StatusKind::Error,
                    );
                }
                self.refresh_visible();
                self.notify(
                    format!("Booking Complete! Total Amount: {}", booking.total),
                    StatusKind::Info,
                );
                Mode::Normal
            }
            WorkflowState::Done(Outcome::NothingBooked) => Mode::Normal,
            WorkflowState::Cancelled => {
                self.refresh_visible();
                self.set_status("Booking cancelled.", StatusKind::Info);
                Mode::Normal
            }
        }
    }

    fn refresh_visible(&mut self) {
        self.visible = self.store.available_rooms().cloned().collect();
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    fn notify<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        let notification = Notification {
            text: text.into(),
            kind,
        };
        self.status = Some(notification.clone());
        self.notifications.push_back(notification);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(Notification {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_room_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::EnteringCustomer(form) => self.draw_customer_form(frame, area, form),
            Mode::SelectingRooms { workflow, prompt } => {
                self.draw_room_prompt(frame, area, workflow, prompt)
            }
            Mode::Normal => {}
        }

        if let Some(notification) = self.notifications.front() {
            self.draw_notification(frame, area, notification);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn draw_room_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title("Rooms").borders(Borders::ALL);

        if self.visible.is_empty() {
            let message = Paragraph::new("No rooms available.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(TABLE_HEADERS.to_vec())
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = self.visible.iter().map(room_row).collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Min(10),
                Constraint::Length(10),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        if !self.notifications.is_empty() {
            return Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Acknowledge"),
            ]);
        }
        match &self.mode {
            Mode::Normal => Line::from(vec![
                Span::styled("[b]", key_style),
                Span::raw(" Book Room   "),
                Span::styled("[v]", key_style),
                Span::raw(" View Available Rooms   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[q]", key_style),
                Span::raw(" Exit"),
            ]),
            Mode::EnteringCustomer(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" OK   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::SelectingRooms { .. } => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Add room (blank to finish)   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Finish   "),
                Span::styled("[Ctrl+X]", key_style),
                Span::raw(" Abandon booking"),
            ]),
        }
    }

    fn draw_customer_form(&self, frame: &mut Frame, area: Rect, form: &CustomerForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Enter Booking Details")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = CustomerField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to confirm • Tab to switch • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let row = CustomerField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let prefix = form.active.label().len() as u16 + 2;
        frame.set_cursor_position((
            inner.x + prefix + form.value_len(form.active) as u16,
            inner.y + row,
        ));
    }

    fn draw_room_prompt(
        &self,
        frame: &mut Frame,
        area: Rect,
        workflow: &WorkflowState,
        prompt: &RoomPrompt,
    ) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Book Rooms").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![prompt.build_line(), Line::from("")];
        if let WorkflowState::SelectingRooms(selection) = workflow {
            let picked = if selection.rooms.is_empty() {
                "none yet".to_string()
            } else {
                selection
                    .rooms
                    .iter()
                    .map(|number| number.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            lines.push(Line::from(format!("Customer: {}", selection.customer.name)));
            lines.push(Line::from(format!("Selected: {picked}")));
            lines.push(Line::from(format!("Running total: {}", selection.total)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter room number to book (blank to finish)",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        frame.set_cursor_position((
            inner.x + RoomPrompt::LABEL.len() as u16 + prompt.input.chars().count() as u16,
            inner.y,
        ));
    }

    fn draw_notification(&self, frame: &mut Frame, area: Rect, notification: &Notification) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notification.kind.title())
            .borders(Borders::ALL)
            .border_style(notification.kind.style());

        let lines = vec![
            Line::from(notification.text.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ensure_schema, fetch_bookings, fetch_rooms, insert_room};
    use crate::db::open_database;
    use crate::models::Price;

    fn db(app: &App) -> &Connection {
        app.conn.as_ref().unwrap()
    }

    fn app_with_rooms(rooms: &[(i64, &str, bool, i64)]) -> App {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        for &(number, kind, available, cents) in rooms {
            insert_room(
                &conn,
                &Room {
                    number,
                    kind: kind.to_string(),
                    available,
                    price: Price::from_cents(cents),
                },
            )
            .unwrap();
        }
        App::new(conn)
    }

    fn standard_app() -> App {
        app_with_rooms(&[
            (101, "Single", true, 10_000),
            (102, "Twin", true, 7_550),
            (103, "Double", false, 15_000),
            (104, "Suite", true, 30_000),
        ])
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn pending(app: &App) -> Vec<String> {
        app.notifications.iter().map(|n| n.text.clone()).collect()
    }

    fn acknowledge_all(app: &mut App) {
        while !app.notifications.is_empty() {
            app.handle_key(KeyCode::Enter);
        }
    }

    fn visible_numbers(app: &App) -> Vec<i64> {
        app.visible.iter().map(|room| room.number).collect()
    }

    #[test]
    fn startup_shows_available_rooms_in_load_order() {
        let app = standard_app();
        assert_eq!(visible_numbers(&app), vec![101, 102, 104]);
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn startup_load_failure_leaves_table_empty() {
        let mut app = App::new(Connection::open_in_memory().unwrap());
        assert!(app.visible.is_empty());
        assert!(app.store.is_empty());
        let messages = pending(&app);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Error loading rooms: no such table: rooms"));

        assert!(!app.handle_key(KeyCode::Char('q')));
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn unreadable_database_still_starts_with_notice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotel.sqlite");
        std::fs::write(&path, b"not an sqlite file ".repeat(256)).unwrap();

        let err = open_database(&path).unwrap_err();
        let mut app = App::without_database(err);

        assert!(app.visible.is_empty());
        let messages = pending(&app);
        assert_eq!(messages.len(), 1);
        assert!(
            messages[0].starts_with("Error loading rooms: file is not a database"),
            "{}",
            messages[0]
        );

        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "101");
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            pending(&app),
            vec!["Room 101 is not available or is an invalid room number."]
        );
        acknowledge_all(&mut app);
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            pending(&app),
            vec!["No rooms booked. Please book at least one room."]
        );
        acknowledge_all(&mut app);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn commits_without_database_report_each_write() {
        let mut app = App::without_database(anyhow::anyhow!("disk went away"));
        acknowledge_all(&mut app);
        app.store = RoomStore::from_rooms(vec![Room {
            number: 101,
            kind: "Single".into(),
            available: true,
            price: Price::from_cents(10_000),
        }]);

        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "101");
        app.handle_key(KeyCode::Enter);
        acknowledge_all(&mut app);
        app.handle_key(KeyCode::Enter);

        assert_eq!(
            pending(&app),
            vec![
                "Room 101: Error saving booking: no database connection".to_string(),
                "Room 101: Error updating room: no database connection".to_string(),
                "Booking Complete! Total Amount: 100.00".to_string(),
            ]
        );
    }

    #[test]
    fn full_booking_persists_and_reports_total() {
        let mut app = standard_app();

        app.handle_key(KeyCode::Char('b'));
        type_text(&mut app, "Ada Moreno");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "555-0134");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "4 Quay Street");
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "ada@example.com");
        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.mode, Mode::SelectingRooms { .. }));

        type_text(&mut app, "101");
        app.handle_key(KeyCode::Enter);
        assert_eq!(pending(&app), vec!["Room 101 booked successfully."]);
        acknowledge_all(&mut app);

        type_text(&mut app, "102");
        app.handle_key(KeyCode::Enter);
        acknowledge_all(&mut app);

        // The table is not refreshed mid-selection.
        assert_eq!(visible_numbers(&app), vec![101, 102, 104]);

        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(pending(&app), vec!["Booking Complete! Total Amount: 175.50"]);
        assert_eq!(visible_numbers(&app), vec![104]);

        let bookings = fetch_bookings(db(&app)).unwrap();
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].customer.name, "Ada Moreno");
        assert_eq!(bookings[1].customer.email, "ada@example.com");
        assert_eq!(bookings[1].room_number, 102);

        let stored: Vec<i64> = fetch_rooms(db(&app))
            .unwrap()
            .into_iter()
            .filter(|room| room.available)
            .map(|room| room.number)
            .collect();
        assert_eq!(stored, vec![104]);
    }

    #[test]
    fn bad_room_numbers_are_reported_and_retried() {
        let mut app = standard_app();
        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Enter);

        type_text(&mut app, "abc");
        app.handle_key(KeyCode::Enter);
        assert_eq!(pending(&app), vec!["Invalid room number format: 'abc'."]);
        acknowledge_all(&mut app);

        type_text(&mut app, "103");
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            pending(&app),
            vec!["Room 103 is not available or is an invalid room number."]
        );
        acknowledge_all(&mut app);

        type_text(&mut app, "104");
        app.handle_key(KeyCode::Enter);
        acknowledge_all(&mut app);
        type_text(&mut app, "104");
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            pending(&app),
            vec!["Room 104 is not available or is an invalid room number."]
        );
        acknowledge_all(&mut app);
        assert!(matches!(app.mode, Mode::SelectingRooms { .. }));

        app.handle_key(KeyCode::Esc);
        assert_eq!(pending(&app), vec!["Booking Complete! Total Amount: 300.00"]);
    }

    #[test]
    fn finishing_without_rooms_writes_nothing() {
        let mut app = standard_app();
        app.handle_key(KeyCode::Char('b'));
        type_text(&mut app, "Walk-in");
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(
            pending(&app),
            vec!["No rooms booked. Please book at least one room."]
        );
        assert!(fetch_bookings(db(&app)).unwrap().is_empty());
        assert_eq!(visible_numbers(&app), vec![101, 102, 104]);
    }

    #[test]
    fn escape_on_customer_form_cancels() {
        let mut app = standard_app();
        app.handle_key(KeyCode::Char('b'));
        type_text(&mut app, "Someone");
        app.handle_key(KeyCode::Esc);

        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.notifications.is_empty());
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Booking cancelled.")
        );
    }

    #[test]
    fn ctrl_x_abandons_selection_and_releases_rooms() {
        let mut app = standard_app();
        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "101");
        app.handle_key(KeyCode::Enter);
        acknowledge_all(&mut app);

        app.handle_ctrl_x();

        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.store.find_available(101).is_ok());
        assert_eq!(visible_numbers(&app), vec![101, 102, 104]);
        assert!(fetch_bookings(db(&app)).unwrap().is_empty());
    }

    #[test]
    fn failed_writes_are_reported_without_stopping_later_rooms() {
        let mut app = standard_app();
        app.handle_key(KeyCode::Char('b'));
        app.handle_key(KeyCode::Enter);
        for number in ["101", "102", "104"] {
            type_text(&mut app, number);
            app.handle_key(KeyCode::Enter);
            acknowledge_all(&mut app);
        }

        // Room 102 refuses the availability update.
        db(&app)
            .execute_batch(
                "CREATE TRIGGER lock_102 BEFORE UPDATE ON rooms
                 WHEN NEW.room_number = 102
                 BEGIN SELECT RAISE(ABORT, 'room 102 is locked'); END;",
            )
            .unwrap();
        app.handle_key(KeyCode::Enter);

        assert_eq!(
            pending(&app),
            vec![
                "Room 102: Error updating room: room 102 is locked".to_string(),
                "Booking Complete! Total Amount: 475.50".to_string(),
            ]
        );
        let booked: Vec<i64> = fetch_bookings(db(&app))
            .unwrap()
            .into_iter()
            .map(|b| b.room_number)
            .collect();
        assert_eq!(booked, vec![101, 102, 104]);
        assert!(app.visible.is_empty());
    }

    #[test]
    fn view_refreshes_from_store() {
        let mut app = standard_app();
        app.store.mark_unavailable(101);
        assert_eq!(visible_numbers(&app), vec![101, 102, 104]);

        app.handle_key(KeyCode::Char('v'));
        assert_eq!(visible_numbers(&app), vec![102, 104]);
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn navigation_stays_within_table() {
        let mut app = standard_app();
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected, 0);
        for _ in 0..5 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.selected, 2);
    }
}
