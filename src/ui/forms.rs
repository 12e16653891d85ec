use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::CustomerDetails;

/// Fields available within the customer form, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum CustomerField {
    #[default]
    Name,
    Contact,
    Address,
    Email,
}

impl CustomerField {
    pub(crate) const ALL: [CustomerField; 4] = [
        CustomerField::Name,
        CustomerField::Contact,
        CustomerField::Address,
        CustomerField::Email,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            CustomerField::Name => "Customer Name",
            CustomerField::Contact => "Contact",
            CustomerField::Address => "Address",
            CustomerField::Email => "Email",
        }
    }

    fn index(self) -> usize {
        match self {
            CustomerField::Name => 0,
            CustomerField::Contact => 1,
            CustomerField::Address => 2,
            CustomerField::Email => 3,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// State of the "Enter Booking Details" dialog. Every field is free text and
/// may be left blank.
#[derive(Default, Clone, Debug)]
pub(crate) struct CustomerForm {
    pub(crate) details: CustomerDetails,
    pub(crate) active: CustomerField,
}

impl CustomerForm {
    pub(crate) fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn focus_previous(&mut self) {
        self.active = self.active.previous();
    }

    fn field_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::Name => &mut self.details.name,
            CustomerField::Contact => &mut self.details.contact,
            CustomerField::Address => &mut self.details.address,
            CustomerField::Email => &mut self.details.email,
        }
    }

    pub(crate) fn value(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.details.name,
            CustomerField::Contact => &self.details.contact,
            CustomerField::Address => &self.details.address,
            CustomerField::Email => &self.details.email,
        }
    }

    /// Append a character to the active field. Control characters are
    /// rejected; everything else is kept verbatim.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let active = self.active;
        self.field_mut(active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let active = self.active;
        self.field_mut(active).pop();
    }

    pub(crate) fn value_len(&self, field: CustomerField) -> usize {
        self.value(field).chars().count()
    }

    pub(crate) fn into_details(self) -> CustomerDetails {
        self.details
    }

    /// Render a single `Label: value` line, highlighting the focused field.
    pub(crate) fn build_line(&self, field: CustomerField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() && !is_active {
            "<blank>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }
}

/// Single-line prompt asking for the next room number.
#[derive(Default, Clone, Debug)]
pub(crate) struct RoomPrompt {
    pub(crate) input: String,
}

impl RoomPrompt {
    pub(crate) const LABEL: &'static str = "Room number: ";

    /// Any printable character is accepted so that bad input reaches the
    /// workflow and gets reported as a format error.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            false
        } else {
            self.input.push(ch);
            true
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.input.pop();
    }

    pub(crate) fn take(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::raw(Self::LABEL),
            Span::styled(self.input.clone(), Style::default().fg(Color::Yellow)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_wraps_both_ways() {
        let mut form = CustomerForm::default();
        assert_eq!(form.active, CustomerField::Name);
        form.focus_previous();
        assert_eq!(form.active, CustomerField::Email);
        form.focus_next();
        form.focus_next();
        assert_eq!(form.active, CustomerField::Contact);
    }

    #[test]
    fn typing_targets_the_focused_field() {
        let mut form = CustomerForm::default();
        for ch in "Lee".chars() {
            assert!(form.push_char(ch));
        }
        form.focus_next();
        assert!(!form.push_char('\n'));
        for ch in "07 700".chars() {
            form.push_char(ch);
        }
        form.backspace();

        let details = form.into_details();
        assert_eq!(details.name, "Lee");
        assert_eq!(details.contact, "07 70");
        assert!(details.address.is_empty());
    }

    #[test]
    fn room_prompt_keeps_non_digits() {
        let mut prompt = RoomPrompt::default();
        for ch in "1a".chars() {
            prompt.push_char(ch);
        }
        assert_eq!(prompt.take(), "1a");
        assert!(prompt.input.is_empty());
    }
}
