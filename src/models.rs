//! Domain models that mirror the SQLite schema and get passed between the
//! store, the booking workflow, and the TUI. They stay light-weight data
//! holders so the other layers can focus on presentation and persistence.

use std::fmt;
use std::ops::{Add, AddAssign};

/// Exact currency amount stored as minor units (cents). Sums saturate rather
/// than wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: i64) -> Self {
        Price(cents)
    }

    /// Convert a `NUMERIC` column value into cents, rounding to the nearest
    /// cent. SQLite hands back either an integer or a real depending on how
    /// the value was written.
    pub fn from_decimal(value: f64) -> Self {
        Price((value * 100.0).round() as i64)
    }

    /// Value bound into SQL parameters for the `price` column.
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Price) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A bookable unit. `number` is unique across the store and doubles as the
/// key the clerk types into the room prompt.
pub struct Room {
    pub number: i64,
    /// Short label such as "Single" or "Suite".
    pub kind: String,
    pub available: bool,
    pub price: Price,
}

impl Room {
    /// Text for the "Available" column.
    pub fn availability_label(&self) -> &'static str {
        if self.available {
            "Yes"
        } else {
            "No"
        }
    }
}

/// Free-text customer fields captured by the booking form. None of them are
/// validated; whatever the clerk typed is what gets stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub email: String,
}

/// A customer's reservation of one or more rooms in a single session. Built
/// transiently by the workflow, committed once, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub customer: CustomerDetails,
    /// Room numbers in the order they were selected. Never empty.
    pub rooms: Vec<i64>,
    /// Sum of each room's price at the moment it was selected.
    pub total: Price,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_sums_exactly() {
        let total = Price::from_decimal(100.00) + Price::from_decimal(75.50);
        assert_eq!(total, Price::from_cents(17_550));
        assert_eq!(total.to_string(), "175.50");
    }

    #[test]
    fn price_rounds_to_nearest_cent() {
        assert_eq!(Price::from_decimal(19.999), Price::from_cents(2000));
        assert_eq!(Price::from_decimal(0.1 + 0.2), Price::from_cents(30));
        assert_eq!(Price::from_cents(-250).to_string(), "-2.50");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
    }

    #[test]
    fn huge_stored_prices_saturate_instead_of_overflowing() {
        let huge = Price::from_decimal(1e300);
        assert_eq!(huge, Price::from_cents(i64::MAX));

        assert_eq!(huge + huge, Price::from_cents(i64::MAX));
        let mut total = Price::from_cents(100);
        total += huge;
        assert_eq!(total, Price::from_cents(i64::MAX));
    }

    #[test]
    fn availability_label_matches_flag() {
        let mut room = Room {
            number: 101,
            kind: "Single".into(),
            available: true,
            price: Price::from_cents(10_000),
        };
        assert_eq!(room.availability_label(), "Yes");
        room.available = false;
        assert_eq!(room.availability_label(), "No");
    }
}
