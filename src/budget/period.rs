//! Calendar month windows used to match expenses to budgets.

use time::{Date, Month};

use crate::Error;

/// A validated calendar month, e.g. March 2025.
///
/// Expenses dated in `[start, end)` fall within the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    start: Date,
    end: Date,
}

impl Period {
    /// Create the period for `month` (1-12) of `year`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] if `month` is not in 1-12, or if the period's dates cannot be
    /// represented.
    pub fn new(month: u8, year: i32) -> Result<Self, Error> {
        let invalid = || Error::InvalidPeriod { month, year };

        let calendar_month = Month::try_from(month).map_err(|_| invalid())?;
        let start = Date::from_calendar_date(year, calendar_month, 1).map_err(|_| invalid())?;

        let end = match calendar_month {
            Month::December => year
                .checked_add(1)
                .and_then(|next_year| Date::from_calendar_date(next_year, Month::January, 1).ok()),
            _ => Date::from_calendar_date(year, calendar_month.next(), 1).ok(),
        }
        .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    /// The period that contains `date`.
    ///
    /// # Errors
    /// Returns [Error::InvalidPeriod] if `date` is in the last representable month.
    pub fn containing(date: Date) -> Result<Self, Error> {
        Self::new(date.month() as u8, date.year())
    }

    /// The month of the year, 1-12.
    pub fn month(&self) -> u8 {
        self.start.month() as u8
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// The first day of the period.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The first day after the period.
    pub fn end(&self) -> Date {
        self.end
    }
}
