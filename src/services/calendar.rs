//! Day-by-day availability for the public booking calendar.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::database::models::{Booking, ClosedPeriod};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("endDate must not be before startDate")]
    EndBeforeStart,

    #[error("Date range cannot exceed {0} days")]
    RangeTooLong(i64),
}

/// Validated inclusive `[start, end]` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn parse(start: &str, end: &str, max_days: i64) -> Result<Self, CalendarError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end, max_days)
    }

    pub fn new(start: NaiveDate, end: NaiveDate, max_days: i64) -> Result<Self, CalendarError> {
        if end < start {
            return Err(CalendarError::EndBeforeStart);
        }
        let window = Self { start, end };
        if window.days() > max_days {
            return Err(CalendarError::RangeTooLong(max_days));
        }
        Ok(window)
    }

    /// Number of calendar days in the window, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| CalendarError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnavailableReason {
    Closed,
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub available: bool,
    pub reason: Option<UnavailableReason>,
}

/// One entry per day of `window`. A day is unavailable when a closed period
/// covers it or a non-cancelled stay occupies its night; closures win over bookings.
pub fn compute_availability(
    window: DateWindow,
    bookings: &[Booking],
    closed: &[ClosedPeriod],
) -> Vec<DayAvailability> {
    let active: Vec<&Booking> = bookings.iter().filter(|b| !b.is_cancelled()).collect();

    window
        .start
        .iter_days()
        .take_while(|day| *day <= window.end)
        .map(|date| {
            let reason = if closed.iter().any(|p| p.covers(date)) {
                Some(UnavailableReason::Closed)
            } else if active.iter().any(|b| b.occupies(date)) {
                Some(UnavailableReason::Booked)
            } else {
                None
            };
            DayAvailability {
                date,
                available: reason.is_none(),
                reason,
            }
        })
        .collect()
}
