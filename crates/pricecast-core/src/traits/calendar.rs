//! Trading calendars used to date future forecast points.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Supplies the next trading session after a date.
pub trait TradingCalendar: Debug + Send + Sync {
    /// First session strictly after `date`.
    fn next_session(&self, date: NaiveDate) -> NaiveDate;

    /// The `count` sessions following `date`.
    fn sessions_after(&self, date: NaiveDate, count: usize) -> Vec<NaiveDate> {
        let mut out = Vec::with_capacity(count);
        let mut current = date;
        for _ in 0..count {
            current = self.next_session(current);
            out.push(current);
        }
        out
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday to Friday, no holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekdayCalendar;

impl TradingCalendar for WeekdayCalendar {
    fn next_session(&self, date: NaiveDate) -> NaiveDate {
        let mut next = date + Duration::days(1);
        while is_weekend(next) {
            next += Duration::days(1);
        }
        next
    }
}

/// Weekdays minus an explicit holiday list.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

impl TradingCalendar for HolidayCalendar {
    fn next_session(&self, date: NaiveDate) -> NaiveDate {
        let mut next = date + Duration::days(1);
        while is_weekend(next) || self.is_holiday(next) {
            next += Duration::days(1);
        }
        next
    }
}
