use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::schedule::Schedule;

/// Working-day arithmetic over a fixed holiday set and weekend policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendar {
    holidays: HashSet<NaiveDate>,
    skip_weekends: bool,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            holidays: HashSet::new(),
            skip_weekends: true,
        }
    }
}

impl WorkCalendar {
    pub fn new<I>(holidays: I, skip_weekends: bool) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
            skip_weekends,
        }
    }

    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self::new(schedule.holidays.iter().copied(), schedule.skip_weekends)
    }

    pub fn skip_weekends(&self) -> bool {
        self.skip_weekends
    }

    /// Add a single holiday
    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    /// Check if a date counts toward scheduled effort
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if self.holidays.contains(&date) {
            return false;
        }
        if self.skip_weekends {
            let weekday = date.weekday();
            if weekday == Weekday::Sat || weekday == Weekday::Sun {
                return false;
            }
        }
        true
    }

    /// End date of a task that starts at `start` and consumes `person_days`
    /// working days. The scan anchors one day before `start` so that a
    /// working start date is itself the first counted day.
    ///
    /// `person_days < 1` is a caller error; callers guard before invoking.
    pub fn end_date_for(&self, start: NaiveDate, person_days: i64) -> NaiveDate {
        assert!(
            person_days >= 1,
            "end_date_for requires person_days >= 1 (got {person_days})"
        );

        let mut current = start - Duration::days(1);
        let mut remaining = person_days;
        while remaining > 0 {
            current = current + Duration::days(1);
            if self.is_working_day(current) {
                remaining -= 1;
            }
        }
        current
    }

    /// Count working days in `[start, end]`, inclusive of both endpoints.
    /// Returns 0 when `end < start`.
    pub fn person_days_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let mut count = 0;
        let mut current = start;
        while current <= end {
            if self.is_working_day(current) {
                count += 1;
            }
            current = current + Duration::days(1);
        }
        count
    }
}
