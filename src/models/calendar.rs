//! Calendar days, call periods and holidays.
//!
//! # Date handling
//! Only calendar dates matter to the engines. Timestamps are truncated to
//! their date component; offsets are not converted.
//!
//! # Holidays
//! The fixed set is Jan 1, Jul 4, Nov 11 and Dec 25 of every year.
//! Additional dates may be registered per run.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{ScheduleError, ScheduleResult};

/// Month/day pairs that are holidays every year.
const FIXED_HOLIDAYS: [(u32, u32); 4] = [(1, 1), (7, 4), (11, 11), (12, 25)];

/// Parses an ISO date, naive date-time, or RFC 3339 timestamp to its date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Lowercase English weekday name (`"monday"`).
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Holiday lookup: the fixed yearly set plus run-specific dates.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    extra: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Creates a calendar with only the fixed holidays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.extra.insert(date);
        self
    }

    /// Adds multiple holidays at once.
    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.extra.extend(dates);
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        FIXED_HOLIDAYS.contains(&(date.month(), date.day())) || self.extra.contains(&date)
    }
}

/// One calendar date requiring on-call coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct CallDay {
    pub date: NaiveDate,
    pub day_of_week: Weekday,
    pub is_weekend: bool,
    pub is_holiday: bool,
}

impl CallDay {
    pub fn new(date: NaiveDate, holidays: &HolidayCalendar) -> Self {
        let day_of_week = date.weekday();
        Self {
            date,
            day_of_week,
            is_weekend: matches!(day_of_week, Weekday::Sat | Weekday::Sun),
            is_holiday: holidays.is_holiday(date),
        }
    }

    /// Call weight: holiday wins over weekend, otherwise 1.0.
    pub fn weight(&self, weekend_weight: f64, holiday_weight: f64) -> f64 {
        if self.is_holiday {
            holiday_weight
        } else if self.is_weekend {
            weekend_weight
        } else {
            1.0
        }
    }
}

/// Inclusive range of call dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CallPeriod {
    /// Creates a period, rejecting an end before the start.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> ScheduleResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// `weeks × 7` consecutive days starting at `start_date`.
    ///
    /// Zero weeks yields a period with no days. Fails with
    /// [`ScheduleError::InvalidCallPeriod`] when the end date is out of range.
    pub fn weeks(start_date: NaiveDate, weeks: u32) -> ScheduleResult<Self> {
        let end_date = chrono::Duration::try_days(i64::from(weeks) * 7 - 1)
            .and_then(|span| start_date.checked_add_signed(span))
            .ok_or(ScheduleError::InvalidCallPeriod {
                start: start_date,
                end: start_date,
            })?;
        Self::new(start_date, end_date)
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        // A period one day short of its start is the empty period from `weeks(_, 0)`.
        let valid = match self.end_date.succ_opt() {
            Some(next) => next >= self.start_date,
            None => true,
        };
        if !valid {
            return Err(ScheduleError::InvalidCallPeriod {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Number of dates in the period.
    pub fn len(&self) -> usize {
        ((self.end_date - self.start_date).num_days() + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call days in chronological order.
    pub fn days(&self, holidays: &HolidayCalendar) -> Vec<CallDay> {
        let end = self.end_date;
        std::iter::successors(Some(self.start_date), |d| d.succ_opt())
            .take_while(|d| *d <= end)
            .map(|d| CallDay::new(d, holidays))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_iso_variants() {
        assert_eq!(parse_iso_date("2025-03-04"), Some(d(2025, 3, 4)));
        assert_eq!(parse_iso_date("2025-03-04T10:30:00Z"), Some(d(2025, 3, 4)));
        assert_eq!(parse_iso_date("2025-03-04T10:30:00.123456"), Some(d(2025, 3, 4)));
        assert_eq!(parse_iso_date("2025-03-04T23:00:00-05:00"), Some(d(2025, 3, 4)));
        assert_eq!(parse_iso_date("04/03/2025"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn test_fixed_holidays() {
        let h = HolidayCalendar::new();
        assert!(h.is_holiday(d(2025, 12, 25)));
        assert!(h.is_holiday(d(2031, 1, 1)));
        assert!(h.is_holiday(d(2025, 7, 4)));
        assert!(h.is_holiday(d(2025, 11, 11)));
        assert!(!h.is_holiday(d(2025, 11, 27)));

        let h = h.with_holiday(d(2025, 11, 27));
        assert!(h.is_holiday(d(2025, 11, 27)));
    }

    #[test]
    fn test_call_weight_precedence() {
        let h = HolidayCalendar::new();
        // 2027-12-25 is a Saturday: holiday wins over weekend
        let xmas = CallDay::new(d(2027, 12, 25), &h);
        assert!(xmas.is_weekend && xmas.is_holiday);
        assert!((xmas.weight(1.5, 2.0) - 2.0).abs() < 1e-10);

        let sat = CallDay::new(d(2025, 3, 8), &h);
        assert!(sat.is_weekend && !sat.is_holiday);
        assert!((sat.weight(1.5, 2.0) - 1.5).abs() < 1e-10);

        let mon = CallDay::new(d(2025, 3, 10), &h);
        assert!((mon.weight(1.5, 2.0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_period_days_chronological() {
        let p = CallPeriod::weeks(d(2025, 3, 3), 2).unwrap();
        assert_eq!(p.len(), 14);
        let days = p.days(&HolidayCalendar::new());
        assert_eq!(days.len(), 14);
        assert_eq!(days[0].date, d(2025, 3, 3));
        assert_eq!(days[13].date, d(2025, 3, 16));
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(days[5].day_of_week, Weekday::Sat);
    }

    #[test]
    fn test_period_validation() {
        assert!(CallPeriod::new(d(2025, 3, 3), d(2025, 3, 3)).is_ok());
        assert!(CallPeriod::new(d(2025, 3, 3), d(2025, 3, 1)).is_err());
        let empty = CallPeriod::weeks(d(2025, 3, 3), 0).unwrap();
        assert!(empty.is_empty());
        assert!(empty.validate().is_ok());
        assert!(empty.days(&HolidayCalendar::new()).is_empty());
    }

    #[test]
    fn test_period_at_calendar_limits() {
        assert!(CallPeriod::weeks(NaiveDate::MIN, 0).is_err());
        assert!(CallPeriod::weeks(NaiveDate::MAX, 1).is_err());
        assert!(CallPeriod::weeks(d(2025, 3, 3), u32::MAX).is_err());

        let last = CallPeriod::new(NaiveDate::MAX, NaiveDate::MAX).unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last.days(&HolidayCalendar::new()).len(), 1);

        let inverted = CallPeriod {
            start_date: NaiveDate::MAX,
            end_date: NaiveDate::MIN,
        };
        assert!(matches!(
            inverted.validate(),
            Err(ScheduleError::InvalidCallPeriod { .. })
        ));
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Mon), "monday");
        assert_eq!(weekday_name(Weekday::Sun), "sunday");
    }
}
