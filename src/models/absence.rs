//! Absence calendar.
//!
//! Expands approved-leave date ranges into a per-faculty, per-date lookup.
//! A date present in the calendar means the faculty member is unavailable
//! for the entry's scope; the entry's replacement activity is what makes
//! substitution coverage possible.
//!
//! # Expansion rules
//! - Every date in `[Leave Start, Leave End]` (inclusive) is marked for every
//!   listed faculty id.
//! - Scope defaults to `All Day`.
//! - Replacement activity = comments, or the leave type when comments are empty.
//! - Overlapping records for the same faculty/date: last write wins.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use super::calendar::parse_iso_date;
use super::LeaveRecord;
use crate::validation::{DiagnosticKind, Diagnostics};

const DEFAULT_LEAVE_TYPE: &str = "Leave";

/// Half-day session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[default]
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl TimeOfDay {
    /// Parses `"AM"` / `"PM"` (case-insensitive). Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AM" => Some(Self::Am),
            "PM" => Some(Self::Pm),
            _ => None,
        }
    }

    /// Parses an optional field, defaulting to `AM`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }
}

/// Portion of a day covered by an absence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceScope {
    #[default]
    #[serde(rename = "All Day")]
    AllDay,
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl AbsenceScope {
    /// Parses a scope field. Absent or unrecognized values mean all day.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()) {
            Some(v) if v == "AM" => Self::Am,
            Some(v) if v == "PM" => Self::Pm,
            _ => Self::AllDay,
        }
    }

    /// Whether this scope blocks the given session.
    pub fn covers(&self, time_of_day: TimeOfDay) -> bool {
        matches!(
            (self, time_of_day),
            (Self::AllDay, _) | (Self::Am, TimeOfDay::Am) | (Self::Pm, TimeOfDay::Pm)
        )
    }
}

/// One faculty-date absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceEntry {
    pub leave_type: String,
    #[serde(rename = "timeOfDay")]
    pub scope: AbsenceScope,
    pub replacement_activity: Option<String>,
}

impl AbsenceEntry {
    /// Creates an all-day entry with no replacement.
    pub fn new(leave_type: impl Into<String>) -> Self {
        Self {
            leave_type: leave_type.into(),
            scope: AbsenceScope::AllDay,
            replacement_activity: None,
        }
    }

    pub fn with_scope(mut self, scope: AbsenceScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_replacement(mut self, activity: impl Into<String>) -> Self {
        self.replacement_activity = Some(activity.into());
        self
    }

    /// Replacement activity, if one offers substitution coverage.
    pub fn replacement(&self) -> Option<&str> {
        self.replacement_activity
            .as_deref()
            .filter(|r| !r.trim().is_empty())
    }
}

/// Per-faculty, per-date absence lookup.
#[derive(Debug, Clone, Default)]
pub struct AbsenceCalendar {
    entries: HashMap<String, BTreeMap<NaiveDate, AbsenceEntry>>,
}

impl AbsenceCalendar {
    /// Creates an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands leave records into a calendar.
    ///
    /// Records with missing or unparseable dates, or an end before the start,
    /// are skipped with a diagnostic. When `honor_approval_flags` is set,
    /// records with an explicitly withheld approval are skipped too.
    pub fn build(
        records: &[LeaveRecord],
        honor_approval_flags: bool,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut calendar = Self::new();

        for (index, record) in records.iter().enumerate() {
            let label = record.id.clone().unwrap_or_else(|| format!("leave[{index}]"));

            if honor_approval_flags && record.is_rejected() {
                warn!(leave = %label, "skipping unapproved leave");
                diagnostics.push(DiagnosticKind::UnapprovedLeave, &label, "approval withheld");
                continue;
            }

            let start = record.leave_start.as_deref().and_then(parse_iso_date);
            let end = record.leave_end.as_deref().and_then(parse_iso_date);
            let (start, end) = match (start, end) {
                (Some(s), Some(e)) => (s, e),
                _ => {
                    warn!(leave = %label, "skipping leave with unparseable dates");
                    diagnostics.push(
                        DiagnosticKind::InvalidLeaveDates,
                        &label,
                        format!(
                            "start={:?} end={:?}",
                            record.leave_start, record.leave_end
                        ),
                    );
                    continue;
                }
            };
            if end < start {
                warn!(leave = %label, %start, %end, "skipping inverted leave range");
                diagnostics.push(
                    DiagnosticKind::InvalidLeaveDates,
                    &label,
                    format!("end {end} before start {start}"),
                );
                continue;
            }

            let leave_type = record
                .leave_type
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LEAVE_TYPE.to_string());
            let replacement = record
                .comments
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| leave_type.clone());
            let entry = AbsenceEntry {
                leave_type,
                scope: AbsenceScope::parse_or_default(record.time_of_day.as_deref()),
                replacement_activity: Some(replacement),
            };

            for date in start.iter_days().take_while(|d| *d <= end) {
                for faculty_id in &record.faculty {
                    calendar.insert(faculty_id, date, entry.clone());
                }
            }
            debug!(leave = %label, %start, %end, faculty = record.faculty.len(), "expanded leave");
        }

        calendar
    }

    /// Marks a faculty-date. Replaces any existing entry.
    pub fn insert(&mut self, faculty_id: &str, date: NaiveDate, entry: AbsenceEntry) {
        self.entries
            .entry(faculty_id.to_string())
            .or_default()
            .insert(date, entry);
    }

    /// Absence entry for a faculty-date, any scope.
    pub fn entry(&self, faculty_id: &str, date: NaiveDate) -> Option<&AbsenceEntry> {
        self.entries.get(faculty_id).and_then(|days| days.get(&date))
    }

    /// Whether the faculty member is absent for the given session.
    pub fn is_absent(&self, faculty_id: &str, date: NaiveDate, time_of_day: TimeOfDay) -> bool {
        self.entry(faculty_id, date)
            .is_some_and(|e| e.scope.covers(time_of_day))
    }

    /// Whether any absence touches the date.
    pub fn has_absence(&self, faculty_id: &str, date: NaiveDate) -> bool {
        self.entry(faculty_id, date).is_some()
    }

    /// Number of absent dates recorded for a faculty member.
    pub fn absence_days(&self, faculty_id: &str) -> usize {
        self.entries.get(faculty_id).map_or(0, |days| days.len())
    }

    /// Faculty ids with at least one absence.
    pub fn faculty_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn build(records: &[LeaveRecord]) -> (AbsenceCalendar, Diagnostics) {
        let mut diag = Diagnostics::default();
        let cal = AbsenceCalendar::build(records, false, &mut diag);
        (cal, diag)
    }

    #[test]
    fn test_inclusive_range_expansion() {
        let leave = LeaveRecord::new(
            vec!["F1".into(), "F2".into()],
            "2025-03-03T00:00:00Z",
            "2025-03-05T00:00:00Z",
            "TDY",
        );
        let (cal, diag) = build(&[leave]);
        assert!(diag.is_empty());
        for id in ["F1", "F2"] {
            assert_eq!(cal.absence_days(id), 3);
            assert!(cal.has_absence(id, d("2025-03-03")));
            assert!(cal.has_absence(id, d("2025-03-05")));
            assert!(!cal.has_absence(id, d("2025-03-06")));
        }
    }

    #[test]
    fn test_replacement_falls_back_to_leave_type() {
        let (cal, _) = build(&[LeaveRecord::new(
            vec!["F1".into()],
            "2025-03-03",
            "2025-03-03",
            "Conference",
        )]);
        let e = cal.entry("F1", d("2025-03-03")).unwrap();
        assert_eq!(e.replacement(), Some("Conference"));
        assert_eq!(e.scope, AbsenceScope::AllDay);

        let (cal, _) = build(&[LeaveRecord::new(
            vec!["F1".into()],
            "2025-03-03",
            "2025-03-03",
            "Conference",
        )
        .with_comments("Virtual Coverage")]);
        assert_eq!(
            cal.entry("F1", d("2025-03-03")).unwrap().replacement(),
            Some("Virtual Coverage")
        );
    }

    #[test]
    fn test_scope_matching() {
        let (cal, _) = build(&[LeaveRecord::new(
            vec!["F1".into()],
            "2025-03-03",
            "2025-03-03",
            "Appointment",
        )
        .with_time_of_day("PM")]);
        assert!(!cal.is_absent("F1", d("2025-03-03"), TimeOfDay::Am));
        assert!(cal.is_absent("F1", d("2025-03-03"), TimeOfDay::Pm));
        assert!(cal.has_absence("F1", d("2025-03-03")));
    }

    #[test]
    fn test_last_write_wins() {
        let first = LeaveRecord::new(vec!["F1".into()], "2025-03-01", "2025-03-10", "Vacation");
        let second = LeaveRecord::new(vec!["F1".into()], "2025-03-05", "2025-03-05", "TDY")
            .with_time_of_day("AM");
        let (cal, _) = build(&[first, second]);
        let e = cal.entry("F1", d("2025-03-05")).unwrap();
        assert_eq!(e.leave_type, "TDY");
        assert_eq!(e.scope, AbsenceScope::Am);
        assert_eq!(cal.entry("F1", d("2025-03-04")).unwrap().leave_type, "Vacation");
    }

    #[test]
    fn test_bad_dates_are_diagnosed() {
        let bad = LeaveRecord::new(vec!["F1".into()], "not a date", "2025-03-01", "TDY");
        let inverted = LeaveRecord::new(vec!["F1".into()], "2025-03-05", "2025-03-01", "TDY");
        let (cal, diag) = build(&[bad, inverted]);
        assert!(cal.is_empty());
        assert_eq!(diag.count(DiagnosticKind::InvalidLeaveDates), 2);
    }

    #[test]
    fn test_unapproved_leave_honored_only_when_configured() {
        let mut leave = LeaveRecord::new(vec!["F1".into()], "2025-03-01", "2025-03-01", "TDY");
        leave.approved_army = Some(false);

        let (cal, _) = build(std::slice::from_ref(&leave));
        assert!(cal.has_absence("F1", d("2025-03-01")));

        let mut diag = Diagnostics::default();
        let cal = AbsenceCalendar::build(&[leave], true, &mut diag);
        assert!(cal.is_empty());
        assert_eq!(diag.count(DiagnosticKind::UnapprovedLeave), 1);
    }

    #[test]
    fn test_time_of_day_parsing() {
        assert_eq!(TimeOfDay::parse(" pm "), Some(TimeOfDay::Pm));
        assert_eq!(TimeOfDay::parse("evening"), None);
        assert_eq!(TimeOfDay::parse_or_default(None), TimeOfDay::Am);
        assert_eq!(AbsenceScope::parse_or_default(Some("All Day")), AbsenceScope::AllDay);
        assert_eq!(AbsenceScope::parse_or_default(Some("am")), AbsenceScope::Am);
    }
}
