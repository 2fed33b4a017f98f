//! Faculty capability profiles.
//!
//! A profile is the normalized form of a roster row: identity, weekday
//! availability, credentials, workload capacity and call history. Profiles
//! are immutable once built; per-run counters live in the scheduler's
//! trackers.
//!
//! # Capacity
//! `workload_capacity = available weekdays × 2` (two half-days per day).

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::warn;

use super::RosterRecord;
use crate::validation::{DiagnosticKind, Diagnostics};

/// Credential name for the procedure flag.
pub const PROCEDURE_CREDENTIAL: &str = "Performs Procedure";

const ACTIVE_STATUS: &str = "Active";
const UNKNOWN_NAME: &str = "Unknown";

/// Monday..Friday availability flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableDays {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
}

impl AvailableDays {
    /// All five weekdays available.
    pub fn all() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
        }
    }

    /// Weekend days are never available for supervision.
    pub fn on(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat | Weekday::Sun => false,
        }
    }

    pub fn count(&self) -> u32 {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
        ]
        .iter()
        .filter(|&&d| d)
        .count() as u32
    }
}

/// Roster status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacultyStatus {
    #[default]
    Active,
    Inactive,
}

impl FacultyStatus {
    /// `"Active"` or a missing field is active; any other value is not.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None => Self::Active,
            Some(v) if v.eq_ignore_ascii_case(ACTIVE_STATUS) => Self::Active,
            Some(_) => Self::Inactive,
        }
    }
}

/// Normalized faculty profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityProfile {
    pub id: String,
    pub name: String,
    pub last_name: Option<String>,
    pub primary_duty: Option<String>,
    pub available_days: AvailableDays,
    pub performs_procedures: bool,
    pub specialties: BTreeSet<String>,
    pub total_inpatient_weeks: f64,
    pub workload_capacity: u32,
    pub status: FacultyStatus,
    /// Historical call counts, Monday first.
    pub call_history: [f64; 7],
}

impl CapabilityProfile {
    /// Creates an active profile with no availability and no credentials.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            last_name: None,
            primary_duty: None,
            available_days: AvailableDays::default(),
            performs_procedures: false,
            specialties: BTreeSet::new(),
            total_inpatient_weeks: 0.0,
            workload_capacity: 0,
            status: FacultyStatus::Active,
            call_history: [0.0; 7],
        }
    }

    /// Normalizes a roster row. Returns `None` when the row has no identity.
    pub fn from_record(record: &RosterRecord) -> Option<Self> {
        let id = record.id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let available_days = AvailableDays {
            monday: record.available_monday,
            tuesday: record.available_tuesday,
            wednesday: record.available_wednesday,
            thursday: record.available_thursday,
            friday: record.available_friday,
        };
        let name = record
            .faculty
            .clone()
            .or_else(|| record.last_name.clone())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Some(Self {
            id: id.to_string(),
            name,
            last_name: record.last_name.clone(),
            primary_duty: record.primary_duty.clone(),
            available_days,
            performs_procedures: record.performs_procedure,
            specialties: record.specialties.iter().cloned().collect(),
            total_inpatient_weeks: record.total_inpatient_weeks,
            workload_capacity: available_days.count() * 2,
            status: FacultyStatus::parse(record.faculty_status.as_deref()),
            call_history: record.call_history(),
        })
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets availability and recomputes capacity.
    pub fn with_available_days(mut self, days: AvailableDays) -> Self {
        self.available_days = days;
        self.workload_capacity = days.count() * 2;
        self
    }

    pub fn with_procedures(mut self, performs: bool) -> Self {
        self.performs_procedures = performs;
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialties.insert(specialty.into());
        self
    }

    pub fn with_status(mut self, status: FacultyStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_call_history(mut self, history: [f64; 7]) -> Self {
        self.call_history = history;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == FacultyStatus::Active
    }

    /// Whether the profile holds a named credential.
    ///
    /// `"Performs Procedure"` maps to the procedure flag; any other name is
    /// matched case-insensitively against the specialty list.
    pub fn holds_credential(&self, credential: &str) -> bool {
        if credential.eq_ignore_ascii_case(PROCEDURE_CREDENTIAL) {
            return self.performs_procedures;
        }
        self.specialties
            .iter()
            .any(|s| s.eq_ignore_ascii_case(credential))
    }

    /// Weekday availability for a date.
    pub fn works_on(&self, date: NaiveDate) -> bool {
        self.available_days.on(date.weekday())
    }

    /// Sum of historical calls across all weekdays.
    pub fn historical_calls(&self) -> f64 {
        self.call_history.iter().sum()
    }
}

/// Ordered set of faculty profiles built from roster rows.
///
/// Roster order is preserved; it is the tie-break order of both engines.
#[derive(Debug, Clone, Default)]
pub struct FacultyRegistry {
    profiles: Vec<CapabilityProfile>,
}

impl FacultyRegistry {
    /// Builds a registry. Rows without identity and duplicate ids (after the
    /// first) are omitted and recorded in `diagnostics`.
    pub fn build(records: &[RosterRecord], diagnostics: &mut Diagnostics) -> Self {
        let mut seen = HashSet::new();
        let mut profiles = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let Some(profile) = CapabilityProfile::from_record(record) else {
                warn!(row = index, "omitting roster row without identity");
                diagnostics.push(
                    DiagnosticKind::MissingIdentity,
                    format!("roster[{index}]"),
                    "roster row has no id",
                );
                continue;
            };
            if !seen.insert(profile.id.clone()) {
                warn!(faculty = %profile.id, "omitting duplicate roster row");
                diagnostics.push(
                    DiagnosticKind::DuplicateFacultyId,
                    &profile.id,
                    "duplicate roster row ignored",
                );
                continue;
            }
            profiles.push(profile);
        }

        Self { profiles }
    }

    /// Builds a registry from already-normalized profiles.
    pub fn from_profiles(profiles: Vec<CapabilityProfile>) -> Self {
        Self { profiles }
    }

    /// All profiles in roster order, active or not.
    pub fn profiles(&self) -> &[CapabilityProfile] {
        &self.profiles
    }

    /// Active profiles in roster order.
    pub fn active(&self) -> impl Iterator<Item = &CapabilityProfile> {
        self.profiles.iter().filter(|p| p.is_active())
    }

    pub fn get(&self, id: &str) -> Option<&CapabilityProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
