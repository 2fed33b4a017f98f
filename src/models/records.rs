//! Input records.
//!
//! These mirror the upstream tables field for field. Field names are the
//! wire contract: they are renamed exactly as the host delivers them and
//! every optional field defaults instead of failing deserialization.
//! An explicit `null` counts as missing.

use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes `null` as `T::default()`.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A faculty roster row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterRecord {
    /// Record identity. Rows without one are omitted from the registry.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name.
    #[serde(rename = "Faculty", default)]
    pub faculty: Option<String>,
    #[serde(rename = "First Name", default)]
    pub first_name: Option<String>,
    #[serde(rename = "Last Name", default)]
    pub last_name: Option<String>,
    #[serde(rename = "Primary Duty", default)]
    pub primary_duty: Option<String>,
    #[serde(rename = "Performs Procedure", default, deserialize_with = "null_default")]
    pub performs_procedure: bool,
    #[serde(rename = "Specialties", default, deserialize_with = "null_default")]
    pub specialties: Vec<String>,
    #[serde(rename = "Available Monday", default, deserialize_with = "null_default")]
    pub available_monday: bool,
    #[serde(rename = "Available Tuesday", default, deserialize_with = "null_default")]
    pub available_tuesday: bool,
    #[serde(rename = "Available Wednesday", default, deserialize_with = "null_default")]
    pub available_wednesday: bool,
    #[serde(rename = "Available Thursday", default, deserialize_with = "null_default")]
    pub available_thursday: bool,
    #[serde(rename = "Available Friday", default, deserialize_with = "null_default")]
    pub available_friday: bool,
    #[serde(rename = "Total Inpatient Weeks", default, deserialize_with = "null_default")]
    pub total_inpatient_weeks: f64,
    /// `"Active"` (or absent) keeps the faculty in candidate pools.
    #[serde(rename = "Faculty Status", default)]
    pub faculty_status: Option<String>,
    #[serde(rename = "Total Monday Call", default, deserialize_with = "null_default")]
    pub total_monday_call: f64,
    #[serde(rename = "Total Tuesday Call", default, deserialize_with = "null_default")]
    pub total_tuesday_call: f64,
    #[serde(rename = "Total Wednesday Call", default, deserialize_with = "null_default")]
    pub total_wednesday_call: f64,
    #[serde(rename = "Total Thursday Call", default, deserialize_with = "null_default")]
    pub total_thursday_call: f64,
    #[serde(rename = "Total Friday Call", default, deserialize_with = "null_default")]
    pub total_friday_call: f64,
    #[serde(rename = "Total Saturday Call", default, deserialize_with = "null_default")]
    pub total_saturday_call: f64,
    #[serde(rename = "Total Sunday Call", default, deserialize_with = "null_default")]
    pub total_sunday_call: f64,
}

impl RosterRecord {
    /// Creates an active roster row with the given identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.faculty = Some(name.into());
        self
    }

    /// Sets the status field verbatim.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.faculty_status = Some(status.into());
        self
    }

    /// Marks every weekday Monday..Friday available.
    pub fn available_all_week(mut self) -> Self {
        self.available_monday = true;
        self.available_tuesday = true;
        self.available_wednesday = true;
        self.available_thursday = true;
        self.available_friday = true;
        self
    }

    /// Sets the procedure credential.
    pub fn with_procedures(mut self, performs: bool) -> Self {
        self.performs_procedure = performs;
        self
    }

    /// Adds a specialty credential.
    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialties.push(specialty.into());
        self
    }

    /// Historical call counts, Monday first.
    pub fn call_history(&self) -> [f64; 7] {
        [
            self.total_monday_call,
            self.total_tuesday_call,
            self.total_wednesday_call,
            self.total_thursday_call,
            self.total_friday_call,
            self.total_saturday_call,
            self.total_sunday_call,
        ]
    }
}

/// An approved-leave row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveRecord {
    #[serde(default)]
    pub id: Option<String>,
    /// Faculty ids covered by this leave.
    #[serde(rename = "Faculty", default, deserialize_with = "null_default")]
    pub faculty: Vec<String>,
    /// ISO date or timestamp, inclusive.
    #[serde(rename = "Leave Start", default)]
    pub leave_start: Option<String>,
    /// ISO date or timestamp, inclusive.
    #[serde(rename = "Leave End", default)]
    pub leave_end: Option<String>,
    #[serde(rename = "Leave Type", default)]
    pub leave_type: Option<String>,
    /// `"AM"`, `"PM"` or `"All Day"`; absent means all day.
    #[serde(rename = "Time of Day", default)]
    pub time_of_day: Option<String>,
    /// Free text. When present it names the replacement activity.
    #[serde(rename = "Comments", default)]
    pub comments: Option<String>,
    #[serde(rename = "Leave Approved Residency", default)]
    pub approved_residency: Option<bool>,
    #[serde(rename = "Leave Approved Army", default)]
    pub approved_army: Option<bool>,
}

impl LeaveRecord {
    /// Creates a leave row for the given faculty over `[start, end]`.
    pub fn new(
        faculty: Vec<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        leave_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            faculty,
            leave_start: Some(start.into()),
            leave_end: Some(end.into()),
            leave_type: Some(leave_type.into()),
            ..Default::default()
        }
    }

    /// Sets the comments (replacement activity text).
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Sets the time-of-day scope.
    pub fn with_time_of_day(mut self, time_of_day: impl Into<String>) -> Self {
        self.time_of_day = Some(time_of_day.into());
        self
    }

    /// Whether an approval flag was explicitly withheld.
    pub fn is_rejected(&self) -> bool {
        self.approved_residency == Some(false) || self.approved_army == Some(false)
    }
}

/// A master assignment block: positionally aligned half-day lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentBlock {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(rename = "Half-Day of the Week of Blocks", default, deserialize_with = "null_default")]
    pub half_days: Vec<String>,
    #[serde(
        rename = "Resident (from Residency Block Schedule)",
        default,
        deserialize_with = "null_default"
    )]
    pub residents: Vec<String>,
    #[serde(
        rename = "PGY Link (from Residency Block Schedule)",
        default,
        deserialize_with = "null_default"
    )]
    pub pgy_levels: Vec<String>,
    #[serde(
        rename = "Activity (from Rotation Templates)",
        default,
        deserialize_with = "null_default"
    )]
    pub activities: Vec<String>,
}

impl AssignmentBlock {
    /// Creates an empty block.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Appends one aligned half-day entry.
    pub fn with_half_day(
        mut self,
        half_day_id: impl Into<String>,
        resident_id: impl Into<String>,
        pgy_level: impl Into<String>,
        activity: impl Into<String>,
    ) -> Self {
        self.half_days.push(half_day_id.into());
        self.residents.push(resident_id.into());
        self.pgy_levels.push(pgy_level.into());
        self.activities.push(activity.into());
        self
    }
}

/// Half-day resolution row: id → calendar date and session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HalfDayRecord {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Time of Day", default)]
    pub time_of_day: Option<String>,
}

impl HalfDayRecord {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        time_of_day: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date: Some(date.into()),
            time_of_day: Some(time_of_day.into()),
        }
    }
}

/// Attending clinic template row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateRecord {
    #[serde(default, deserialize_with = "null_default")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Activity Type", default)]
    pub activity_type: Option<String>,
    #[serde(rename = "Requires Specialty Credentials", default, deserialize_with = "null_default")]
    pub requires_specialty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_defaults_missing_fields() {
        let r = RosterRecord::default();
        assert!(r.id.is_none());
        assert!(!r.performs_procedure);
        assert!(r.specialties.is_empty());
        assert_eq!(r.call_history(), [0.0; 7]);
    }

    #[test]
    fn test_roster_builder() {
        let r = RosterRecord::new("F1")
            .with_name("Smith")
            .available_all_week()
            .with_procedures(true)
            .with_specialty("Sports Medicine");
        assert_eq!(r.id.as_deref(), Some("F1"));
        assert!(r.available_friday);
        assert!(r.performs_procedure);
        assert_eq!(r.specialties, vec!["Sports Medicine"]);
    }

    #[test]
    fn test_leave_rejection() {
        let mut l = LeaveRecord::new(vec!["F1".into()], "2025-01-01", "2025-01-02", "TDY");
        assert!(!l.is_rejected());
        l.approved_army = Some(true);
        assert!(!l.is_rejected());
        l.approved_residency = Some(false);
        assert!(l.is_rejected());
    }

    #[test]
    fn test_block_builder_keeps_alignment() {
        let b = AssignmentBlock::new("B1")
            .with_half_day("H1", "R1", "PGY-1", "Clinic")
            .with_half_day("H2", "R2", "PGY-2", "Botox");
        assert_eq!(b.half_days, vec!["H1", "H2"]);
        assert_eq!(b.pgy_levels[1], "PGY-2");
        assert_eq!(b.activities[1], "Botox");
    }

    #[test]
    fn test_null_fields_default() {
        let r: RosterRecord = serde_json::from_str(
            r#"{"id":"F2","Performs Procedure":null,"Total Monday Call":null,"Specialties":null}"#,
        )
        .unwrap();
        assert_eq!(r.id.as_deref(), Some("F2"));
        assert!(!r.performs_procedure);
        assert!(r.specialties.is_empty());
        assert!(r.total_monday_call.abs() < 1e-10);

        let b: AssignmentBlock = serde_json::from_value(serde_json::json!({
            "id": null,
            "Half-Day of the Week of Blocks": ["H1"],
            "PGY Link (from Residency Block Schedule)": null
        }))
        .unwrap();
        assert_eq!(b.id, "");
        assert_eq!(b.half_days, vec!["H1"]);
        assert!(b.pgy_levels.is_empty());

        let t: TemplateRecord =
            serde_json::from_str(r#"{"id":"T1","Requires Specialty Credentials":null}"#).unwrap();
        assert!(!t.requires_specialty);
    }
}
