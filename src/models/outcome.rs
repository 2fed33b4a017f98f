//! Terminal outcome records.
//!
//! Every supervision need and every call day ends in exactly one of
//! assignment, substitution or gap. These records are the output wire
//! contract: supervision records use camelCase keys, call records use
//! snake_case keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AbsenceEntry, ActivityType, SpecialtyRule, SupervisionType, TimeOfDay};

/// Label of a regular on-call duty.
pub const OVERNIGHT_CALL: &str = "Overnight Call";

/// Gap severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
}

/// Why a supervision record was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentReason {
    #[serde(rename = "ACGME-compliant assignment")]
    Compliant,
    /// Wire text is fixed by downstream consumers.
    #[serde(rename = "Absence substitution with Phase 0 integration")]
    AbsenceSubstitution,
}

/// A faculty supervision record (assigned or substituted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisionAssignment {
    pub assignment_id: String,
    pub half_day_id: String,
    pub faculty_id: String,
    pub faculty_name: String,
    pub clinic_template_id: String,
    pub clinic_template_name: String,
    pub supervision_type: SupervisionType,
    pub pgy_level: String,
    /// Activity performed: the replacement label when substituted.
    pub activity: String,
    pub original_activity: String,
    pub activity_type: ActivityType,
    pub resident_id: Option<String>,
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
    pub supervision_ratio: u32,
    pub substitution_applied: bool,
    pub absence_info: Option<AbsenceEntry>,
    pub assignment_reason: AssignmentReason,
}

/// Substitution log entry for the supervision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisionSubstitution {
    pub faculty_id: String,
    pub date: NaiveDate,
    pub original_activity: String,
    pub replacement_activity: String,
    pub absence_type: String,
}

/// A supervision need with no eligible, available or substitutable faculty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageGap {
    pub half_day_id: String,
    pub pgy_level: String,
    pub activity: String,
    pub reason: String,
    pub specialty_requirement: Option<SpecialtyRule>,
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
    pub critical_level: Severity,
}

/// An on-call record (assigned or substituted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallAssignment {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub faculty_id: String,
    pub faculty_name: String,
    pub call_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_call_type: Option<String>,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub call_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_score: Option<f64>,
    /// Days since the faculty's previous call in this run.
    pub gap_days: Option<i64>,
    pub substitution_applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absence_type: Option<String>,
}

/// A call day left uncovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallGap {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub reason: String,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub critical_level: Severity,
}
