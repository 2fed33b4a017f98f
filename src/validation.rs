//! Input diagnostics.
//!
//! Per-record problems never abort a run. Records that cannot be used are
//! omitted and the omission is logged here, so the gap between what was
//! supplied and what was processed stays observable. Detects:
//! - Roster rows without identity, duplicate faculty ids
//! - Leave with unparseable or inverted dates, withheld approval
//! - Leave naming faculty absent from the roster
//! - Blocks without half-days, needs without activity or resolvable half-day

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{FacultyRegistry, LeaveRecord};

/// Categories of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A roster row has no id.
    MissingIdentity,
    /// Two roster rows share an id; the first is kept.
    DuplicateFacultyId,
    /// Leave dates are missing, unparseable, or end before they start.
    InvalidLeaveDates,
    /// Leave approval was explicitly withheld.
    UnapprovedLeave,
    /// Leave references a faculty id that is not on the roster.
    UnknownLeaveFaculty,
    /// An assignment block lists no half-days.
    EmptyBlock,
    /// A half-day entry has no activity label.
    MissingActivity,
    /// A half-day id does not resolve to a date.
    UnresolvedHalfDay,
    /// Two half-day rows share an id; the first is kept.
    DuplicateHalfDay,
}

/// One diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Record the diagnostic refers to.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

/// Ordered diagnostic log for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            kind,
            subject: subject.into(),
            message: message.into(),
        });
    }

    /// Number of diagnostics of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flags leave rows naming faculty that are not on the roster.
///
/// Such leave still expands into the calendar; it simply can never affect
/// a candidate. Each unknown id is reported once.
pub fn check_leave_references(
    leave: &[LeaveRecord],
    registry: &FacultyRegistry,
    diagnostics: &mut Diagnostics,
) {
    let mut reported = HashSet::new();
    for record in leave {
        for id in &record.faculty {
            if !registry.contains(id) && reported.insert(id.as_str()) {
                diagnostics.push(
                    DiagnosticKind::UnknownLeaveFaculty,
                    id,
                    format!("leave references unknown faculty '{id}'"),
                );
            }
        }
    }
}
