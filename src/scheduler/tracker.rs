//! Per-run workload trackers.
//!
//! A tracker is created fresh by each `schedule` call and owned by it for
//! the duration of the run. Nothing here is shared between runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{CapabilityProfile, SupervisionType};

/// Supervision counters for one faculty member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyWorkload {
    pub total_assignments: u32,
    pub direct_supervision: u32,
    pub indirect_supervision: u32,
    /// Assignments made under a specialty requirement.
    pub specialty_assignments: u32,
}

/// Supervision workload per faculty.
#[derive(Debug, Clone, Default)]
pub struct WorkloadTracker {
    loads: HashMap<String, FacultyWorkload>,
}

impl WorkloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for a faculty member (zero if never assigned).
    pub fn get(&self, faculty_id: &str) -> FacultyWorkload {
        self.loads.get(faculty_id).copied().unwrap_or_default()
    }

    /// Total assignments so far.
    pub fn load(&self, faculty_id: &str) -> u32 {
        self.get(faculty_id).total_assignments
    }

    /// Records one supervision assignment.
    pub fn record(
        &mut self,
        faculty_id: &str,
        supervision_type: SupervisionType,
        under_specialty: bool,
    ) {
        let w = self.loads.entry(faculty_id.to_string()).or_default();
        w.total_assignments += 1;
        match supervision_type {
            SupervisionType::Direct => w.direct_supervision += 1,
            SupervisionType::Indirect => w.indirect_supervision += 1,
        }
        if under_specialty {
            w.specialty_assignments += 1;
        }
    }

    /// Sum of all assignments across faculty.
    pub fn total(&self) -> u32 {
        self.loads.values().map(|w| w.total_assignments).sum()
    }
}

/// Call state for one faculty member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CallLoad {
    /// Historical calls plus weighted calls assigned in this run.
    pub total_calls: f64,
    /// Calls assigned in this run (unweighted count).
    pub new_calls: u32,
    pub last_call: Option<NaiveDate>,
}

/// On-call state per faculty.
#[derive(Debug, Clone, Default)]
pub struct CallTracker {
    loads: HashMap<String, CallLoad>,
}

impl CallTracker {
    /// Seeds totals from each profile's historical call counts.
    pub fn seeded<'a>(profiles: impl IntoIterator<Item = &'a CapabilityProfile>) -> Self {
        let loads = profiles
            .into_iter()
            .map(|p| {
                (
                    p.id.clone(),
                    CallLoad {
                        total_calls: p.historical_calls(),
                        ..Default::default()
                    },
                )
            })
            .collect();
        Self { loads }
    }

    pub fn get(&self, faculty_id: &str) -> CallLoad {
        self.loads.get(faculty_id).copied().unwrap_or_default()
    }

    /// Days between the faculty's last call and `date`, if any.
    pub fn days_since_last_call(&self, faculty_id: &str, date: NaiveDate) -> Option<i64> {
        self.get(faculty_id)
            .last_call
            .map(|last| (date - last).num_days())
    }

    /// Mean `total_calls` over the given faculty; 0 for an empty set.
    pub fn mean_total_calls<'a>(&self, faculty_ids: impl IntoIterator<Item = &'a str>) -> f64 {
        let (sum, n) = faculty_ids
            .into_iter()
            .fold((0.0, 0usize), |(sum, n), id| (sum + self.get(id).total_calls, n + 1));
        if n == 0 {
            0.0
        } else {
            sum / n as f64
        }
    }

    /// Records a regular call assignment.
    pub fn record(&mut self, faculty_id: &str, date: NaiveDate, weight: f64) {
        let load = self.loads.entry(faculty_id.to_string()).or_default();
        load.total_calls += weight;
        load.new_calls += 1;
        load.last_call = Some(date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_workload_counters() {
        let mut t = WorkloadTracker::new();
        t.record("F1", SupervisionType::Direct, false);
        t.record("F1", SupervisionType::Indirect, true);
        t.record("F2", SupervisionType::Direct, false);

        let f1 = t.get("F1");
        assert_eq!(f1.total_assignments, 2);
        assert_eq!(f1.direct_supervision, 1);
        assert_eq!(f1.indirect_supervision, 1);
        assert_eq!(f1.specialty_assignments, 1);
        assert_eq!(t.load("F3"), 0);
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn test_call_tracker_seeds_history() {
        let profiles = vec![
            CapabilityProfile::new("F1").with_call_history([1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]),
            CapabilityProfile::new("F2"),
        ];
        let mut t = CallTracker::seeded(&profiles);
        assert!((t.get("F1").total_calls - 5.0).abs() < 1e-10);
        assert!((t.mean_total_calls(["F1", "F2"]) - 2.5).abs() < 1e-10);
        assert!(t.days_since_last_call("F1", d("2025-03-03")).is_none());

        t.record("F2", d("2025-03-03"), 1.5);
        let f2 = t.get("F2");
        assert!((f2.total_calls - 1.5).abs() < 1e-10);
        assert_eq!(f2.new_calls, 1);
        assert_eq!(t.days_since_last_call("F2", d("2025-03-06")), Some(3));
        assert!(t.mean_total_calls(std::iter::empty()).abs() < 1e-10);
    }
}
