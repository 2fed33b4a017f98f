//! Candidate snapshots scored by dispatching rules.
//!
//! A candidate is a faculty member's live state at the moment one unit of
//! work is being decided. Snapshots are rebuilt for every unit.

/// A faculty candidate for a supervision need.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisionCandidate {
    pub faculty_id: String,
    /// Assignments made so far in this run.
    pub current_load: u32,
    /// Workload capacity (half-days).
    pub capacity: u32,
    /// Whether the faculty satisfies the need's specialty requirement.
    pub matches_specialty: bool,
}

impl SupervisionCandidate {
    pub fn new(faculty_id: impl Into<String>, current_load: u32, capacity: u32) -> Self {
        Self {
            faculty_id: faculty_id.into(),
            current_load,
            capacity,
            matches_specialty: false,
        }
    }

    pub fn with_specialty_match(mut self, matches: bool) -> Self {
        self.matches_specialty = matches;
        self
    }

    /// `current_load / capacity`; a zero capacity counts as fully used.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            1.0
        } else {
            f64::from(self.current_load) / f64::from(self.capacity)
        }
    }
}

/// A faculty candidate for one call day.
#[derive(Debug, Clone, PartialEq)]
pub struct CallCandidate {
    pub faculty_id: String,
    /// Historical plus weighted calls assigned so far.
    pub total_calls: f64,
    /// `None` when the faculty has no call yet in this run.
    pub days_since_last_call: Option<i64>,
    /// Absence days recorded for the faculty.
    pub absence_days: usize,
}

impl CallCandidate {
    pub fn new(faculty_id: impl Into<String>, total_calls: f64) -> Self {
        Self {
            faculty_id: faculty_id.into(),
            total_calls,
            days_since_last_call: None,
            absence_days: 0,
        }
    }

    pub fn with_days_since_last_call(mut self, days: i64) -> Self {
        self.days_since_last_call = Some(days);
        self
    }

    pub fn with_absence_days(mut self, days: usize) -> Self {
        self.absence_days = days;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization() {
        assert!((SupervisionCandidate::new("F1", 3, 6).utilization() - 0.5).abs() < 1e-10);
        assert!((SupervisionCandidate::new("F1", 0, 0).utilization() - 1.0).abs() < 1e-10);
    }
}
