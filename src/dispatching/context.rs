//! Scheduling context for dispatching rule evaluation.

/// Per-unit scoring state passed to dispatching rules.
///
/// Holds what is shared by every candidate for the unit of work being
/// decided: the call weight and gap threshold of a call day, the pool's
/// mean call load, and whether a supervision need carries a specialty
/// requirement.
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    /// Weight of the call day being decided.
    pub call_weight: f64,
    /// Minimum days between calls.
    pub minimum_gap_days: i64,
    /// Mean `total_calls` across the active pool, recomputed per day.
    pub mean_total_calls: f64,
    /// Equity credit per absence day.
    pub absence_equity_credit: f64,
    /// Whether the need being decided has a specialty requirement.
    pub specialty_required: bool,
}

impl SchedulingContext {
    /// Creates a context for one call day.
    pub fn for_call(call_weight: f64, minimum_gap_days: i64) -> Self {
        Self {
            call_weight,
            minimum_gap_days,
            ..Default::default()
        }
    }

    /// Creates a context for one supervision need.
    pub fn for_supervision(specialty_required: bool) -> Self {
        Self {
            specialty_required,
            ..Default::default()
        }
    }

    /// Sets the pool mean.
    pub fn with_mean_total_calls(mut self, mean: f64) -> Self {
        self.mean_total_calls = mean;
        self
    }

    /// Sets the absence equity credit.
    pub fn with_absence_equity_credit(mut self, credit: f64) -> Self {
        self.absence_equity_credit = credit;
        self
    }
}
