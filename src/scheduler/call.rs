//! Overnight on-call rotation.
//!
//! # Algorithm
//!
//! Days are processed strictly in chronological order; gap and equity
//! scores read state written by earlier days.
//!
//! 1. Weight the day: holiday, else weekend, else 1.0.
//! 2. Available faculty: active with no absence entry on the date (any
//!    session).
//! 3. If none are available, the first active faculty (roster order) with
//!    an absence entry carrying a replacement activity covers the day as a
//!    substitution; otherwise the day is a `HIGH` gap. Substitutions leave
//!    call state untouched.
//! 4. Otherwise score every available faculty as
//!    `0.7 × gap_penalty + 0.3 × (equity + weight)` and take the minimum,
//!    ties in roster order. The winner's last call date and weighted total
//!    are updated.
//!
//! # Complexity
//! O(d * f) where d = days, f = faculty.

use tracing::{debug, info, warn};

use crate::config::CallConfig;
use crate::dispatching::{rules, CallCandidate, RuleEngine, SchedulingContext};
use crate::models::{
    weekday_name, AbsenceCalendar, CallAssignment, CallDay, CallGap, CallPeriod, CapabilityProfile,
    FacultyRegistry, HolidayCalendar, Severity, OVERNIGHT_CALL,
};

use super::CallTracker;

const ALL_FACULTY_ABSENT: &str = "All faculty absent";

/// Weight of the gap penalty in the call score.
pub const GAP_WEIGHT: f64 = 0.7;
/// Weight of equity and call weight in the call score.
pub const EQUITY_WEIGHT: f64 = 0.3;

/// Result of one call run.
#[derive(Debug, Clone, Default)]
pub struct CallOutcome {
    /// Call records, substitutions included, in date order.
    pub assignments: Vec<CallAssignment>,
    pub substitutions: Vec<CallAssignment>,
    pub gaps: Vec<CallGap>,
    /// Final call state.
    pub tracker: CallTracker,
    /// Days that reached a terminal outcome.
    pub processed: usize,
}

impl CallOutcome {
    /// Records made without substitution.
    pub fn assigned_count(&self) -> usize {
        self.assignments.len() - self.substitutions.len()
    }
}

/// Greedy on-call scheduler with gap penalty and equity scoring.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_roster::config::CallConfig;
/// use u_roster::models::{AbsenceCalendar, CallPeriod, CapabilityProfile, FacultyRegistry};
/// use u_roster::scheduler::CallScheduler;
///
/// let registry = FacultyRegistry::from_profiles(vec![
///     CapabilityProfile::new("F1"),
///     CapabilityProfile::new("F2"),
/// ]);
/// let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let period = CallPeriod::weeks(start, 1).unwrap();
/// let outcome = CallScheduler::new(CallConfig::default())
///     .schedule(&period, &registry, &AbsenceCalendar::new());
/// assert_eq!(outcome.assignments.len(), 7);
/// assert!(outcome.gaps.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct CallScheduler {
    config: CallConfig,
    holidays: HolidayCalendar,
    rule_engine: RuleEngine<CallCandidate>,
}

impl CallScheduler {
    /// Creates a scheduler with the fixed holiday set and default scoring.
    pub fn new(config: CallConfig) -> Self {
        Self {
            config,
            holidays: HolidayCalendar::new(),
            rule_engine: Self::default_rule_engine(),
        }
    }

    /// `0.7 × gap + 0.3 × equity + 0.3 × weight`.
    pub fn default_rule_engine() -> RuleEngine<CallCandidate> {
        RuleEngine::new()
            .with_weighted_rule(rules::GapPenalty, GAP_WEIGHT)
            .with_weighted_rule(rules::Equity, EQUITY_WEIGHT)
            .with_weighted_rule(rules::CallWeight, EQUITY_WEIGHT)
    }

    /// Sets the holiday calendar.
    pub fn with_holidays(mut self, holidays: HolidayCalendar) -> Self {
        self.holidays = holidays;
        self
    }

    /// Replaces the scoring rules.
    pub fn with_rule_engine(mut self, engine: RuleEngine<CallCandidate>) -> Self {
        self.rule_engine = engine;
        self
    }

    pub fn config(&self) -> &CallConfig {
        &self.config
    }

    /// Decides every day of the period in chronological order with a fresh
    /// tracker seeded from historical call counts.
    pub fn schedule(
        &self,
        period: &CallPeriod,
        registry: &FacultyRegistry,
        absences: &AbsenceCalendar,
    ) -> CallOutcome {
        let active: Vec<&CapabilityProfile> = registry.active().collect();
        let mut outcome = CallOutcome {
            tracker: CallTracker::seeded(active.iter().copied()),
            ..Default::default()
        };

        for day in period.days(&self.holidays) {
            let weight = day.weight(self.config.weekend_weight, self.config.holiday_weight);
            let available: Vec<&CapabilityProfile> = active
                .iter()
                .copied()
                .filter(|p| !absences.has_absence(&p.id, day.date))
                .collect();

            if available.is_empty() {
                self.substitute_or_gap(&day, weight, &active, absences, &mut outcome);
            } else {
                self.assign(&day, weight, &active, &available, absences, &mut outcome);
            }
            outcome.processed += 1;
        }

        info!(
            days = outcome.processed,
            assigned = outcome.assigned_count(),
            substituted = outcome.substitutions.len(),
            gaps = outcome.gaps.len(),
            "call run complete"
        );
        outcome
    }

    fn assign(
        &self,
        day: &CallDay,
        weight: f64,
        active: &[&CapabilityProfile],
        available: &[&CapabilityProfile],
        absences: &AbsenceCalendar,
        outcome: &mut CallOutcome,
    ) {
        let tracker = &outcome.tracker;
        let mean = tracker.mean_total_calls(active.iter().map(|p| p.id.as_str()));
        let context = SchedulingContext::for_call(weight, self.config.minimum_gap_days)
            .with_mean_total_calls(mean)
            .with_absence_equity_credit(self.config.absence_equity_credit);

        let candidates: Vec<CallCandidate> = available
            .iter()
            .map(|p| {
                let mut c = CallCandidate::new(&p.id, tracker.get(&p.id).total_calls)
                    .with_absence_days(absences.absence_days(&p.id));
                c.days_since_last_call = tracker.days_since_last_call(&p.id, day.date);
                c
            })
            .collect();

        let Some((best, score)) = self.rule_engine.select_best_scored(&candidates, &context) else {
            return;
        };
        let profile = available[best];
        let gap_days = candidates[best].days_since_last_call;

        debug!(
            date = %day.date,
            faculty = %profile.id,
            score,
            ?gap_days,
            "assigned call"
        );

        outcome.assignments.push(CallAssignment {
            date: day.date,
            day_of_week: weekday_name(day.day_of_week).to_string(),
            faculty_id: profile.id.clone(),
            faculty_name: profile.name.clone(),
            call_type: OVERNIGHT_CALL.to_string(),
            original_call_type: None,
            is_weekend: day.is_weekend,
            is_holiday: day.is_holiday,
            call_weight: weight,
            penalty_score: Some(score),
            gap_days,
            substitution_applied: false,
            absence_type: None,
        });
        outcome.tracker.record(&profile.id, day.date, weight);
    }

    fn substitute_or_gap(
        &self,
        day: &CallDay,
        weight: f64,
        active: &[&CapabilityProfile],
        absences: &AbsenceCalendar,
        outcome: &mut CallOutcome,
    ) {
        let substitute = active.iter().find_map(|p| {
            absences
                .entry(&p.id, day.date)
                .and_then(|e| e.replacement().map(|r| (*p, e, r)))
        });

        let Some((profile, entry, replacement)) = substitute else {
            warn!(date = %day.date, "call coverage gap");
            outcome.gaps.push(CallGap {
                date: day.date,
                day_of_week: weekday_name(day.day_of_week).to_string(),
                reason: ALL_FACULTY_ABSENT.to_string(),
                is_weekend: day.is_weekend,
                is_holiday: day.is_holiday,
                critical_level: Severity::High,
            });
            return;
        };

        debug!(date = %day.date, faculty = %profile.id, replacement, "substituted call");

        let record = CallAssignment {
            date: day.date,
            day_of_week: weekday_name(day.day_of_week).to_string(),
            faculty_id: profile.id.clone(),
            faculty_name: profile.name.clone(),
            call_type: replacement.to_string(),
            original_call_type: Some(OVERNIGHT_CALL.to_string()),
            is_weekend: day.is_weekend,
            is_holiday: day.is_holiday,
            call_weight: weight,
            penalty_score: None,
            gap_days: None,
            substitution_applied: true,
            absence_type: Some(entry.leave_type.clone()),
        };
        outcome.substitutions.push(record.clone());
        outcome.assignments.push(record);
    }
}

/// Days between consecutive assigned calls below `minimum_gap_days`.
pub fn count_gap_violations(assignments: &[CallAssignment], minimum_gap_days: i64) -> usize {
    assignments
        .iter()
        .filter(|a| !a.substitution_applied)
        .filter(|a| a.gap_days.is_some_and(|g| g < minimum_gap_days))
        .count()
}
