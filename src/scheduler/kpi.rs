//! Roster quality metrics.
//!
//! Pure summaries over the two engines' outcomes. Nothing here mutates
//! engine state.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Compliance rate | supervision records / needs processed |
//! | Faculty utilization | supervision records / workload capacity |
//! | Coverage rate | call records / days in period |
//! | Substitution rate | call substitutions / max(call records, 1) |
//! | Gap violations | regular calls made less than `minimum_gap_days` after the previous one |
//!
//! Rates are rendered as percentages with one decimal (`"83.3%"`). A rate
//! over an empty population renders `"0%"`.

use serde::{Deserialize, Serialize};

use crate::config::CallConfig;
use crate::models::{FacultyRegistry, SupervisionType};

use super::{call::count_gap_violations, CallOutcome, SupervisionOutcome};

/// `numerator / denominator` as a percentage string; `"0%"` when the
/// denominator is zero.
pub fn percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "0%".to_string()
    } else {
        format_rate(numerator as f64 / denominator as f64)
    }
}

/// A 0..1 rate as a percentage string with one decimal.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Supervision type counts and compliance rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub total_direct_required: usize,
    pub total_indirect_allowed: usize,
    pub compliance_rate: String,
}

/// Per-faculty supervision workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyUtilization {
    pub faculty_id: String,
    pub faculty_name: String,
    pub total_assignments: u32,
    pub direct_supervision: u32,
    pub indirect_supervision: u32,
    pub utilization_rate: String,
}

/// Summary of a supervision run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisionSummary {
    /// Needs that reached a terminal outcome.
    pub total_supervision_needs: usize,
    /// Needs dropped before scheduling for missing data.
    pub skipped_supervision_needs: usize,
    /// Supervision records, substitutions included.
    pub faculty_assignments: usize,
    pub absence_substitutions: usize,
    pub coverage_gaps: usize,
    pub acgme_compliance: ComplianceSummary,
    pub faculty_utilization: Vec<FacultyUtilization>,
}

impl SupervisionSummary {
    /// Computes the summary. Utilization is listed for active faculty in
    /// roster order.
    pub fn calculate(
        outcome: &SupervisionOutcome,
        registry: &FacultyRegistry,
        skipped: usize,
    ) -> Self {
        let count_type = |t: SupervisionType| {
            outcome
                .assignments
                .iter()
                .filter(|a| a.supervision_type == t)
                .count()
        };

        let faculty_utilization = registry
            .active()
            .map(|p| {
                let w = outcome.workload.get(&p.id);
                let rate = if p.workload_capacity == 0 {
                    0.0
                } else {
                    f64::from(w.total_assignments) / f64::from(p.workload_capacity)
                };
                FacultyUtilization {
                    faculty_id: p.id.clone(),
                    faculty_name: p.name.clone(),
                    total_assignments: w.total_assignments,
                    direct_supervision: w.direct_supervision,
                    indirect_supervision: w.indirect_supervision,
                    utilization_rate: format_rate(rate),
                }
            })
            .collect();

        Self {
            total_supervision_needs: outcome.processed,
            skipped_supervision_needs: skipped,
            faculty_assignments: outcome.assignments.len(),
            absence_substitutions: outcome.substitutions.len(),
            coverage_gaps: outcome.gaps.len(),
            acgme_compliance: ComplianceSummary {
                total_direct_required: count_type(SupervisionType::Direct),
                total_indirect_allowed: count_type(SupervisionType::Indirect),
                compliance_rate: percent(outcome.assignments.len(), outcome.processed),
            },
            faculty_utilization,
        }
    }
}

/// Per-faculty call load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallUtilization {
    pub faculty_id: String,
    pub faculty_name: String,
    /// Historical plus weighted calls from this run.
    pub total_calls: f64,
    /// Regular calls assigned in this run.
    pub new_calls: u32,
}

/// Summary of a call run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStatistics {
    pub total_dates: usize,
    /// Regular (non-substituted) call records.
    pub successful_assignments: usize,
    pub substitutions: usize,
    pub gaps: usize,
    /// Dates that ended with neither a record nor a gap. Every date in the
    /// period is processed, so this stays zero.
    pub skipped_dates: usize,
    pub coverage_rate: String,
    pub substitution_rate: String,
    pub gap_violations: usize,
    /// Faculty whose calls in this run exceed the advisory ceiling.
    pub faculty_over_max_calls: Vec<String>,
}

impl CallStatistics {
    pub fn calculate(
        outcome: &CallOutcome,
        registry: &FacultyRegistry,
        config: &CallConfig,
    ) -> Self {
        let records = outcome.assignments.len();
        let substitution_rate = outcome.substitutions.len() as f64 / records.max(1) as f64;
        let faculty_over_max_calls = registry
            .active()
            .filter(|p| outcome.tracker.get(&p.id).new_calls > config.max_calls_per_period)
            .map(|p| p.id.clone())
            .collect();

        Self {
            total_dates: outcome.processed,
            successful_assignments: outcome.assigned_count(),
            substitutions: outcome.substitutions.len(),
            gaps: outcome.gaps.len(),
            skipped_dates: outcome.processed.saturating_sub(records + outcome.gaps.len()),
            coverage_rate: percent(records, outcome.processed),
            substitution_rate: format_rate(substitution_rate),
            gap_violations: count_gap_violations(&outcome.assignments, config.minimum_gap_days),
            faculty_over_max_calls,
        }
    }

    /// Call load per active faculty in roster order.
    pub fn utilization(outcome: &CallOutcome, registry: &FacultyRegistry) -> Vec<CallUtilization> {
        registry
            .active()
            .map(|p| {
                let load = outcome.tracker.get(&p.id);
                CallUtilization {
                    faculty_id: p.id.clone(),
                    faculty_name: p.name.clone(),
                    total_calls: load.total_calls,
                    new_calls: load.new_calls,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AbsenceCalendar, AbsenceEntry, ActivityClassifier, AvailableDays, CallPeriod,
        CapabilityProfile, SupervisionNeed,
    };
    use crate::scheduler::{CallScheduler, SupervisionScheduler};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(5, 6), "83.3%");
        assert_eq!(percent(1, 1), "100.0%");
        assert_eq!(percent(0, 4), "0.0%");
        assert_eq!(percent(0, 0), "0%");
        assert_eq!(format_rate(0.125), "12.5%");
    }

    #[test]
    fn test_supervision_summary() {
        let registry = FacultyRegistry::from_profiles(vec![
            CapabilityProfile::new("F1")
                .with_name("A")
                .with_available_days(AvailableDays {
                    monday: true,
                    ..Default::default()
                }),
            CapabilityProfile::new("F2").with_name("B"),
        ]);
        let monday = d(2025, 3, 3);
        let needs = vec![
            SupervisionNeed::new("B1", "H1", "Clinic", monday),
            SupervisionNeed::new("B1", "H2", "Clinic", monday).with_pgy_level("PGY-2"),
            SupervisionNeed::new("B1", "H3", "Clinic", monday),
        ];
        let outcome = SupervisionScheduler::new(ActivityClassifier::default()).schedule(
            &needs,
            &registry,
            &AbsenceCalendar::new(),
        );
        let s = SupervisionSummary::calculate(&outcome, &registry, 1);

        assert_eq!(s.total_supervision_needs, 3);
        assert_eq!(s.skipped_supervision_needs, 1);
        assert_eq!(s.faculty_assignments, 2);
        assert_eq!(s.coverage_gaps, 1);
        assert_eq!(s.acgme_compliance.total_direct_required, 1);
        assert_eq!(s.acgme_compliance.total_indirect_allowed, 1);
        assert_eq!(s.acgme_compliance.compliance_rate, "66.7%");

        let f1 = &s.faculty_utilization[0];
        assert_eq!(f1.total_assignments, 2);
        assert_eq!(f1.utilization_rate, "100.0%");
        assert_eq!(s.faculty_utilization[1].utilization_rate, "0.0%");
    }

    #[test]
    fn test_call_statistics() {
        let registry = FacultyRegistry::from_profiles(vec![CapabilityProfile::new("F1")]);
        let mut absences = AbsenceCalendar::new();
        absences.insert(
            "F1",
            d(2025, 3, 5),
            AbsenceEntry::new("Conference").with_replacement("Virtual Coverage"),
        );
        let config = CallConfig {
            max_calls_per_period: 5,
            ..Default::default()
        };
        let outcome = CallScheduler::new(config.clone()).schedule(
            &CallPeriod::weeks(d(2025, 3, 3), 1).unwrap(),
            &registry,
            &absences,
        );
        let stats = CallStatistics::calculate(&outcome, &registry, &config);

        assert_eq!(stats.total_dates, 7);
        assert_eq!(stats.successful_assignments, 6);
        assert_eq!(stats.substitutions, 1);
        assert_eq!(stats.gaps, 0);
        assert_eq!(stats.skipped_dates, 0);
        assert_eq!(stats.coverage_rate, "100.0%");
        assert_eq!(stats.substitution_rate, "14.3%");
        // Tue (gap 1), Thu (gap 2), Fri, Sat, Sun (gap 1); Wed is the substitution
        assert_eq!(stats.gap_violations, 5);
        assert_eq!(stats.faculty_over_max_calls, vec!["F1".to_string()]);

        let util = CallStatistics::utilization(&outcome, &registry);
        assert_eq!(util[0].new_calls, 6);
    }

    #[test]
    fn test_empty_runs() {
        let registry = FacultyRegistry::default();
        let outcome = CallScheduler::new(CallConfig::default()).schedule(
            &CallPeriod::weeks(d(2025, 3, 3), 0).unwrap(),
            &registry,
            &AbsenceCalendar::new(),
        );
        let stats = CallStatistics::calculate(&outcome, &registry, &CallConfig::default());
        assert_eq!(stats.coverage_rate, "0%");
        assert_eq!(stats.substitution_rate, "0.0%");
        assert_eq!(stats.skipped_dates, 0);

        let sup = SupervisionSummary::calculate(&SupervisionOutcome::default(), &registry, 0);
        assert_eq!(sup.acgme_compliance.compliance_rate, "0%");
    }
}
