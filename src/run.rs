//! Batch entry point.
//!
//! [`run`] takes every input channel explicitly, builds the shared calendar,
//! registry and classifier once, runs the supervision engine and (when a
//! call period is given) the call engine, and returns one envelope.
//!
//! # Steps
//! 1. Validate the configuration and call period.
//! 2. Refuse an absence-aware run without a leave channel.
//! 3. Build the absence calendar, faculty registry, half-day index,
//!    classifier and template catalog.
//! 4. Supervision: needs in block, then half-day, order.
//! 5. On-call: days in chronological order.
//! 6. Summaries and diagnostics.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::records::null_default;
use crate::models::{
    expand_blocks, AbsenceCalendar, ActivityClassifier, AssignmentBlock, CallAssignment, CallGap,
    CallPeriod, CoverageGap, FacultyRegistry, HalfDayIndex, HalfDayRecord, HolidayCalendar,
    LeaveRecord, RosterRecord, SupervisionAssignment, SupervisionSubstitution, TemplateCatalog,
    TemplateRecord,
};
use crate::scheduler::{
    CallOutcome, CallScheduler, CallStatistics, CallUtilization, ComplianceSummary,
    FacultyUtilization, SupervisionOutcome, SupervisionScheduler, SupervisionSummary,
};
use crate::validation::{check_leave_references, Diagnostics};

/// Input channels for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunInput {
    #[serde(deserialize_with = "null_default")]
    pub roster: Vec<RosterRecord>,
    /// `None` means no absence source was supplied at all.
    pub leave: Option<Vec<LeaveRecord>>,
    #[serde(deserialize_with = "null_default")]
    pub assignment_blocks: Vec<AssignmentBlock>,
    #[serde(deserialize_with = "null_default")]
    pub half_days: Vec<HalfDayRecord>,
    #[serde(deserialize_with = "null_default")]
    pub clinic_templates: Vec<TemplateRecord>,
    /// When absent the call engine does not run.
    pub call_period: Option<CallPeriod>,
    #[serde(deserialize_with = "null_default")]
    pub config: EngineConfig,
}

impl RunInput {
    /// Creates an input with a roster and an empty leave channel.
    pub fn new(roster: Vec<RosterRecord>) -> Self {
        Self {
            roster,
            leave: Some(Vec::new()),
            ..Default::default()
        }
    }

    pub fn with_leave(mut self, leave: Vec<LeaveRecord>) -> Self {
        self.leave = Some(leave);
        self
    }

    /// Drops the leave channel entirely.
    pub fn without_leave(mut self) -> Self {
        self.leave = None;
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<AssignmentBlock>) -> Self {
        self.assignment_blocks = blocks;
        self
    }

    pub fn with_half_days(mut self, half_days: Vec<HalfDayRecord>) -> Self {
        self.half_days = half_days;
        self
    }

    pub fn with_templates(mut self, templates: Vec<TemplateRecord>) -> Self {
        self.clinic_templates = templates;
        self
    }

    pub fn with_call_period(mut self, period: CallPeriod) -> Self {
        self.call_period = Some(period);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

/// Supervision section of the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisionReport {
    pub enhanced_faculty_assignments: Vec<SupervisionAssignment>,
    pub absence_substitutions: Vec<SupervisionSubstitution>,
    pub coverage_gaps: Vec<CoverageGap>,
    pub summary: SupervisionSummary,
    /// Copy of `summary.acgmeCompliance` for consumers reading it top-level.
    pub acgme_compliance: ComplianceSummary,
    /// Copy of `summary.facultyUtilization`.
    pub faculty_utilization: Vec<FacultyUtilization>,
}

impl SupervisionReport {
    fn new(outcome: SupervisionOutcome, registry: &FacultyRegistry, skipped: usize) -> Self {
        let summary = SupervisionSummary::calculate(&outcome, registry, skipped);
        Self {
            enhanced_faculty_assignments: outcome.assignments,
            absence_substitutions: outcome.substitutions,
            coverage_gaps: outcome.gaps,
            acgme_compliance: summary.acgme_compliance.clone(),
            faculty_utilization: summary.faculty_utilization.clone(),
            summary,
        }
    }
}

/// On-call section of the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallReport {
    pub assignments: Vec<CallAssignment>,
    pub substitutions: Vec<CallAssignment>,
    pub gaps: Vec<CallGap>,
    pub statistics: CallStatistics,
    pub faculty_utilization: Vec<CallUtilization>,
}

impl CallReport {
    fn new(outcome: CallOutcome, registry: &FacultyRegistry, config: &EngineConfig) -> Self {
        let statistics = CallStatistics::calculate(&outcome, registry, &config.call);
        let faculty_utilization = CallStatistics::utilization(&outcome, registry);
        Self {
            assignments: outcome.assignments,
            substitutions: outcome.substitutions,
            gaps: outcome.gaps,
            statistics,
            faculty_utilization,
        }
    }
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub supervision: SupervisionReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_call: Option<CallReport>,
    /// Records omitted or skipped, in the order they were found.
    pub diagnostics: Diagnostics,
}

/// Runs both engines over one batch of input.
///
/// # Errors
/// - [`ScheduleError::InvalidConfig`] / [`ScheduleError::InvalidCallPeriod`]
///   for unusable parameters.
/// - [`ScheduleError::MissingAbsenceData`] when `config.absence_aware` is
///   set and no leave channel was supplied.
///
/// Per-record problems never fail the run; see
/// [`ResultEnvelope::diagnostics`].
pub fn run(input: &RunInput) -> ScheduleResult<ResultEnvelope> {
    let config = &input.config;
    config.validate()?;
    if let Some(period) = &input.call_period {
        period.validate()?;
    }

    let leave: &[LeaveRecord] = match &input.leave {
        Some(leave) => leave,
        None if config.absence_aware => return Err(ScheduleError::MissingAbsenceData),
        None => &[],
    };

    info!(
        roster = input.roster.len(),
        leave = leave.len(),
        blocks = input.assignment_blocks.len(),
        call_days = input.call_period.map_or(0, |p| p.len()),
        "starting roster run"
    );

    let mut diagnostics = Diagnostics::default();
    let registry = FacultyRegistry::build(&input.roster, &mut diagnostics);
    let absences = AbsenceCalendar::build(leave, config.honor_approval_flags, &mut diagnostics);
    check_leave_references(leave, &registry, &mut diagnostics);
    let half_days = HalfDayIndex::build(&input.half_days, &mut diagnostics);
    let need_set = expand_blocks(&input.assignment_blocks, &half_days, &mut diagnostics);

    let classifier = ActivityClassifier::new(config.specialties.clone());
    let supervision = SupervisionScheduler::new(classifier)
        .with_templates(TemplateCatalog::build(&input.clinic_templates))
        .schedule(&need_set.needs, &registry, &absences);
    let supervision = SupervisionReport::new(supervision, &registry, need_set.skipped);

    let on_call = input.call_period.map(|period| {
        let mut holidays = HolidayCalendar::new();
        holidays.add_holidays(&config.extra_holidays);
        let outcome = CallScheduler::new(config.call.clone())
            .with_holidays(holidays)
            .schedule(&period, &registry, &absences);
        CallReport::new(outcome, &registry, config)
    });

    info!(
        supervision_records = supervision.enhanced_faculty_assignments.len(),
        supervision_gaps = supervision.coverage_gaps.len(),
        call_records = on_call.as_ref().map_or(0, |c| c.assignments.len()),
        diagnostics = diagnostics.len(),
        "roster run complete"
    );

    Ok(ResultEnvelope {
        supervision,
        on_call,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_missing_leave_is_fatal_when_absence_aware() {
        let input = RunInput::new(vec![RosterRecord::new("F1")]).without_leave();
        assert_eq!(run(&input), Err(ScheduleError::MissingAbsenceData));

        let input = input.with_config(EngineConfig::default().with_absence_aware(false));
        assert!(run(&input).is_ok());
    }

    #[test]
    fn test_invalid_period_rejected() {
        let input = RunInput::new(vec![]).with_call_period(CallPeriod {
            start_date: d(2025, 3, 10),
            end_date: d(2025, 3, 1),
        });
        assert!(matches!(run(&input), Err(ScheduleError::InvalidCallPeriod { .. })));
    }

    #[test]
    fn test_call_engine_optional() {
        let input = RunInput::new(vec![RosterRecord::new("F1")]);
        let env = run(&input).unwrap();
        assert!(env.on_call.is_none());
        assert_eq!(env.supervision.summary.total_supervision_needs, 0);

        let period = CallPeriod::weeks(d(2025, 3, 3), 1).unwrap();
        let env = run(&input.with_call_period(period)).unwrap();
        assert_eq!(env.on_call.unwrap().statistics.total_dates, 7);
    }

    #[test]
    fn test_extra_holidays_applied() {
        let config = EngineConfig {
            extra_holidays: vec![d(2025, 11, 27)],
            ..Default::default()
        };
        let input = RunInput::new(vec![RosterRecord::new("F1")])
            .with_config(config)
            .with_call_period(CallPeriod::new(d(2025, 11, 27), d(2025, 11, 27)).unwrap());
        let call = run(&input).unwrap().on_call.unwrap();
        assert!(call.assignments[0].is_holiday);
        assert!((call.assignments[0].call_weight - 2.0).abs() < 1e-10);
    }
}
