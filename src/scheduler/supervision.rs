//! Absence-aware supervision assignment.
//!
//! # Algorithm
//!
//! For each need, in input order:
//! 1. Classify the activity and look up the PGY row (supervision type and
//!    ratio).
//! 2. Eligible faculty: active profiles, narrowed by the specialty
//!    requirement (explicit ids, else credential), and by the procedure
//!    credential for procedure activities.
//! 3. Available faculty: eligible, not absent for the session, working that
//!    weekday, and below workload capacity.
//! 4. If none are available, the first eligible faculty (roster order) with
//!    an absence entry carrying a replacement activity yields a
//!    substitution; otherwise the need is a coverage gap, `HIGH` when direct
//!    supervision was required and `MEDIUM` otherwise.
//! 5. Otherwise score the available faculty (utilization, specialty bonus)
//!    and take the minimum, ties in roster order.
//!
//! Workload counters change as needs are decided, so input order matters.
//!
//! # Complexity
//! O(n * f) where n = needs, f = faculty.

use tracing::{debug, info, warn};

use crate::dispatching::{rules, RuleEngine, SchedulingContext, SupervisionCandidate};
use crate::models::{
    AbsenceCalendar, AbsenceEntry, ActivityClassifier, ActivityType, AssignmentReason,
    CapabilityProfile, Classification, CoverageGap, FacultyRegistry, Severity,
    SupervisionAssignment, SupervisionNeed, SupervisionRatio, SupervisionSubstitution,
    SupervisionType, TemplateCatalog,
};

use super::WorkloadTracker;

const NO_ELIGIBLE_FACULTY: &str = "No eligible faculty";
const NO_AVAILABLE_FACULTY: &str = "No available faculty";

/// Result of one supervision run.
#[derive(Debug, Clone, Default)]
pub struct SupervisionOutcome {
    /// Supervision records, substitutions included, in need order.
    pub assignments: Vec<SupervisionAssignment>,
    pub substitutions: Vec<SupervisionSubstitution>,
    pub gaps: Vec<CoverageGap>,
    /// Final workload counters.
    pub workload: WorkloadTracker,
    /// Needs that reached a terminal outcome.
    pub processed: usize,
}

impl SupervisionOutcome {
    /// Records made without substitution.
    pub fn assigned_count(&self) -> usize {
        self.assignments.len() - self.substitutions.len()
    }
}

/// Per-need facts derived before candidate selection.
struct ResolvedNeed<'n> {
    need: &'n SupervisionNeed,
    classification: Classification,
    supervision_type: SupervisionType,
    supervision_ratio: u32,
}

impl ResolvedNeed<'_> {
    fn activity_type(&self) -> ActivityType {
        self.classification.activity_type
    }

    fn has_specialty(&self) -> bool {
        self.classification.specialty.is_some()
    }

    fn satisfies_specialty(&self, profile: &CapabilityProfile) -> bool {
        self.classification
            .specialty
            .as_ref()
            .is_some_and(|rule| rule.is_satisfied_by(profile))
    }
}

/// Greedy, absence-aware supervision scheduler.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_roster::models::{
///     AbsenceCalendar, ActivityClassifier, AvailableDays, CapabilityProfile, FacultyRegistry,
///     SupervisionNeed,
/// };
/// use u_roster::scheduler::SupervisionScheduler;
///
/// let registry = FacultyRegistry::from_profiles(vec![
///     CapabilityProfile::new("F1").with_available_days(AvailableDays::all()),
/// ]);
/// let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let needs = vec![SupervisionNeed::new("B1", "H1", "Continuity Clinic", monday)];
///
/// let scheduler = SupervisionScheduler::new(ActivityClassifier::default());
/// let outcome = scheduler.schedule(&needs, &registry, &AbsenceCalendar::new());
/// assert_eq!(outcome.assignments.len(), 1);
/// assert_eq!(outcome.assignments[0].faculty_id, "F1");
/// ```
#[derive(Debug, Clone)]
pub struct SupervisionScheduler {
    classifier: ActivityClassifier,
    templates: TemplateCatalog,
    rule_engine: RuleEngine<SupervisionCandidate>,
}

impl SupervisionScheduler {
    /// Creates a scheduler with the default scoring rules and no templates.
    pub fn new(classifier: ActivityClassifier) -> Self {
        Self {
            classifier,
            templates: TemplateCatalog::new(),
            rule_engine: Self::default_rule_engine(),
        }
    }

    /// Utilization plus specialty bonus, equally weighted.
    pub fn default_rule_engine() -> RuleEngine<SupervisionCandidate> {
        RuleEngine::new()
            .with_rule(rules::Utilization)
            .with_rule(rules::SpecialtyMatch)
    }

    /// Sets the clinic template catalog.
    pub fn with_templates(mut self, templates: TemplateCatalog) -> Self {
        self.templates = templates;
        self
    }

    /// Replaces the scoring rules.
    pub fn with_rule_engine(mut self, engine: RuleEngine<SupervisionCandidate>) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Decides every need in order with a fresh workload tracker.
    pub fn schedule(
        &self,
        needs: &[SupervisionNeed],
        registry: &FacultyRegistry,
        absences: &AbsenceCalendar,
    ) -> SupervisionOutcome {
        let mut outcome = SupervisionOutcome::default();

        for need in needs {
            let resolved = self.resolve(need);
            let eligible = Self::eligible(&resolved, registry);

            let available: Vec<&CapabilityProfile> = eligible
                .iter()
                .copied()
                .filter(|p| Self::is_available(p, need, absences, &outcome.workload))
                .collect();

            if available.is_empty() {
                let substitute = eligible.iter().find_map(|p| {
                    absences
                        .entry(&p.id, need.date)
                        .filter(|e| e.replacement().is_some())
                        .map(|e| (*p, e))
                });
                match substitute {
                    Some((profile, entry)) => {
                        self.substitute(&resolved, profile, entry, &mut outcome);
                    }
                    None => {
                        let reason = if eligible.is_empty() {
                            NO_ELIGIBLE_FACULTY
                        } else {
                            NO_AVAILABLE_FACULTY
                        };
                        Self::gap(&resolved, reason, &mut outcome);
                    }
                }
            } else {
                self.assign(&resolved, &available, &mut outcome);
            }
            outcome.processed += 1;
        }

        info!(
            needs = outcome.processed,
            assigned = outcome.assigned_count(),
            substituted = outcome.substitutions.len(),
            gaps = outcome.gaps.len(),
            "supervision run complete"
        );
        outcome
    }

    fn resolve<'n>(&self, need: &'n SupervisionNeed) -> ResolvedNeed<'n> {
        let classification = self.classifier.classify(&need.activity);
        let ratio = SupervisionRatio::for_level(&need.pgy_level);
        ResolvedNeed {
            need,
            supervision_type: ratio.supervision_type(),
            supervision_ratio: ratio.ratio_for(classification.activity_type),
            classification,
        }
    }

    fn eligible<'r>(
        resolved: &ResolvedNeed<'_>,
        registry: &'r FacultyRegistry,
    ) -> Vec<&'r CapabilityProfile> {
        let is_procedure = resolved.activity_type() == ActivityType::Procedure;
        registry
            .active()
            .filter(|p| !resolved.has_specialty() || resolved.satisfies_specialty(p))
            .filter(|p| !is_procedure || p.performs_procedures)
            .collect()
    }

    fn is_available(
        profile: &CapabilityProfile,
        need: &SupervisionNeed,
        absences: &AbsenceCalendar,
        workload: &WorkloadTracker,
    ) -> bool {
        !absences.is_absent(&profile.id, need.date, need.time_of_day)
            && profile.works_on(need.date)
            && workload.load(&profile.id) < profile.workload_capacity
    }

    fn assign(
        &self,
        resolved: &ResolvedNeed<'_>,
        available: &[&CapabilityProfile],
        outcome: &mut SupervisionOutcome,
    ) {
        let candidates: Vec<SupervisionCandidate> = available
            .iter()
            .map(|p| {
                SupervisionCandidate::new(&p.id, outcome.workload.load(&p.id), p.workload_capacity)
                    .with_specialty_match(resolved.satisfies_specialty(p))
            })
            .collect();
        let context = SchedulingContext::for_supervision(resolved.has_specialty());
        let Some(best) = self.rule_engine.select_best(&candidates, &context) else {
            return;
        };
        let profile = available[best];
        let need = resolved.need;

        debug!(
            half_day = %need.half_day_id,
            faculty = %profile.id,
            load = candidates[best].current_load,
            "assigned supervision"
        );

        let template = self
            .templates
            .lookup(&need.activity, resolved.activity_type(), false);
        outcome.assignments.push(SupervisionAssignment {
            assignment_id: need.assignment_id.clone(),
            half_day_id: need.half_day_id.clone(),
            faculty_id: profile.id.clone(),
            faculty_name: profile.name.clone(),
            clinic_template_id: template.id,
            clinic_template_name: template.name,
            supervision_type: resolved.supervision_type,
            pgy_level: need.pgy_level.clone(),
            activity: need.activity.clone(),
            original_activity: need.activity.clone(),
            activity_type: resolved.activity_type(),
            resident_id: need.resident_id.clone(),
            date: need.date,
            time_of_day: need.time_of_day,
            supervision_ratio: resolved.supervision_ratio,
            substitution_applied: false,
            absence_info: None,
            assignment_reason: AssignmentReason::Compliant,
        });
        outcome
            .workload
            .record(&profile.id, resolved.supervision_type, resolved.has_specialty());
    }

    fn substitute(
        &self,
        resolved: &ResolvedNeed<'_>,
        profile: &CapabilityProfile,
        entry: &AbsenceEntry,
        outcome: &mut SupervisionOutcome,
    ) {
        let need = resolved.need;
        let replacement = entry.replacement().unwrap_or(&entry.leave_type).to_string();

        debug!(
            half_day = %need.half_day_id,
            faculty = %profile.id,
            replacement = %replacement,
            "substituted supervision"
        );

        let template = self
            .templates
            .lookup(&replacement, resolved.activity_type(), true);
        outcome.substitutions.push(SupervisionSubstitution {
            faculty_id: profile.id.clone(),
            date: need.date,
            original_activity: need.activity.clone(),
            replacement_activity: replacement.clone(),
            absence_type: entry.leave_type.clone(),
        });
        outcome.assignments.push(SupervisionAssignment {
            assignment_id: need.assignment_id.clone(),
            half_day_id: need.half_day_id.clone(),
            faculty_id: profile.id.clone(),
            faculty_name: profile.name.clone(),
            clinic_template_id: template.id,
            clinic_template_name: template.name,
            supervision_type: resolved.supervision_type,
            pgy_level: need.pgy_level.clone(),
            activity: replacement,
            original_activity: need.activity.clone(),
            activity_type: resolved.activity_type(),
            resident_id: need.resident_id.clone(),
            date: need.date,
            time_of_day: need.time_of_day,
            supervision_ratio: resolved.supervision_ratio,
            substitution_applied: true,
            absence_info: Some(entry.clone()),
            assignment_reason: AssignmentReason::AbsenceSubstitution,
        });
        outcome
            .workload
            .record(&profile.id, resolved.supervision_type, resolved.has_specialty());
    }

    fn gap(resolved: &ResolvedNeed<'_>, reason: &str, outcome: &mut SupervisionOutcome) {
        let need = resolved.need;
        let critical_level = match resolved.supervision_type {
            SupervisionType::Direct => Severity::High,
            SupervisionType::Indirect => Severity::Medium,
        };
        warn!(
            half_day = %need.half_day_id,
            activity = %need.activity,
            date = %need.date,
            ?critical_level,
            reason,
            "supervision coverage gap"
        );
        outcome.gaps.push(CoverageGap {
            half_day_id: need.half_day_id.clone(),
            pgy_level: need.pgy_level.clone(),
            activity: need.activity.clone(),
            reason: reason.to_string(),
            specialty_requirement: resolved.classification.specialty.clone(),
            date: need.date,
            time_of_day: need.time_of_day,
            critical_level,
        });
    }
}
