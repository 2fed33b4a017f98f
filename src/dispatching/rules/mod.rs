//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Supervision**: UTIL, SPEC
//! - **On-call**: GAP, EQUITY, WEIGHT
//!
//! # Score Convention
//! All rules return lower scores for preferred candidates.

use super::{CallCandidate, DispatchingRule, RuleScore, SchedulingContext, SupervisionCandidate};

/// Score added when a candidate satisfies the need's specialty requirement.
pub const SPECIALTY_BONUS: f64 = -0.5;

// ======================== Supervision rules ========================

/// Workload utilization.
///
/// `current_load / capacity`; zero capacity scores 1.0. Spreads
/// supervision across faculty in proportion to their availability.
#[derive(Debug, Clone, Copy)]
pub struct Utilization;

impl DispatchingRule<SupervisionCandidate> for Utilization {
    fn name(&self) -> &'static str {
        "UTIL"
    }

    fn evaluate(
        &self,
        candidate: &SupervisionCandidate,
        _context: &SchedulingContext,
    ) -> RuleScore {
        candidate.utilization()
    }

    fn description(&self) -> &'static str {
        "Workload Utilization"
    }
}

/// Specialty match bonus.
///
/// Applies [`SPECIALTY_BONUS`] when the need has a specialty requirement
/// and the candidate satisfies it; otherwise 0.
#[derive(Debug, Clone, Copy)]
pub struct SpecialtyMatch;

impl DispatchingRule<SupervisionCandidate> for SpecialtyMatch {
    fn name(&self) -> &'static str {
        "SPEC"
    }

    fn evaluate(&self, candidate: &SupervisionCandidate, context: &SchedulingContext) -> RuleScore {
        if context.specialty_required && candidate.matches_specialty {
            SPECIALTY_BONUS
        } else {
            0.0
        }
    }

    fn description(&self) -> &'static str {
        "Specialty Match"
    }
}

// ======================== On-call rules ========================

/// Minimum-gap penalty.
///
/// `(minimum_gap_days - days_since_last_call + 1)^3` when the gap is below
/// the minimum, else 0. A candidate without a call in this run scores 0.
/// Strictly increasing as the gap shrinks below the minimum.
#[derive(Debug, Clone, Copy)]
pub struct GapPenalty;

impl DispatchingRule<CallCandidate> for GapPenalty {
    fn name(&self) -> &'static str {
        "GAP"
    }

    fn evaluate(&self, candidate: &CallCandidate, context: &SchedulingContext) -> RuleScore {
        match candidate.days_since_last_call {
            Some(days) if days < context.minimum_gap_days => {
                ((context.minimum_gap_days - days + 1) as f64).powi(3)
            }
            _ => 0.0,
        }
    }

    fn description(&self) -> &'static str {
        "Minimum Gap Penalty"
    }
}

/// Call equity.
///
/// `total_calls - mean_total_calls`, less `absence_equity_credit` per
/// absence day. Favors faculty below the pool average.
#[derive(Debug, Clone, Copy)]
pub struct Equity;

impl DispatchingRule<CallCandidate> for Equity {
    fn name(&self) -> &'static str {
        "EQUITY"
    }

    fn evaluate(&self, candidate: &CallCandidate, context: &SchedulingContext) -> RuleScore {
        candidate.total_calls
            - context.mean_total_calls
            - context.absence_equity_credit * candidate.absence_days as f64
    }

    fn description(&self) -> &'static str {
        "Call Equity"
    }
}

/// Call weight of the day. Equal for every candidate on a given day.
#[derive(Debug, Clone, Copy)]
pub struct CallWeight;

impl DispatchingRule<CallCandidate> for CallWeight {
    fn name(&self) -> &'static str {
        "WEIGHT"
    }

    fn evaluate(&self, _candidate: &CallCandidate, context: &SchedulingContext) -> RuleScore {
        context.call_weight
    }

    fn description(&self) -> &'static str {
        "Call Weight"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_rule() {
        let ctx = SchedulingContext::for_supervision(false);
        let c = SupervisionCandidate::new("F1", 2, 8);
        assert!((Utilization.evaluate(&c, &ctx) - 0.25).abs() < 1e-10);
        let zero = SupervisionCandidate::new("F2", 0, 0);
        assert!((Utilization.evaluate(&zero, &ctx) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_specialty_bonus_requires_requirement() {
        let c = SupervisionCandidate::new("F1", 0, 4).with_specialty_match(true);
        let with = SchedulingContext::for_supervision(true);
        let without = SchedulingContext::for_supervision(false);
        assert!((SpecialtyMatch.evaluate(&c, &with) - SPECIALTY_BONUS).abs() < 1e-10);
        assert!(SpecialtyMatch.evaluate(&c, &without).abs() < 1e-10);

        let miss = SupervisionCandidate::new("F2", 0, 4);
        assert!(SpecialtyMatch.evaluate(&miss, &with).abs() < 1e-10);
    }

    #[test]
    fn test_gap_penalty_monotonic() {
        let ctx = SchedulingContext::for_call(1.0, 3);
        let at = |days: i64| {
            let candidate = CallCandidate::new("F", 0.0).with_days_since_last_call(days);
            GapPenalty.evaluate(&candidate, &ctx)
        };

        assert!((at(2) - 8.0).abs() < 1e-10);
        assert!((at(1) - 27.0).abs() < 1e-10);
        assert!((at(0) - 64.0).abs() < 1e-10);
        assert!(at(3).abs() < 1e-10);
        assert!(at(10).abs() < 1e-10);
        for days in 0..3 {
            assert!(at(days) > at(days + 1));
        }

        let fresh = CallCandidate::new("F", 0.0);
        assert!(GapPenalty.evaluate(&fresh, &ctx).abs() < 1e-10);
    }

    #[test]
    fn test_equity_with_absence_credit() {
        let ctx = SchedulingContext::for_call(1.0, 3)
            .with_mean_total_calls(5.0)
            .with_absence_equity_credit(0.1);
        let c = CallCandidate::new("F1", 7.0).with_absence_days(10);
        assert!((Equity.evaluate(&c, &ctx) - 1.0).abs() < 1e-10);

        let ctx = SchedulingContext::for_call(1.0, 3).with_mean_total_calls(5.0);
        assert!((Equity.evaluate(&c, &ctx) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_call_weight_from_context() {
        let ctx = SchedulingContext::for_call(2.0, 3);
        assert!((CallWeight.evaluate(&CallCandidate::new("F", 9.0), &ctx) - 2.0).abs() < 1e-10);
    }
}
