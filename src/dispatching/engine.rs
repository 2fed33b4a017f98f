//! Rule engine for multi-criteria candidate selection.
//!
//! Combines weighted dispatching rules into one score per candidate.
//! Ranking is stable: candidates with equal totals keep input order, which
//! is the tie-break both engines rely on.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchingRule, RuleScore, SchedulingContext};

struct WeightedRule<C> {
    rule: Arc<dyn DispatchingRule<C>>,
    weight: f64,
}

impl<C> Clone for WeightedRule<C> {
    fn clone(&self) -> Self {
        Self {
            rule: Arc::clone(&self.rule),
            weight: self.weight,
        }
    }
}

/// A composable weighted-sum rule engine.
///
/// # Example
/// ```
/// use u_roster::dispatching::{rules, RuleEngine, SchedulingContext, SupervisionCandidate};
///
/// let engine: RuleEngine<SupervisionCandidate> = RuleEngine::new()
///     .with_rule(rules::Utilization)
///     .with_rule(rules::SpecialtyMatch);
///
/// let pool = vec![
///     SupervisionCandidate::new("F1", 4, 10),
///     SupervisionCandidate::new("F2", 1, 10),
/// ];
/// let ctx = SchedulingContext::for_supervision(false);
/// assert_eq!(engine.select_best(&pool, &ctx), Some(1));
/// ```
pub struct RuleEngine<C> {
    rules: Vec<WeightedRule<C>>,
}

impl<C> RuleEngine<C> {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule with weight 1.0.
    pub fn with_rule<R: DispatchingRule<C> + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R>(mut self, rule: R, weight: f64) -> Self
    where
        R: DispatchingRule<C> + 'static,
    {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Sorts candidates by preference (best first).
    ///
    /// Returns indices into the candidate slice. Equal scores keep input order.
    pub fn sort_indices(&self, candidates: &[C], context: &SchedulingContext) -> Vec<usize> {
        let scores: Vec<f64> = candidates.iter().map(|c| self.score(c, context)).collect();
        let mut indices: Vec<usize> = (0..candidates.len()).collect();
        indices.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));
        indices
    }

    /// Returns the index of the best candidate: the first one with the
    /// minimum total score.
    pub fn select_best(&self, candidates: &[C], context: &SchedulingContext) -> Option<usize> {
        self.select_best_scored(candidates, context).map(|(i, _)| i)
    }

    /// Like [`select_best`](Self::select_best), also returning the winning score.
    pub fn select_best_scored(
        &self,
        candidates: &[C],
        context: &SchedulingContext,
    ) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            let score = self.score(candidate, context);
            match best {
                Some((_, s)) if score >= s => {}
                _ => best = Some((i, score)),
            }
        }
        best
    }

    /// Evaluates a single candidate and returns the weighted score of each rule.
    pub fn evaluate(&self, candidate: &C, context: &SchedulingContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(candidate, context) * wr.weight)
            .collect()
    }

    /// Weighted sum of all rule scores.
    pub fn score(&self, candidate: &C, context: &SchedulingContext) -> f64 {
        self.evaluate(candidate, context).iter().sum()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<C> Clone for RuleEngine<C> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<C> Default for RuleEngine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for RuleEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::dispatching::{CallCandidate, SupervisionCandidate};

    fn supervision_engine() -> RuleEngine<SupervisionCandidate> {
        RuleEngine::new()
            .with_rule(rules::Utilization)
            .with_rule(rules::SpecialtyMatch)
    }

    #[test]
    fn test_lowest_utilization_first() {
        let pool = vec![
            SupervisionCandidate::new("busy", 6, 10),
            SupervisionCandidate::new("idle", 0, 10),
            SupervisionCandidate::new("half", 5, 10),
        ];
        let ctx = SchedulingContext::for_supervision(false);
        let engine = supervision_engine();

        let order = engine.sort_indices(&pool, &ctx);
        assert_eq!(pool[order[0]].faculty_id, "idle");
        assert_eq!(pool[order[1]].faculty_id, "half");
        assert_eq!(pool[order[2]].faculty_id, "busy");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let pool = vec![
            SupervisionCandidate::new("B", 2, 4),
            SupervisionCandidate::new("A", 1, 2),
            SupervisionCandidate::new("C", 2, 4),
        ];
        let ctx = SchedulingContext::for_supervision(false);
        let engine = supervision_engine();

        assert_eq!(engine.sort_indices(&pool, &ctx), vec![0, 1, 2]);
        assert_eq!(engine.select_best(&pool, &ctx), Some(0));
    }

    #[test]
    fn test_specialty_bonus_outweighs_full_capacity() {
        let pool = vec![
            SupervisionCandidate::new("generalist", 0, 10),
            SupervisionCandidate::new("specialist", 10, 10).with_specialty_match(true),
        ];
        let ctx = SchedulingContext::for_supervision(true);
        // generalist: 0.0, specialist: 1.0 - 0.5 = 0.5
        assert_eq!(supervision_engine().select_best(&pool, &ctx), Some(0));

        let pool = vec![
            SupervisionCandidate::new("generalist", 6, 10),
            SupervisionCandidate::new("specialist", 9, 10).with_specialty_match(true),
        ];
        // generalist: 0.6, specialist: 0.9 - 0.5 = 0.4
        assert_eq!(supervision_engine().select_best(&pool, &ctx), Some(1));
    }

    #[test]
    fn test_weighted_call_score() {
        let engine: RuleEngine<CallCandidate> = RuleEngine::new()
            .with_weighted_rule(rules::GapPenalty, 0.7)
            .with_weighted_rule(rules::Equity, 0.3)
            .with_weighted_rule(rules::CallWeight, 0.3);
        let ctx = SchedulingContext::for_call(1.5, 3).with_mean_total_calls(2.0);

        let c = CallCandidate::new("F1", 4.0).with_days_since_last_call(2);
        let scores = engine.evaluate(&c, &ctx);
        assert_eq!(scores.len(), 3);
        assert!((scores[0] - 0.7 * 8.0).abs() < 1e-10); // (3 - 2 + 1)^3
        assert!((scores[1] - 0.3 * 2.0).abs() < 1e-10);
        assert!((scores[2] - 0.3 * 1.5).abs() < 1e-10);
        assert!((engine.score(&c, &ctx) - (5.6 + 0.6 + 0.45)).abs() < 1e-10);
    }

    #[test]
    fn test_empty_pool() {
        let ctx = SchedulingContext::for_supervision(false);
        let engine = supervision_engine();
        assert!(engine.sort_indices(&[], &ctx).is_empty());
        assert!(engine.select_best(&[], &ctx).is_none());
    }

    #[test]
    fn test_select_best_scored() {
        let pool = vec![
            SupervisionCandidate::new("F1", 3, 4),
            SupervisionCandidate::new("F2", 1, 4),
        ];
        let ctx = SchedulingContext::for_supervision(false);
        let (i, score) = supervision_engine().select_best_scored(&pool, &ctx).unwrap();
        assert_eq!(i, 1);
        assert!((score - 0.25).abs() < 1e-10);
    }
}
