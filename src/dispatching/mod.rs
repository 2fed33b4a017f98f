//! Dispatching rules and rule engine for candidate selection.
//!
//! Both engines choose among faculty candidates the same way: every rule
//! scores a candidate, the engine combines the weighted scores, and the
//! lowest total wins. Ties keep the candidates' input order.
//!
//! # Usage
//!
//! ```
//! use u_roster::dispatching::{rules, CallCandidate, RuleEngine, SchedulingContext};
//!
//! let engine: RuleEngine<CallCandidate> = RuleEngine::new()
//!     .with_weighted_rule(rules::GapPenalty, 0.7)
//!     .with_weighted_rule(rules::Equity, 0.3)
//!     .with_weighted_rule(rules::CallWeight, 0.3);
//!
//! let context = SchedulingContext::for_call(1.0, 3);
//! let pool = vec![
//!     CallCandidate::new("F1", 4.0).with_days_since_last_call(1),
//!     CallCandidate::new("F2", 4.0),
//! ];
//! assert_eq!(engine.select_best(&pool, &context), Some(1));
//! ```

mod candidate;
mod context;
mod engine;
pub mod rules;

pub use candidate::{CallCandidate, SupervisionCandidate};
pub use context::SchedulingContext;
pub use engine::RuleEngine;

use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = preferred candidate.
pub type RuleScore = f64;

/// A dispatching rule that scores one kind of candidate.
///
/// # Score Convention
/// **Lower score = higher preference.** Rules return smaller values for
/// candidates that should be picked first.
pub trait DispatchingRule<C>: Send + Sync + Debug {
    /// Rule name (e.g., "UTIL", "GAP").
    fn name(&self) -> &'static str;

    /// Scores a candidate given the current unit of work.
    fn evaluate(&self, candidate: &C, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
