//! Greedy roster engines and KPI evaluation.
//!
//! # Algorithm
//!
//! Both engines are scored-greedy allocators: each unit of work (a
//! supervision need, a call day) is decided in a fixed order against a
//! per-run tracker, ending in exactly one of assignment, substitution or
//! coverage gap. They are not optimal, but are deterministic and fast.
//!
//! - `SupervisionScheduler`: needs in input order, utilization and
//!   specialty scoring.
//! - `CallScheduler`: days in chronological order, gap penalty and equity
//!   scoring.
//!
//! # KPI
//!
//! `SupervisionSummary` and `CallStatistics` summarize compliance,
//! utilization, coverage and gap violations.

pub mod call;
mod kpi;
mod supervision;
mod tracker;

pub use call::{count_gap_violations, CallOutcome, CallScheduler};
pub use kpi::{
    format_rate, percent, CallStatistics, CallUtilization, ComplianceSummary, FacultyUtilization,
    SupervisionSummary,
};
pub use supervision::{SupervisionOutcome, SupervisionScheduler};
pub use tracker::{CallLoad, CallTracker, FacultyWorkload, WorkloadTracker};
