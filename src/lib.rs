//! Faculty supervision and on-call rostering for residency programs.
//!
//! Assigns attending faculty to supervise residents' half-day activities and
//! builds an overnight call roster over a date range. Both engines are
//! absence-aware greedy allocators driven by weighted dispatching rules.
//!
//! # Modules
//!
//! - **`models`**: Input records, capability profiles, absence calendar,
//!   activity classification, supervision needs and output records
//! - **`dispatching`**: Weighted priority rules and the `RuleEngine` that
//!   ranks candidate faculty
//! - **`scheduler`**: `SupervisionScheduler`, `CallScheduler` and their
//!   summary statistics
//! - **`config`**: Run parameters with serde defaults
//! - **`validation`**: Per-record diagnostics for omitted or skipped input
//! - **`run`**: The batch entry point combining everything above
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_roster::models::{AssignmentBlock, CallPeriod, HalfDayRecord, RosterRecord};
//! use u_roster::{run, RunInput};
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let input = RunInput::new(vec![
//!     RosterRecord::new("F1").with_name("Dr. Adams").available_all_week(),
//!     RosterRecord::new("F2").with_name("Dr. Baker").available_all_week(),
//! ])
//! .with_blocks(vec![AssignmentBlock::new("B1").with_half_day("H1", "R1", "PGY-1", "Clinic")])
//! .with_half_days(vec![HalfDayRecord::new("H1", "2025-03-03", "AM")])
//! .with_call_period(CallPeriod::weeks(monday, 1).unwrap());
//!
//! let envelope = run(&input).unwrap();
//! assert_eq!(envelope.supervision.enhanced_faculty_assignments.len(), 1);
//! assert_eq!(envelope.on_call.unwrap().statistics.total_dates, 7);
//! ```
//!
//! # References
//!
//! - ACGME Common Program Requirements, Section VI.A.2 (Supervision of
//!   Residents)
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", dispatching
//!   rules

pub mod config;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod run;
pub mod scheduler;
pub mod validation;

pub use config::{CallConfig, EngineConfig};
pub use error::{ScheduleError, ScheduleResult};
pub use run::{run, ResultEnvelope, RunInput};
