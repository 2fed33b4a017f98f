//! Roster error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a scheduling run.
///
/// Per-record problems (missing identity, bad leave dates, unresolved
/// half-days) are not errors; they are collected as diagnostics and the
/// offending record is skipped.
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("absence-aware run requires a leave channel, none was supplied")]
    MissingAbsenceData,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid call period: end {end} is before start {start}")]
    InvalidCallPeriod { start: NaiveDate, end: NaiveDate },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
