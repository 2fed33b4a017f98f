//! Rostering domain models.
//!
//! Input records as the host delivers them, their normalized forms, and
//! the terminal outcome records both engines emit.
//!
//! # Domain Mappings
//!
//! | u-roster | Supervision engine | Call engine |
//! |----------|--------------------|-------------|
//! | Unit of work | `SupervisionNeed` (resident half-day) | `CallDay` |
//! | Candidate pool | `FacultyRegistry` (eligible subset) | `FacultyRegistry` (active) |
//! | Unavailability | `AbsenceCalendar` (scoped) | `AbsenceCalendar` (any scope) |
//! | Filled | assignment or substitution | assignment or substitution |
//! | Unfilled | `CoverageGap` | `CallGap` |

mod absence;
mod activity;
pub(crate) mod calendar;
mod need;
mod outcome;
mod profile;
pub(crate) mod records;
mod template;

pub use absence::{AbsenceCalendar, AbsenceEntry, AbsenceScope, TimeOfDay};
pub use activity::{
    ActivityClassifier, ActivityType, Classification, SpecialtyRule, SupervisionRatio,
    SupervisionType,
};
pub use calendar::{weekday_name, CallDay, CallPeriod, HolidayCalendar};
pub use need::{
    expand_blocks, HalfDayIndex, HalfDaySlot, NeedSet, SupervisionNeed, DEFAULT_PGY_LEVEL,
};
pub use outcome::{
    AssignmentReason, CallAssignment, CallGap, CoverageGap, Severity, SupervisionAssignment,
    SupervisionSubstitution, OVERNIGHT_CALL,
};
pub use profile::{
    AvailableDays, CapabilityProfile, FacultyRegistry, FacultyStatus, PROCEDURE_CREDENTIAL,
};
pub use records::{AssignmentBlock, HalfDayRecord, LeaveRecord, RosterRecord, TemplateRecord};
pub use template::{ClinicTemplate, TemplateCatalog};
