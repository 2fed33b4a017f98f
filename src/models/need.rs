//! Supervision needs and half-day resolution.
//!
//! An assignment block carries positionally aligned lists: half-day ids,
//! residents, PGY levels and activity labels. Each half-day index expands
//! into one [`SupervisionNeed`], resolved to a real date and session via
//! a [`HalfDayIndex`].
//!
//! # Per-index defaults
//! | Field | Missing at index `i` |
//! |-------|----------------------|
//! | PGY level | first element, else `"PGY-1"` |
//! | activity | first element, else the need is skipped |
//! | resident | first element, else none |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::calendar::parse_iso_date;
use super::{AssignmentBlock, HalfDayRecord, TimeOfDay};
use crate::validation::{DiagnosticKind, Diagnostics};

/// PGY level used when a block carries none.
pub const DEFAULT_PGY_LEVEL: &str = "PGY-1";

/// A resolved half-day session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfDaySlot {
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
}

/// Half-day id → date and session.
#[derive(Debug, Clone, Default)]
pub struct HalfDayIndex {
    slots: HashMap<String, HalfDaySlot>,
}

impl HalfDayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from resolution rows.
    ///
    /// Rows with an empty id or unparseable date are dropped; for duplicate
    /// ids the first row wins. Both are recorded in `diagnostics`.
    pub fn build(records: &[HalfDayRecord], diagnostics: &mut Diagnostics) -> Self {
        let mut index = Self::new();

        for record in records {
            let id = record.id.trim();
            let date = record.date.as_deref().and_then(parse_iso_date);
            let Some(date) = date.filter(|_| !id.is_empty()) else {
                warn!(half_day = %record.id, "dropping unresolvable half-day row");
                diagnostics.push(
                    DiagnosticKind::UnresolvedHalfDay,
                    &record.id,
                    format!("half-day row has no usable date: {:?}", record.date),
                );
                continue;
            };
            if index.slots.contains_key(id) {
                diagnostics.push(
                    DiagnosticKind::DuplicateHalfDay,
                    id,
                    "duplicate half-day row ignored",
                );
                continue;
            }
            index.insert(
                id,
                date,
                TimeOfDay::parse_or_default(record.time_of_day.as_deref()),
            );
        }

        index
    }

    pub fn insert(&mut self, id: impl Into<String>, date: NaiveDate, time_of_day: TimeOfDay) {
        self.slots.insert(id.into(), HalfDaySlot { date, time_of_day });
    }

    /// Adds a slot (builder form).
    pub fn with_slot(
        mut self,
        id: impl Into<String>,
        date: NaiveDate,
        time_of_day: TimeOfDay,
    ) -> Self {
        self.insert(id, date, time_of_day);
        self
    }

    pub fn resolve(&self, id: &str) -> Option<HalfDaySlot> {
        self.slots.get(id.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// One resident half-day requiring supervision.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisionNeed {
    /// Id of the block this need came from.
    pub assignment_id: String,
    pub half_day_id: String,
    pub resident_id: Option<String>,
    pub pgy_level: String,
    /// Raw activity label.
    pub activity: String,
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
}

impl SupervisionNeed {
    /// Creates a PGY-1 morning need with no resident.
    pub fn new(
        assignment_id: impl Into<String>,
        half_day_id: impl Into<String>,
        activity: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            assignment_id: assignment_id.into(),
            half_day_id: half_day_id.into(),
            resident_id: None,
            pgy_level: DEFAULT_PGY_LEVEL.to_string(),
            activity: activity.into(),
            date,
            time_of_day: TimeOfDay::Am,
        }
    }

    pub fn with_pgy_level(mut self, pgy_level: impl Into<String>) -> Self {
        self.pgy_level = pgy_level.into();
        self
    }

    pub fn with_resident(mut self, resident_id: impl Into<String>) -> Self {
        self.resident_id = Some(resident_id.into());
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = time_of_day;
        self
    }
}

/// Needs expanded from a batch of blocks.
#[derive(Debug, Clone, Default)]
pub struct NeedSet {
    /// Needs in block order, then half-day index order.
    pub needs: Vec<SupervisionNeed>,
    /// Units dropped for missing mandatory data.
    pub skipped: usize,
}

/// Expands assignment blocks into supervision needs.
///
/// Input order is preserved. A block with no half-days counts as one
/// skipped unit; a half-day without an activity label or a resolvable id
/// is skipped. Every skip leaves a diagnostic.
pub fn expand_blocks(
    blocks: &[AssignmentBlock],
    half_days: &HalfDayIndex,
    diagnostics: &mut Diagnostics,
) -> NeedSet {
    let mut set = NeedSet::default();

    for block in blocks {
        if block.half_days.is_empty() {
            warn!(block = %block.id, "skipping block without half-days");
            diagnostics.push(DiagnosticKind::EmptyBlock, &block.id, "block lists no half-days");
            set.skipped += 1;
            continue;
        }

        for (i, half_day_id) in block.half_days.iter().enumerate() {
            let subject = format!("{}[{i}]", block.id);

            let Some(activity) = aligned(&block.activities, i).filter(|a| !a.trim().is_empty())
            else {
                warn!(need = %subject, "skipping half-day without activity");
                diagnostics.push(DiagnosticKind::MissingActivity, &subject, "no activity label");
                set.skipped += 1;
                continue;
            };

            let Some(slot) = half_days.resolve(half_day_id) else {
                warn!(need = %subject, half_day = %half_day_id, "skipping unresolved half-day");
                diagnostics.push(
                    DiagnosticKind::UnresolvedHalfDay,
                    &subject,
                    format!("half-day '{half_day_id}' does not resolve to a date"),
                );
                set.skipped += 1;
                continue;
            };

            let pgy_level = aligned(&block.pgy_levels, i)
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(DEFAULT_PGY_LEVEL);

            set.needs.push(SupervisionNeed {
                assignment_id: block.id.clone(),
                half_day_id: half_day_id.clone(),
                resident_id: aligned(&block.residents, i).map(str::to_string),
                pgy_level: pgy_level.to_string(),
                activity: activity.to_string(),
                date: slot.date,
                time_of_day: slot.time_of_day,
            });
        }
    }

    debug!(needs = set.needs.len(), skipped = set.skipped, "expanded blocks");
    set
}

/// Element `i`, falling back to the first element.
fn aligned(values: &[String], i: usize) -> Option<&str> {
    values.get(i).or_else(|| values.first()).map(String::as_str)
}
