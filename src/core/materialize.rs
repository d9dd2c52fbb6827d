//! Occurrence materialization - the rows a definition should have in the ledger.
//!
//! Materialization is pure: it reads no clock and touches no store. The caller passes
//! the synchronization date, which decides both the status of each row and, later in
//! the synchronizer, which rows may still be changed.

use crate::{
    core::cadence::{Cadence, Schedule},
    entities::{OccurrenceStatus, RecurringDefinitionModel},
};
use chrono::{Months, NaiveDate};

/// How far past the start date an open-ended definition is generated
pub const DEFAULT_HORIZON_MONTHS: u32 = 24;

/// The date-bearing part of a recurring definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecurrenceWindow {
    /// Cadence anchored at the start date
    pub schedule: Schedule,
    /// Inclusive end date, if the definition has one
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceWindow {
    /// Builds a window from its parts
    #[must_use]
    pub const fn new(cadence: Cadence, start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            schedule: Schedule::new(cadence, start_date),
            end_date,
        }
    }

    /// Reads cadence and dates off a stored definition
    #[must_use]
    pub fn from_definition(definition: &RecurringDefinitionModel) -> Self {
        Self::new(
            Cadence::parse(definition.frequency.as_deref()),
            definition.start_date,
            definition.end_date,
        )
    }

    /// Last date that may carry an occurrence: the end date when present, otherwise
    /// the start date plus [`DEFAULT_HORIZON_MONTHS`].
    #[must_use]
    pub fn effective_end(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| {
            self.schedule
                .start()
                .checked_add_months(Months::new(DEFAULT_HORIZON_MONTHS))
                .unwrap_or(NaiveDate::MAX)
        })
    }
}

/// One row the ledger should contain for a definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedOccurrence {
    /// Occurrence date
    pub date: NaiveDate,
    /// Status as of the synchronization date
    pub status: OccurrenceStatus,
}

/// Paid when `date` is strictly before `today`, scheduled otherwise.
#[must_use]
pub fn status_for(date: NaiveDate, today: NaiveDate) -> OccurrenceStatus {
    if date < today {
        OccurrenceStatus::Paid
    } else {
        OccurrenceStatus::Scheduled
    }
}

/// Every occurrence of `window` from its start date through its effective end, both
/// inclusive, in date order. Empty when the start lies after the effective end.
#[must_use]
pub fn materialize(window: &RecurrenceWindow, today: NaiveDate) -> Vec<PlannedOccurrence> {
    let end = window.effective_end();
    window
        .schedule
        .iter()
        .take_while(|date| *date <= end)
        .map(|date| PlannedOccurrence {
            date,
            status: status_for(date, today),
        })
        .collect()
}
