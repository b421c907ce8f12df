use core::fmt::{self, Display};
use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PreferenceError;
use crate::preference::Category;
use crate::week::{weekday_name, DayPair, Week};

/// One requester holding one resource on one day.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    pub requester: String,
    pub resource: String,
    pub date: NaiveDate,
}

/// Something an admin should know about a run. None of these fail the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Skipped {
        category: Category,
        requester: String,
        reason: PreferenceError,
    },
    NoRoomAvailable {
        team: String,
        team_size: u32,
        day_pair: DayPair,
    },
    DeskPoolFull {
        pool: String,
        date: NaiveDate,
        requested: usize,
        capacity: u32,
    },
}

impl Diagnostic {
    /// Number of requesters this diagnostic leaves without a slot.
    #[must_use]
    pub fn turned_away(&self) -> usize {
        match self {
            Self::Skipped { .. } | Self::NoRoomAvailable { .. } => 1,
            Self::DeskPoolFull {
                requested,
                capacity,
                ..
            } => requested.saturating_sub(usize::try_from(*capacity).unwrap_or(usize::MAX)),
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped {
                category,
                requester,
                reason,
            } => {
                let requester = if requester.trim().is_empty() {
                    "<unnamed>"
                } else {
                    requester.as_str()
                };
                write!(f, "skipped {category} preference from {requester}: {reason}")
            }
            Self::NoRoomAvailable {
                team,
                team_size,
                day_pair,
            } => write!(
                f,
                "no room available for team {team} ({team_size} people) on {}",
                day_pair.describe()
            ),
            Self::DeskPoolFull {
                pool,
                date,
                requested,
                capacity,
            } => write!(
                f,
                "{pool} is full on {} {date}: {} of {requested} people turned away (capacity \
                 {capacity})",
                weekday_name(date.weekday()),
                self.turned_away(),
            ),
        }
    }
}

/// Counts describing a finished allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationSummary {
    pub category: Category,
    /// Valid, de-duplicated requests that took part in the allocation.
    pub considered: usize,
    pub skipped: usize,
    /// Requesters that received at least one slot.
    pub placed: usize,
    pub rows: usize,
}

impl AllocationSummary {
    #[must_use]
    pub const fn unplaced(&self) -> usize {
        self.considered.saturating_sub(self.placed)
    }
}

impl Display for AllocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} requesters placed, {} rows, {} skipped",
            self.category, self.placed, self.considered, self.rows, self.skipped
        )
    }
}

/// Result of allocating one category for one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub category: Category,
    pub week: Week,
    pub assignments: Vec<Assignment>,
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) considered: usize,
}

impl AllocationOutcome {
    #[must_use]
    pub const fn new(category: Category, week: Week) -> Self {
        Self {
            category,
            week,
            assignments: Vec::new(),
            diagnostics: Vec::new(),
            considered: 0,
        }
    }

    pub(crate) fn skip(&mut self, requester: &str, reason: PreferenceError) {
        warn!(category = %self.category, requester, %reason, "skipping preference");
        self.diagnostics.push(Diagnostic::Skipped {
            category: self.category,
            requester: requester.to_owned(),
            reason,
        });
    }

    pub(crate) fn assign(&mut self, requester: &str, resource: &str, date: NaiveDate) {
        self.assignments.push(Assignment {
            requester: requester.to_owned(),
            resource: resource.to_owned(),
            date,
        });
    }

    pub fn assignments_of<'a>(&'a self, requester: &'a str) -> impl Iterator<Item = &'a Assignment> {
        self.assignments
            .iter()
            .filter(move |assignment| assignment.requester == requester)
    }

    /// Plain text rendering of the diagnostics, in the order they occurred.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn summary(&self) -> AllocationSummary {
        let placed: HashSet<&str> = self
            .assignments
            .iter()
            .map(|assignment| assignment.requester.as_str())
            .collect();
        AllocationSummary {
            category: self.category,
            considered: self.considered,
            skipped: self
                .diagnostics
                .iter()
                .filter(|diagnostic| matches!(diagnostic, Diagnostic::Skipped { .. }))
                .count(),
            placed: placed.len(),
            rows: self.assignments.len(),
        }
    }
}
