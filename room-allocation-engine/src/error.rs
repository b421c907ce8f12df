use chrono::{NaiveDate, NaiveDateTime, Weekday};
use thiserror::Error;

/// Why a single submission could not be turned into an allocation request.
///
/// These never abort a run, the offending submission is skipped and reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid team size {0}")]
    InvalidTeamSize(i32),
    #[error("invalid day pair '{0}', expected Monday,Wednesday or Tuesday,Thursday")]
    InvalidDayPair(String),
    #[error("invalid weekday '{0}', expected Monday to Friday")]
    InvalidWeekday(String),
    #[error("no days selected")]
    NoDays,
    #[error("{0} days selected but at most 5 are allowed")]
    TooManyDays(usize),
    #[error("duplicate submission, the earlier one from {submitted_at} is used")]
    Duplicate { submitted_at: NaiveDateTime },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeekError {
    #[error("{date} is a {weekday}, weeks are identified by their Monday")]
    NotAMonday { date: NaiveDate, weekday: Weekday },
    #[error("the week of {0} reaches past the last representable date")]
    OutOfRange(NaiveDate),
    #[error("invalid date: {0}")]
    Parse(#[from] chrono::ParseError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("resource name must not be empty")]
    EmptyName,
    #[error("resource '{0}' needs a capacity of at least 1")]
    ZeroCapacity(String),
    #[error("resource name '{0}' is used more than once")]
    DuplicateName(String),
}
