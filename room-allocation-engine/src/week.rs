use core::fmt::{self, Display};
use core::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PreferenceError, WeekError};

/// The office days of a week, in calendar order.
pub const WORKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a stored day choice such as `"Tuesday"`. Weekends are rejected.
pub fn parse_workday(value: &str) -> Result<Weekday, PreferenceError> {
    value
        .trim()
        .parse::<Weekday>()
        .ok()
        .filter(|weekday| WORKDAYS.contains(weekday))
        .ok_or_else(|| PreferenceError::InvalidWeekday(value.to_owned()))
}

/// A target week, identified by its Monday.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct Week(NaiveDate);

impl Week {
    /// Accepts a Monday whose Friday chrono can still represent, so every
    /// date of the week can be computed without overflow.
    pub fn new(monday: NaiveDate) -> Result<Self, WeekError> {
        match monday.weekday() {
            Weekday::Mon if monday.checked_add_days(Days::new(4)).is_some() => Ok(Self(monday)),
            Weekday::Mon => Err(WeekError::OutOfRange(monday)),
            weekday => Err(WeekError::NotAMonday {
                date: monday,
                weekday,
            }),
        }
    }

    /// The week preferences are collected for on `today`: today if it is a
    /// Monday, otherwise the next Monday.
    #[must_use]
    pub fn upcoming(today: NaiveDate) -> Self {
        let days_until_monday = (7 - today.weekday().num_days_from_monday()) % 7;
        Self(today + Days::new(u64::from(days_until_monday)))
    }

    #[must_use]
    pub const fn monday(self) -> NaiveDate {
        self.0
    }

    #[must_use]
    pub fn friday(self) -> NaiveDate {
        self.date_of(Weekday::Fri)
    }

    #[must_use]
    pub fn date_of(self, weekday: Weekday) -> NaiveDate {
        self.0 + Days::new(u64::from(weekday.num_days_from_monday()))
    }

    pub fn workdays(self) -> impl Iterator<Item = (Weekday, NaiveDate)> {
        WORKDAYS
            .into_iter()
            .map(move |weekday| (weekday, self.date_of(weekday)))
    }
}

impl TryFrom<NaiveDate> for Week {
    type Error = WeekError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Week> for NaiveDate {
    fn from(week: Week) -> Self {
        week.0
    }
}

impl Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Week {
    type Err = WeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
    }
}

/// The two fixed day patterns a team can book a room for.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayPair {
    MondayWednesday,
    TuesdayThursday,
}

impl DayPair {
    pub const ALL: [Self; 2] = [Self::MondayWednesday, Self::TuesdayThursday];

    #[must_use]
    pub const fn days(self) -> [Weekday; 2] {
        match self {
            Self::MondayWednesday => [Weekday::Mon, Weekday::Wed],
            Self::TuesdayThursday => [Weekday::Tue, Weekday::Thu],
        }
    }

    #[must_use]
    pub fn dates(self, week: Week) -> [NaiveDate; 2] {
        self.days().map(|weekday| week.date_of(weekday))
    }

    /// Human readable form, e.g. `Monday and Wednesday`.
    #[must_use]
    pub fn describe(self) -> String {
        let [first, second] = self.days();
        format!("{} and {}", weekday_name(first), weekday_name(second))
    }
}

/// Renders the stored form, e.g. `Monday,Wednesday`.
impl Display for DayPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second] = self.days();
        write!(f, "{},{}", weekday_name(first), weekday_name(second))
    }
}

impl FromStr for DayPair {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PreferenceError::InvalidDayPair(s.to_owned());
        let mut days = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse::<Weekday>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;
        days.sort_by_key(Weekday::num_days_from_monday);
        days.dedup();
        match days.as_slice() {
            [Weekday::Mon, Weekday::Wed] => Ok(Self::MondayWednesday),
            [Weekday::Tue, Weekday::Thu] => Ok(Self::TuesdayThursday),
            _ => Err(invalid()),
        }
    }
}
