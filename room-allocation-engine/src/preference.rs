use core::fmt::{self, Display};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;
use crate::outcome::AllocationOutcome;
use crate::week::{parse_workday, DayPair, WORKDAYS};

/// The resource category an allocation run covers.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Rooms,
    Oasis,
}

impl Category {
    pub const ALL: [Self; 2] = [Self::Rooms, Self::Oasis];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rooms => "rooms",
            Self::Oasis => "oasis",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team's room preference as it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSubmission {
    pub team_name: String,
    pub contact_person: Option<String>,
    pub team_size: Option<i32>,
    /// Stored form of the day pair, e.g. `Monday,Wednesday`.
    pub preferred_days: Option<String>,
    pub submitted_at: Option<NaiveDateTime>,
}

/// A person's hot-desk preference as it was stored, empty slots removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskSubmission {
    pub person_name: String,
    pub preferred_days: Vec<String>,
    pub submitted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRequest {
    pub team: String,
    pub team_size: u32,
    pub day_pair: DayPair,
    pub submitted_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskRequest {
    pub person: String,
    /// Requested days in the order they were chosen, without repetitions.
    pub days: Vec<Weekday>,
    pub submitted_at: NaiveDateTime,
}

pub(crate) trait Submission {
    type Request: Request;

    fn requester(&self) -> &str;

    fn validate(&self) -> Result<Self::Request, PreferenceError>;
}

pub(crate) trait Request {
    fn requester(&self) -> &str;

    fn submitted_at(&self) -> NaiveDateTime;
}

fn required_name(value: &str, field: &'static str) -> Result<String, PreferenceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PreferenceError::MissingField(field));
    }
    Ok(value.to_owned())
}

fn submission_time(value: Option<NaiveDateTime>) -> Result<NaiveDateTime, PreferenceError> {
    value.ok_or(PreferenceError::MissingField("submission_time"))
}

impl RoomSubmission {
    pub fn validate(&self) -> Result<RoomRequest, PreferenceError> {
        let team = required_name(&self.team_name, "team_name")?;
        let submitted_at = submission_time(self.submitted_at)?;
        let size = self
            .team_size
            .ok_or(PreferenceError::MissingField("team_size"))?;
        let team_size = u32::try_from(size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(PreferenceError::InvalidTeamSize(size))?;
        let day_pair = self
            .preferred_days
            .as_deref()
            .ok_or(PreferenceError::MissingField("preferred_days"))?
            .parse()?;
        Ok(RoomRequest {
            team,
            team_size,
            day_pair,
            submitted_at,
        })
    }
}

impl DeskSubmission {
    pub fn validate(&self) -> Result<DeskRequest, PreferenceError> {
        let person = required_name(&self.person_name, "person_name")?;
        let submitted_at = submission_time(self.submitted_at)?;
        let mut days = Vec::with_capacity(self.preferred_days.len());
        for value in &self.preferred_days {
            let day = parse_workday(value)?;
            if !days.contains(&day) {
                days.push(day);
            }
        }
        if days.is_empty() {
            return Err(PreferenceError::NoDays);
        }
        if self.preferred_days.len() > WORKDAYS.len() {
            return Err(PreferenceError::TooManyDays(self.preferred_days.len()));
        }
        Ok(DeskRequest {
            person,
            days,
            submitted_at,
        })
    }
}

impl Submission for RoomSubmission {
    type Request = RoomRequest;

    fn requester(&self) -> &str {
        &self.team_name
    }

    fn validate(&self) -> Result<Self::Request, PreferenceError> {
        Self::validate(self)
    }
}

impl Submission for DeskSubmission {
    type Request = DeskRequest;

    fn requester(&self) -> &str {
        &self.person_name
    }

    fn validate(&self) -> Result<Self::Request, PreferenceError> {
        Self::validate(self)
    }
}

impl Request for RoomRequest {
    fn requester(&self) -> &str {
        &self.team
    }

    fn submitted_at(&self) -> NaiveDateTime {
        self.submitted_at
    }
}

impl Request for DeskRequest {
    fn requester(&self) -> &str {
        &self.person
    }

    fn submitted_at(&self) -> NaiveDateTime {
        self.submitted_at
    }
}

/// Turns submissions into requests ordered by submission time and name.
///
/// Invalid submissions and all but the earliest submission of a requester are
/// reported on `outcome` and left out.
pub(crate) fn admit<S: Submission>(
    submissions: &[S],
    outcome: &mut AllocationOutcome,
) -> Vec<S::Request> {
    let mut requests = Vec::with_capacity(submissions.len());
    for submission in submissions {
        match submission.validate() {
            Ok(request) => requests.push(request),
            Err(error) => outcome.skip(submission.requester(), error),
        }
    }
    requests.sort_by(|left, right| {
        left.submitted_at()
            .cmp(&right.submitted_at())
            .then_with(|| left.requester().cmp(right.requester()))
    });

    let mut first_seen: HashMap<String, NaiveDateTime> = HashMap::new();
    requests.retain(|request| match first_seen.entry(request.requester().to_owned()) {
        Entry::Occupied(first) => {
            outcome.skip(
                request.requester(),
                PreferenceError::Duplicate {
                    submitted_at: *first.get(),
                },
            );
            false
        }
        Entry::Vacant(vacant) => {
            vacant.insert(request.submitted_at());
            true
        }
    });
    requests
}
