use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use room_allocation_engine::{Assignment, DeskSubmission, RoomSubmission};

use crate::schema::{oasis_allocations, oasis_preferences, weekly_allocations, weekly_preferences};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = weekly_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoomPreferenceRow {
    pub team_name: String,
    pub contact_person: Option<String>,
    pub team_size: Option<i32>,
    pub preferred_days: Option<String>,
    pub submission_time: Option<NaiveDateTime>,
}

impl From<RoomPreferenceRow> for RoomSubmission {
    fn from(row: RoomPreferenceRow) -> Self {
        Self {
            team_name: row.team_name,
            contact_person: row.contact_person,
            team_size: row.team_size,
            preferred_days: row.preferred_days,
            submitted_at: row.submission_time,
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = oasis_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DeskPreferenceRow {
    pub person_name: String,
    pub preferred_day_1: Option<String>,
    pub preferred_day_2: Option<String>,
    pub preferred_day_3: Option<String>,
    pub preferred_day_4: Option<String>,
    pub preferred_day_5: Option<String>,
    pub submission_time: Option<NaiveDateTime>,
}

impl From<DeskPreferenceRow> for DeskSubmission {
    fn from(row: DeskPreferenceRow) -> Self {
        Self {
            person_name: row.person_name,
            // unused slots are stored as NULL or, from older forms, as ''
            preferred_days: [
                row.preferred_day_1,
                row.preferred_day_2,
                row.preferred_day_3,
                row.preferred_day_4,
                row.preferred_day_5,
            ]
            .into_iter()
            .flatten()
            .filter(|day| !day.trim().is_empty())
            .collect(),
            submitted_at: row.submission_time,
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = weekly_allocations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoomAllocationRow {
    pub team_name: String,
    pub room_name: String,
    pub date: NaiveDate,
}

impl From<RoomAllocationRow> for Assignment {
    fn from(row: RoomAllocationRow) -> Self {
        Self {
            requester: row.team_name,
            resource: row.room_name,
            date: row.date,
        }
    }
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = oasis_allocations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OasisAllocationRow {
    pub person_name: String,
    pub date: NaiveDate,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = weekly_allocations)]
pub struct NewRoomAllocation<'a> {
    pub team_name: &'a str,
    pub room_name: &'a str,
    pub date: NaiveDate,
}

impl<'a> From<&'a Assignment> for NewRoomAllocation<'a> {
    fn from(assignment: &'a Assignment) -> Self {
        Self {
            team_name: &assignment.requester,
            room_name: &assignment.resource,
            date: assignment.date,
        }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = oasis_allocations)]
pub struct NewOasisAllocation<'a> {
    pub person_name: &'a str,
    pub date: NaiveDate,
}

impl<'a> From<&'a Assignment> for NewOasisAllocation<'a> {
    fn from(assignment: &'a Assignment) -> Self {
        Self {
            person_name: &assignment.requester,
            date: assignment.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_day_slots_are_dropped() {
        let submitted = NaiveDate::from_ymd_opt(2024, 2, 27)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let submission = DeskSubmission::from(DeskPreferenceRow {
            person_name: "Alice".to_owned(),
            preferred_day_1: Some("Tuesday".to_owned()),
            preferred_day_2: None,
            preferred_day_3: Some(String::new()),
            preferred_day_4: Some("Friday".to_owned()),
            preferred_day_5: None,
            submission_time: Some(submitted),
        });
        assert_eq!(submission.preferred_days, vec!["Tuesday", "Friday"]);
        assert_eq!(submission.submitted_at, Some(submitted));
    }
}
