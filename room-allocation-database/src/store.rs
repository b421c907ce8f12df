use async_trait::async_trait;
use room_allocation_engine::{Assignment, Category, DeskSubmission, RoomSubmission, Week};

use crate::error::DatabaseError;

/// Key of the admin setting naming the week preferences are collected for.
pub const CURRENT_WEEK_KEY: &str = "current_week_monday";

/// Read access to the submitted preferences of a week.
#[async_trait]
pub trait PreferenceReader: Send + Sync {
    async fn room_preferences(&self, week: Week) -> Result<Vec<RoomSubmission>, DatabaseError>;

    async fn desk_preferences(&self, week: Week) -> Result<Vec<DeskSubmission>, DatabaseError>;

    /// The week an admin selected, `None` while no week is set.
    async fn current_week(&self) -> Result<Option<Week>, DatabaseError>;
}

/// Stores allocation results.
#[async_trait]
pub trait AllocationWriter: Send + Sync {
    /// Replaces every stored assignment of `week` and `category` with
    /// `assignments` as one atomic step and returns the number of rows
    /// written. On error the previous rows stay in place.
    async fn replace_allocations(
        &self,
        week: Week,
        category: Category,
        assignments: &[Assignment],
    ) -> Result<usize, DatabaseError>;

    async fn allocations(
        &self,
        week: Week,
        category: Category,
    ) -> Result<Vec<Assignment>, DatabaseError>;
}

/// Everything an allocation run needs from storage.
pub trait AllocationStore: PreferenceReader + AllocationWriter {}

impl<T: PreferenceReader + AllocationWriter + ?Sized> AllocationStore for T {}

/// Reads the stored `YYYY-MM-DD` value of [`CURRENT_WEEK_KEY`]. A missing or
/// blank value means no week is set.
pub fn parse_current_week(value: Option<&str>) -> Result<Option<Week>, DatabaseError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| DatabaseError::InvalidSetting {
                key: CURRENT_WEEK_KEY,
                value: value.to_owned(),
            }),
    }
}
