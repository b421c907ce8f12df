use std::collections::BTreeMap;

use async_trait::async_trait;
use room_allocation_engine::{Assignment, Category, DeskSubmission, RoomSubmission, Week};
use tokio::sync::Mutex;

use crate::error::DatabaseError;
use crate::store::{AllocationWriter, PreferenceReader};

#[derive(Default)]
struct State {
    room_preferences: BTreeMap<Week, Vec<RoomSubmission>>,
    desk_preferences: BTreeMap<Week, Vec<DeskSubmission>>,
    allocations: BTreeMap<(Week, Category), Vec<Assignment>>,
    current_week: Option<Week>,
    read_failure: Option<String>,
    write_failure: Option<String>,
}

/// A store that keeps everything in memory, for dry runs and tests.
///
/// Each replace happens under a single lock acquisition, so concurrent runs
/// never interleave.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_room_preference(&self, week: Week, submission: RoomSubmission) {
        self.state
            .lock()
            .await
            .room_preferences
            .entry(week)
            .or_default()
            .push(submission);
    }

    pub async fn add_desk_preference(&self, week: Week, submission: DeskSubmission) {
        self.state
            .lock()
            .await
            .desk_preferences
            .entry(week)
            .or_default()
            .push(submission);
    }

    pub async fn set_current_week(&self, week: Option<Week>) {
        self.state.lock().await.current_week = week;
    }

    /// Makes every following read fail with `reason`, `None` heals the store.
    pub async fn fail_reads(&self, reason: Option<String>) {
        self.state.lock().await.read_failure = reason;
    }

    /// Makes every following write fail with `reason`, `None` heals the store.
    pub async fn fail_writes(&self, reason: Option<String>) {
        self.state.lock().await.write_failure = reason;
    }
}

impl State {
    fn readable(&self) -> Result<(), DatabaseError> {
        self.read_failure
            .as_ref()
            .map_or(Ok(()), |reason| Err(DatabaseError::Unavailable(reason.clone())))
    }
}

#[async_trait]
impl PreferenceReader for MemoryStore {
    async fn room_preferences(&self, week: Week) -> Result<Vec<RoomSubmission>, DatabaseError> {
        let state = self.state.lock().await;
        state.readable()?;
        Ok(state
            .room_preferences
            .get(&week)
            .cloned()
            .unwrap_or_default())
    }

    async fn desk_preferences(&self, week: Week) -> Result<Vec<DeskSubmission>, DatabaseError> {
        let state = self.state.lock().await;
        state.readable()?;
        Ok(state
            .desk_preferences
            .get(&week)
            .cloned()
            .unwrap_or_default())
    }

    async fn current_week(&self) -> Result<Option<Week>, DatabaseError> {
        let state = self.state.lock().await;
        state.readable()?;
        Ok(state.current_week)
    }
}

#[async_trait]
impl AllocationWriter for MemoryStore {
    async fn replace_allocations(
        &self,
        week: Week,
        category: Category,
        assignments: &[Assignment],
    ) -> Result<usize, DatabaseError> {
        let mut state = self.state.lock().await;
        if let Some(reason) = &state.write_failure {
            return Err(DatabaseError::Unavailable(reason.clone()));
        }
        state
            .allocations
            .insert((week, category), assignments.to_vec());
        Ok(assignments.len())
    }

    async fn allocations(
        &self,
        week: Week,
        category: Category,
    ) -> Result<Vec<Assignment>, DatabaseError> {
        let state = self.state.lock().await;
        state.readable()?;
        Ok(state
            .allocations
            .get(&(week, category))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn week() -> Week {
        Week::new(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()).unwrap()
    }

    fn assignment(requester: &str, day: u32) -> Assignment {
        Assignment {
            requester: requester.to_owned(),
            resource: "Falcon".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn replace_drops_previous_rows() {
        let store = MemoryStore::new();
        store
            .replace_allocations(
                week(),
                Category::Rooms,
                &[assignment("A", 4), assignment("A", 6)],
            )
            .await
            .unwrap();
        let written = store
            .replace_allocations(week(), Category::Rooms, &[assignment("B", 5)])
            .await
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(
            store.allocations(week(), Category::Rooms).await.unwrap(),
            vec![assignment("B", 5)]
        );
        assert!(store
            .allocations(week(), Category::Oasis)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn failed_write_keeps_previous_rows() {
        let store = MemoryStore::new();
        store
            .replace_allocations(week(), Category::Rooms, &[assignment("A", 4)])
            .await
            .unwrap();
        store.fail_writes(Some("disk full".to_owned())).await;
        let error = store
            .replace_allocations(week(), Category::Rooms, &[])
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Store unavailable: disk full");
        assert_eq!(
            store.allocations(week(), Category::Rooms).await.unwrap(),
            vec![assignment("A", 4)]
        );
    }

    #[tokio::test]
    async fn preferences_are_scoped_by_week() {
        let store = MemoryStore::new();
        let submitted = NaiveDate::from_ymd_opt(2024, 2, 28)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        store
            .add_desk_preference(
                week(),
                DeskSubmission {
                    person_name: "Alice".to_owned(),
                    preferred_days: vec!["Monday".to_owned()],
                    submitted_at: Some(submitted),
                },
            )
            .await;
        assert_eq!(store.desk_preferences(week()).await.unwrap().len(), 1);
        let later = Week::new(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()).unwrap();
        assert!(store
            .desk_preferences(later)
            .await
            .unwrap()
            .is_empty());
        assert!(store.room_preferences(week()).await.unwrap().is_empty());

        store.fail_reads(Some("offline".to_owned())).await;
        assert!(store.desk_preferences(week()).await.is_err());
    }

    #[tokio::test]
    async fn current_week_is_unset_until_an_admin_picks_one() {
        let store = MemoryStore::new();
        assert_eq!(store.current_week().await.unwrap(), None);
        store.set_current_week(Some(week())).await;
        assert_eq!(store.current_week().await.unwrap(), Some(week()));
        store.set_current_week(None).await;
        assert_eq!(store.current_week().await.unwrap(), None);
    }
}
