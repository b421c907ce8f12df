use async_trait::async_trait;
use chrono::Datelike;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use room_allocation_engine::{Assignment, Category, DeskSubmission, RoomSubmission, Week};
use tracing::{debug, instrument};

use crate::error::DatabaseError;
use crate::models::{
    DeskPreferenceRow, NewOasisAllocation, NewRoomAllocation, OasisAllocationRow,
    RoomAllocationRow, RoomPreferenceRow,
};
use crate::schema::{
    admin_settings, oasis_allocations, oasis_preferences, weekly_allocations, weekly_preferences,
};
use crate::store::{parse_current_week, AllocationWriter, PreferenceReader, CURRENT_WEEK_KEY};

// https://github.com/tokio-rs/axum/tree/main/examples/diesel-async-postgres

pub type DatabasePool = Pool<AsyncPgConnection>;

pub fn get_database_connection(database_url: &str) -> Result<DatabasePool, DatabaseError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Ok(Pool::builder(config).build()?)
}

/// Upper bits of every advisory lock key taken here ("RA").
const LOCK_NAMESPACE: i64 = 0x5241 << 40;

/// Advisory lock key of one week and category, stable across processes.
#[must_use]
pub fn lock_key(week: Week, category: Category) -> i64 {
    let category = match category {
        Category::Rooms => 0,
        Category::Oasis => 1,
    };
    LOCK_NAMESPACE | (i64::from(week.monday().num_days_from_ce()) << 1) | category
}

/// Preference and allocation tables in PostgreSQL.
///
/// Oasis rows carry no resource column, they are read back under the desk
/// pool's name.
#[derive(Clone)]
pub struct PgStore {
    pool: DatabasePool,
    desk_pool: String,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: DatabasePool, desk_pool: String) -> Self {
        Self { pool, desk_pool }
    }

    pub fn connect(database_url: &str, desk_pool: String) -> Result<Self, DatabaseError> {
        Ok(Self::new(get_database_connection(database_url)?, desk_pool))
    }
}

#[async_trait]
impl PreferenceReader for PgStore {
    #[instrument(skip(self))]
    async fn room_preferences(&self, week: Week) -> Result<Vec<RoomSubmission>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let rows = weekly_preferences::table
            .filter(weekly_preferences::week_monday.eq(week.monday()))
            .order((
                weekly_preferences::submission_time.asc(),
                weekly_preferences::id.asc(),
            ))
            .select(RoomPreferenceRow::as_select())
            .load(&mut connection)
            .await?;
        debug!(rows = rows.len(), "loaded room preferences");
        Ok(rows.into_iter().map(RoomSubmission::from).collect())
    }

    #[instrument(skip(self))]
    async fn desk_preferences(&self, week: Week) -> Result<Vec<DeskSubmission>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let rows = oasis_preferences::table
            .filter(oasis_preferences::week_monday.eq(week.monday()))
            .order((
                oasis_preferences::submission_time.asc(),
                oasis_preferences::id.asc(),
            ))
            .select(DeskPreferenceRow::as_select())
            .load(&mut connection)
            .await?;
        debug!(rows = rows.len(), "loaded oasis preferences");
        Ok(rows.into_iter().map(DeskSubmission::from).collect())
    }

    #[instrument(skip(self))]
    async fn current_week(&self) -> Result<Option<Week>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let value: Option<Option<String>> = admin_settings::table
            .filter(admin_settings::setting_key.eq(CURRENT_WEEK_KEY))
            .select(admin_settings::setting_value)
            .first(&mut connection)
            .await
            .optional()?;
        parse_current_week(value.flatten().as_deref())
    }
}

#[async_trait]
impl AllocationWriter for PgStore {
    #[instrument(skip(self, assignments), fields(rows = assignments.len()))]
    async fn replace_allocations(
        &self,
        week: Week,
        category: Category,
        assignments: &[Assignment],
    ) -> Result<usize, DatabaseError> {
        let mut pooled = self.pool.get().await?;
        let connection: &mut AsyncPgConnection = &mut pooled;
        let desk_pool = self.desk_pool.as_str();
        let (monday, friday) = (week.monday(), week.friday());

        connection
            .transaction::<_, DatabaseError, _>(|connection| {
                async move {
                    // serializes concurrent runs for the same week and category
                    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
                        .bind::<BigInt, _>(lock_key(week, category))
                        .execute(connection)
                        .await?;

                    let (removed, written) = match category {
                        Category::Rooms => {
                            let removed = diesel::delete(
                                weekly_allocations::table
                                    .filter(weekly_allocations::date.between(monday, friday))
                                    .filter(weekly_allocations::room_name.ne(desk_pool)),
                            )
                            .execute(connection)
                            .await?;
                            let rows: Vec<NewRoomAllocation<'_>> =
                                assignments.iter().map(NewRoomAllocation::from).collect();
                            let written = if rows.is_empty() {
                                0
                            } else {
                                diesel::insert_into(weekly_allocations::table)
                                    .values(&rows)
                                    .execute(connection)
                                    .await?
                            };
                            (removed, written)
                        }
                        Category::Oasis => {
                            let removed = diesel::delete(
                                oasis_allocations::table
                                    .filter(oasis_allocations::date.between(monday, friday)),
                            )
                            .execute(connection)
                            .await?;
                            let rows: Vec<NewOasisAllocation<'_>> =
                                assignments.iter().map(NewOasisAllocation::from).collect();
                            let written = if rows.is_empty() {
                                0
                            } else {
                                diesel::insert_into(oasis_allocations::table)
                                    .values(&rows)
                                    .execute(connection)
                                    .await?
                            };
                            (removed, written)
                        }
                    };
                    debug!(removed, written, "replaced allocations");
                    Ok(written)
                }
                .scope_boxed()
            })
            .await
    }

    #[instrument(skip(self))]
    async fn allocations(
        &self,
        week: Week,
        category: Category,
    ) -> Result<Vec<Assignment>, DatabaseError> {
        let mut connection = self.pool.get().await?;
        let (monday, friday) = (week.monday(), week.friday());
        match category {
            Category::Rooms => Ok(weekly_allocations::table
                .filter(weekly_allocations::date.between(monday, friday))
                .filter(weekly_allocations::room_name.ne(self.desk_pool.as_str()))
                .order((weekly_allocations::date.asc(), weekly_allocations::room_name.asc()))
                .select(RoomAllocationRow::as_select())
                .load(&mut connection)
                .await?
                .into_iter()
                .map(Assignment::from)
                .collect()),
            Category::Oasis => Ok(oasis_allocations::table
                .filter(oasis_allocations::date.between(monday, friday))
                .order((oasis_allocations::date.asc(), oasis_allocations::person_name.asc()))
                .select(OasisAllocationRow::as_select())
                .load(&mut connection)
                .await?
                .into_iter()
                .map(|row| Assignment {
                    requester: row.person_name,
                    resource: self.desk_pool.clone(),
                    date: row.date,
                })
                .collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn lock_keys_are_distinct_per_week_and_category() {
        let week = Week::new(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()).unwrap();
        let later = Week::new(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()).unwrap();
        let keys = [
            lock_key(week, Category::Rooms),
            lock_key(week, Category::Oasis),
            lock_key(later, Category::Rooms),
            lock_key(later, Category::Oasis),
        ];
        for (index, key) in keys.iter().enumerate() {
            assert!(!keys[index + 1..].contains(key));
            assert_eq!(key >> 40, 0x5241);
        }
        assert_eq!(lock_key(week, Category::Oasis), lock_key(week, Category::Oasis));
    }
}
