use core::fmt::{self, Display};

use chrono::NaiveDate;
use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use room_allocation_database::{AllocationStore, AllocationWriter, DatabaseError, PreferenceReader};
use room_allocation_engine::{
    allocate_desks, allocate_rooms, AllocationOutcome, AllocationSummary, Assignment, Category,
    ResourceCatalog, Week,
};
use serde::Serialize;
use tracing::{error, info, instrument};

/// Which categories a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Target {
    Rooms,
    Oasis,
    #[default]
    All,
}

impl Target {
    /// Categories in the order they are processed, rooms first.
    #[must_use]
    pub fn categories(self) -> &'static [Category] {
        match self {
            Self::Rooms => &[Category::Rooms],
            Self::Oasis => &[Category::Oasis],
            Self::All => &Category::ALL,
        }
    }
}

/// What happened to one category during a run.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: Category,
    pub summary: AllocationSummary,
    pub assignments: Vec<Assignment>,
    pub messages: Vec<String>,
    /// Rows stored, `None` for previews and failed categories.
    pub written: Option<usize>,
    pub error: Option<String>,
}

impl CategoryReport {
    fn from_outcome(outcome: AllocationOutcome) -> Self {
        Self {
            category: outcome.category,
            summary: outcome.summary(),
            messages: outcome.messages(),
            assignments: outcome.assignments,
            written: None,
            error: None,
        }
    }

    fn failed(category: Category, message: String) -> Self {
        Self {
            category,
            summary: AllocationSummary {
                category,
                considered: 0,
                skipped: 0,
                placed: 0,
                rows: 0,
            },
            assignments: Vec::new(),
            messages: Vec::new(),
            written: None,
            error: Some(message),
        }
    }

    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub week: Week,
    pub seed: u64,
    pub dry_run: bool,
    pub success: bool,
    pub categories: Vec<CategoryReport>,
    /// Diagnostics and failures of every category, in processing order.
    pub messages: Vec<String>,
}

impl RunReport {
    fn new(week: Week, seed: u64, dry_run: bool, categories: Vec<CategoryReport>) -> Self {
        let messages = categories
            .iter()
            .flat_map(|report| report.messages.iter().cloned().chain(report.error.clone()))
            .collect();
        Self {
            week,
            seed,
            dry_run,
            success: categories.iter().all(CategoryReport::succeeded),
            categories,
            messages,
        }
    }

    #[must_use]
    pub fn category(&self, category: Category) -> Option<&CategoryReport> {
        self.categories
            .iter()
            .find(|report| report.category == category)
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "week of {}{} (seed {}): {}",
            self.week,
            if self.dry_run { ", dry run" } else { "" },
            self.seed,
            if self.success { "ok" } else { "FAILED" }
        )?;
        for report in &self.categories {
            writeln!(f, "{}", report.summary)?;
            for assignment in &report.assignments {
                writeln!(
                    f,
                    "  {} {:<12} {}",
                    assignment.date, assignment.resource, assignment.requester
                )?;
            }
        }
        for message in &self.messages {
            writeln!(f, "! {message}")?;
        }
        Ok(())
    }
}

/// Picks the week to work on: an explicit `requested` week, then the week an
/// admin selected in the store, then the week after `today`.
pub async fn resolve_week<S: PreferenceReader + ?Sized>(
    store: &S,
    requested: Option<Week>,
    today: NaiveDate,
) -> Result<Week, DatabaseError> {
    if let Some(week) = requested {
        return Ok(week);
    }
    if let Some(week) = store.current_week().await? {
        info!(%week, "using the admin selected week");
        return Ok(week);
    }
    let week = Week::upcoming(today);
    info!(%week, "no week selected, using the upcoming week");
    Ok(week)
}

async fn allocate_category<S, R>(
    store: &S,
    catalog: &ResourceCatalog,
    week: Week,
    category: Category,
    rng: &mut R,
) -> Result<AllocationOutcome, DatabaseError>
where
    S: PreferenceReader + ?Sized,
    R: Rng + ?Sized,
{
    Ok(match category {
        Category::Rooms => {
            let submissions = store.room_preferences(week).await?;
            allocate_rooms(&submissions, catalog.rooms(), week, rng)
        }
        Category::Oasis => {
            let submissions = store.desk_preferences(week).await?;
            allocate_desks(&submissions, catalog.desk_pool(), week, rng)
        }
    })
}

fn failure(category: Category, week: Week, action: &str, error: &DatabaseError) -> CategoryReport {
    error!(%category, %week, %error, "could not {action}");
    CategoryReport::failed(
        category,
        format!("could not {action} for week {week}: {error}"),
    )
}

/// Allocates every category of `target` for `week` and replaces the stored
/// rows of each category with the result.
///
/// One `StdRng` seeded with `seed` serves the whole run. A failing category
/// marks the run failed but does not stop the remaining ones.
#[instrument(skip(store, catalog))]
pub async fn run_allocation<S: AllocationStore + ?Sized>(
    store: &S,
    catalog: &ResourceCatalog,
    week: Week,
    target: Target,
    seed: u64,
) -> RunReport {
    info!(%week, seed, "starting allocation run");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut reports = Vec::new();
    for &category in target.categories() {
        let outcome = match allocate_category(store, catalog, week, category, &mut rng).await {
            Ok(outcome) => outcome,
            Err(error) => {
                reports.push(failure(
                    category,
                    week,
                    &format!("load {category} preferences"),
                    &error,
                ));
                continue;
            }
        };
        let mut report = CategoryReport::from_outcome(outcome);
        match store
            .replace_allocations(week, category, &report.assignments)
            .await
        {
            Ok(written) => {
                info!(%category, written, "stored allocations");
                report.written = Some(written);
            }
            Err(error) => {
                let failed = failure(
                    category,
                    week,
                    &format!("store {category} allocations"),
                    &error,
                );
                report.error = failed.error;
            }
        }
        reports.push(report);
    }
    let report = RunReport::new(week, seed, false, reports);
    info!(success = report.success, messages = report.messages.len(), "finished allocation run");
    report
}

/// Same as [`run_allocation`] without writing anything.
#[instrument(skip(store, catalog))]
pub async fn preview_allocation<S: PreferenceReader + ?Sized>(
    store: &S,
    catalog: &ResourceCatalog,
    week: Week,
    target: Target,
    seed: u64,
) -> RunReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut reports = Vec::new();
    for &category in target.categories() {
        reports.push(
            match allocate_category(store, catalog, week, category, &mut rng).await {
                Ok(outcome) => CategoryReport::from_outcome(outcome),
                Err(error) => {
                    failure(category, week, &format!("load {category} preferences"), &error)
                }
            },
        );
    }
    RunReport::new(week, seed, true, reports)
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredAllocations {
    pub week: Week,
    pub category: Category,
    pub assignments: Vec<Assignment>,
}

impl Display for StoredAllocations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} for week of {}:", self.category, self.week)?;
        if self.assignments.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for assignment in &self.assignments {
            writeln!(
                f,
                "  {} {:<12} {}",
                assignment.date, assignment.resource, assignment.requester
            )?;
        }
        Ok(())
    }
}

/// Reads back what is currently stored for `week`.
#[instrument(skip(store))]
pub async fn stored_allocations<S: AllocationWriter + ?Sized>(
    store: &S,
    week: Week,
    target: Target,
) -> Result<Vec<StoredAllocations>, DatabaseError> {
    let mut stored = Vec::new();
    for &category in target.categories() {
        stored.push(StoredAllocations {
            week,
            category,
            assignments: store.allocations(week, category).await?,
        });
    }
    Ok(stored)
}
