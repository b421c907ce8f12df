use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::outcome::{AllocationOutcome, Diagnostic};
use crate::preference::{admit, Category, DeskRequest, DeskSubmission};
use crate::resource::DeskPool;
use crate::week::Week;

/// Fills the desk pool day by day.
///
/// Every weekday gets its own shuffle of the people who asked for it, so a
/// lucky draw on one day says nothing about the next. Up to `capacity`
/// people are taken per day.
#[instrument(skip_all, fields(%week, submissions = submissions.len()))]
pub fn allocate_desks<R: Rng + ?Sized>(
    submissions: &[DeskSubmission],
    pool: &DeskPool,
    week: Week,
    rng: &mut R,
) -> AllocationOutcome {
    let mut outcome = AllocationOutcome::new(Category::Oasis, week);
    let requests = admit(submissions, &mut outcome);
    outcome.considered = requests.len();
    let capacity = usize::try_from(pool.capacity).unwrap_or(usize::MAX);

    for (weekday, date) in week.workdays() {
        let mut candidates: Vec<&DeskRequest> = requests
            .iter()
            .filter(|request| request.days.contains(&weekday))
            .collect();
        candidates.shuffle(rng);
        debug!(%weekday, %date, requested = candidates.len(), capacity, "allocating desks");

        if candidates.len() > capacity {
            warn!(%weekday, %date, turned_away = candidates.len() - capacity, "desk pool full");
            outcome.diagnostics.push(Diagnostic::DeskPoolFull {
                pool: pool.name.clone(),
                date,
                requested: candidates.len(),
                capacity: pool.capacity,
            });
        }
        for request in candidates.into_iter().take(capacity) {
            outcome.assign(&request.person, &pool.name, date);
        }
    }
    outcome
}
