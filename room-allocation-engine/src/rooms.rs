use core::cmp::Reverse;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::outcome::{AllocationOutcome, Diagnostic};
use crate::preference::{admit, Category, RoomRequest, RoomSubmission};
use crate::resource::Room;
use crate::week::{DayPair, Week};

/// Assigns every team a room on both days of its day pair.
///
/// Teams of the same day pair are shuffled with `rng` and then walk a list of
/// rooms ordered by descending capacity, taking the first one that fits. A
/// room taken for one pair stays free for the other pair. Teams no room fits
/// are reported and get nothing.
#[instrument(skip_all, fields(%week, submissions = submissions.len()))]
pub fn allocate_rooms<R: Rng + ?Sized>(
    submissions: &[RoomSubmission],
    rooms: &[Room],
    week: Week,
    rng: &mut R,
) -> AllocationOutcome {
    let mut outcome = AllocationOutcome::new(Category::Rooms, week);
    let requests = admit(submissions, &mut outcome);
    outcome.considered = requests.len();

    // stable, so rooms of equal capacity keep their catalog order
    let by_capacity: Vec<&Room> = rooms
        .iter()
        .sorted_by_key(|room| Reverse(room.capacity))
        .collect();
    let mut buckets = requests
        .into_iter()
        .into_group_map_by(|request| request.day_pair);

    for day_pair in DayPair::ALL {
        let mut bucket: Vec<RoomRequest> = buckets.remove(&day_pair).unwrap_or_default();
        bucket.shuffle(rng);
        debug!(%day_pair, teams = bucket.len(), rooms = by_capacity.len(), "allocating day pair");

        let mut free = by_capacity.clone();
        for request in bucket {
            let Some(index) = free
                .iter()
                .position(|room| room.capacity >= request.team_size)
            else {
                warn!(team = %request.team, size = request.team_size, %day_pair, "no room available");
                outcome.diagnostics.push(Diagnostic::NoRoomAvailable {
                    team: request.team,
                    team_size: request.team_size,
                    day_pair,
                });
                continue;
            };
            let room = free.remove(index);
            for date in day_pair.dates(week) {
                outcome.assign(&request.team, &room.name, date);
            }
        }
    }
    outcome
}
