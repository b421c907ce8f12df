use chrono::{NaiveDate, NaiveDateTime};
use room_allocation_backend::{
    preview_allocation, resolve_week, run_allocation, stored_allocations, RunReport, Target,
};
use room_allocation_database::{AllocationWriter, MemoryStore};
use room_allocation_engine::{
    Assignment, Category, DeskPool, DeskSubmission, ResourceCatalog, Room, RoomSubmission, Week,
};

fn week() -> Week {
    Week::new(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()).unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn submitted(minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 28)
        .unwrap()
        .and_hms_opt(10, minute, 0)
        .unwrap()
}

fn catalog(desk_capacity: u32) -> ResourceCatalog {
    ResourceCatalog::new(
        vec![
            Room {
                name: "Falcon".to_owned(),
                capacity: 4,
            },
            Room {
                name: "Eagle".to_owned(),
                capacity: 2,
            },
        ],
        DeskPool {
            name: "Oasis".to_owned(),
            capacity: desk_capacity,
        },
    )
    .unwrap()
}

fn team(name: &str, size: i32, days: &str, minute: u32) -> RoomSubmission {
    RoomSubmission {
        team_name: name.to_owned(),
        contact_person: Some(format!("{name} lead")),
        team_size: Some(size),
        preferred_days: Some(days.to_owned()),
        submitted_at: Some(submitted(minute)),
    }
}

fn person(name: &str, days: &[&str], minute: u32) -> DeskSubmission {
    DeskSubmission {
        person_name: name.to_owned(),
        preferred_days: days.iter().map(|&day| day.to_owned()).collect(),
        submitted_at: Some(submitted(minute)),
    }
}

async fn office() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .add_room_preference(week(), team("TeamA", 3, "Monday,Wednesday", 1))
        .await;
    store
        .add_room_preference(week(), team("TeamB", 5, "Monday,Wednesday", 2))
        .await;
    store
        .add_room_preference(week(), team("TeamC", 2, "Tuesday,Thursday", 3))
        .await;
    store
        .add_desk_preference(week(), person("Alice", &["Monday", "Tuesday"], 4))
        .await;
    store
        .add_desk_preference(week(), person("Bob", &["Monday"], 5))
        .await;
    store
        .add_desk_preference(week(), person("Carol", &["Monday"], 6))
        .await;
    store
}

fn on(report: &RunReport, category: Category, day: u32) -> Vec<String> {
    let mut requesters: Vec<String> = report
        .category(category)
        .unwrap()
        .assignments
        .iter()
        .filter(|assignment| assignment.date == date(day))
        .map(|assignment| assignment.requester.clone())
        .collect();
    requesters.sort();
    requesters
}

#[tokio::test]
async fn no_preferences_is_a_quiet_success() {
    let store = MemoryStore::new();
    let report = run_allocation(&store, &catalog(15), week(), Target::All, 7).await;

    assert!(report.success);
    assert!(report.messages.is_empty());
    assert_eq!(report.categories.len(), 2);
    for category in &report.categories {
        assert_eq!(category.written, Some(0));
        assert!(category.assignments.is_empty());
    }
    for stored in stored_allocations(&store, week(), Target::All).await.unwrap() {
        assert!(stored.assignments.is_empty());
    }
}

#[tokio::test]
async fn allocates_rooms_and_desks_for_the_week() {
    let store = office().await;
    let report = run_allocation(&store, &catalog(2), week(), Target::All, 42).await;

    assert!(report.success);
    let rooms = report.category(Category::Rooms).unwrap();
    let falcon: Vec<&Assignment> = rooms
        .assignments
        .iter()
        .filter(|assignment| assignment.requester == "TeamA")
        .collect();
    assert_eq!(falcon.len(), 2);
    assert!(falcon.iter().all(|assignment| assignment.resource == "Falcon"));
    assert_eq!(
        falcon.iter().map(|assignment| assignment.date).collect::<Vec<_>>(),
        vec![date(4), date(6)]
    );
    assert!(rooms
        .assignments
        .iter()
        .all(|assignment| assignment.requester != "TeamB"));
    // the Tuesday/Thursday pair has every room to itself
    assert_eq!(on(&report, Category::Rooms, 5), vec!["TeamC"]);
    assert_eq!(on(&report, Category::Rooms, 7), vec!["TeamC"]);
    assert_eq!(rooms.written, Some(6));

    assert_eq!(on(&report, Category::Oasis, 4).len(), 2);
    assert_eq!(on(&report, Category::Oasis, 5), vec!["Alice"]);
    assert!(on(&report, Category::Oasis, 6).is_empty());

    assert_eq!(
        report.messages,
        vec![
            "no room available for team TeamB (5 people) on Monday and Wednesday".to_owned(),
            "Oasis is full on Monday 2024-03-04: 1 of 3 people turned away (capacity 2)"
                .to_owned(),
        ]
    );
}

#[tokio::test]
async fn a_run_replaces_every_previous_row() {
    let store = office().await;
    let stale = Assignment {
        requester: "Ghost team".to_owned(),
        resource: "Eagle".to_owned(),
        date: date(8),
    };
    store
        .replace_allocations(week(), Category::Rooms, &[stale.clone()])
        .await
        .unwrap();

    let report = run_allocation(&store, &catalog(2), week(), Target::Rooms, 3).await;
    assert!(report.success);
    assert_eq!(report.categories.len(), 1);

    let stored = store.allocations(week(), Category::Rooms).await.unwrap();
    assert!(!stored.contains(&stale));
    assert_eq!(stored, report.categories[0].assignments);
    assert!(store
        .allocations(week(), Category::Oasis)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn the_same_seed_reproduces_the_run() {
    let first = run_allocation(&office().await, &catalog(2), week(), Target::All, 99).await;
    let second = run_allocation(&office().await, &catalog(2), week(), Target::All, 99).await;

    for category in Category::ALL {
        assert_eq!(
            first.category(category).unwrap().assignments,
            second.category(category).unwrap().assignments
        );
    }
    assert_eq!(first.messages, second.messages);
}

#[tokio::test]
async fn a_failed_write_keeps_the_previous_rows() {
    let store = office().await;
    let first = run_allocation(&store, &catalog(2), week(), Target::All, 1).await;
    assert!(first.success);

    store.fail_writes(Some("disk full".to_owned())).await;
    let second = run_allocation(&store, &catalog(2), week(), Target::All, 2).await;

    assert!(!second.success);
    // both categories are still attempted
    assert_eq!(second.categories.len(), 2);
    for category in ["rooms", "oasis"] {
        let message = format!(
            "could not store {category} allocations for week 2024-03-04: Store unavailable: disk \
             full"
        );
        assert!(second.messages.contains(&message), "{:?}", second.messages);
    }
    for category in Category::ALL {
        assert_eq!(second.category(category).unwrap().written, None);
        assert_eq!(
            store.allocations(week(), category).await.unwrap(),
            first.category(category).unwrap().assignments
        );
    }
}

#[tokio::test]
async fn a_failed_read_reports_the_category() {
    let store = office().await;
    store.fail_reads(Some("connection refused".to_owned())).await;
    let report = run_allocation(&store, &catalog(2), week(), Target::Oasis, 1).await;

    assert!(!report.success);
    assert_eq!(
        report.messages,
        vec![
            "could not load oasis preferences for week 2024-03-04: Store unavailable: \
             connection refused"
                .to_owned()
        ]
    );
}

#[tokio::test]
async fn a_preview_writes_nothing() {
    let store = office().await;
    let preview = preview_allocation(&store, &catalog(2), week(), Target::All, 5).await;

    assert!(preview.dry_run);
    assert!(preview.success);
    for category in Category::ALL {
        assert_eq!(preview.category(category).unwrap().written, None);
        assert!(store
            .allocations(week(), category)
            .await
            .unwrap()
            .is_empty());
    }

    let run = run_allocation(&store, &catalog(2), week(), Target::All, 5).await;
    for category in Category::ALL {
        assert_eq!(
            preview.category(category).unwrap().assignments,
            run.category(category).unwrap().assignments
        );
    }
}

#[tokio::test]
async fn an_untimed_submission_is_skipped() {
    let store = MemoryStore::new();
    let mut untimed = team("TeamA", 3, "Monday,Wednesday", 1);
    untimed.submitted_at = None;
    store.add_room_preference(week(), untimed).await;
    store
        .add_room_preference(week(), team("TeamC", 2, "Tuesday,Thursday", 3))
        .await;

    let report = run_allocation(&store, &catalog(2), week(), Target::Rooms, 11).await;
    assert!(report.success);
    assert_eq!(on(&report, Category::Rooms, 4), Vec::<String>::new());
    assert_eq!(on(&report, Category::Rooms, 5), vec!["TeamC"]);
    assert_eq!(
        report.messages,
        vec!["skipped rooms preference from TeamA: missing required field `submission_time`"
            .to_owned()]
    );
}

#[tokio::test]
async fn the_admin_selected_week_is_the_default() {
    let store = MemoryStore::new();
    let today = date(6);
    let selected = Week::new(date(18)).unwrap();

    assert_eq!(
        resolve_week(&store, None, today).await.unwrap(),
        Week::new(date(11)).unwrap()
    );

    store.set_current_week(Some(selected)).await;
    assert_eq!(resolve_week(&store, None, today).await.unwrap(), selected);
    assert_eq!(
        resolve_week(&store, Some(week()), today).await.unwrap(),
        week()
    );

    store.fail_reads(Some("offline".to_owned())).await;
    assert!(resolve_week(&store, None, today).await.is_err());
}
