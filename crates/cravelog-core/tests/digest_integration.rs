//! End-to-end digest flow: events in, pageable weeks, per-week digests and
//! the unlock gate backed by a real database.

use chrono::{DateTime, Duration, TimeZone, Utc};
use cravelog_core::digest::{
    AvailabilityState, DigestModelBuilder, DigestUnlockHandler, DigestWeekBuilder, UnlockClock,
    UnlockSchedule, DIGEST_THREAD_ID, NO_EVENTS_NAME,
};
use cravelog_core::events::{LoggedEvent, Outcome};
use cravelog_core::notify::MemoryNotificationCenter;
use cravelog_core::storage::{Database, FlagStore, MemoryFlagStore};
use cravelog_core::ZonedCalendar;

// ============================================================================
// Test Helpers
// ============================================================================

/// Wednesday afternoon; the current week starts Monday 2024-03-11.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 13, 15, 0, 0).unwrap()
}

fn week_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
}

fn resisted(at: DateTime<Utc>, name: &str) -> LoggedEvent {
    LoggedEvent::new(at, name, Outcome::Resisted)
}

fn succumbed(at: DateTime<Utc>, name: &str) -> LoggedEvent {
    LoggedEvent::new(at, name, Outcome::Succumbed)
}

/// One resisted event on the Tuesday of each of the last `weeks` weeks.
fn weekly_events(weeks: i64) -> Vec<LoggedEvent> {
    (0..weeks)
        .map(|w| resisted(week_start() + Duration::days(1) - Duration::weeks(w), "Chips"))
        .collect()
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_empty_history() {
    let builder = DigestModelBuilder::new(&[], now());
    let digest = builder.digest(0);
    assert_eq!(digest.events_logged, 0);
    assert_eq!(digest.most_common_name, NO_EVENTS_NAME);
    assert_eq!(digest.streak_length, 0);
    assert!(!digest.has_events());

    assert_eq!(DigestWeekBuilder::new(&[], now()).available_offsets(), vec![1, 0]);
}

#[test]
fn test_weekly_counts_and_most_common() {
    let events = vec![
        resisted(week_start() + Duration::hours(9), "Chips"),
        succumbed(week_start() + Duration::hours(20), "Chips"),
        resisted(week_start() + Duration::days(1), "Soda"),
        resisted(week_start() - Duration::days(2), "Candy"),
    ];
    let digest = DigestModelBuilder::new(&events, now()).digest(0);
    assert_eq!(digest.week_start, week_start());
    assert_eq!(digest.week_end, week_start() + Duration::weeks(1));
    assert_eq!(digest.events_logged, 3);
    assert_eq!(digest.resisted_count, 2);
    assert_eq!(digest.succumbed_count, 1);
    assert_eq!(digest.most_common_name, "Chips");
    assert_eq!(digest.streak_length, 2);
}

#[test]
fn test_streak_counts_consecutive_weeks() {
    let events = weekly_events(5);
    assert_eq!(DigestModelBuilder::new(&events, now()).digest(0).streak_length, 5);
}

#[test]
fn test_empty_week_caps_streak() {
    let gap_start = week_start() - Duration::weeks(2);
    let gap_end = week_start() - Duration::weeks(1);
    let events: Vec<LoggedEvent> = weekly_events(6)
        .into_iter()
        .filter(|e| !(gap_start <= e.timestamp && e.timestamp < gap_end))
        .collect();
    let builder = DigestModelBuilder::new(&events, now());
    assert_eq!(builder.digest(0).streak_length, 2);
    assert_eq!(builder.digest(2).streak_length, 0);
    assert_eq!(builder.digest(3).streak_length, 3);
}

#[test]
fn test_week_end_boundary() {
    let week_end = week_start() + Duration::weeks(1);
    let events = vec![
        resisted(week_end - Duration::seconds(1), "Late"),
        resisted(week_end, "Next"),
    ];
    let later = week_end + Duration::days(2);
    let builder = DigestModelBuilder::new(&events, later);
    let previous = builder.digest(1);
    assert_eq!(previous.week_start, week_start());
    assert_eq!(previous.events_logged, 1);
    assert_eq!(previous.most_common_name, "Late");

    let current = builder.digest(0);
    assert_eq!(current.events_logged, 1);
    assert_eq!(current.most_common_name, "Next");
}

#[test]
fn test_digest_is_deterministic() {
    let events = weekly_events(3);
    let first = DigestModelBuilder::new(&events, now()).digest(0);
    let second = DigestModelBuilder::new(&events, now()).digest(0);
    assert_eq!(first, second);
    assert_eq!(first.tip, second.tip);
    assert_eq!(first.title, second.title);

    // A later `now` in the same week renders the same digest.
    let friday = now() + Duration::days(2);
    assert_eq!(DigestModelBuilder::new(&events, friday).digest(0), first);
}

#[test]
fn test_pager_lists_every_week_since_first_event() {
    let events = vec![
        resisted(week_start() - Duration::weeks(4) + Duration::hours(30), "Chips"),
        succumbed(week_start() + Duration::hours(10), "Soda"),
    ];
    let offsets = DigestWeekBuilder::new(&events, now()).available_offsets();
    assert_eq!(offsets, vec![4, 3, 2, 1, 0]);

    let digests = DigestModelBuilder::new(&events, now()).digests(&offsets);
    let counts: Vec<u32> = digests.iter().map(|d| d.events_logged).collect();
    assert_eq!(counts, vec![1, 0, 0, 0, 1]);
    assert!(digests.windows(2).all(|w| w[0].week_start < w[1].week_start));
}

#[test]
fn test_pager_with_only_current_week() {
    let events = vec![resisted(now(), "Chips")];
    assert_eq!(DigestWeekBuilder::new(&events, now()).available_offsets(), vec![0]);
}

// ============================================================================
// Unlock gate
// ============================================================================

#[test]
fn test_unlock_flow_persists_in_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cravelog.db");
    let events = weekly_events(2);
    let digest = DigestModelBuilder::new(&events, now()).digest(0);

    let monday_morning = UnlockClock::at(week_start() + Duration::hours(9));
    let monday_lunch = UnlockClock::at(week_start() + Duration::hours(13));

    {
        let mut db = Database::open_at(&path).unwrap();
        let mut center = MemoryNotificationCenter::new();
        let mut handler = DigestUnlockHandler::new(
            &mut db,
            &mut center,
            ZonedCalendar::utc(),
            UnlockSchedule::default(),
        );
        assert_eq!(handler.availability_state(&digest, monday_morning), AvailabilityState::Locked);
        assert_eq!(handler.availability_state(&digest, monday_lunch), AvailabilityState::Unlockable);

        handler.mark_unlocked(&digest).unwrap();
        handler.mark_unlocked(&digest).unwrap();
        assert_eq!(handler.availability_state(&digest, monday_lunch), AvailabilityState::Unlocked);
    }

    let mut db = Database::open_at(&path).unwrap();
    assert!(db.flag("digest_unlocked_2024-03-11").unwrap());
    let handler = DigestUnlockHandler::new(
        &mut db,
        MemoryNotificationCenter::new(),
        ZonedCalendar::utc(),
        UnlockSchedule::default(),
    );
    assert_eq!(handler.availability_state(&digest, monday_lunch), AvailabilityState::Unlocked);
}

#[test]
fn test_non_current_weeks_ignore_the_flag() {
    let events = weekly_events(3);
    let builder = DigestModelBuilder::new(&events, now());
    let handler = DigestUnlockHandler::new(
        MemoryFlagStore::new(),
        MemoryNotificationCenter::new(),
        ZonedCalendar::utc(),
        UnlockSchedule::new(chrono::Weekday::Sun, 23, 0).unwrap(),
    );
    let clock = UnlockClock::at(now());
    assert_eq!(handler.availability_state(&builder.digest(0), clock), AvailabilityState::Locked);
    assert_eq!(handler.availability_state(&builder.digest(1), clock), AvailabilityState::Unlocked);
    assert_eq!(handler.availability_state(&builder.digest(2), clock), AvailabilityState::Unlocked);
}

#[test]
fn test_nudge_and_notification_cleanup() {
    let digest = DigestModelBuilder::new(&[], now()).digest(0);
    let mut center = MemoryNotificationCenter::new();
    center.deliver("digest-2024-11", DIGEST_THREAD_ID, "Your weekly digest is ready");
    center.deliver("reminder-1", "reminders", "How was lunch?");

    let mut handler = DigestUnlockHandler::new(
        MemoryFlagStore::new(),
        center,
        ZonedCalendar::utc(),
        UnlockSchedule::default(),
    );
    let clock = UnlockClock::at(now());
    assert!(handler.should_nudge(&digest, clock));
    handler.mark_nudge_sent(&digest).unwrap();
    assert!(!handler.should_nudge(&digest, clock));

    handler.clear_delivered_notifications();
    assert_eq!(handler.notifications().all().len(), 1);
    assert_eq!(handler.notifications().all()[0].thread_id, "reminders");
    assert!(handler.store().flag("digest_nudge_sent_2024-03-11").unwrap());
    assert!(!handler.store().flag("digest_unlocked_2024-03-11").unwrap());
}

#[test]
fn test_override_unlock_time_for_testing() {
    let digest = DigestModelBuilder::new(&[], now()).digest(0);
    let handler = DigestUnlockHandler::new(
        MemoryFlagStore::new(),
        MemoryNotificationCenter::new(),
        ZonedCalendar::utc(),
        UnlockSchedule::default(),
    );
    let clock = UnlockClock::at(now()).with_override(now() + Duration::minutes(5));
    assert_eq!(handler.availability_state(&digest, clock), AvailabilityState::Locked);
    assert_eq!(handler.unlock_message(&digest, clock), "Check back on Wednesday at 3:05 PM");
}
