//! Tests for the calendar widget feed against a populated store.

use chrono::{NaiveDate, NaiveDateTime};

use bookline::backend::MemoryBackend;
use bookline::error::ScheduleError;
use bookline::feed::{self, FeedAction};
use bookline::model::{Interval, ScheduledItem, ServiceEntry};
use bookline::service::Scheduler;

fn instant(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn slot(start_h: u32, end_h: u32) -> Interval {
    Interval::new(instant(start_h, 0), instant(end_h, 0)).unwrap()
}

#[tokio::test]
async fn test_feed_flattens_appointments_and_blockers() {
    let scheduler = Scheduler::new(MemoryBackend::new());
    let appointment = scheduler
        .create(
            ScheduledItem::appointment("Akinyi", slot(10, 11))
                .with_owner("jane")
                .with_services(vec![ServiceEntry::new("Cut")]),
        )
        .await
        .unwrap();
    let blocker = scheduler
        .create(
            ScheduledItem::blocker(slot(12, 13))
                .with_owner("jane")
                .with_reason("Lunch"),
        )
        .await
        .unwrap();

    let entries = feed::feed(&scheduler.items().await);
    assert_eq!(entries.len(), 2);

    let booking = entries.iter().find(|e| e.id == appointment.id).unwrap();
    assert_eq!(booking.title, "Akinyi - Cut");
    assert_eq!(booking.start, instant(10, 0));

    let blocked = entries
        .iter()
        .find(|e| e.id == format!("blocker-{}", blocker.id))
        .unwrap();
    assert_eq!(blocked.title, "Lunch");
    assert_eq!(blocked.background_color, "#6c757d");
}

#[tokio::test]
async fn test_widget_drop_commits_through_the_conflict_gate() {
    let scheduler = Scheduler::new(MemoryBackend::new());
    scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(10, 11)).with_owner("jane"))
        .await
        .unwrap();
    let dragged = scheduler
        .create(ScheduledItem::appointment("Brigid", slot(14, 15)).with_owner("jane"))
        .await
        .unwrap();

    // Dropping onto the occupied slot is refused; nothing moves.
    let err = feed::apply_action(
        &scheduler,
        FeedAction::Move {
            id: dragged.id.clone(),
            new_start: instant(10, 30),
            new_end: instant(11, 30),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ScheduleError::Conflict { .. }));
    assert_eq!(
        scheduler.item(&dragged.id).await.unwrap().interval,
        slot(14, 15)
    );

    // A free slot commits and the feed reflects it.
    feed::apply_action(
        &scheduler,
        FeedAction::Move {
            id: dragged.id.clone(),
            new_start: instant(16, 0),
            new_end: instant(17, 0),
        },
    )
    .await
    .unwrap();
    let entries = feed::feed(&scheduler.items().await);
    let entry = entries.iter().find(|e| e.id == dragged.id).unwrap();
    assert_eq!(entry.start, instant(16, 0));
}

#[test]
fn test_actions_parse_from_widget_json() {
    let action: FeedAction = serde_json::from_str(
        r#"{"action":"move","id":"blocker-7","new_start":"2026-03-02T10:00:00","new_end":"2026-03-02T11:00:00"}"#,
    )
    .unwrap();
    match action {
        FeedAction::Move { id, new_start, .. } => {
            assert_eq!(id, "blocker-7");
            assert_eq!(new_start, instant(10, 0));
        }
        other => panic!("expected move, got {other:?}"),
    }

    let action: FeedAction = serde_json::from_str(
        r#"{"action":"resize","id":"12","new_end":"2026-03-02T11:30:00"}"#,
    )
    .unwrap();
    assert!(matches!(action, FeedAction::Resize { .. }));
}
