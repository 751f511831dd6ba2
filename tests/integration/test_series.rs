//! Tests for recurring series through the mutation service:
//! partial-success creation and detach-on-delete.

use chrono::{NaiveDate, NaiveDateTime};

use bookline::backend::MemoryBackend;
use bookline::model::{
    Interval, RecurrencePattern, ScheduledItem, SeriesTemplate, ServiceEntry,
};
use bookline::service::Scheduler;

fn instant(month: u32, day: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, month, day)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn scheduler() -> Scheduler<MemoryBackend> {
    Scheduler::new(MemoryBackend::new())
}

#[tokio::test]
async fn test_series_creation_commits_clear_occurrences_and_skips_the_rest() {
    let scheduler = scheduler();

    // Pre-existing booking colliding with the second weekly occurrence.
    scheduler
        .create(
            ScheduledItem::appointment(
                "Walk-in",
                Interval::new(instant(3, 9, 10), instant(3, 9, 11)).unwrap(),
            )
            .with_owner("jane"),
        )
        .await
        .unwrap();

    let template = SeriesTemplate::new("Akinyi")
        .with_owner("jane")
        .with_services(vec![ServiceEntry::new("Color").with_duration(60)]);
    let outcome = scheduler
        .create_series(
            &template,
            RecurrencePattern::Weekly,
            instant(3, 2, 10),
            instant(3, 23, 10),
        )
        .await
        .unwrap();

    assert_eq!(outcome.created.len(), 3);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].interval.start, instant(3, 9, 10));
    assert_eq!(outcome.skipped[0].conflicts.len(), 1);

    // Every committed occurrence is tied back to the series.
    for item in &outcome.created {
        assert_eq!(item.series.as_deref(), Some(outcome.series.id.as_str()));
        let details = item.as_appointment().unwrap();
        assert_eq!(details.client_name, "Akinyi");
        assert_eq!(details.services.len(), 1);
    }

    // 1 walk-in + 3 committed occurrences in the store.
    assert_eq!(scheduler.items().await.len(), 4);
    assert_eq!(scheduler.series_list().await.len(), 1);
}

#[tokio::test]
async fn test_series_creation_with_no_committable_occurrence() {
    let scheduler = scheduler();
    scheduler
        .create(ScheduledItem::blocker(
            Interval::new(instant(3, 1, 0), instant(3, 31, 0)).unwrap(),
        ))
        .await
        .unwrap();

    let template = SeriesTemplate::new("Akinyi").with_owner("jane");
    let outcome = scheduler
        .create_series(
            &template,
            RecurrencePattern::Weekly,
            instant(3, 2, 10),
            instant(3, 23, 10),
        )
        .await
        .unwrap();

    assert!(outcome.created.is_empty());
    assert_eq!(outcome.skipped.len(), 4);
}

#[tokio::test]
async fn test_occurrence_duration_comes_from_services() {
    let scheduler = scheduler();
    let template = SeriesTemplate::new("Akinyi").with_owner("jane").with_services(vec![
        ServiceEntry::new("Cut").with_duration(30),
        ServiceEntry::new("Color").with_duration(45),
    ]);

    let outcome = scheduler
        .create_series(
            &template,
            RecurrencePattern::Daily,
            instant(3, 2, 10),
            instant(3, 3, 10),
        )
        .await
        .unwrap();
    assert_eq!(outcome.created.len(), 2);
    assert_eq!(
        outcome.created[0].interval.duration(),
        chrono::Duration::minutes(75)
    );
}

#[tokio::test]
async fn test_batch_occurrences_are_checked_against_each_other() {
    let scheduler = scheduler();
    // Occurrences a day apart but lasting 25 hours: each one overlaps
    // the next, so only every other occurrence survives.
    let template = SeriesTemplate::new("Akinyi")
        .with_owner("jane")
        .with_duration(25 * 60);

    let outcome = scheduler
        .create_series(
            &template,
            RecurrencePattern::Daily,
            instant(3, 2, 10),
            instant(3, 5, 10),
        )
        .await
        .unwrap();

    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.skipped.len(), 2);
    assert_eq!(outcome.created[0].interval.start, instant(3, 2, 10));
    assert_eq!(outcome.created[1].interval.start, instant(3, 4, 10));
}

#[tokio::test]
async fn test_deleting_a_series_detaches_its_appointments() {
    let scheduler = scheduler();
    let template = SeriesTemplate::new("Akinyi").with_owner("jane");
    let outcome = scheduler
        .create_series(
            &template,
            RecurrencePattern::Weekly,
            instant(3, 2, 10),
            instant(3, 16, 10),
        )
        .await
        .unwrap();
    assert_eq!(outcome.created.len(), 3);

    scheduler.delete_series(&outcome.series.id).await.unwrap();

    assert!(scheduler.series_list().await.is_empty());
    let items = scheduler.items().await;
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i.series.is_none()));
}
