//! Tests for the mutation service: conflict gating, status transitions,
//! and mutation guards.

use chrono::{NaiveDate, NaiveDateTime};

use bookline::backend::MemoryBackend;
use bookline::error::ScheduleError;
use bookline::model::{
    AppointmentStatus, Interval, ItemUpdate, ResourceKind, ScheduledItem,
};
use bookline::service::Scheduler;

fn instant(day: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn slot(day: u32, start_h: u32, end_h: u32) -> Interval {
    Interval::new(instant(day, start_h, 0), instant(day, end_h, 0)).unwrap()
}

fn scheduler() -> Scheduler<MemoryBackend> {
    Scheduler::new(MemoryBackend::new())
}

#[tokio::test]
async fn test_same_staff_overlap_is_rejected() {
    let scheduler = scheduler();
    scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();

    let err = scheduler
        .create(ScheduledItem::appointment("Brigid", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap_err();
    match err {
        ScheduleError::Conflict { conflicts } => {
            assert_eq!(conflicts.len(), 1);
            assert_eq!(conflicts[0].owner.as_deref(), Some("jane"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_back_to_back_bookings_do_not_conflict() {
    let scheduler = scheduler();
    scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();

    // Shared boundary instant; the interval is half-open.
    scheduler
        .create(ScheduledItem::appointment("Brigid", slot(2, 11, 12)).with_owner("jane"))
        .await
        .unwrap();
    assert_eq!(scheduler.items().await.len(), 2);
}

#[tokio::test]
async fn test_different_staff_may_overlap() {
    let scheduler = scheduler();
    scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();
    scheduler
        .create(ScheduledItem::appointment("Brigid", slot(2, 10, 11)).with_owner("sam"))
        .await
        .unwrap();
    assert_eq!(scheduler.items().await.len(), 2);
}

#[tokio::test]
async fn test_unassigned_appointment_conflicts_with_everyone() {
    let scheduler = scheduler();
    scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();

    let err = scheduler
        .create(ScheduledItem::appointment("Walk-in", slot(2, 10, 11)))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Conflict { .. }));
}

#[tokio::test]
async fn test_ownerless_blocker_blocks_all_staff() {
    let scheduler = scheduler();
    scheduler
        .create(ScheduledItem::blocker(slot(2, 9, 17)).with_reason("Renovation"))
        .await
        .unwrap();

    let err = scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Conflict { .. }));
}

#[tokio::test]
async fn test_shared_resource_conflicts_across_staff() {
    let scheduler = scheduler();
    scheduler
        .create(
            ScheduledItem::appointment("Akinyi", slot(2, 10, 11))
                .with_owner("jane")
                .with_resource("room-1"),
        )
        .await
        .unwrap();

    let err = scheduler
        .create(
            ScheduledItem::appointment("Brigid", slot(2, 10, 11))
                .with_owner("sam")
                .with_resource("room-1"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Conflict { .. }));
}

#[tokio::test]
async fn test_cancelled_items_never_conflict() {
    let scheduler = scheduler();
    let first = scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();
    scheduler.cancel(&first.id).await.unwrap();

    scheduler
        .create(ScheduledItem::appointment("Brigid", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_move_excludes_self_and_gates_on_conflicts() {
    let scheduler = scheduler();
    let item = scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();
    scheduler
        .create(ScheduledItem::appointment("Brigid", slot(2, 14, 15)).with_owner("jane"))
        .await
        .unwrap();

    // Shifting within its own slot only overlaps itself.
    let nudged = scheduler
        .move_item(
            &item.id,
            Interval::new(instant(2, 10, 30), instant(2, 11, 30)).unwrap(),
            false,
        )
        .await
        .unwrap();
    assert_eq!(nudged.interval.start, instant(2, 10, 30));

    // Landing on the other booking is rejected without force.
    let err = scheduler
        .move_item(&item.id, slot(2, 14, 15), false)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Conflict { .. }));

    // Force commits anyway; the conflict pass is advisory.
    let forced = scheduler
        .move_item(&item.id, slot(2, 14, 15), true)
        .await
        .unwrap();
    assert_eq!(forced.interval, slot(2, 14, 15));
}

#[tokio::test]
async fn test_resize_keeps_start() {
    let scheduler = scheduler();
    let item = scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();

    let resized = scheduler
        .resize(&item.id, instant(2, 11, 45), false)
        .await
        .unwrap();
    assert_eq!(resized.interval.start, instant(2, 10, 0));
    assert_eq!(resized.interval.end, instant(2, 11, 45));
}

#[tokio::test]
async fn test_status_flow_forward_only() {
    let scheduler = scheduler();
    let item = scheduler
        .create(
            ScheduledItem::appointment("Akinyi", slot(2, 10, 11))
                .with_owner("jane")
                .with_status(AppointmentStatus::Pending),
        )
        .await
        .unwrap();

    // Pending may jump straight to completed.
    let done = scheduler.complete(&item.id, Some("sale-77")).await.unwrap();
    let details = done.as_appointment().unwrap();
    assert_eq!(details.status, AppointmentStatus::Completed);
    assert_eq!(details.sale_ref.as_deref(), Some("sale-77"));

    // Completed is terminal.
    let err = scheduler.cancel(&item.id).await.unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::InvalidStateTransition { .. } | ScheduleError::Guarded(_)
    ));
}

#[tokio::test]
async fn test_update_rejects_backward_transition() {
    let scheduler = scheduler();
    let item = scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();

    let err = scheduler
        .update(
            &item.id,
            ItemUpdate {
                status: Some(AppointmentStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidStateTransition { .. }));
}

#[tokio::test]
async fn test_accept_claims_unassigned_only() {
    let scheduler = scheduler();
    let open = scheduler
        .create(
            ScheduledItem::appointment("Walk-in", slot(2, 10, 11))
                .with_status(AppointmentStatus::Pending),
        )
        .await
        .unwrap();

    let accepted = scheduler.accept(&open.id, "jane").await.unwrap();
    assert_eq!(accepted.owner.as_deref(), Some("jane"));
    assert_eq!(
        accepted.as_appointment().unwrap().status,
        AppointmentStatus::Scheduled
    );

    // Already-claimed appointments cannot be accepted again.
    let err = scheduler.accept(&open.id, "sam").await.unwrap_err();
    assert!(matches!(err, ScheduleError::Guarded(_)));
}

#[tokio::test]
async fn test_completed_items_are_frozen() {
    let scheduler = scheduler();
    let item = scheduler
        .create(ScheduledItem::appointment("Akinyi", slot(2, 10, 11)).with_owner("jane"))
        .await
        .unwrap();
    scheduler.complete(&item.id, None).await.unwrap();

    let err = scheduler
        .move_item(&item.id, slot(2, 14, 15), true)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::Guarded(_)));

    let err = scheduler.delete(&item.id).await.unwrap_err();
    assert!(matches!(err, ScheduleError::Guarded(_)));
}

#[tokio::test]
async fn test_blockers_have_no_status_lifecycle() {
    let scheduler = scheduler();
    let blocker = scheduler
        .create(ScheduledItem::blocker(slot(2, 12, 13)))
        .await
        .unwrap();

    let err = scheduler.complete(&blocker.id, None).await.unwrap_err();
    assert!(matches!(err, ScheduleError::Guarded(_)));
}

#[tokio::test]
async fn test_resource_lifecycle_and_delete_guard() {
    let scheduler = scheduler();
    let room = scheduler
        .create_resource("Room 1", ResourceKind::Room)
        .await
        .unwrap();
    scheduler
        .create(
            ScheduledItem::appointment("Akinyi", slot(2, 10, 11))
                .with_owner("jane")
                .with_resource(&room.id),
        )
        .await
        .unwrap();

    let err = scheduler.delete_resource(&room.id).await.unwrap_err();
    assert!(matches!(err, ScheduleError::Guarded(_)));

    let idle = scheduler
        .create_resource("Steamer", ResourceKind::Equipment)
        .await
        .unwrap();
    scheduler.delete_resource(&idle.id).await.unwrap();
    assert_eq!(scheduler.resources().await.len(), 1);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let scheduler = scheduler();
    let err = scheduler.item("missing").await.unwrap_err();
    assert!(matches!(err, ScheduleError::NotFound(_)));
}
