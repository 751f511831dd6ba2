//! Tests for the pieces the offline CLI mode is built from: config
//! files on disk, the persisted session, and snapshot round-trips.

use chrono::NaiveDate;

use bookline::backend::{MemoryBackend, ScheduleSnapshot};
use bookline::model::{Interval, ScheduledItem};
use bookline::service::Scheduler;
use bookline::session::{Role, Session, User};
use bookline::Config;

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookline.toml");
    std::fs::write(
        &path,
        r#"
        [backend]
        url = "https://salon.example.com/api"
        timeout_secs = 10

        [session]
        file = "/tmp/bookline-test/session.json"

        [defaults]
        business = "barber_shop"
        appointment_minutes = 45
        "#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.backend.url, "https://salon.example.com/api");
    assert_eq!(config.backend.timeout_secs, 10);
    assert_eq!(config.defaults.appointment_minutes, 45);
    assert_eq!(
        config.session_file(),
        std::path::PathBuf::from("/tmp/bookline-test/session.json")
    );
}

#[test]
fn test_session_persists_at_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state/session.json");

    let mut session = Session::new();
    session.login(User::new("7", "Jane Wanjiru", Role::Manager));
    session.save(&path).unwrap();

    let restored = Session::load(&path);
    assert_eq!(restored.auth_header(), Some("7"));
    assert!(restored.is_manager());
}

#[tokio::test]
async fn test_snapshot_survives_a_restart() {
    let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let slot = Interval::new(
        day.and_hms_opt(10, 0, 0).unwrap(),
        day.and_hms_opt(11, 0, 0).unwrap(),
    )
    .unwrap();

    // First "run": book an appointment and write the snapshot out.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let backend = MemoryBackend::new();
    let scheduler = Scheduler::new(backend.clone());
    let created = scheduler
        .create(ScheduledItem::appointment("Akinyi", slot).with_owner("jane"))
        .await
        .unwrap();
    let json = serde_json::to_string_pretty(&backend.snapshot().await).unwrap();
    std::fs::write(&path, json).unwrap();

    // Second "run": reload and find the booking again.
    let content = std::fs::read_to_string(&path).unwrap();
    let snapshot: ScheduleSnapshot = serde_json::from_str(&content).unwrap();
    let scheduler = Scheduler::new(MemoryBackend::from_snapshot(snapshot));
    scheduler.refresh().await.unwrap();

    let restored = scheduler.item(&created.id).await.unwrap();
    assert_eq!(restored.interval, slot);
    assert_eq!(restored.owner.as_deref(), Some("jane"));
}
