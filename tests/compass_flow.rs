//! Live compass from a parked session

mod common;

use carfinder::app_platform::RawHeading;
use carfinder::app_state::{CompassDisplay, PARKED_LOCATION_KEY};
use carfinder::app_ui::NoticeVariant;
use carfinder::geodesy::{CompassDirection, Coordinate};
use carfinder::storage::{KeyValueStorage, KvStore};
use carfinder::CarfinderApp;
use common::{config_in, Devices, TestHeading};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn parked() -> Coordinate {
    Coordinate::new_unchecked(52.2297, 21.0122)
}

/// About 1.1 km due south of the car
fn walker() -> Coordinate {
    Coordinate::new_unchecked(52.2197, 21.0122)
}

#[tokio::test]
async fn test_compass_points_to_parked_car() {
    let temp_dir = TempDir::new().unwrap();
    let (heading, heading_tx) = TestHeading::channel();
    let devices = Devices::new(parked(), heading);
    let app = CarfinderApp::open(&config_in(temp_dir.path()), devices.platform()).unwrap();
    app.start(&["en"]).await;
    app.start_parking().await;

    let position_tx = devices.location.watch_channel();
    let tracker = app.open_compass().await.unwrap();
    assert_eq!(tracker.current(), CompassDisplay::Locating);
    assert_eq!(
        app.compass_panel(&tracker.current()).message.as_deref(),
        Some("Determining your position...")
    );

    assert!(position_tx.send(walker()).await);
    assert!(heading_tx.send(RawHeading::magnetic(90.0)).await);

    let mut displays = tracker.displays();
    let display = timeout(
        Duration::from_secs(2),
        displays.wait_for(|display| {
            display.reading().is_some_and(|r| r.heading_degrees == 90.0 && r.distance_meters > 0.0)
        }),
    )
    .await
    .unwrap()
    .map(|display| *display)
    .unwrap();

    let reading = display.reading().unwrap();
    assert_eq!(reading.direction, CompassDirection::N);
    assert!((reading.distance_meters - 1112.0).abs() < 1.0);
    // Facing east with the car due north, the arrow turns left
    assert!((reading.arrow_rotation + 90.0).abs() < 1e-6);

    let panel = app.compass_panel(&display);
    assert_eq!(panel.heading_line.as_deref(), Some("Heading: 90.0° | Target: 0.0°"));
    assert_eq!(panel.distance_line.as_deref(), Some("Distance: 1.11 km"));
    assert_eq!(panel.direction, Some("N"));

    tracker.stop();
    assert!(tracker.is_stopped());
    assert!(!position_tx.send(parked()).await);
    assert!(!heading_tx.send(RawHeading::magnetic(180.0)).await);
    assert_eq!(tracker.current(), display);
}

#[tokio::test]
async fn test_compass_from_stored_location_before_start() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(temp_dir.path());

    {
        let store = KvStore::new(config.kv_config()).unwrap();
        store
            .set_item(PARKED_LOCATION_KEY, r#"{"latitude":52.2297,"longitude":21.0122}"#)
            .await
            .unwrap();
    }

    let (heading, _heading_tx) = TestHeading::channel();
    let devices = Devices::new(walker(), heading);
    let app = CarfinderApp::open(&config, devices.platform()).unwrap();

    let target = app.controller().compass_target().await.unwrap();
    assert_eq!(target, parked());

    let position_tx = devices.location.watch_channel();
    let tracker = app.open_compass().await.unwrap();
    assert!(position_tx.send(walker()).await);

    let mut displays = tracker.displays();
    let display = timeout(
        Duration::from_secs(2),
        displays.wait_for(|display| matches!(display, CompassDisplay::Tracking(_))),
    )
    .await
    .unwrap()
    .map(|display| *display)
    .unwrap();

    // No heading yet: the device is assumed to face north
    let reading = display.reading().unwrap();
    assert_eq!(reading.heading_degrees, 0.0);
    assert!(reading.arrow_rotation.abs() < 1e-6);
}

#[tokio::test]
async fn test_compass_without_parked_car() {
    let temp_dir = TempDir::new().unwrap();
    let (heading, _heading_tx) = TestHeading::channel();
    let devices = Devices::new(parked(), heading);
    let app = CarfinderApp::open(&config_in(temp_dir.path()), devices.platform()).unwrap();
    app.start(&["en"]).await;

    let notice = app.open_compass().await.unwrap_err();
    assert_eq!(notice.variant, NoticeVariant::Info);
    assert_eq!(notice.message, "Start parking first to save your car's location.");
}

#[tokio::test]
async fn test_compass_without_heading_sensor() {
    let temp_dir = TempDir::new().unwrap();
    let devices = Devices::new(parked(), TestHeading::missing());
    let app = CarfinderApp::open(&config_in(temp_dir.path()), devices.platform()).unwrap();
    app.start(&["de"]).await;
    app.start_parking().await;

    let _position_tx = devices.location.watch_channel();
    let notice = app.open_compass().await.unwrap_err();
    assert_eq!(notice.variant, NoticeVariant::Warning);
    assert_eq!(notice.buttons.len(), 1);
}
