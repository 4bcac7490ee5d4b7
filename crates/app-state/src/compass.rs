//! Compass toward the parked car
//!
//! [`CompassViewModel`] turns the latest position and heading into what the
//! compass screen shows. [`CompassTracker`] feeds it from live position and
//! heading streams on a background task.

use app_platform::{HeadingReference, HeadingSample, HeadingStream, StopHandle, Subscription};
use geodesy::{bearing_between, normalize_degrees, shortest_rotation, CompassDirection, Coordinate};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// One frame of compass output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompassReading {
    /// Distance to the car in meters
    pub distance_meters: f64,
    /// Bearing from the device to the car, in [0, 360)
    pub bearing_degrees: f64,
    /// Sector the bearing falls in
    pub direction: CompassDirection,
    /// Device heading, 0 until the first sample arrives
    pub heading_degrees: f64,
    /// North reference of the heading, if one has arrived
    pub heading_reference: Option<HeadingReference>,
    /// Arrow rotation; accumulates past [0, 360) so it can be animated
    /// without wrapping jumps
    pub arrow_rotation: f64,
    /// Change applied to the arrow by the last update, in (-180, 180]
    pub rotation_delta: f64,
}

/// What the compass screen shows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum CompassDisplay {
    /// There is no saved location to point at
    NoTarget,
    /// Waiting for the first position fix
    Locating,
    /// Pointing at the car
    Tracking(CompassReading),
}

impl CompassDisplay {
    /// The reading, when tracking
    pub fn reading(&self) -> Option<&CompassReading> {
        match self {
            CompassDisplay::Tracking(reading) => Some(reading),
            _ => None,
        }
    }
}

/// Compass state for a single target
#[derive(Debug, Clone)]
pub struct CompassViewModel {
    target: Option<Coordinate>,
    position: Option<Coordinate>,
    heading: Option<HeadingSample>,
    arrow_rotation: f64,
    rotation_delta: f64,
}

impl CompassViewModel {
    /// Create a view model pointing at `target`
    pub fn new(target: Option<Coordinate>) -> Self {
        Self { target, position: None, heading: None, arrow_rotation: 0.0, rotation_delta: 0.0 }
    }

    /// The coordinate being pointed at
    pub fn target(&self) -> Option<Coordinate> {
        self.target
    }

    /// Apply a new device position
    pub fn update_position(&mut self, position: Coordinate) -> CompassDisplay {
        if self.target.is_some() {
            self.position = Some(position);
            self.rotate();
        }
        self.display()
    }

    /// Apply a new heading sample
    pub fn update_heading(&mut self, sample: HeadingSample) -> CompassDisplay {
        if self.target.is_some() {
            self.heading = Some(sample);
            self.rotate();
        }
        self.display()
    }

    /// Current output
    pub fn display(&self) -> CompassDisplay {
        let Some(target) = self.target else {
            return CompassDisplay::NoTarget;
        };
        let Some(position) = self.position else {
            return CompassDisplay::Locating;
        };

        let bearing = bearing_between(&position, &target);
        CompassDisplay::Tracking(CompassReading {
            distance_meters: bearing.distance_meters,
            bearing_degrees: bearing.initial_bearing_degrees,
            direction: CompassDirection::from_bearing(bearing.initial_bearing_degrees),
            heading_degrees: self.heading_degrees(),
            heading_reference: self.heading.map(|h| h.reference),
            arrow_rotation: self.arrow_rotation,
            rotation_delta: self.rotation_delta,
        })
    }

    fn heading_degrees(&self) -> f64 {
        self.heading.map(|h| h.degrees).unwrap_or(0.0)
    }

    fn rotate(&mut self) {
        let (Some(target), Some(position)) = (self.target, self.position) else {
            return;
        };
        let bearing = bearing_between(&position, &target).initial_bearing_degrees;
        let desired = normalize_degrees(bearing - self.heading_degrees());
        self.rotation_delta = shortest_rotation(normalize_degrees(self.arrow_rotation), desired);
        self.arrow_rotation += self.rotation_delta;
    }
}

/// Drives a [`CompassViewModel`] from live streams
#[derive(Debug)]
pub struct CompassTracker {
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
    sources: Vec<StopHandle>,
    task: JoinHandle<()>,
    displays: watch::Receiver<CompassDisplay>,
}

impl CompassTracker {
    /// Start tracking. Without a heading stream the arrow assumes the device
    /// faces north.
    pub fn spawn(
        view_model: CompassViewModel,
        positions: Subscription<Coordinate>,
        headings: Option<HeadingStream>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let gate = Arc::new(Mutex::new(()));
        let (tx, displays) = watch::channel(view_model.display());

        let mut sources = vec![positions.stop_handle()];
        sources.extend(headings.as_ref().map(HeadingStream::stop_handle));

        let task = tokio::spawn(run(
            view_model,
            positions,
            headings,
            tx,
            cancel.clone(),
            Arc::clone(&gate),
        ));

        Self { cancel, gate, sources, task, displays }
    }

    /// Receiver of every display the view model produces
    pub fn displays(&self) -> watch::Receiver<CompassDisplay> {
        self.displays.clone()
    }

    /// The latest display
    pub fn current(&self) -> CompassDisplay {
        *self.displays.borrow()
    }

    /// Stop tracking and release the sensors. Nothing is published after
    /// this returns.
    pub fn stop(&self) {
        let _gate = self.gate.lock();
        self.cancel.cancel();
        for source in &self.sources {
            source.stop();
        }
    }

    /// Whether tracking has been stopped
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for CompassTracker {
    fn drop(&mut self) {
        self.stop();
        self.task.abort();
    }
}

async fn run(
    mut view_model: CompassViewModel,
    mut positions: Subscription<Coordinate>,
    mut headings: Option<HeadingStream>,
    publish: watch::Sender<CompassDisplay>,
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
) {
    let mut positions_open = true;
    let mut headings_open = headings.is_some();

    while positions_open || headings_open {
        let display = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            position = positions.next(), if positions_open => match position {
                Some(position) => view_model.update_position(position),
                None => {
                    positions_open = false;
                    continue;
                }
            },
            sample = next_heading(&mut headings), if headings_open => match sample {
                Some(sample) => view_model.update_heading(sample),
                None => {
                    headings_open = false;
                    continue;
                }
            },
        };

        let _gate = gate.lock();
        if cancel.is_cancelled() {
            break;
        }
        publish.send_replace(display);
    }
    tracing::debug!("Compass tracking ended");
}

async fn next_heading(headings: &mut Option<HeadingStream>) -> Option<HeadingSample> {
    match headings {
        Some(stream) => stream.next().await,
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeHeading;
    use app_platform::{HeadingConfig, HeadingSource, RawHeading};
    use std::time::Duration;

    const EPS: f64 = 1e-9;

    fn parked() -> Coordinate {
        Coordinate::new_unchecked(52.1, 21.0)
    }

    // Due south of the car, so the car bears 0°
    fn south_of_car() -> Coordinate {
        Coordinate::new_unchecked(52.0, 21.0)
    }

    fn heading(degrees: f64) -> HeadingSample {
        HeadingSample { degrees, reference: HeadingReference::True, accuracy: None }
    }

    #[test]
    fn test_no_target_is_terminal() {
        let mut vm = CompassViewModel::new(None);
        assert_eq!(vm.display(), CompassDisplay::NoTarget);
        assert_eq!(vm.update_position(south_of_car()), CompassDisplay::NoTarget);
        assert_eq!(vm.update_heading(heading(90.0)), CompassDisplay::NoTarget);
    }

    #[test]
    fn test_locating_until_first_position() {
        let mut vm = CompassViewModel::new(Some(parked()));
        assert_eq!(vm.display(), CompassDisplay::Locating);
        assert_eq!(vm.update_heading(heading(45.0)), CompassDisplay::Locating);
        assert!(vm.update_position(south_of_car()).reading().is_some());
    }

    #[test]
    fn test_reading_before_heading() {
        let mut vm = CompassViewModel::new(Some(parked()));
        let display = vm.update_position(south_of_car());
        let reading = display.reading().unwrap();

        assert!((reading.distance_meters - 11_119.5).abs() < 1.0);
        assert!(reading.bearing_degrees.abs() < EPS);
        assert_eq!(reading.direction, CompassDirection::N);
        assert_eq!(reading.heading_degrees, 0.0);
        assert_eq!(reading.heading_reference, None);
        assert!(reading.arrow_rotation.abs() < EPS);
    }

    #[test]
    fn test_arrow_takes_shortest_path() {
        let mut vm = CompassViewModel::new(Some(parked()));
        vm.update_position(south_of_car());

        // Desired 350°: reached by turning 10° counterclockwise
        let display = vm.update_heading(heading(10.0));
        let reading = display.reading().unwrap();
        assert!((reading.rotation_delta + 10.0).abs() < EPS);
        assert!((normalize_degrees(reading.arrow_rotation) - 350.0).abs() < EPS);

        // 350° to 5° is +15°, not -345°
        let display = vm.update_heading(heading(355.0));
        let reading = display.reading().unwrap();
        assert!((reading.rotation_delta - 15.0).abs() < EPS);
        assert!((reading.arrow_rotation - 5.0).abs() < EPS);
    }

    #[test]
    fn test_arrow_accumulates_across_full_turns() {
        let mut vm = CompassViewModel::new(Some(parked()));
        vm.update_position(south_of_car());

        // Spinning the device counterclockwise turns the arrow clockwise
        let mut last = 0.0;
        for step in 1..=8 {
            let h = normalize_degrees(-(step as f64) * 90.0);
            last = vm.update_heading(heading(h)).reading().unwrap().arrow_rotation;
        }
        assert!((last - 720.0).abs() < EPS);
    }

    #[test]
    fn test_direction_sector() {
        let mut vm = CompassViewModel::new(Some(Coordinate::new_unchecked(52.0, 21.1)));
        let display = vm.update_position(south_of_car());
        assert_eq!(display.reading().unwrap().direction, CompassDirection::E);
    }

    #[tokio::test]
    async fn test_tracker_follows_streams() {
        let (positions_tx, positions) = Subscription::channel(8);
        let (provider, headings_tx) = FakeHeading::channel();
        let source = HeadingSource::new(
            Arc::new(provider),
            HeadingConfig::default().min_interval(Duration::ZERO),
        );
        let headings = source.start().await.unwrap();

        let tracker =
            CompassTracker::spawn(CompassViewModel::new(Some(parked())), positions, Some(headings));
        let mut displays = tracker.displays();
        assert_eq!(*displays.borrow_and_update(), CompassDisplay::Locating);

        assert!(positions_tx.send(south_of_car()).await);
        displays.changed().await.unwrap();
        assert!(displays.borrow_and_update().reading().is_some());

        assert!(headings_tx.send(RawHeading::with_true(90.0, 90.0)).await);
        displays.changed().await.unwrap();
        let reading = *displays.borrow_and_update().reading().unwrap();
        assert_eq!(reading.heading_degrees, 90.0);
        assert!((normalize_degrees(reading.arrow_rotation) - 270.0).abs() < EPS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttled_heading_survives_position_fix() {
        let (positions_tx, positions) = Subscription::channel(8);
        let (provider, headings_tx) = FakeHeading::channel();
        let source = HeadingSource::new(Arc::new(provider), HeadingConfig::default());
        let headings = source.start().await.unwrap();

        let tracker =
            CompassTracker::spawn(CompassViewModel::new(Some(parked())), positions, Some(headings));
        let mut displays = tracker.displays();

        assert!(positions_tx.send(south_of_car()).await);
        assert!(headings_tx.send(RawHeading::magnetic(10.0)).await);
        displays
            .wait_for(|d| d.reading().is_some_and(|r| r.heading_degrees == 10.0))
            .await
            .unwrap();

        // The next heading waits out the 100 ms throttle while a fix arrives
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(headings_tx.send(RawHeading::magnetic(200.0)).await);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(positions_tx.send(south_of_car()).await);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let reading = *tracker.current().reading().unwrap();
        assert_eq!(reading.heading_degrees, 200.0);
        assert!((normalize_degrees(reading.arrow_rotation) - 160.0).abs() < EPS);
    }

    #[tokio::test]
    async fn test_tracker_without_heading() {
        let (positions_tx, positions) = Subscription::channel(8);
        let tracker = CompassTracker::spawn(CompassViewModel::new(Some(parked())), positions, None);
        let mut displays = tracker.displays();

        assert!(positions_tx.send(south_of_car()).await);
        displays.changed().await.unwrap();
        assert_eq!(tracker.current().reading().unwrap().heading_degrees, 0.0);
    }

    #[tokio::test]
    async fn test_tracker_stop_releases_sources() {
        let (positions_tx, positions) = Subscription::channel(8);
        let (provider, headings_tx) = FakeHeading::channel();
        let source = HeadingSource::new(Arc::new(provider), HeadingConfig::default());
        let headings = source.start().await.unwrap();

        let tracker =
            CompassTracker::spawn(CompassViewModel::new(Some(parked())), positions, Some(headings));
        tracker.stop();

        assert!(tracker.is_stopped());
        assert!(positions_tx.is_cancelled());
        assert!(headings_tx.is_cancelled());
        assert!(!positions_tx.send(south_of_car()).await);
        assert_eq!(tracker.current(), CompassDisplay::Locating);
    }

    #[tokio::test]
    async fn test_tracker_drop_releases_sources() {
        let (positions_tx, positions) = Subscription::<Coordinate>::channel(8);
        let tracker = CompassTracker::spawn(CompassViewModel::new(None), positions, None);
        drop(tracker);
        positions_tx.cancelled().await;
    }
}
