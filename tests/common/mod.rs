//! Device fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use carfinder::app_platform::{
    self, Clock, HeadingProvider, LocationAccuracy, LocationProvider, ManualClock,
    PermissionStatus, PlatformError, RawHeading, Subscription, SubscriptionSender, UrlLauncher,
    WatchOptions,
};
use carfinder::geodesy::Coordinate;
use carfinder::{AppConfig, Platform};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const T0: i64 = 1_700_000_000_000;

/// Location fix, permission and position watch controlled by the test
pub struct TestLocation {
    permission: Mutex<PermissionStatus>,
    position: Mutex<Coordinate>,
    watch: Mutex<Option<Subscription<Coordinate>>>,
}

impl TestLocation {
    pub fn at(position: Coordinate) -> Arc<Self> {
        Arc::new(Self {
            permission: Mutex::new(PermissionStatus::Granted),
            position: Mutex::new(position),
            watch: Mutex::new(None),
        })
    }

    pub fn deny(&self) {
        *self.permission.lock().unwrap() = PermissionStatus::Denied;
    }

    pub fn move_to(&self, position: Coordinate) {
        *self.position.lock().unwrap() = position;
    }

    /// Sender feeding the next position watch
    pub fn watch_channel(&self) -> SubscriptionSender<Coordinate> {
        let (tx, rx) = Subscription::channel(16);
        *self.watch.lock().unwrap() = Some(rx);
        tx
    }
}

#[async_trait]
impl LocationProvider for TestLocation {
    async fn request_permission(&self) -> app_platform::Result<PermissionStatus> {
        Ok(*self.permission.lock().unwrap())
    }

    async fn current_position(
        &self,
        _accuracy: LocationAccuracy,
    ) -> app_platform::Result<Coordinate> {
        Ok(*self.position.lock().unwrap())
    }

    async fn watch_position(
        &self,
        _options: WatchOptions,
    ) -> app_platform::Result<Subscription<Coordinate>> {
        self.watch
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| PlatformError::LocationUnavailable("no watch".to_string()))
    }
}

/// Heading sensor fed through a channel, or missing entirely
pub struct TestHeading {
    raw: Mutex<Option<Subscription<RawHeading>>>,
}

impl TestHeading {
    pub fn channel() -> (Arc<Self>, SubscriptionSender<RawHeading>) {
        let (tx, rx) = Subscription::channel(16);
        (Arc::new(Self { raw: Mutex::new(Some(rx)) }), tx)
    }

    pub fn missing() -> Arc<Self> {
        Arc::new(Self { raw: Mutex::new(None) })
    }
}

#[async_trait]
impl HeadingProvider for TestHeading {
    async fn is_available(&self) -> bool {
        self.raw.lock().unwrap().is_some()
    }

    async fn subscribe(&self) -> app_platform::Result<Subscription<RawHeading>> {
        self.raw.lock().unwrap().take().ok_or(PlatformError::HeadingUnavailable)
    }
}

/// Launcher that records every URL it is asked to open
#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl UrlLauncher for RecordingLauncher {
    async fn open_url(&self, url: &str) -> app_platform::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub struct Devices {
    pub location: Arc<TestLocation>,
    pub heading: Arc<TestHeading>,
    pub launcher: Arc<RecordingLauncher>,
    pub clock: Arc<ManualClock>,
}

impl Devices {
    pub fn new(position: Coordinate, heading: Arc<TestHeading>) -> Self {
        Self {
            location: TestLocation::at(position),
            heading,
            launcher: Arc::new(RecordingLauncher::default()),
            clock: Arc::new(ManualClock::new(T0)),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform {
            location: self.location.clone(),
            heading: self.heading.clone(),
            launcher: self.launcher.clone(),
            clock: self.clock.clone() as Arc<dyn Clock>,
        }
    }
}

/// Configuration with the store under `dir` and no heading throttling
pub fn config_in(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.path = dir.join("carfinder.db").to_string_lossy().to_string();
    config.storage.flush_every_ms = None;
    config.heading.min_interval_ms = 0;
    config
}
