//! Scriptable collaborators shared by the unit tests

use app_platform::{
    HeadingProvider, LocationAccuracy, LocationProvider, PermissionStatus, PlatformError,
    RawHeading, Subscription, SubscriptionSender, WatchOptions,
};
use async_trait::async_trait;
use geodesy::Coordinate;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use storage::{KeyValueStorage, KvError, MemoryStorage};

/// Memory storage whose operations can be made to fail
#[derive(Debug)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_reads: AtomicBool,
    fail_removes: AtomicBool,
    writes_left: AtomicUsize,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self {
            inner: MemoryStorage::new(),
            fail_reads: AtomicBool::new(false),
            fail_removes: AtomicBool::new(false),
            writes_left: AtomicUsize::new(usize::MAX),
        }
    }

    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removes(&self, fail: bool) {
        self.fail_removes.store(fail, Ordering::SeqCst);
    }

    /// Let `n` more writes succeed, then fail every write
    pub fn fail_writes_after(&self, n: usize) {
        self.writes_left.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStorage for FlakyStorage {
    async fn get_item(&self, key: &str) -> storage::Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("read failed".to_string()));
        }
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> storage::Result<()> {
        let allowed = self
            .writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok();
        if !allowed {
            return Err(KvError::Unavailable("write failed".to_string()));
        }
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> storage::Result<()> {
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("remove failed".to_string()));
        }
        self.inner.remove_item(key).await
    }
}

/// Location provider answering from a script
#[derive(Debug)]
pub struct FakeLocation {
    permission: Mutex<app_platform::Result<PermissionStatus>>,
    queued: Mutex<VecDeque<app_platform::Result<Coordinate>>>,
    position: Mutex<app_platform::Result<Coordinate>>,
    delay: Mutex<Duration>,
    fetches: AtomicUsize,
    permission_requests: AtomicUsize,
    watch: Mutex<Option<Subscription<Coordinate>>>,
}

impl FakeLocation {
    pub fn granted(position: Coordinate) -> Self {
        Self {
            permission: Mutex::new(Ok(PermissionStatus::Granted)),
            queued: Mutex::new(VecDeque::new()),
            position: Mutex::new(Ok(position)),
            delay: Mutex::new(Duration::ZERO),
            fetches: AtomicUsize::new(0),
            permission_requests: AtomicUsize::new(0),
            watch: Mutex::new(None),
        }
    }

    pub fn set_permission(&self, permission: app_platform::Result<PermissionStatus>) {
        *self.permission.lock() = permission;
    }

    /// Answer every later fetch with `position`
    pub fn set_position(&self, position: app_platform::Result<Coordinate>) {
        *self.position.lock() = position;
    }

    /// Answer the next fetch with `position`, ahead of the standing answer
    pub fn push_position(&self, position: app_platform::Result<Coordinate>) {
        self.queued.lock().push_back(position);
    }

    /// Make every fetch take `delay`
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// Prepare the subscription handed out by the next position watch
    pub fn watch_channel(&self) -> SubscriptionSender<Coordinate> {
        let (tx, rx) = Subscription::channel(16);
        *self.watch.lock() = Some(rx);
        tx
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn request_permission(&self) -> app_platform::Result<PermissionStatus> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.permission.lock().clone()
    }

    async fn current_position(
        &self,
        _accuracy: LocationAccuracy,
    ) -> app_platform::Result<Coordinate> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let queued = self.queued.lock().pop_front();
        queued.unwrap_or_else(|| self.position.lock().clone())
    }

    async fn watch_position(
        &self,
        _options: WatchOptions,
    ) -> app_platform::Result<Subscription<Coordinate>> {
        self.watch
            .lock()
            .take()
            .ok_or_else(|| PlatformError::LocationUnavailable("watch not prepared".to_string()))
    }
}

/// Heading provider fed through a channel
#[derive(Debug)]
pub struct FakeHeading {
    available: bool,
    raw: Mutex<Option<Subscription<RawHeading>>>,
}

impl FakeHeading {
    pub fn channel() -> (Self, SubscriptionSender<RawHeading>) {
        let (tx, rx) = Subscription::channel(16);
        (Self { available: true, raw: Mutex::new(Some(rx)) }, tx)
    }

    pub fn unavailable() -> Self {
        Self { available: false, raw: Mutex::new(None) }
    }
}

#[async_trait]
impl HeadingProvider for FakeHeading {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn subscribe(&self) -> app_platform::Result<Subscription<RawHeading>> {
        self.raw.lock().take().ok_or(PlatformError::HeadingUnavailable)
    }
}
