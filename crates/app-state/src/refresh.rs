//! Periodic position refresh
//!
//! While a parking session is active the device position is re-read on a
//! fixed interval so distance readouts stay current. Fetches run one at a
//! time inside the loop and ticks that pass during a slow fetch are skipped,
//! so positions are published in the order they were requested.

use app_platform::{LocationAccuracy, LocationProvider};
use geodesy::Coordinate;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Background task re-reading the device position
#[derive(Debug)]
pub struct PositionRefresher {
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
    task: JoinHandle<()>,
    positions: watch::Receiver<Option<Coordinate>>,
}

impl PositionRefresher {
    /// Start refreshing into a fresh channel.
    ///
    /// The first fetch happens one `interval` after spawning.
    pub fn spawn(
        provider: Arc<dyn LocationProvider>,
        interval: Duration,
        accuracy: LocationAccuracy,
    ) -> Self {
        let (tx, _) = watch::channel(None);
        Self::spawn_into(provider, interval, accuracy, Arc::new(tx))
    }

    /// Start refreshing into an existing channel, so receivers outlive
    /// individual refreshers.
    pub fn spawn_into(
        provider: Arc<dyn LocationProvider>,
        interval: Duration,
        accuracy: LocationAccuracy,
        publish: Arc<watch::Sender<Option<Coordinate>>>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let gate = Arc::new(Mutex::new(()));
        let positions = publish.subscribe();

        let task = tokio::spawn(run(
            provider,
            interval,
            accuracy,
            publish,
            cancel.clone(),
            Arc::clone(&gate),
        ));
        tracing::debug!(interval_ms = interval.as_millis() as u64, "Position refresher started");

        Self { cancel, gate, task, positions }
    }

    /// Receiver of refreshed positions
    pub fn positions(&self) -> watch::Receiver<Option<Coordinate>> {
        self.positions.clone()
    }

    /// Stop refreshing. Nothing is published after this returns.
    pub fn stop(&self) {
        let _gate = self.gate.lock();
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            tracing::debug!("Position refresher stopped");
        }
    }

    /// Whether the refresher has been stopped
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PositionRefresher {
    fn drop(&mut self) {
        self.stop();
        self.task.abort();
    }
}

async fn run(
    provider: Arc<dyn LocationProvider>,
    interval: Duration,
    accuracy: LocationAccuracy,
    publish: Arc<watch::Sender<Option<Coordinate>>>,
    cancel: CancellationToken,
    gate: Arc<Mutex<()>>,
) {
    let period = interval.max(Duration::from_millis(1));
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = provider.current_position(accuracy) => result,
        };

        match result {
            Ok(position) => {
                let _gate = gate.lock();
                if cancel.is_cancelled() {
                    break;
                }
                publish.send_replace(Some(position));
                tracing::trace!(%position, "Position refreshed");
            }
            Err(e) => tracing::warn!("Position refresh failed, keeping last position: {}", e),
        }
    }
}
