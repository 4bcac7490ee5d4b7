//! Cancellable event subscriptions
//!
//! Device services push readings into a [`SubscriptionSender`]; consumers
//! pull them from the paired [`Subscription`]. Stopping a subscription is
//! synchronous: once [`Subscription::stop`] returns, [`Subscription::next`]
//! yields `None` even if readings were already buffered.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Create a subscription with a bounded buffer
pub fn channel<T>(capacity: usize) -> (SubscriptionSender<T>, Subscription<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let cancel = CancellationToken::new();
    (
        SubscriptionSender { tx, cancel: cancel.clone() },
        Subscription { rx, cancel },
    )
}

/// Consumer side of a subscription
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::Receiver<T>,
    cancel: CancellationToken,
}

impl<T> Subscription<T> {
    /// Create a subscription with a bounded buffer
    pub fn channel(capacity: usize) -> (SubscriptionSender<T>, Subscription<T>) {
        channel(capacity)
    }

    /// Wait for the next item.
    ///
    /// Returns `None` once the subscription is stopped or the producer is gone.
    pub async fn next(&mut self) -> Option<T> {
        if self.cancel.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            item = self.rx.recv() => {
                if self.cancel.is_cancelled() {
                    None
                } else {
                    item
                }
            }
        }
    }

    /// Take a buffered item without waiting
    pub fn try_next(&mut self) -> Option<T> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// Stop delivery. No item is returned after this call.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.rx.close();
    }

    /// Whether the subscription has been stopped
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A handle that can stop this subscription from another task
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { cancel: self.cancel.clone() }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Stops a subscription from outside the consuming task
#[derive(Debug, Clone)]
pub struct StopHandle {
    cancel: CancellationToken,
}

impl StopHandle {
    /// Stop the associated subscription
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Producer side of a subscription
#[derive(Debug)]
pub struct SubscriptionSender<T> {
    tx: mpsc::Sender<T>,
    cancel: CancellationToken,
}

impl<T> Clone for SubscriptionSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone(), cancel: self.cancel.clone() }
    }
}

impl<T> SubscriptionSender<T> {
    /// Deliver an item, waiting for buffer space.
    ///
    /// Returns `false` if the consumer has stopped or gone away.
    pub async fn send(&self, item: T) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            result = self.tx.send(item) => result.is_ok(),
        }
    }

    /// Deliver an item without waiting; the item is dropped if the buffer is full
    pub fn try_send(&self, item: T) -> bool {
        !self.cancel.is_cancelled() && self.tx.try_send(item).is_ok()
    }

    /// Whether the consumer has stopped
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    /// Resolves when the consumer stops
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}
