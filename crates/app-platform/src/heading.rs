//! Heading sensor
//!
//! Raw compass readings arrive from a [`HeadingProvider`] in whatever sign
//! convention the platform uses. [`HeadingSource`] normalizes them into
//! [0, 360), prefers true north when the platform knows it, and throttles
//! delivery to a bounded rate.

use async_trait::async_trait;
use geodesy::normalize_degrees;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::{PlatformError, Result};
use crate::subscription::{StopHandle, Subscription};

/// Reading as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHeading {
    /// Heading relative to magnetic north, any sign convention
    pub magnetic: f64,
    /// Heading relative to true north; negative when unknown
    pub true_heading: Option<f64>,
    /// Platform accuracy level, if reported
    pub accuracy: Option<u8>,
}

impl RawHeading {
    /// Reading with only a magnetic heading
    pub fn magnetic(degrees: f64) -> Self {
        Self { magnetic: degrees, true_heading: None, accuracy: None }
    }

    /// Reading with both magnetic and true headings
    pub fn with_true(magnetic: f64, true_heading: f64) -> Self {
        Self { magnetic, true_heading: Some(true_heading), accuracy: None }
    }
}

/// North reference of a heading sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingReference {
    /// Geographic north
    True,
    /// Magnetic north
    Magnetic,
}

/// Normalized heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadingSample {
    /// Direction the device faces, in [0, 360)
    pub degrees: f64,
    /// Which north the value is relative to
    pub reference: HeadingReference,
    /// Platform accuracy level, if reported
    pub accuracy: Option<u8>,
}

impl HeadingSample {
    /// Normalize a raw reading. Returns `None` if it holds no finite value.
    pub fn from_raw(raw: &RawHeading) -> Option<Self> {
        let accuracy = raw.accuracy;
        match raw.true_heading {
            Some(true_heading) if true_heading.is_finite() && true_heading >= 0.0 => Some(Self {
                degrees: normalize_degrees(true_heading),
                reference: HeadingReference::True,
                accuracy,
            }),
            _ if raw.magnetic.is_finite() => Some(Self {
                degrees: normalize_degrees(raw.magnetic),
                reference: HeadingReference::Magnetic,
                accuracy,
            }),
            _ => None,
        }
    }
}

/// Device heading sensor
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HeadingProvider: Send + Sync {
    /// Whether the device has a heading sensor
    async fn is_available(&self) -> bool;

    /// Start receiving raw readings
    async fn subscribe(&self) -> Result<Subscription<RawHeading>>;
}

/// Heading source configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingConfig {
    /// Minimum time between delivered samples
    pub min_interval: Duration,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self { min_interval: Duration::from_millis(100) }
    }
}

impl HeadingConfig {
    /// Set the minimum time between delivered samples
    pub fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }
}

/// Starts normalized heading streams from a provider
#[derive(Clone)]
pub struct HeadingSource {
    provider: Arc<dyn HeadingProvider>,
    config: HeadingConfig,
}

impl HeadingSource {
    /// Create a heading source
    pub fn new(provider: Arc<dyn HeadingProvider>, config: HeadingConfig) -> Self {
        Self { provider, config }
    }

    /// Subscribe to the sensor
    pub async fn start(&self) -> Result<HeadingStream> {
        if !self.provider.is_available().await {
            tracing::warn!("Heading sensor not available");
            return Err(PlatformError::HeadingUnavailable);
        }

        let raw = self.provider.subscribe().await?;
        tracing::debug!(
            min_interval_ms = self.config.min_interval.as_millis() as u64,
            "Heading stream started"
        );

        Ok(HeadingStream {
            raw,
            pending: None,
            min_interval: self.config.min_interval,
            last_emitted: None,
            calibrated: false,
        })
    }
}

/// Live, throttled stream of normalized headings
#[derive(Debug)]
pub struct HeadingStream {
    raw: Subscription<RawHeading>,
    pending: Option<RawHeading>,
    min_interval: Duration,
    last_emitted: Option<Instant>,
    calibrated: bool,
}

impl HeadingStream {
    /// Wait for the next sample.
    ///
    /// When readings arrive faster than the minimum interval, only the most
    /// recent one is delivered. Returns `None` after [`stop`](Self::stop) or
    /// when the sensor goes away.
    ///
    /// Cancel safe: a reading taken before the future is dropped is kept
    /// and delivered by the next call.
    pub async fn next(&mut self) -> Option<HeadingSample> {
        loop {
            if self.pending.is_none() {
                self.pending = Some(self.raw.next().await?);
            }

            if let Some(last) = self.last_emitted {
                let ready_at = last + self.min_interval;
                if Instant::now() < ready_at {
                    tokio::time::sleep_until(ready_at).await;
                }
            }

            while let Some(newer) = self.raw.try_next() {
                self.pending = Some(newer);
            }
            if self.raw.is_stopped() {
                self.pending = None;
                return None;
            }

            let Some(raw) = self.pending.take() else {
                continue;
            };
            match HeadingSample::from_raw(&raw) {
                Some(sample) => {
                    self.last_emitted = Some(Instant::now());
                    self.calibrated = true;
                    return Some(sample);
                }
                None => {
                    tracing::trace!(?raw, "Dropping heading reading without a finite value");
                }
            }
        }
    }

    /// Whether at least one sample has been delivered
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Stop the stream. No sample is delivered afterwards.
    pub fn stop(&mut self) {
        self.raw.stop();
    }

    /// Whether the stream has been stopped
    pub fn is_stopped(&self) -> bool {
        self.raw.is_stopped()
    }

    /// A handle that can stop this stream from another task
    pub fn stop_handle(&self) -> StopHandle {
        self.raw.stop_handle()
    }
}
