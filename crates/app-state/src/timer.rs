//! Parking timer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::parking::ParkingSession;

const WARNING_AFTER_SECS: u64 = 60 * 60;
const DANGER_AFTER_SECS: u64 = 4 * 60 * 60;

/// Time spent parked, split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElapsedTime {
    total_seconds: u64,
}

impl ElapsedTime {
    /// Elapsed time between two epoch millisecond stamps, zero if `now_ms`
    /// is before `start_ms`
    pub fn between(start_ms: i64, now_ms: i64) -> Self {
        let millis = now_ms.saturating_sub(start_ms).max(0) as u64;
        Self { total_seconds: millis / 1000 }
    }

    /// Elapsed time from a duration, truncated to whole seconds
    pub fn from_duration(duration: Duration) -> Self {
        Self { total_seconds: duration.as_secs() }
    }

    /// Whole hours
    pub fn hours(&self) -> u64 {
        self.total_seconds / 3600
    }

    /// Minutes past the hour
    pub fn minutes(&self) -> u64 {
        (self.total_seconds % 3600) / 60
    }

    /// Seconds past the minute
    pub fn seconds(&self) -> u64 {
        self.total_seconds % 60
    }

    /// Total whole seconds
    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    /// `HH:MM:SS`; hours grow past two digits after 99 hours
    pub fn format_hms(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours(), self.minutes(), self.seconds())
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_hms())
    }
}

/// Severity of the parking timer display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerVariant {
    /// No session
    Inactive,
    /// Under an hour
    Normal,
    /// Under four hours
    Warning,
    /// Four hours or more
    Danger,
}

impl TimerVariant {
    /// Variant for a running timer
    pub fn for_elapsed(elapsed: ElapsedTime) -> Self {
        match elapsed.total_seconds() {
            s if s < WARNING_AFTER_SECS => TimerVariant::Normal,
            s if s < DANGER_AFTER_SECS => TimerVariant::Warning,
            _ => TimerVariant::Danger,
        }
    }

    /// Variant and elapsed time for an optional session
    pub fn for_session(
        session: Option<&ParkingSession>,
        now_ms: i64,
    ) -> (Self, Option<ElapsedTime>) {
        match session {
            Some(session) => {
                let elapsed = ElapsedTime::between(session.started_at_ms, now_ms);
                (Self::for_elapsed(elapsed), Some(elapsed))
            }
            None => (TimerVariant::Inactive, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodesy::Coordinate;

    #[test]
    fn test_format_hms() {
        let elapsed = ElapsedTime::between(0, ((2 * 3600 + 5 * 60 + 9) * 1000) + 999);
        assert_eq!(elapsed.hours(), 2);
        assert_eq!(elapsed.minutes(), 5);
        assert_eq!(elapsed.seconds(), 9);
        assert_eq!(elapsed.format_hms(), "02:05:09");
        assert_eq!(elapsed.to_string(), "02:05:09");
    }

    #[test]
    fn test_long_sessions_keep_counting_hours() {
        let elapsed = ElapsedTime::from_duration(Duration::from_secs(123 * 3600 + 1));
        assert_eq!(elapsed.format_hms(), "123:00:01");
    }

    #[test]
    fn test_clock_behind_start_is_zero() {
        let elapsed = ElapsedTime::between(10_000, 4_000);
        assert_eq!(elapsed.total_seconds(), 0);
        assert_eq!(elapsed.format_hms(), "00:00:00");
    }

    #[test]
    fn test_variant_thresholds() {
        let at = |secs| {
            TimerVariant::for_elapsed(ElapsedTime::from_duration(Duration::from_secs(secs)))
        };
        assert_eq!(at(0), TimerVariant::Normal);
        assert_eq!(at(3599), TimerVariant::Normal);
        assert_eq!(at(3600), TimerVariant::Warning);
        assert_eq!(at(14_399), TimerVariant::Warning);
        assert_eq!(at(14_400), TimerVariant::Danger);
    }

    #[test]
    fn test_variant_for_session() {
        assert_eq!(TimerVariant::for_session(None, 0), (TimerVariant::Inactive, None));

        let session = ParkingSession::new(Coordinate::new_unchecked(52.1, 21.0), 1_000);
        let (variant, elapsed) = TimerVariant::for_session(Some(&session), 1_000 + 7_200_000);
        assert_eq!(variant, TimerVariant::Warning);
        assert_eq!(elapsed.map(|e| e.format_hms()).as_deref(), Some("02:00:00"));
    }
}
