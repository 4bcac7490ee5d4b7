//! Status indicator and compass panel models
//!
//! These turn controller and compass state into the text and colors a
//! screen shows, resolving translation keys through [`I18nManager`].

use app_state::{CompassDisplay, ElapsedTime, ParkingSession, SessionStatus, TimerVariant};
use i18n::{I18nManager, Language, Translator};
use serde::Serialize;

use crate::tokens::colors;

/// Visual style of the status card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusVariant {
    /// A car is parked
    Active,
    /// Nothing is parked
    Inactive,
    /// Work in progress
    Loading,
    /// Something blocks the app
    Error,
}

impl StatusVariant {
    /// Accent color of the card
    pub fn accent(&self) -> &'static str {
        match self {
            StatusVariant::Active => colors::SUCCESS.shade_400,
            StatusVariant::Inactive => colors::NEUTRAL.shade_600,
            StatusVariant::Loading => colors::PRIMARY.shade_400,
            StatusVariant::Error => colors::ERROR.shade_400,
        }
    }

    /// Whether the card pulses
    pub fn is_animated(&self) -> bool {
        matches!(self, StatusVariant::Active | StatusVariant::Loading)
    }
}

/// Status card content before translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    /// Visual style
    pub variant: StatusVariant,
    /// Translation key of the title
    pub title_key: &'static str,
    /// Translation key of the subtitle
    pub subtitle_key: Option<&'static str>,
}

/// Status card content ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedStatus {
    /// Visual style
    pub variant: StatusVariant,
    /// Title text
    pub title: String,
    /// Subtitle text
    pub subtitle: Option<String>,
}

impl StatusIndicator {
    /// Card for a controller status
    pub fn for_status(status: &SessionStatus) -> Self {
        let (variant, title_key, subtitle_key) = match status {
            SessionStatus::Unknown => {
                (StatusVariant::Loading, "permissions.requestingPermission", None)
            }
            SessionStatus::PermissionDenied => (
                StatusVariant::Error,
                "permissions.locationDenied",
                Some("permissions.locationDeniedMessage"),
            ),
            SessionStatus::Idle => {
                (StatusVariant::Inactive, "parking.inactive", Some("parking.inactiveSubtitle"))
            }
            SessionStatus::Active { .. } => {
                (StatusVariant::Active, "parking.active", Some("parking.activeSubtitle"))
            }
            SessionStatus::Loading => (StatusVariant::Loading, "parking.busy", None),
        };
        Self { variant, title_key, subtitle_key }
    }

    /// Translate into the active language
    pub fn render(&self, i18n: &I18nManager) -> RenderedStatus {
        self.render_with(i18n.translator(), i18n.current_language())
    }

    /// Translate into `lang`
    pub fn render_with(&self, translator: &Translator, lang: Language) -> RenderedStatus {
        RenderedStatus {
            variant: self.variant,
            title: translator.translate(lang, self.title_key),
            subtitle: self.subtitle_key.map(|key| translator.translate(lang, key)),
        }
    }
}

/// Parking timer card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerDisplay {
    /// Severity
    pub variant: TimerVariant,
    /// `HH:MM:SS`, or `None` when nothing is parked
    pub text: Option<String>,
}

impl TimerDisplay {
    /// Timer for an optional session at `now_ms`
    pub fn for_session(session: Option<&ParkingSession>, now_ms: i64) -> Self {
        let (variant, elapsed) = TimerVariant::for_session(session, now_ms);
        Self { variant, text: elapsed.as_ref().map(ElapsedTime::format_hms) }
    }
}

/// Compass screen text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompassPanel {
    /// Message shown instead of readings
    pub message: Option<String>,
    /// "Heading: 12.3° | Target: 45.6°"
    pub heading_line: Option<String>,
    /// "Distance: 120.5 m"
    pub distance_line: Option<String>,
    /// Sector abbreviation of the bearing, such as "NE"
    pub direction: Option<&'static str>,
    /// Arrow rotation in degrees
    pub arrow_rotation: f64,
}

impl CompassPanel {
    /// Panel for a compass display in the active language
    pub fn render(display: &CompassDisplay, i18n: &I18nManager) -> Self {
        Self::render_with(display, i18n.translator(), i18n.current_language())
    }

    /// Panel for a compass display in `lang`
    pub fn render_with(display: &CompassDisplay, translator: &Translator, lang: Language) -> Self {
        let t = |key: &str| translator.translate(lang, key);
        match display {
            CompassDisplay::NoTarget => Self::message(t("compass.noTarget")),
            CompassDisplay::Locating => Self::message(t("compass.locating")),
            CompassDisplay::Tracking(reading) => Self {
                message: None,
                heading_line: Some(format!(
                    "{}: {:.1}° | {}: {:.1}°",
                    t("compass.heading"),
                    reading.heading_degrees,
                    t("compass.target"),
                    reading.bearing_degrees
                )),
                distance_line: Some(format!(
                    "{}: {}",
                    t("compass.distance"),
                    format_distance(reading.distance_meters)
                )),
                direction: Some(reading.direction.abbreviation()),
                arrow_rotation: reading.arrow_rotation,
            },
        }
    }

    fn message(text: String) -> Self {
        Self {
            message: Some(text),
            heading_line: None,
            distance_line: None,
            direction: None,
            arrow_rotation: 0.0,
        }
    }
}

/// Meters with one decimal below a kilometer, kilometers with two above
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.1} m")
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_state::CompassReading;
    use geodesy::{CompassDirection, Coordinate};

    fn translator() -> Translator {
        Translator::builtin(Language::Pl).unwrap()
    }

    fn session() -> ParkingSession {
        ParkingSession::new(Coordinate::new_unchecked(52.1, 21.0), 0)
    }

    #[test]
    fn test_status_variants() {
        let cases = [
            (SessionStatus::Unknown, StatusVariant::Loading),
            (SessionStatus::Loading, StatusVariant::Loading),
            (SessionStatus::PermissionDenied, StatusVariant::Error),
            (SessionStatus::Idle, StatusVariant::Inactive),
            (SessionStatus::Active { session: session() }, StatusVariant::Active),
        ];
        for (status, variant) in cases {
            assert_eq!(StatusIndicator::for_status(&status).variant, variant, "{status}");
        }
    }

    #[test]
    fn test_status_render() {
        let rendered = StatusIndicator::for_status(&SessionStatus::Active { session: session() })
            .render_with(&translator(), Language::En);

        assert_eq!(rendered.title, "Parking active");
        assert_eq!(rendered.subtitle.as_deref(), Some("Your car's location is saved"));
    }

    #[test]
    fn test_status_keys_exist_in_every_language() {
        let translator = translator();
        let statuses = [
            SessionStatus::Unknown,
            SessionStatus::Loading,
            SessionStatus::PermissionDenied,
            SessionStatus::Idle,
            SessionStatus::Active { session: session() },
        ];
        for status in statuses {
            let indicator = StatusIndicator::for_status(&status);
            for lang in Language::ALL {
                assert!(translator.has_key(lang, indicator.title_key));
                if let Some(key) = indicator.subtitle_key {
                    assert!(translator.has_key(lang, key), "{lang} lacks {key}");
                }
            }
        }
    }

    #[test]
    fn test_variant_styling() {
        assert!(StatusVariant::Active.is_animated());
        assert!(!StatusVariant::Error.is_animated());
        assert_eq!(StatusVariant::Error.accent(), "#EF5350");
    }

    #[test]
    fn test_timer_display() {
        let idle = TimerDisplay::for_session(None, 5_000);
        assert_eq!(idle.variant, TimerVariant::Inactive);
        assert_eq!(idle.text, None);

        let parked = TimerDisplay::for_session(Some(&session()), 4 * 3_600_000 + 61_000);
        assert_eq!(parked.variant, TimerVariant::Danger);
        assert_eq!(parked.text.as_deref(), Some("04:01:01"));
    }

    #[test]
    fn test_compass_panel_messages() {
        let t = translator();
        let panel = CompassPanel::render_with(&CompassDisplay::NoTarget, &t, Language::En);
        assert_eq!(panel.message.as_deref(), Some("No saved location found!"));
        assert!(panel.distance_line.is_none());

        let panel = CompassPanel::render_with(&CompassDisplay::Locating, &t, Language::En);
        assert_eq!(panel.message.as_deref(), Some("Determining your position..."));
    }

    #[test]
    fn test_compass_panel_reading() {
        let reading = CompassReading {
            distance_meters: 1234.5,
            bearing_degrees: 45.04,
            direction: CompassDirection::NE,
            heading_degrees: 12.34,
            heading_reference: None,
            arrow_rotation: 32.7,
            rotation_delta: 5.0,
        };
        let display = CompassDisplay::Tracking(reading);
        let panel = CompassPanel::render_with(&display, &translator(), Language::En);

        assert_eq!(panel.message, None);
        assert_eq!(panel.heading_line.as_deref(), Some("Heading: 12.3° | Target: 45.0°"));
        assert_eq!(panel.distance_line.as_deref(), Some("Distance: 1.23 km"));
        assert_eq!(panel.direction, Some("NE"));
        assert_eq!(panel.arrow_rotation, 32.7);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.0), "0.0 m");
        assert_eq!(format_distance(999.94), "999.9 m");
        assert_eq!(format_distance(1500.0), "1.50 km");
    }
}
