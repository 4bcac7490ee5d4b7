//! User notices
//!
//! Modal messages shown after an operation: success confirmations, the
//! end-parking confirmation, and one notice per error kind. The same error
//! kind can read differently depending on which operation failed, so errors
//! are mapped together with the [`Operation`] that produced them.

use app_state::{ErrorKind, ParkingStoreError, SessionError};
use i18n::{I18nManager, Language, Translator};
use serde::Serialize;

use crate::tokens::{colors, Palette};

/// Tone of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeVariant {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Neutral information
    Info,
    /// Needs attention or confirmation
    Warning,
}

impl NoticeVariant {
    /// Palette used for the notice header
    pub fn palette(&self) -> Palette {
        match self {
            NoticeVariant::Success => colors::SUCCESS,
            NoticeVariant::Error => colors::ERROR,
            NoticeVariant::Info => colors::PRIMARY,
            NoticeVariant::Warning => colors::WARNING,
        }
    }
}

/// What a notice button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeAction {
    /// Close the notice
    Dismiss,
    /// Close and open directions to the car
    NavigateToCar,
    /// Close and end parking
    ConfirmEndParking,
}

/// Button emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonStyle {
    /// Filled
    Primary,
    /// Outline only
    Ghost,
}

/// A notice button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoticeButton {
    /// What pressing it does
    pub action: NoticeAction,
    /// Translation key of the label
    pub label_key: &'static str,
    /// Emphasis
    pub style: ButtonStyle,
}

impl NoticeButton {
    const fn new(action: NoticeAction, label_key: &'static str, style: ButtonStyle) -> Self {
        Self { action, label_key, style }
    }

    const fn ok() -> Self {
        Self::new(NoticeAction::Dismiss, "common.ok", ButtonStyle::Primary)
    }
}

/// Operation a notice reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// App start
    Initialize,
    /// Saving the parking spot
    StartParking,
    /// Removing the parking spot
    EndParking,
    /// Opening external directions
    NavigateToCar,
    /// Opening the compass
    OpenCompass,
}

/// A notice before translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Tone
    pub variant: NoticeVariant,
    /// Translation key of the title
    pub title_key: &'static str,
    /// Translation key of the message
    pub message_key: &'static str,
    /// Buttons, primary first
    pub buttons: Vec<NoticeButton>,
}

/// A button ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedButton {
    /// What pressing it does
    pub action: NoticeAction,
    /// Label text
    pub label: String,
    /// Emphasis
    pub style: ButtonStyle,
}

/// A notice ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNotice {
    /// Tone
    pub variant: NoticeVariant,
    /// Title text
    pub title: String,
    /// Message text
    pub message: String,
    /// Buttons
    pub buttons: Vec<RenderedButton>,
}

impl Notice {
    fn new(variant: NoticeVariant, title_key: &'static str, message_key: &'static str) -> Self {
        Self { variant, title_key, message_key, buttons: vec![NoticeButton::ok()] }
    }

    fn with_buttons(mut self, buttons: Vec<NoticeButton>) -> Self {
        self.buttons = buttons;
        self
    }

    /// Shown after parking was saved; offers directions right away
    pub fn parking_started() -> Self {
        Self::new(NoticeVariant::Success, "common.success", "parking.startSuccess").with_buttons(
            vec![
                NoticeButton::new(
                    NoticeAction::NavigateToCar,
                    "parking.navigateToCar",
                    ButtonStyle::Primary,
                ),
                NoticeButton::new(NoticeAction::Dismiss, "common.ok", ButtonStyle::Ghost),
            ],
        )
    }

    /// Shown after parking was ended
    pub fn parking_ended() -> Self {
        Self::new(NoticeVariant::Success, "common.success", "parking.endSuccess")
    }

    /// Asked before ending parking
    pub fn confirm_end_parking() -> Self {
        Self::new(NoticeVariant::Warning, "parking.confirmEnd", "parking.confirmEndMessage")
            .with_buttons(vec![
                NoticeButton::new(
                    NoticeAction::ConfirmEndParking,
                    "parking.endParking",
                    ButtonStyle::Primary,
                ),
                NoticeButton::new(NoticeAction::Dismiss, "common.cancel", ButtonStyle::Ghost),
            ])
    }

    /// Notice for a failed operation
    pub fn for_error(operation: Operation, error: &SessionError) -> Self {
        match (error.kind(), operation) {
            (ErrorKind::PermissionDenied, Operation::Initialize) => Self::new(
                NoticeVariant::Error,
                "permissions.locationDenied",
                "permissions.locationDeniedMessage",
            ),
            (ErrorKind::PermissionDenied, _) => Self::new(
                NoticeVariant::Error,
                "permissions.locationDenied",
                "permissions.locationAccessError",
            ),
            (ErrorKind::StorageWriteError, _)
                if matches!(error, SessionError::Storage(ParkingStoreError::Clear(_))) =>
            {
                Self::new(NoticeVariant::Error, "common.error", "parking.clearError")
            }
            (kind, _) => Self::for_kind(kind),
        }
    }

    /// Notice for an error category
    pub fn for_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::PermissionDenied => Self::new(
                NoticeVariant::Error,
                "permissions.locationDenied",
                "permissions.locationDeniedMessage",
            ),
            ErrorKind::LocationUnavailable => {
                Self::new(NoticeVariant::Error, "common.error", "permissions.locationUnavailable")
            }
            ErrorKind::StorageReadError => {
                Self::new(NoticeVariant::Error, "common.error", "parking.loadError")
            }
            ErrorKind::StorageWriteError => {
                Self::new(NoticeVariant::Error, "common.error", "parking.saveError")
            }
            ErrorKind::NavigationLaunchFailed => {
                Self::new(NoticeVariant::Error, "common.error", "parking.mapsError")
            }
            ErrorKind::HeadingUnavailable => Self::new(
                NoticeVariant::Warning,
                "compass.headingUnavailable",
                "compass.headingUnavailableMessage",
            ),
            ErrorKind::NoSavedLocation => {
                Self::new(NoticeVariant::Info, "parking.noLocation", "parking.noLocationMessage")
            }
            ErrorKind::InvalidTransition => {
                Self::new(NoticeVariant::Info, "parking.title", "parking.busy")
            }
        }
    }

    /// Translate into the active language
    pub fn render(&self, i18n: &I18nManager) -> RenderedNotice {
        self.render_with(i18n.translator(), i18n.current_language())
    }

    /// Translate into `lang`
    pub fn render_with(&self, translator: &Translator, lang: Language) -> RenderedNotice {
        RenderedNotice {
            variant: self.variant,
            title: translator.translate(lang, self.title_key),
            message: translator.translate(lang, self.message_key),
            buttons: self
                .buttons
                .iter()
                .map(|button| RenderedButton {
                    action: button.action,
                    label: translator.translate(lang, button.label_key),
                    style: button.style,
                })
                .collect(),
        }
    }
}
