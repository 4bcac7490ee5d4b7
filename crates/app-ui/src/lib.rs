//! Presentation models for Carfinder
//!
//! This crate holds what the screens need but no rendering code: the
//! design tokens, the status card and compass panel models, and the
//! notices shown after operations. Text is resolved through the
//! [`i18n::I18nManager`].
//!
//! # Modules
//!
//! - [`tokens`] - Colors, spacing, radii, typography and timings
//! - [`status`] - Status card, parking timer and compass panel
//! - [`notices`] - Success, confirmation and error notices

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod notices;
pub mod status;
pub mod tokens;

pub use notices::{
    ButtonStyle, Notice, NoticeAction, NoticeButton, NoticeVariant, Operation, RenderedButton,
    RenderedNotice,
};
pub use status::{
    format_distance, CompassPanel, RenderedStatus, StatusIndicator, StatusVariant, TimerDisplay,
};
pub use tokens::{
    colors, duration, font_size, line_height, radius, spacing, timer_colors, FontWeight, Palette,
    TimerColors,
};
