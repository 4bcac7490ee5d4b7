//! Carfinder
//!
//! Remembers where the car was parked and guides the driver back to it,
//! either through an external maps application or with a live compass.
//!
//! The workspace crates each own one concern:
//!
//! - [`geodesy`]: distances, bearings and compass sectors
//! - [`app_platform`]: device services (location, heading, URL launching, clock)
//! - [`storage`]: string key-value persistence
//! - [`app_state`]: the parking session, its controller and the compass
//! - [`i18n`]: language detection and translations
//! - [`app_ui`]: display models built from controller state
//!
//! This crate wires them together from an [`AppConfig`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod logging;

pub use app::{AppError, CarfinderApp, Platform, Startup};
pub use config::{AppConfig, ConfigError};
pub use logging::LoggingError;

pub use app_platform;
pub use app_state;
pub use app_ui;
pub use geodesy;
pub use i18n;
pub use storage;
