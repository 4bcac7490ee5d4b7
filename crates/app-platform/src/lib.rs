//! Platform boundary for Carfinder
//!
//! This crate defines the device services the application consumes
//! (location, heading sensor, URL launching, wall clock) as traits, plus the
//! cancellable subscription primitive that sensor streams are delivered
//! through.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod error;
pub mod heading;
pub mod launcher;
pub mod location;
pub mod subscription;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PlatformError, Result};
pub use heading::{
    HeadingConfig, HeadingProvider, HeadingReference, HeadingSample, HeadingSource, HeadingStream,
    RawHeading,
};
pub use launcher::{LaunchTarget, NavigationConfig, Navigator, UrlLauncher};
pub use location::{LocationAccuracy, LocationProvider, PermissionStatus, WatchOptions};
pub use subscription::{StopHandle, Subscription, SubscriptionSender};
