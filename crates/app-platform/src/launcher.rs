//! External navigation
//!
//! Hands a coordinate to whatever maps application the system opens for a
//! directions URL, falling back to a `geo:` URI.

use async_trait::async_trait;
use geodesy::Coordinate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{PlatformError, Result};

/// Opens URLs with the system handler
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlLauncher: Send + Sync {
    /// Open a URL
    async fn open_url(&self, url: &str) -> Result<()>;
}

/// Which link ended up being opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaunchTarget {
    /// The maps directions URL
    Directions,
    /// The `geo:` URI fallback
    GeoUri,
}

/// Navigation link configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationConfig {
    /// Directions endpoint; `destination=lat,lon` is appended as a query parameter
    pub directions_base_url: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { directions_base_url: "https://www.google.com/maps/dir/?api=1".to_string() }
    }
}

impl NavigationConfig {
    /// Create a configuration with a custom directions endpoint
    pub fn new(directions_base_url: impl Into<String>) -> Self {
        Self { directions_base_url: directions_base_url.into() }
    }

    /// Directions URL for a destination
    pub fn directions_url(&self, destination: &Coordinate) -> String {
        let base = &self.directions_base_url;
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}destination={},{}", destination.latitude, destination.longitude)
    }

    /// `geo:` URI for a destination
    pub fn geo_uri(destination: &Coordinate) -> String {
        let (lat, lon) = (destination.latitude, destination.longitude);
        format!("geo:{lat},{lon}?q={lat},{lon}")
    }
}

/// Opens directions to a coordinate
#[derive(Clone)]
pub struct Navigator {
    launcher: Arc<dyn UrlLauncher>,
    config: NavigationConfig,
}

impl Navigator {
    /// Create a navigator
    pub fn new(launcher: Arc<dyn UrlLauncher>, config: NavigationConfig) -> Self {
        Self { launcher, config }
    }

    /// Open directions to `destination`.
    ///
    /// The directions URL is tried first without probing whether it can be
    /// handled; on failure the `geo:` URI is tried.
    pub async fn navigate_to(&self, destination: &Coordinate) -> Result<LaunchTarget> {
        let url = self.config.directions_url(destination);
        match self.launcher.open_url(&url).await {
            Ok(()) => {
                tracing::info!(%url, "Opened directions");
                return Ok(LaunchTarget::Directions);
            }
            Err(e) => tracing::warn!("Failed to open directions URL: {}", e),
        }

        let fallback = NavigationConfig::geo_uri(destination);
        match self.launcher.open_url(&fallback).await {
            Ok(()) => {
                tracing::info!(url = %fallback, "Opened geo URI");
                Ok(LaunchTarget::GeoUri)
            }
            Err(e) => {
                tracing::error!("Failed to open geo URI: {}", e);
                Err(PlatformError::LaunchFailed { url: fallback, reason: e.to_string() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn destination() -> Coordinate {
        Coordinate::new_unchecked(52.1, 21.0)
    }

    fn launch_error(url: &str) -> PlatformError {
        PlatformError::LaunchFailed { url: url.to_string(), reason: "no handler".to_string() }
    }

    #[test]
    fn test_default_directions_url() {
        let url = NavigationConfig::default().directions_url(&destination());
        assert_eq!(url, "https://www.google.com/maps/dir/?api=1&destination=52.1,21");
    }

    #[test]
    fn test_directions_url_without_query() {
        let url = NavigationConfig::new("https://maps.example/dir/").directions_url(&destination());
        assert_eq!(url, "https://maps.example/dir/?destination=52.1,21");
    }

    #[test]
    fn test_geo_uri() {
        assert_eq!(NavigationConfig::geo_uri(&destination()), "geo:52.1,21?q=52.1,21");
    }

    #[tokio::test]
    async fn test_opens_directions() {
        let mut launcher = MockUrlLauncher::new();
        launcher
            .expect_open_url()
            .with(eq("https://www.google.com/maps/dir/?api=1&destination=52.1,21"))
            .times(1)
            .returning(|_| Ok(()));

        let navigator = Navigator::new(Arc::new(launcher), NavigationConfig::default());
        assert_eq!(navigator.navigate_to(&destination()).await.unwrap(), LaunchTarget::Directions);
    }

    #[tokio::test]
    async fn test_falls_back_to_geo_uri() {
        let mut seq = Sequence::new();
        let mut launcher = MockUrlLauncher::new();
        launcher
            .expect_open_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|url| Err(launch_error(url)));
        launcher
            .expect_open_url()
            .with(eq("geo:52.1,21?q=52.1,21"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let navigator = Navigator::new(Arc::new(launcher), NavigationConfig::default());
        assert_eq!(navigator.navigate_to(&destination()).await.unwrap(), LaunchTarget::GeoUri);
    }

    #[tokio::test]
    async fn test_both_links_fail() {
        let mut launcher = MockUrlLauncher::new();
        launcher.expect_open_url().times(2).returning(|url| Err(launch_error(url)));

        let navigator = Navigator::new(Arc::new(launcher), NavigationConfig::default());
        let err = navigator.navigate_to(&destination()).await.unwrap_err();
        assert!(matches!(
            err,
            PlatformError::LaunchFailed { ref url, .. } if url.starts_with("geo:")
        ));
    }
}
