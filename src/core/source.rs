//! Configuration and source resolution for hexroute
//!
//! Holds the two external endpoints (dataset and routing service) together
//! with the view defaults, and resolves the dataset source string.

use crate::core::camera::CameraState;

/// Default location of the precomputed hexagon dataset
pub const DATASET_URL: &str = "data/hexagons.geojson";

/// Default routing service (OSRM HTTP API)
pub const ROUTING_URL: &str = "https://router.project-osrm.org";

/// Default routing profile
pub const ROUTING_PROFILE: &str = "driving";

/// Pixel padding used when fitting the camera to a route
pub const FIT_PADDING_PX: u32 = 40;

/// Where the dataset is read from
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// Fetched once by GET
    Http { url: String },
    /// Read from the local filesystem
    File { path: String },
}

/// Configuration for a dashboard session
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Dataset URL or file path
    pub dataset: String,

    /// Base URL of the routing service
    pub routing_url: String,

    /// Routing profile embedded in the request path
    pub profile: String,

    /// Padding in pixels around a fitted route
    pub fit_padding: u32,

    /// Camera state restored by `reset`
    pub initial_view: CameraState,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset: DATASET_URL.to_string(),
            routing_url: ROUTING_URL.to_string(),
            profile: ROUTING_PROFILE.to_string(),
            fit_padding: FIT_PADDING_PX,
            initial_view: CameraState::default(),
        }
    }
}

/// Resolves a dataset string to a source
pub fn resolve_source(dataset: &str) -> DatasetSource {
    match dataset {
        url if url.starts_with("http://") || url.starts_with("https://") => DatasetSource::Http {
            url: url.to_string(),
        },
        path => DatasetSource::File {
            path: path.strip_prefix("file://").unwrap_or(path).to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_http_source() {
        let source = resolve_source("https://example.org/data/hexagons.geojson");
        assert_eq!(
            source,
            DatasetSource::Http {
                url: "https://example.org/data/hexagons.geojson".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_file_source() {
        assert_eq!(
            resolve_source("data/hexagons.geojson"),
            DatasetSource::File {
                path: "data/hexagons.geojson".to_string()
            }
        );
        assert_eq!(
            resolve_source("file:///tmp/cells.geojson"),
            DatasetSource::File {
                path: "/tmp/cells.geojson".to_string()
            }
        );
    }

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.routing_url, "https://router.project-osrm.org");
        assert_eq!(config.profile, "driving");
        assert_eq!(config.fit_padding, 40);
        assert_eq!(config.initial_view, CameraState::default());
    }
}
