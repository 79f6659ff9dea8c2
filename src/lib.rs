//! # Hexroute Library
//!
//! Turns a precomputed dataset of hexagonal cells (visit counts and CO2 per
//! car trip) into drawable map layers, and draws driving routes between the
//! centroids of two selected cells using an OSRM-compatible routing service.
//!
//! ## Features
//!
//! - **Choropleth cells**: extruded by visit count, colored on a three-segment ramp
//! - **Routes**: one GET to the routing service, camera fitted to the result
//! - **Stale-response fencing**: only the newest route request may update state
//! - **Headless viewport**: web-mercator bounds fitting without a GPU
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use hexroute::{Action, DashboardConfig, WebMercatorViewport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut dashboard = hexroute::open(DashboardConfig::default()).await;
//!     dashboard.dispatch(Action::SelectOrigin(Some("891fb466257ffff".into())));
//!     dashboard.dispatch(Action::SelectDestination(Some("891fb4662d7ffff".into())));
//!
//!     let client = hexroute::RoutingClient::new(
//!         &dashboard.config().routing_url,
//!         &dashboard.config().profile,
//!     );
//!     dashboard.draw_route(&client, &WebMercatorViewport::default()).await?;
//!
//!     let frame = dashboard.frame();
//!     println!("{} layers", frame.layers.len());
//!     Ok(())
//! }
//! ```

// Re-export core types that users might need
pub use crate::core::camera::{
    BoundingBox, CameraController, CameraState, RenderSurface, WebMercatorViewport,
};
pub use crate::core::centroid::{centroid_of, Centroid};
pub use crate::core::color::{color_for, Rgba};
pub use crate::core::dashboard::{
    route_collection, Action, Endpoints, Frame, RouteOutcome, RouteResult, RouteTicket, Selection,
    TripStats,
};
pub use crate::core::dataset::{load_dataset, Dataset, DatasetIndex, Feature};
pub use crate::core::error::{Error, Result, SelectionRole};
pub use crate::core::layers::{
    build_layers, tooltip, CellLayer, CellShape, Layer, Marker, MarkerLayer, MarkerRole, RouteLayer,
};
pub use crate::core::routing::{RouteCandidate, RouteResponse};
pub use crate::core::source::{resolve_source, DatasetSource};

// Internal modules
mod core;

/// Open a dashboard, loading its dataset once
///
/// A dataset that fails to load is logged and leaves the dashboard with an
/// empty map; this never fails.
///
/// # Examples
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() {
/// let dashboard = hexroute::open(hexroute::DashboardConfig {
///     dataset: "data/hexagons.geojson".to_string(),
///     ..Default::default()
/// })
/// .await;
/// println!("{} origins", dashboard.index().origin_options().len());
/// # }
/// ```
pub async fn open(config: DashboardConfig) -> Dashboard {
    let dataset = load_dataset(&config.dataset).await;
    Dashboard::new(config, dataset)
}

/// Advanced API: the dashboard state record, routing client and configuration
///
/// # Examples
/// ```rust,no_run
/// use hexroute::{Dashboard, DashboardConfig, RoutingClient};
///
/// let config = DashboardConfig {
///     routing_url: "http://localhost:5000".to_string(),
///     ..Default::default()
/// };
/// let client = RoutingClient::new(&config.routing_url, &config.profile);
/// let dashboard = Dashboard::new(config, None);
/// ```
pub use crate::core::{Dashboard, DashboardConfig, RoutingClient};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_open_with_dataset_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(crate::core::dataset::tests::sample_geojson().as_bytes()).unwrap();

        let dashboard = open(DashboardConfig {
            dataset: file.path().to_str().unwrap().to_string(),
            ..Default::default()
        })
        .await;

        assert!(dashboard.index().is_loaded());
        assert_eq!(dashboard.index().destination_options(), ["X", "Y", "Z"]);
    }

    #[tokio::test]
    async fn test_open_with_broken_dataset_degrades() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not geojson").unwrap();

        let dashboard = open(DashboardConfig {
            dataset: file.path().to_str().unwrap().to_string(),
            ..Default::default()
        })
        .await;

        assert!(!dashboard.index().is_loaded());
        assert!(dashboard.frame().layers.is_empty());
    }
}
