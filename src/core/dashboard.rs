//! Application state and route orchestration
//!
//! `Dashboard` owns every piece of mutable state: selection, route, endpoint
//! centroids, trip stats, camera and the cell toggle. Synchronous events go
//! through `dispatch`. Drawing a route is split at its one await point:
//! `begin_route` prepares and stamps a generation, `complete_route` applies a
//! routing response only if no newer request has started since. Every
//! user-facing failure is also kept as the latest alert text.

use std::sync::Arc;

use geojson::{Feature as GeoFeature, FeatureCollection, Geometry, Value};
use log::{debug, info, warn};
use serde::Serialize;

use crate::core::camera::{BoundingBox, CameraController, CameraState, RenderSurface};
use crate::core::centroid::{centroid_of, Centroid};
use crate::core::dataset::{Dataset, DatasetIndex};
use crate::core::error::{suggest_correction, Error, Result, SelectionRole};
use crate::core::layers::{build_layers, Layer};
use crate::core::routing::{RouteResponse, RoutingClient};
use crate::core::source::DashboardConfig;

/// Selected origin and destination identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// Centroids of the selected origin and destination cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Endpoints {
    pub origin: Centroid,
    pub destination: Centroid,
}

/// Statistics of the destination cell, copied when a route is requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TripStats {
    /// Grams of CO2 for one car trip
    pub co2_per_trip: Option<f64>,
    pub visit_count: Option<f64>,
}

/// A successfully fetched route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// Single-feature LineString collection
    pub geometry: FeatureCollection,
    pub bounds: BoundingBox,
    pub stats: TripStats,
    pub distance_m: Option<f64>,
    pub duration_s: Option<f64>,
}

/// Wrap route coordinates as a one-feature line collection
pub fn route_collection(coordinates: Vec<Vec<f64>>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![GeoFeature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(coordinates))),
            id: None,
            properties: None,
            foreign_members: None,
        }],
        foreign_members: None,
    }
}

/// Synchronous user and render-surface events
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectOrigin(Option<String>),
    SelectDestination(Option<String>),
    ShowCells(bool),
    ToggleCells,
    SetFlat,
    Rotate(f64),
    ResetCamera,
    /// Pan/zoom/rotate gesture from the render surface
    ViewChanged(CameraState),
    RemoveRoute,
}

/// Proof that a route request was started, carrying what it needs
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTicket {
    pub generation: u64,
    pub origin: Centroid,
    pub destination: Centroid,
    /// Destination stats as they were when the request started
    pub stats: TripStats,
}

/// What `complete_route` did with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Route stored and camera fitted
    Drawn,
    /// A newer request started; this response was dropped
    Stale,
}

/// What the render surface draws next
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub camera: CameraState,
    pub layers: Vec<Layer>,
}

/// The single owned application-state record
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    index: DatasetIndex,
    selection: Selection,
    route: Option<RouteResult>,
    endpoints: Option<Endpoints>,
    stats: Option<TripStats>,
    camera: CameraController,
    show_cells: bool,
    generation: u64,
    pending: Option<u64>,
    alert: Option<String>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig, dataset: Option<Arc<Dataset>>) -> Self {
        let camera = CameraController::new(config.initial_view);
        Self {
            config,
            index: DatasetIndex::new(dataset),
            selection: Selection::default(),
            route: None,
            endpoints: None,
            stats: None,
            camera,
            show_cells: true,
            generation: 0,
            pending: None,
            alert: None,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    /// Replace the dataset; option lists re-derive only if it changed
    pub fn set_dataset(&mut self, dataset: Option<Arc<Dataset>>) {
        self.index.update(dataset);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_ref()
    }

    pub fn endpoints(&self) -> Option<&Endpoints> {
        self.endpoints.as_ref()
    }

    pub fn stats(&self) -> Option<&TripStats> {
        self.stats.as_ref()
    }

    pub fn camera(&self) -> &CameraState {
        self.camera.state()
    }

    pub fn show_cells(&self) -> bool {
        self.show_cells
    }

    /// Whether a route request is awaiting its response
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Message of the last failed action, cleared when a route starts
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    fn raise(&mut self, e: Error) -> Error {
        warn!("{e}");
        self.alert = Some(e.to_string());
        e
    }

    /// Apply a synchronous event
    pub fn dispatch(&mut self, action: Action) {
        debug!("dispatch {action:?}");
        match action {
            Action::SelectOrigin(id) => self.selection.origin = non_empty(id),
            Action::SelectDestination(id) => self.selection.destination = non_empty(id),
            Action::ShowCells(show) => self.show_cells = show,
            Action::ToggleCells => self.show_cells = !self.show_cells,
            Action::SetFlat => self.camera.set_flat(),
            Action::Rotate(delta) => self.camera.rotate(delta),
            Action::ResetCamera => self.camera.reset(),
            Action::ViewChanged(state) => self.camera.set_view(state),
            Action::RemoveRoute => self.remove_route(),
        }
    }

    /// Clear the route, endpoints and stats; safe to call at any time
    ///
    /// A request still in flight is abandoned: its response comes back stale.
    pub fn remove_route(&mut self) {
        self.route = None;
        self.endpoints = None;
        self.stats = None;
        if self.pending.take().is_some() {
            self.generation += 1;
        }
    }

    /// Validate the selection and prepare a routing request
    ///
    /// On failure nothing changes but the alert. On success the endpoint
    /// centroids and the destination's stats are stored and a new generation
    /// is stamped.
    pub fn begin_route(&mut self) -> Result<RouteTicket> {
        let (endpoints, stats) = match self.resolve_selection() {
            Ok(resolved) => resolved,
            Err(e) => return Err(self.raise(e)),
        };

        self.endpoints = Some(endpoints);
        self.stats = Some(stats);
        self.alert = None;
        self.generation += 1;
        self.pending = Some(self.generation);

        debug!(
            "Route #{} from {:?} to {:?}",
            self.generation, endpoints.origin, endpoints.destination
        );

        Ok(RouteTicket {
            generation: self.generation,
            origin: endpoints.origin,
            destination: endpoints.destination,
            stats,
        })
    }

    fn resolve_selection(&self) -> Result<(Endpoints, TripStats)> {
        if !self.index.is_loaded() {
            return Err(Error::InvalidInput("dataset is not loaded".to_string()));
        }
        let (Some(origin_id), Some(destination_id)) =
            (&self.selection.origin, &self.selection.destination)
        else {
            return Err(Error::InvalidInput(
                "select both an origin and a destination".to_string(),
            ));
        };

        let origin = self.index.find_origin(origin_id).ok_or_else(|| Error::SelectionNotFound {
            role: SelectionRole::Origin,
            id: origin_id.clone(),
            suggestion: suggest_correction(origin_id, self.index.origin_options()),
        })?;
        let destination = self
            .index
            .find_destination(destination_id)
            .ok_or_else(|| Error::SelectionNotFound {
                role: SelectionRole::Destination,
                id: destination_id.clone(),
                suggestion: suggest_correction(destination_id, self.index.destination_options()),
            })?;

        let endpoints = Endpoints {
            origin: centroid_of(origin.geometry.as_ref()),
            destination: centroid_of(destination.geometry.as_ref()),
        };
        let stats = TripStats {
            co2_per_trip: destination.co2_per_trip,
            visit_count: destination.visit_count,
        };
        Ok((endpoints, stats))
    }

    /// Apply the routing service's answer to a started request
    ///
    /// - stale ticket: dropped, nothing changes
    /// - request failure: error, the previous route stays
    /// - zero routes: error, the previous route is cleared
    /// - otherwise the first route is stored and the camera fits it
    pub fn complete_route(
        &mut self,
        ticket: &RouteTicket,
        response: Result<RouteResponse>,
        surface: &dyn RenderSurface,
    ) -> Result<RouteOutcome> {
        if ticket.generation != self.generation {
            debug!(
                "Dropping route #{} response, #{} is current",
                ticket.generation, self.generation
            );
            return Ok(RouteOutcome::Stale);
        }
        self.pending = None;

        let response = match response {
            Ok(response) => response,
            Err(Error::RoutingNetworkFailure(msg)) => {
                return Err(self.raise(Error::RoutingNetworkFailure(msg)))
            }
            Err(other) => return Err(self.raise(Error::RoutingNetworkFailure(other.to_string()))),
        };

        let Some(first) = response.routes.first() else {
            self.route = None;
            return Err(self.raise(Error::RoutingEmptyResult));
        };

        let coordinates = match first.line() {
            Ok(coordinates) => coordinates,
            Err(e) => return Err(self.raise(e)),
        };
        let Some(bounds) = BoundingBox::from_positions(coordinates) else {
            return Err(self.raise(Error::RoutingNetworkFailure(
                "malformed response: route has no coordinates".to_string(),
            )));
        };

        self.route = Some(RouteResult {
            geometry: route_collection(coordinates.clone()),
            bounds,
            stats: ticket.stats,
            distance_m: first.distance,
            duration_s: first.duration,
        });
        self.camera.fit_bounds(surface, &bounds, self.config.fit_padding);

        info!(
            "Route #{} drawn with {} points, bounds {:?}",
            ticket.generation,
            coordinates.len(),
            bounds
        );
        Ok(RouteOutcome::Drawn)
    }

    /// Draw a route between the selected cells
    pub async fn draw_route(
        &mut self,
        client: &RoutingClient,
        surface: &dyn RenderSurface,
    ) -> Result<RouteOutcome> {
        let ticket = self.begin_route()?;
        let response = client.fetch_route(ticket.origin, ticket.destination).await;
        self.complete_route(&ticket, response, surface)
    }

    /// Current layers and camera for the render surface
    pub fn frame(&self) -> Frame {
        Frame {
            camera: *self.camera.state(),
            layers: build_layers(
                &self.index,
                self.show_cells,
                self.route.as_ref(),
                self.endpoints.as_ref(),
            ),
        }
    }
}

fn non_empty(id: Option<String>) -> Option<String> {
    id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
