//! Drawable layer descriptors derived from dashboard state
//!
//! `build_layers` is a pure function: the same dataset, toggle, route and
//! endpoints always give the same list. Order matters to the render surface,
//! which draws later layers on top: cells, then the route, then the markers.

use geojson::{FeatureCollection, Geometry, JsonObject, JsonValue};
use serde::Serialize;

use crate::core::centroid::Centroid;
use crate::core::color::{color_for, Rgba};
use crate::core::dashboard::{Endpoints, RouteResult};
use crate::core::dataset::{DatasetIndex, DESTINATION_CODE_KEY};

pub const CELLS_LAYER_ID: &str = "hex-cells";
pub const ROUTE_LAYER_ID: &str = "route";
pub const MARKERS_LAYER_ID: &str = "endpoints";

pub const ROUTE_COLOR: Rgba = Rgba::new(255, 0, 128, 255);
pub const ROUTE_WIDTH_PX: f64 = 5.0;

pub const ORIGIN_COLOR: Rgba = Rgba::new(0, 200, 0, 255);
pub const DESTINATION_COLOR: Rgba = Rgba::new(220, 0, 0, 255);
pub const MARKER_RADIUS_M: f64 = 60.0;
pub const MARKER_MIN_PIXELS: f64 = 6.0;

/// One extruded cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellShape {
    pub geometry: Option<Geometry>,
    pub elevation: f64,
    pub fill_color: Rgba,
    pub destination_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellLayer {
    pub id: &'static str,
    pub filled: bool,
    pub extruded: bool,
    pub pickable: bool,
    pub cells: Vec<CellShape>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLayer {
    pub id: &'static str,
    pub filled: bool,
    pub stroked: bool,
    pub line_color: Rgba,
    pub line_width_px: f64,
    pub data: FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRole {
    Origin,
    Destination,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub role: MarkerRole,
    pub position: Centroid,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub id: &'static str,
    pub radius_m: f64,
    pub radius_min_pixels: f64,
    pub points: [Marker; 2],
}

/// A drawable layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Layer {
    Cells(CellLayer),
    Route(RouteLayer),
    Markers(MarkerLayer),
}

impl Layer {
    pub fn id(&self) -> &'static str {
        match self {
            Layer::Cells(l) => l.id,
            Layer::Route(l) => l.id,
            Layer::Markers(l) => l.id,
        }
    }
}

/// Derive the ordered layer list
pub fn build_layers(
    index: &DatasetIndex,
    show_cells: bool,
    route: Option<&RouteResult>,
    endpoints: Option<&Endpoints>,
) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(3);

    if show_cells && index.is_loaded() {
        layers.push(Layer::Cells(cell_layer(index)));
    }

    if let Some(route) = route {
        layers.push(Layer::Route(RouteLayer {
            id: ROUTE_LAYER_ID,
            filled: false,
            stroked: true,
            line_color: ROUTE_COLOR,
            line_width_px: ROUTE_WIDTH_PX,
            data: route.geometry.clone(),
        }));
    }

    if let Some(endpoints) = endpoints {
        layers.push(Layer::Markers(MarkerLayer {
            id: MARKERS_LAYER_ID,
            radius_m: MARKER_RADIUS_M,
            radius_min_pixels: MARKER_MIN_PIXELS,
            points: [
                Marker {
                    role: MarkerRole::Origin,
                    position: endpoints.origin,
                    color: ORIGIN_COLOR,
                },
                Marker {
                    role: MarkerRole::Destination,
                    position: endpoints.destination,
                    color: DESTINATION_COLOR,
                },
            ],
        }));
    }

    layers
}

fn cell_layer(index: &DatasetIndex) -> CellLayer {
    let max = index.max_visit_count();
    let cells = index
        .features()
        .iter()
        .map(|f| {
            let visits = f.visit_count.unwrap_or(0.0);
            CellShape {
                geometry: f.geometry.clone(),
                elevation: visits,
                fill_color: color_for(visits, max),
                destination_code: f.destination_code.clone(),
            }
        })
        .collect();

    CellLayer {
        id: CELLS_LAYER_ID,
        filled: true,
        extruded: true,
        pickable: true,
        cells,
    }
}

/// Tooltip text for a picked cell's properties
pub fn tooltip(properties: &JsonObject) -> Option<String> {
    match properties.get(DESTINATION_CODE_KEY)? {
        JsonValue::String(code) => Some(format!("Destination: {code}")),
        JsonValue::Number(code) => Some(format!("Destination: {code}")),
        _ => None,
    }
}
