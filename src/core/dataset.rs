//! Hexagon dataset loading and indexing
//!
//! The dataset is a GeoJSON feature collection of polygon cells. It is loaded
//! once, wrapped in an `Arc`, and never mutated afterwards. `DatasetIndex`
//! derives the selection option lists from it and only recomputes them when
//! it is handed a different dataset.

use std::collections::BTreeSet;
use std::sync::Arc;

use geojson::{FeatureCollection, Geometry, JsonObject, JsonValue};
use log::{debug, error, info};

use crate::core::error::{Error, Result};
use crate::core::routing::http_client;
use crate::core::source::{resolve_source, DatasetSource};

pub const ORIGIN_CODE_KEY: &str = "origin_code_level_9";
pub const DESTINATION_CODE_KEY: &str = "destination_code_level_9";
pub const VISIT_COUNT_KEY: &str = "EXTRAPOLATED_NUMBER_OF_USERS";
pub const CO2_PER_TRIP_KEY: &str = "Single_CarTrip_Co2";

/// One polygon cell with its identifiers and statistics
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Option<Geometry>,
    pub origin_code: Option<String>,
    pub destination_code: Option<String>,
    pub visit_count: Option<f64>,
    /// Grams of CO2 for a single car trip
    pub co2_per_trip: Option<f64>,
}

impl Feature {
    fn from_geojson(feature: geojson::Feature) -> Self {
        let props = feature.properties.unwrap_or_default();
        Self {
            geometry: feature.geometry,
            origin_code: code_property(&props, ORIGIN_CODE_KEY),
            destination_code: code_property(&props, DESTINATION_CODE_KEY),
            visit_count: number_property(&props, VISIT_COUNT_KEY),
            co2_per_trip: number_property(&props, CO2_PER_TRIP_KEY),
        }
    }

    /// Properties as the render surface reports them on hover/click
    pub fn properties(&self) -> JsonObject {
        let mut props = JsonObject::new();
        let code = |c: &Option<String>| c.clone().map_or(JsonValue::Null, JsonValue::String);
        props.insert(ORIGIN_CODE_KEY.to_string(), code(&self.origin_code));
        props.insert(DESTINATION_CODE_KEY.to_string(), code(&self.destination_code));
        props.insert(VISIT_COUNT_KEY.to_string(), self.visit_count.into());
        props.insert(CO2_PER_TRIP_KEY.to_string(), self.co2_per_trip.into());
        props
    }
}

// Codes are strings in the published data, but numeric codes are accepted too
fn code_property(props: &JsonObject, key: &str) -> Option<String> {
    match props.get(key)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_property(props: &JsonObject, key: &str) -> Option<f64> {
    match props.get(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The immutable, ordered set of cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    features: Vec<Feature>,
}

impl Dataset {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Parse a GeoJSON feature collection
    pub fn from_geojson_str(json: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(json)
            .map_err(|e| Error::DatasetLoadFailure(format!("invalid feature collection: {}", e)))?;
        Ok(Self::from(collection))
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl From<FeatureCollection> for Dataset {
    fn from(collection: FeatureCollection) -> Self {
        Self::new(collection.features.into_iter().map(Feature::from_geojson).collect())
    }
}

/// Fetch and parse the dataset from its source
pub async fn fetch_dataset(source: &DatasetSource) -> Result<Dataset> {
    let body = match source {
        DatasetSource::Http { url } => {
            let response = http_client()
                .get(url)
                .send()
                .await
                .map_err(|e| Error::DatasetLoadFailure(e.to_string()))?;
            if !response.status().is_success() {
                let status = response.status();
                return Err(Error::DatasetLoadFailure(format!("{url} answered {status}")));
            }
            response
                .text()
                .await
                .map_err(|e| Error::DatasetLoadFailure(e.to_string()))?
        }
        DatasetSource::File { path } => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::DatasetLoadFailure(format!("{path}: {e}")))?,
    };

    Dataset::from_geojson_str(&body)
}

/// Load the dataset at startup
///
/// Failure is logged and yields `None`; the dashboard keeps working with an
/// empty map.
pub async fn load_dataset(dataset: &str) -> Option<Arc<Dataset>> {
    let source = resolve_source(dataset);
    match fetch_dataset(&source).await {
        Ok(dataset) => {
            info!("Loaded {} cells from {:?}", dataset.len(), source);
            Some(Arc::new(dataset))
        }
        Err(e) => {
            error!("{e}");
            None
        }
    }
}

/// Option lists and scale derived from the loaded dataset
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    dataset: Option<Arc<Dataset>>,
    origin_options: Vec<String>,
    destination_options: Vec<String>,
    max_visit_count: f64,
}

impl Default for DatasetIndex {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DatasetIndex {
    pub fn new(dataset: Option<Arc<Dataset>>) -> Self {
        let mut index = Self {
            dataset: None,
            origin_options: Vec::new(),
            destination_options: Vec::new(),
            max_visit_count: 1.0,
        };
        index.derive(dataset);
        index
    }

    /// Swap in a dataset, re-deriving only when it is a different one
    ///
    /// Returns whether the derived lists were recomputed.
    pub fn update(&mut self, dataset: Option<Arc<Dataset>>) -> bool {
        let same = match (&self.dataset, &dataset) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return false;
        }
        self.derive(dataset);
        true
    }

    fn derive(&mut self, dataset: Option<Arc<Dataset>>) {
        let features = dataset.as_deref().map(Dataset::features).unwrap_or_default();

        self.origin_options = unique_sorted(features.iter().filter_map(|f| f.origin_code.as_deref()));
        self.destination_options =
            unique_sorted(features.iter().filter_map(|f| f.destination_code.as_deref()));

        let max = features
            .iter()
            .filter_map(|f| f.visit_count)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        self.max_visit_count = if max > 0.0 { max } else { 1.0 };

        debug!(
            "Derived {} origins, {} destinations, max visits {}",
            self.origin_options.len(),
            self.destination_options.len(),
            self.max_visit_count
        );
        self.dataset = dataset;
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    pub fn features(&self) -> &[Feature] {
        self.dataset.as_deref().map(Dataset::features).unwrap_or_default()
    }

    pub fn origin_options(&self) -> &[String] {
        &self.origin_options
    }

    pub fn destination_options(&self) -> &[String] {
        &self.destination_options
    }

    /// Largest visit count in the dataset, never below 1 when there is none
    pub fn max_visit_count(&self) -> f64 {
        self.max_visit_count
    }

    /// First feature whose origin code matches
    pub fn find_origin(&self, id: &str) -> Option<&Feature> {
        self.features().iter().find(|f| f.origin_code.as_deref() == Some(id))
    }

    /// First feature whose destination code matches
    pub fn find_destination(&self, id: &str) -> Option<&Feature> {
        self.features().iter().find(|f| f.destination_code.as_deref() == Some(id))
    }
}

fn unique_sorted<'a>(codes: impl Iterator<Item = &'a str>) -> Vec<String> {
    codes
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
