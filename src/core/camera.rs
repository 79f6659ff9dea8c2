//! Camera state, controller and the headless web-mercator viewport

use serde::{Deserialize, Serialize};

use crate::core::centroid::Centroid;

/// Map view parameters as the render surface consumes them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            longitude: 4.3517,
            latitude: 50.8503,
            zoom: 10.0,
            pitch: 45.0,
            bearing: 0.0,
        }
    }
}

/// Geographic extent as `[min_lng, min_lat]` / `[max_lng, max_lat]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    /// Extent of a sequence of `[lng, lat, ..]` positions, `None` when empty
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Vec<f64>>) -> Option<Self> {
        let mut bounds: Option<BoundingBox> = None;
        for p in positions.into_iter().filter(|p| p.len() >= 2) {
            let (lng, lat) = (p[0], p[1]);
            bounds = Some(match bounds {
                None => BoundingBox { min: [lng, lat], max: [lng, lat] },
                Some(b) => BoundingBox {
                    min: [b.min[0].min(lng), b.min[1].min(lat)],
                    max: [b.max[0].max(lng), b.max[1].max(lat)],
                },
            });
        }
        bounds
    }

    pub fn center(&self) -> Centroid {
        Centroid::new((self.min[0] + self.max[0]) / 2.0, (self.min[1] + self.max[1]) / 2.0)
    }
}

/// The render surface's projection, used to frame a bounding box
pub trait RenderSurface {
    /// Camera state that frames `bounds` with `padding` pixels on each side
    fn fit_bounds(&self, current: &CameraState, bounds: &BoundingBox, padding: u32) -> CameraState;
}

/// Owns the camera state and applies user commands and gestures to it
#[derive(Debug, Clone)]
pub struct CameraController {
    initial: CameraState,
    state: CameraState,
}

impl CameraController {
    pub fn new(initial: CameraState) -> Self {
        Self { initial, state: initial }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Look straight down
    pub fn set_flat(&mut self) {
        self.state.pitch = 0.0;
    }

    /// Add to the bearing; no wrapping into [0, 360)
    pub fn rotate(&mut self, delta_degrees: f64) {
        self.state.bearing += delta_degrees;
    }

    pub fn reset(&mut self) {
        self.state = self.initial;
    }

    /// Gesture update from the render surface; the latest one wins
    pub fn set_view(&mut self, state: CameraState) {
        self.state = state;
    }

    pub fn fit_bounds(&mut self, surface: &dyn RenderSurface, bounds: &BoundingBox, padding: u32) {
        self.state = surface.fit_bounds(&self.state, bounds, padding);
    }
}

/// Tile size the zoom levels are expressed against
const TILE_SIZE: f64 = 512.0;

/// Zoom used when the box has no extent
const MAX_FIT_ZOOM: f64 = 20.0;

/// Headless web-mercator viewport of a fixed pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercatorViewport {
    pub width: u32,
    pub height: u32,
}

impl Default for WebMercatorViewport {
    fn default() -> Self {
        Self { width: 1280, height: 800 }
    }
}

fn project(lng: f64, lat: f64) -> (f64, f64) {
    let lambda = lng.to_radians();
    let phi = lat.to_radians();
    let x = TILE_SIZE * (lambda + std::f64::consts::PI) / (2.0 * std::f64::consts::PI);
    let y = TILE_SIZE * (std::f64::consts::PI - (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln())
        / (2.0 * std::f64::consts::PI);
    (x, y)
}

fn unproject(x: f64, y: f64) -> (f64, f64) {
    let lambda = x / TILE_SIZE * (2.0 * std::f64::consts::PI) - std::f64::consts::PI;
    let phi = 2.0
        * ((std::f64::consts::PI - y / TILE_SIZE * 2.0 * std::f64::consts::PI).exp().atan()
            - std::f64::consts::FRAC_PI_4);
    (lambda.to_degrees(), phi.to_degrees())
}

impl RenderSurface for WebMercatorViewport {
    fn fit_bounds(&self, current: &CameraState, bounds: &BoundingBox, padding: u32) -> CameraState {
        let (x0, y0) = project(bounds.min[0], bounds.max[1]);
        let (x1, y1) = project(bounds.max[0], bounds.min[1]);
        let (dx, dy) = ((x1 - x0).abs(), (y1 - y0).abs());

        let avail_w = (self.width as f64 - 2.0 * padding as f64).max(1.0);
        let avail_h = (self.height as f64 - 2.0 * padding as f64).max(1.0);

        let scale_x = if dx > 0.0 { avail_w / dx } else { f64::INFINITY };
        let scale_y = if dy > 0.0 { avail_h / dy } else { f64::INFINITY };
        let zoom = scale_x.min(scale_y).log2().min(MAX_FIT_ZOOM);

        let (longitude, latitude) = unproject((x0 + x1) / 2.0, (y0 + y1) / 2.0);

        CameraState {
            longitude,
            latitude,
            zoom,
            ..*current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_flat_and_rotate() {
        let mut camera = CameraController::new(CameraState::default());
        camera.set_flat();
        assert_eq!(camera.state().pitch, 0.0);

        camera.rotate(30.0);
        camera.rotate(350.0);
        assert_eq!(camera.state().bearing, 380.0);

        camera.rotate(-400.0);
        assert_eq!(camera.state().bearing, -20.0);
    }

    #[test]
    fn test_reset_restores_initial() {
        let initial = CameraState {
            longitude: 2.35,
            latitude: 48.85,
            zoom: 11.0,
            pitch: 30.0,
            bearing: 10.0,
        };
        let mut camera = CameraController::new(initial);
        camera.set_flat();
        camera.rotate(90.0);
        camera.set_view(CameraState { zoom: 3.0, ..initial });
        camera.reset();
        assert_eq!(*camera.state(), initial);
    }

    #[test]
    fn test_latest_gesture_wins() {
        let mut camera = CameraController::new(CameraState::default());
        let first = CameraState { zoom: 12.0, ..CameraState::default() };
        let second = CameraState { zoom: 7.5, longitude: 5.0, ..CameraState::default() };
        camera.set_view(first);
        camera.set_view(second);
        assert_eq!(*camera.state(), second);
    }

    #[test]
    fn test_bounding_box_from_positions() {
        let coords = vec![vec![4.3, 50.9], vec![4.5, 50.8], vec![4.4, 51.0]];
        let bbox = BoundingBox::from_positions(&coords).unwrap();
        assert_eq!(bbox.min, [4.3, 50.8]);
        assert_eq!(bbox.max, [4.5, 51.0]);
        assert!(BoundingBox::from_positions(&Vec::<Vec<f64>>::new()).is_none());
    }

    #[test]
    fn test_projection_round_trip() {
        let (x, y) = project(4.35, 50.85);
        let (lng, lat) = unproject(x, y);
        assert!((lng - 4.35).abs() < 1e-9);
        assert!((lat - 50.85).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_fit_centers_and_zooms() {
        let viewport = WebMercatorViewport { width: 800, height: 600 };
        let bounds = BoundingBox { min: [-10.0, -10.0], max: [10.0, 10.0] };
        let current = CameraState { pitch: 45.0, bearing: 15.0, ..CameraState::default() };

        let fitted = viewport.fit_bounds(&current, &bounds, 20);
        assert!(fitted.longitude.abs() < 1e-9);
        assert!(fitted.latitude.abs() < 1e-6);
        assert_eq!(fitted.pitch, 45.0);
        assert_eq!(fitted.bearing, 15.0);

        // 20 degrees spans 512 * 20/360 px at zoom 0; the taller axis limits at 560 px
        let world_height = {
            let (_, y0) = project(0.0, 10.0);
            let (_, y1) = project(0.0, -10.0);
            y1 - y0
        };
        let expected = (560.0 / world_height).log2();
        assert!((fitted.zoom - expected).abs() < 1e-9, "zoom {}", fitted.zoom);
    }

    #[test]
    fn test_viewport_fit_single_point_caps_zoom() {
        let viewport = WebMercatorViewport::default();
        let bounds = BoundingBox { min: [4.35, 50.85], max: [4.35, 50.85] };
        let fitted = viewport.fit_bounds(&CameraState::default(), &bounds, 40);
        assert_eq!(fitted.zoom, MAX_FIT_ZOOM);
        assert!((fitted.longitude - 4.35).abs() < 1e-9);
    }

    #[test]
    fn test_controller_fit_uses_surface() {
        struct Fixed;
        impl RenderSurface for Fixed {
            fn fit_bounds(&self, current: &CameraState, bounds: &BoundingBox, padding: u32) -> CameraState {
                let c = bounds.center();
                CameraState { longitude: c.lng, latitude: c.lat, zoom: padding as f64, ..*current }
            }
        }

        let mut camera = CameraController::new(CameraState::default());
        camera.fit_bounds(&Fixed, &BoundingBox { min: [0.0, 0.0], max: [2.0, 4.0] }, 40);
        assert_eq!(camera.state().longitude, 1.0);
        assert_eq!(camera.state().latitude, 2.0);
        assert_eq!(camera.state().zoom, 40.0);
        assert_eq!(camera.state().pitch, CameraState::default().pitch);
    }
}
