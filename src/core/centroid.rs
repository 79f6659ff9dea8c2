//! Cell centroid approximation
//!
//! The centroid of a cell is the plain mean of its outer ring's vertices.
//! Routing and bounding both consume this exact value, so it is kept as the
//! vertex mean rather than the area-weighted centroid.

use geojson::{Geometry, Value};
use serde::Serialize;

/// A `[longitude, latitude]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub lng: f64,
    pub lat: f64,
}

impl Centroid {
    pub const ORIGIN: Centroid = Centroid { lng: 0.0, lat: 0.0 };

    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn as_pair(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

/// Mean vertex of the first ring of a polygon
///
/// Anything that is not a polygon with at least one vertex, including a
/// missing geometry, yields `[0, 0]`. The closing vertex of a closed ring
/// is not counted twice.
pub fn centroid_of(geometry: Option<&Geometry>) -> Centroid {
    let ring = match geometry.map(|g| &g.value) {
        Some(Value::Polygon(rings)) => match rings.first() {
            Some(ring) => ring,
            None => return Centroid::ORIGIN,
        },
        _ => return Centroid::ORIGIN,
    };

    let vertices = open_ring(ring);
    if vertices.is_empty() {
        return Centroid::ORIGIN;
    }

    let (sum_lng, sum_lat) = vertices
        .iter()
        .filter(|p| p.len() >= 2)
        .fold((0.0, 0.0), |(x, y), p| (x + p[0], y + p[1]));
    let n = vertices.iter().filter(|p| p.len() >= 2).count();
    if n == 0 {
        return Centroid::ORIGIN;
    }

    Centroid::new(sum_lng / n as f64, sum_lat / n as f64)
}

fn open_ring(ring: &[Vec<f64>]) -> &[Vec<f64>] {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(ring: &[[f64; 2]]) -> Geometry {
        Geometry::new(Value::Polygon(vec![ring.iter().map(|p| p.to_vec()).collect()]))
    }

    #[test]
    fn test_square_centroid() {
        let square = polygon(&[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0], [0.0, 0.0]]);
        assert_eq!(centroid_of(Some(&square)), Centroid::new(1.0, 1.0));
    }

    #[test]
    fn test_vertex_mean_not_area_weighted() {
        // Extra vertex on one edge pulls the mean toward it
        let ring = polygon(&[[0.0, 0.0], [0.0, 1.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0], [0.0, 0.0]]);
        assert_eq!(centroid_of(Some(&ring)), Centroid::new(0.8, 1.0));
    }

    #[test]
    fn test_only_outer_ring_counts() {
        let geometry = Geometry::new(Value::Polygon(vec![
            vec![vec![0.0, 0.0], vec![0.0, 4.0], vec![4.0, 4.0], vec![4.0, 0.0], vec![0.0, 0.0]],
            vec![vec![3.0, 3.0], vec![3.0, 3.5], vec![3.5, 3.5], vec![3.0, 3.0]],
        ]));
        assert_eq!(centroid_of(Some(&geometry)), Centroid::new(2.0, 2.0));
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(centroid_of(None), Centroid::ORIGIN);

        let point = Geometry::new(Value::Point(vec![3.0, 4.0]));
        assert_eq!(centroid_of(Some(&point)), Centroid::ORIGIN);

        let empty = Geometry::new(Value::Polygon(vec![]));
        assert_eq!(centroid_of(Some(&empty)), Centroid::ORIGIN);

        let empty_ring = Geometry::new(Value::Polygon(vec![vec![]]));
        assert_eq!(centroid_of(Some(&empty_ring)), Centroid::ORIGIN);
    }
}
