//! Client for the external routing service (OSRM HTTP API)
//!
//! One GET per request, no retries and no overall timeout: a request that
//! never answers leaves the caller pending.

use std::time::Duration;

use geojson::{Geometry, Value};
use log::debug;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

use crate::core::centroid::Centroid;
use crate::core::error::{Error, Result};

/// Global HTTP client shared by dataset and routing requests
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("hexroute/{}", env!("HEXROUTE_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
});

pub(crate) fn http_client() -> &'static Client {
    &GLOBAL_CLIENT
}

/// A candidate route as returned by the service
#[derive(Debug, Clone, Deserialize)]
pub struct RouteCandidate {
    pub geometry: Geometry,
    /// Meters
    #[serde(default)]
    pub distance: Option<f64>,
    /// Seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

impl RouteCandidate {
    /// Coordinates of the route line
    pub fn line(&self) -> Result<&Vec<Vec<f64>>> {
        match &self.geometry.value {
            Value::LineString(coords) => Ok(coords),
            _ => Err(Error::RoutingNetworkFailure(
                "malformed response: route geometry is not a LineString".to_string(),
            )),
        }
    }
}

/// Body of a route response
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteCandidate>,
}

/// Routing service client
#[derive(Debug, Clone)]
pub struct RoutingClient {
    base_url: String,
    profile: String,
}

impl RoutingClient {
    pub fn new(base_url: &str, profile: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            profile: profile.to_string(),
        }
    }

    /// Request URL for a route between two points
    pub fn route_url(&self, from: Centroid, to: Centroid) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, self.profile, from.lng, from.lat, to.lng, to.lat
        )
    }

    /// Fetch candidate routes between two points
    pub async fn fetch_route(&self, from: Centroid, to: Centroid) -> Result<RouteResponse> {
        let url = self.route_url(from, to);
        debug!("GET {url}");

        let response = http_client().get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<RouteResponse>(&body) {
            Ok(parsed) => {
                if !status.is_success() {
                    debug!("Routing service answered {status} with code {:?}", parsed.code);
                }
                Ok(parsed)
            }
            Err(_) if !status.is_success() => Err(Error::RoutingNetworkFailure(format!(
                "routing service answered {status}"
            ))),
            Err(e) => Err(Error::RoutingNetworkFailure(format!("malformed response: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn from() -> Centroid {
        Centroid::new(4.35, 50.85)
    }

    fn to() -> Centroid {
        Centroid::new(4.4, 50.9)
    }

    #[test]
    fn test_route_url() {
        let client = RoutingClient::new("https://router.project-osrm.org/", "driving");
        assert_eq!(
            client.route_url(Centroid::new(1.0, 2.5), Centroid::new(-3.25, 4.0)),
            "https://router.project-osrm.org/route/v1/driving/1,2.5;-3.25,4?overview=full&geometries=geojson"
        );
    }

    #[tokio::test]
    async fn test_fetch_route_parses_geometry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/route/v1/driving/4.35,50.85;4.4,50.9"))
            .and(query_param("geometries", "geojson"))
            .and(query_param("overview", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "Ok",
                "routes": [{
                    "geometry": { "type": "LineString", "coordinates": [[4.35, 50.85], [4.38, 50.88], [4.4, 50.9]] },
                    "distance": 8123.4,
                    "duration": 640.2
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RoutingClient::new(&server.uri(), "driving");
        let response = client.fetch_route(from(), to()).await.unwrap();
        assert_eq!(response.code.as_deref(), Some("Ok"));
        assert_eq!(response.routes.len(), 1);
        assert_eq!(response.routes[0].line().unwrap().len(), 3);
        assert_eq!(response.routes[0].distance, Some(8123.4));
    }

    #[tokio::test]
    async fn test_fetch_route_no_route_body_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "NoRoute",
                "message": "Impossible route between points"
            })))
            .mount(&server)
            .await;

        let client = RoutingClient::new(&server.uri(), "driving");
        let response = client.fetch_route(from(), to()).await.unwrap();
        assert!(response.routes.is_empty());
        assert_eq!(response.code.as_deref(), Some("NoRoute"));
    }

    #[tokio::test]
    async fn test_fetch_route_unparsable_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let client = RoutingClient::new(&server.uri(), "driving");
        let err = client.fetch_route(from(), to()).await.unwrap_err();
        assert!(matches!(err, Error::RoutingNetworkFailure(msg) if msg.contains("502")));
    }

    #[tokio::test]
    async fn test_fetch_route_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = RoutingClient::new(&server.uri(), "driving");
        let err = client.fetch_route(from(), to()).await.unwrap_err();
        assert!(matches!(err, Error::RoutingNetworkFailure(msg) if msg.contains("malformed")));
    }

    #[tokio::test]
    async fn test_fetch_route_wrong_shape_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "routes": 5 })))
            .mount(&server)
            .await;

        let client = RoutingClient::new(&server.uri(), "driving");
        let err = client.fetch_route(from(), to()).await.unwrap_err();
        assert!(
            matches!(&err, Error::RoutingNetworkFailure(msg) if msg.starts_with("malformed response:")),
            "{err}"
        );
    }

    #[tokio::test]
    async fn test_fetch_route_connection_refused() {
        // Nothing listens on port 1
        let client = RoutingClient::new("http://127.0.0.1:1", "driving");
        let err = client.fetch_route(from(), to()).await.unwrap_err();
        assert!(matches!(err, Error::RoutingNetworkFailure(_)));
    }

    #[test]
    fn test_non_line_geometry_is_malformed() {
        let candidate: RouteCandidate = serde_json::from_value(json!({
            "geometry": { "type": "Point", "coordinates": [4.35, 50.85] }
        }))
        .unwrap();
        assert!(matches!(candidate.line(), Err(Error::RoutingNetworkFailure(_))));
    }
}
