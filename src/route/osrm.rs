//! Routing backend for OSRM-compatible `route/v1` HTTP services.

use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::coords::GeoCoordinate;
use crate::route::{RouteError, RoutePath, RouteRequest, Router, TravelMode};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct OsrmRouter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl OsrmRouter {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RouteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| RouteError::Unreachable(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn route_url(&self, request: &RouteRequest) -> String {
        let profile = match request.mode {
            TravelMode::Driving => "driving",
        };
        // OSRM wants lon,lat pairs.
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            profile,
            request.origin.lon,
            request.origin.lat,
            request.destination.lon,
            request.destination.lat,
        )
    }
}

impl Router for OsrmRouter {
    fn route(&self, request: &RouteRequest) -> Result<Vec<RoutePath>, RouteError> {
        let url = self.route_url(request);
        debug!("requesting {url}");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("alternatives", "true"),
                ("overview", "full"),
                ("geometries", "geojson"),
            ])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|err| RouteError::Unreachable(err.to_string()))?;
        let body: RouteResponse = response
            .json()
            .map_err(|err| RouteError::Unreachable(err.to_string()))?;
        decode(body)
    }
}

#[derive(Deserialize)]
struct RouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: Geometry,
    distance: f64,
    duration: f64,
}

#[derive(Deserialize)]
struct Geometry {
    // GeoJSON order: [lon, lat]
    coordinates: Vec<[f64; 2]>,
}

fn decode(body: RouteResponse) -> Result<Vec<RoutePath>, RouteError> {
    if body.code != "Ok" {
        return Err(RouteError::Rejected(body.message.unwrap_or(body.code)));
    }

    let mut paths = Vec::with_capacity(body.routes.len());
    for route in body.routes {
        let polyline = route
            .geometry
            .coordinates
            .iter()
            .map(|&[lon, lat]| GeoCoordinate::new(lat, lon))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| RouteError::Rejected(err.to_string()))?;
        if let Some(path) = RoutePath::from_polyline(polyline, route.distance, route.duration) {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        Err(RouteError::NoRoutes)
    } else {
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn request_url_is_lon_lat_ordered() {
        let router = OsrmRouter::new("https://example.com/").unwrap();
        let request = RouteRequest::driving(coordinate(60.0, 30.0), coordinate(61.5, 31.25));
        assert_eq!(
            router.route_url(&request),
            "https://example.com/route/v1/driving/30,60;31.25,61.5"
        );
    }

    #[test]
    fn decodes_routes_with_geojson_geometry() {
        let body: RouteResponse = serde_json::from_str(
            r#"{
                "code": "Ok",
                "routes": [
                    {
                        "geometry": {"coordinates": [[30.0, 60.0], [30.1, 60.1], [30.2, 60.05]]},
                        "distance": 15210.5,
                        "duration": 1201.9
                    },
                    {
                        "geometry": {"coordinates": [[30.0, 60.0], [30.2, 60.05]]},
                        "distance": 17000.0,
                        "duration": 1500.0
                    }
                ],
                "waypoints": []
            }"#,
        )
        .unwrap();

        let paths = decode(body).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(
            paths[0].polyline,
            vec![
                coordinate(60.0, 30.0),
                coordinate(60.1, 30.1),
                coordinate(60.05, 30.2)
            ]
        );
        assert_eq!(paths[0].distance_m, 15210.5);
        assert_eq!(paths[0].duration_s, 1201.9);
    }

    #[test]
    fn non_ok_code_is_rejected_with_its_message() {
        let body: RouteResponse = serde_json::from_str(
            r#"{"code": "NoRoute", "message": "no route found"}"#,
        )
        .unwrap();
        assert_eq!(decode(body), Err(RouteError::Rejected("no route found".into())));
    }

    #[test]
    fn non_ok_code_without_message_falls_back_to_the_code() {
        let body: RouteResponse =
            serde_json::from_str(r#"{"code": "InvalidUrl", "routes": []}"#).unwrap();
        assert_eq!(decode(body), Err(RouteError::Rejected("InvalidUrl".into())));
    }

    #[test]
    fn ok_without_routes_is_no_routes() {
        let body: RouteResponse = serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).unwrap();
        assert_eq!(decode(body), Err(RouteError::NoRoutes));
    }
}
