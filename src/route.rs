//! Route types, the routing backend seam and the planner that submits
//! requests off the UI thread.

pub mod osrm;

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use log::info;
use thiserror::Error;

use crate::coords::GeoCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Driving,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub origin: GeoCoordinate,
    pub destination: GeoCoordinate,
    pub mode: TravelMode,
}

impl RouteRequest {
    pub fn driving(origin: GeoCoordinate, destination: GeoCoordinate) -> Self {
        Self {
            origin,
            destination,
            mode: TravelMode::Driving,
        }
    }
}

/// The smallest viewport that fully contains a geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center: GeoCoordinate,
    pub lat_span: f64,
    pub lon_span: f64,
}

impl Region {
    /// Bounding region of a set of points, `None` when the set is empty.
    pub fn bounding(points: &[GeoCoordinate]) -> Option<Self> {
        let first = points.first()?;
        let mut min_lat = first.lat;
        let mut max_lat = first.lat;
        let mut min_lon = first.lon;
        let mut max_lon = first.lon;
        for point in &points[1..] {
            min_lat = min_lat.min(point.lat);
            max_lat = max_lat.max(point.lat);
            min_lon = min_lon.min(point.lon);
            max_lon = max_lon.max(point.lon);
        }
        let center = GeoCoordinate::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0).ok()?;
        Some(Self {
            center,
            lat_span: max_lat - min_lat,
            lon_span: max_lon - min_lon,
        })
    }
}

/// One computed route: its polyline, the region that contains it and the
/// totals reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    pub polyline: Vec<GeoCoordinate>,
    pub region: Region,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl RoutePath {
    /// Builds a path from its polyline, `None` when the polyline is empty.
    pub fn from_polyline(
        polyline: Vec<GeoCoordinate>,
        distance_m: f64,
        duration_s: f64,
    ) -> Option<Self> {
        let region = Region::bounding(&polyline)?;
        Some(Self {
            polyline,
            region,
            distance_m,
            duration_s,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("routing service unreachable: {0}")]
    Unreachable(String),
    #[error("{0}")]
    Rejected(String),
    #[error("routing service returned no routes")]
    NoRoutes,
}

/// A routing backend. Implementations may block; the planner always calls
/// them from a worker thread.
pub trait Router: Send + Sync {
    fn route(&self, request: &RouteRequest) -> Result<Vec<RoutePath>, RouteError>;
}

/// Builds a driving request from the session's origin and destination and
/// submits it to the backend without suspending the caller.
pub struct RoutePlanner {
    router: Arc<dyn Router>,
}

impl RoutePlanner {
    pub fn new(router: Arc<dyn Router>) -> Self {
        Self { router }
    }

    /// Submits a request and returns the channel its outcome will arrive on.
    ///
    /// When origin or destination is absent nothing is submitted and `None`
    /// is returned. Of multiple candidate routes only the first is kept.
    /// There is no retry and no cancellation; an abandoned receiver simply
    /// drops the outcome.
    pub fn request(
        &self,
        origin: Option<GeoCoordinate>,
        destination: Option<GeoCoordinate>,
    ) -> Option<Receiver<Result<RoutePath, RouteError>>> {
        let (origin, destination) = match (origin, destination) {
            (Some(origin), Some(destination)) => (origin, destination),
            _ => {
                info!("route requested without an origin fix or a destination pin, ignoring");
                return None;
            }
        };

        let request = RouteRequest::driving(origin, destination);
        let router = Arc::clone(&self.router);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let outcome = router
                .route(&request)
                .and_then(|routes| routes.into_iter().next().ok_or(RouteError::NoRoutes));
            let _ = tx.send(outcome);
        });
        Some(rx)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    struct StubRouter {
        calls: Arc<AtomicUsize>,
        outcome: Result<Vec<RoutePath>, RouteError>,
    }

    impl Router for StubRouter {
        fn route(&self, _request: &RouteRequest) -> Result<Vec<RoutePath>, RouteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn coordinate(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    fn path(start_lat: f64) -> RoutePath {
        RoutePath::from_polyline(
            vec![coordinate(start_lat, 30.0), coordinate(start_lat + 1.0, 31.0)],
            1200.0,
            180.0,
        )
        .unwrap()
    }

    fn planner_with(
        outcome: Result<Vec<RoutePath>, RouteError>,
    ) -> (RoutePlanner, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = StubRouter {
            calls: Arc::clone(&calls),
            outcome,
        };
        (RoutePlanner::new(Arc::new(router)), calls)
    }

    #[test]
    fn missing_origin_or_destination_submits_nothing() {
        let (planner, calls) = planner_with(Ok(vec![path(60.0)]));
        assert!(planner.request(None, Some(coordinate(60.0, 30.0))).is_none());
        assert!(planner.request(Some(coordinate(60.0, 30.0)), None).is_none());
        assert!(planner.request(None, None).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn first_candidate_wins() {
        let (planner, calls) = planner_with(Ok(vec![path(60.0), path(10.0)]));
        let rx = planner
            .request(Some(coordinate(60.0, 30.0)), Some(coordinate(61.0, 31.0)))
            .unwrap();
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.unwrap(), path(60.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_candidate_list_is_an_error() {
        let (planner, _) = planner_with(Ok(vec![]));
        let rx = planner
            .request(Some(coordinate(60.0, 30.0)), Some(coordinate(61.0, 31.0)))
            .unwrap();
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome, Err(RouteError::NoRoutes));
    }

    #[test]
    fn backend_failure_is_passed_through() {
        let (planner, _) = planner_with(Err(RouteError::Rejected("no route found".into())));
        let rx = planner
            .request(Some(coordinate(60.0, 30.0)), Some(coordinate(61.0, 31.0)))
            .unwrap();
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome, Err(RouteError::Rejected("no route found".into())));
    }

    #[test]
    fn bounding_region_covers_the_polyline() {
        let region = Region::bounding(&[
            coordinate(60.0, 30.0),
            coordinate(60.5, 30.2),
            coordinate(60.1, 29.8),
        ])
        .unwrap();
        assert_eq!(region.center, coordinate(60.25, 30.0));
        assert!((region.lat_span - 0.5).abs() < 1e-9);
        assert!((region.lon_span - 0.4).abs() < 1e-9);
        assert!(Region::bounding(&[]).is_none());
    }
}
