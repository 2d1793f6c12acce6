//! The session controller: the single mediator between user intents and the
//! map state the view renders from.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

use log::{debug, error};

use crate::config::Config;
use crate::coords::GeoCoordinate;
use crate::location::LocationService;
use crate::pin::{Pin, PinStore};
use crate::route::{Region, RouteError, RoutePath, RoutePlanner, Router};

/// Where the view should move next: a center plus an angular span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: GeoCoordinate,
    pub lat_span: f64,
    pub lon_span: f64,
}

impl From<Region> for Viewport {
    fn from(region: Region) -> Self {
        Self {
            center: region.center,
            lat_span: region.lat_span,
            lon_span: region.lon_span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Uninitialized,
    Ready,
}

/// One map session. Explicitly constructed with its collaborators; all
/// methods must be called from the UI thread. Asynchronous results (route
/// outcomes, location updates) are integrated by [`MapSession::poll`].
pub struct MapSession {
    config: Config,
    location: Box<dyn LocationService>,
    planner: RoutePlanner,
    pins: PinStore,
    route: Option<RoutePath>,
    pending_routes: Vec<Receiver<Result<RoutePath, RouteError>>>,
    viewport_intent: Option<Viewport>,
    alert: Option<String>,
    state: SessionState,
}

impl MapSession {
    pub fn new(
        config: Config,
        location: Box<dyn LocationService>,
        router: Arc<dyn Router>,
    ) -> Self {
        Self {
            config,
            location,
            planner: RoutePlanner::new(router),
            pins: PinStore::new(),
            route: None,
            pending_routes: Vec::new(),
            viewport_intent: None,
            alert: None,
            state: SessionState::Uninitialized,
        }
    }

    /// First-display setup: asks for location permission, starts updates and
    /// centers the viewport on the best fix available right now, falling
    /// back to the configured center. Never waits for a fix to arrive.
    pub fn initialize(&mut self) {
        if self.state == SessionState::Ready {
            return;
        }
        self.location.request_permission();
        self.location.start_updates();
        let center = self
            .location
            .current_fix()
            .unwrap_or(self.config.fallback_center);
        self.viewport_intent = Some(Viewport {
            center,
            lat_span: self.config.initial_span_deg,
            lon_span: self.config.initial_span_deg,
        });
        self.state = SessionState::Ready;
    }

    /// Press-gesture path: the map layer has already converted the screen
    /// point into a coordinate through its projection.
    pub fn drop_pin(&mut self, coordinate: GeoCoordinate) {
        let pin = Pin::new(
            coordinate,
            self.config.pin_title.clone(),
            self.config.pin_subtitle.clone(),
        );
        self.pins.add(pin);
    }

    /// Dialog-confirm path. Text that does not parse is dropped without
    /// user feedback.
    pub fn submit_coordinate_text(&mut self, text: &str) {
        match text.parse::<GeoCoordinate>() {
            Ok(coordinate) => self.drop_pin(coordinate),
            Err(err) => debug!("ignoring coordinate input {text:?}: {err}"),
        }
    }

    /// Requests a driving route from the current fix to the first pin. A
    /// missing fix or an empty pin store makes this a no-op. A request
    /// already in flight is not cancelled; every outcome is applied in
    /// arrival order.
    pub fn request_route(&mut self) {
        let origin = self.location.current_fix();
        let destination = self.pins.first().map(|pin| pin.coordinate);
        if let Some(pending) = self.planner.request(origin, destination) {
            self.pending_routes.push(pending);
        }
    }

    /// Integrates results that arrived since the last frame.
    pub fn poll(&mut self) {
        let mut index = 0;
        while index < self.pending_routes.len() {
            match self.pending_routes[index].try_recv() {
                Ok(outcome) => {
                    self.pending_routes.remove(index);
                    self.finish_route(outcome);
                }
                Err(TryRecvError::Empty) => index += 1,
                Err(TryRecvError::Disconnected) => {
                    self.pending_routes.remove(index);
                }
            }
        }
    }

    fn finish_route(&mut self, outcome: Result<RoutePath, RouteError>) {
        match outcome {
            Ok(path) => {
                self.viewport_intent = Some(Viewport::from(path.region));
                self.route = Some(path);
            }
            Err(err) => {
                error!("route request failed: {err}");
                self.alert = Some(format!("Could not build a route. {err}"));
            }
        }
    }

    pub fn pins(&self) -> &[Pin] {
        self.pins.all()
    }

    /// The route overlay to draw, once one has been received.
    pub fn route(&self) -> Option<&RoutePath> {
        self.route.as_ref()
    }

    /// Best-known location fix; also drains any queued updates, newest wins.
    pub fn current_fix(&mut self) -> Option<GeoCoordinate> {
        self.location.current_fix()
    }

    /// Takes the pending viewport change, if any. The view applies it once.
    pub fn take_viewport_intent(&mut self) -> Option<Viewport> {
        self.viewport_intent.take()
    }

    /// Message for a blocking alert, set when a route request fails.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}
