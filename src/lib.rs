//! A single-screen map application: drop pins on a slippy map, then plot a
//! driving route from the current location to the first dropped pin.
//!
//! The heavy lifting is delegated: tiles and projection to the map widget,
//! route computation to an OSRM-compatible backend, location fixes to a
//! pluggable [`location::LocationService`]. This crate owns the thin layer
//! in between: coordinate parsing, pin state and the session controller.

pub mod app;
pub mod config;
pub mod coords;
pub mod location;
pub mod map;
pub mod pin;
pub mod route;
pub mod session;

pub use config::Config;
pub use coords::{GeoCoordinate, ParseCoordinateError};
pub use pin::{Pin, PinStore};
pub use route::{RouteError, RoutePath, RouteRequest, Router, TravelMode};
pub use session::MapSession;
