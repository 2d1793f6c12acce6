use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A geographic coordinate in decimal degrees.
///
/// Latitude is bounded to ±90°, longitude to ±180°; [`GeoCoordinate::new`]
/// and the [`FromStr`] parser both reject values outside those ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, ParseCoordinateError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ParseCoordinateError::OutOfRange);
        }
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseCoordinateError {
    #[error("expected two comma separated decimal degrees")]
    Malformed,
    #[error("latitude must be within ±90° and longitude within ±180°")]
    OutOfRange,
}

/// Parses free text of the form `"lat, lon"`.
///
/// The text is split on a single comma and both components are trimmed
/// before numeric parsing. Anything else is [`ParseCoordinateError::Malformed`].
impl FromStr for GeoCoordinate {
    type Err = ParseCoordinateError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut components = text.split(',').map(str::trim);
        let (lat, lon) = match (components.next(), components.next(), components.next()) {
            (Some(lat), Some(lon), None) => (lat, lon),
            _ => return Err(ParseCoordinateError::Malformed),
        };
        let lat = lat.parse().map_err(|_| ParseCoordinateError::Malformed)?;
        let lon = lon.parse().map_err(|_| ParseCoordinateError::Malformed)?;
        Self::new(lat, lon)
    }
}
