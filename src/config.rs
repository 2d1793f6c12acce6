use crate::coords::GeoCoordinate;

/// Presentation and service settings wired together at startup. Defaults
/// mirror the behavior the app ships with; everything here is plain data so
/// a caller can construct a session with different choices.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Viewport center while no location fix is available yet.
    pub fallback_center: GeoCoordinate,
    /// Angular span of the initial viewport, in degrees.
    pub initial_span_deg: f64,
    /// Title given to every dropped pin.
    pub pin_title: String,
    /// Subtitle given to every dropped pin.
    pub pin_subtitle: String,
    /// RGBA stroke color of the route overlay.
    pub route_stroke_rgba: [u8; 4],
    /// Stroke width of the route overlay, in points.
    pub route_stroke_width: f32,
    /// Display name of the tile provider, shown as attribution.
    pub tile_provider_name: String,
    /// Tile URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub tile_url_template: String,
    /// Base URL of the OSRM-compatible routing service.
    pub routing_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_center: GeoCoordinate {
                lat: 60.035351,
                lon: 30.228947,
            },
            initial_span_deg: 0.005,
            pin_title: "New point".to_string(),
            pin_subtitle: "Description of new point".to_string(),
            route_stroke_rgba: [0, 0, 255, 255],
            route_stroke_width: 5.0,
            tile_provider_name: "OpenStreetMap".to_string(),
            tile_url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            routing_url: "https://router.project-osrm.org".to_string(),
        }
    }
}
