//! Glue between the session state and the walkers map widget: tile source,
//! gesture and overlay plugins, viewport conversions.

use std::sync::{Arc, Mutex};

use egui::{Align2, Color32, FontId, Response, Stroke, Ui};
use walkers::sources::{Attribution, TileSource};
use walkers::{lat_lon, MapMemory, Plugin, Position, Projector, TileId};

use crate::config::Config;
use crate::coords::GeoCoordinate;
use crate::pin::Pin;
use crate::route::RoutePath;
use crate::session::Viewport;

pub fn position(coordinate: GeoCoordinate) -> Position {
    lat_lon(coordinate.lat, coordinate.lon)
}

pub fn coordinate(position: Position) -> Option<GeoCoordinate> {
    GeoCoordinate::new(position.y(), position.x()).ok()
}

/// Zoom level whose visible extent roughly matches the given span.
pub fn zoom_for_span(span_deg: f64) -> f64 {
    (360.0 / span_deg).log2()
}

/// Moves the map to a viewport intent. The span is approximated by the zoom
/// level that shows it; walkers rejects absurd levels, which we only log.
pub fn apply_viewport(memory: &mut MapMemory, viewport: Viewport) {
    memory.center_at(position(viewport.center));
    let span = viewport.lat_span.max(viewport.lon_span).max(1e-6);
    if let Err(err) = memory.set_zoom(zoom_for_span(span).clamp(2.0, 19.0)) {
        log::warn!("cannot apply zoom for span {span}: {err:?}");
    }
}

/// Tile source built from the configured `{z}/{x}/{y}` URL template.
pub struct ConfiguredTileSource {
    name: &'static str,
    template: String,
}

impl ConfiguredTileSource {
    pub fn from_config(config: &Config) -> Self {
        // Attribution text must be 'static; the provider name lives as long
        // as the process, so leak it once at startup.
        let name = Box::leak(config.tile_provider_name.clone().into_boxed_str());
        Self {
            name,
            template: config.tile_url_template.clone(),
        }
    }
}

impl TileSource for ConfiguredTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.template
            .replace("{z}", &tile_id.zoom.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: self.name,
            url: "",
            logo_light: None,
            logo_dark: None,
        }
    }
}

/// Reports a press gesture on the map (touch long-press or secondary click)
/// as the geographic coordinate under the pointer.
pub struct PressGesture {
    pub pressed: Arc<Mutex<Option<GeoCoordinate>>>,
}

impl Plugin for PressGesture {
    fn run(
        self: Box<Self>,
        _ui: &mut Ui,
        response: &Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        if !(response.long_touched() || response.secondary_clicked()) {
            return;
        }
        let Some(screen) = response.interact_pointer_pos() else {
            return;
        };
        if let Some(pressed) = coordinate(projector.unproject(screen.to_vec2())) {
            if let Ok(mut slot) = self.pressed.lock() {
                *slot = Some(pressed);
            }
        }
    }
}

/// Draws every pin as a disc with its title next to it.
pub struct PinLayer {
    pins: Vec<(Position, String)>,
}

impl PinLayer {
    pub fn new(pins: &[Pin]) -> Self {
        Self {
            pins: pins
                .iter()
                .map(|pin| (position(pin.coordinate), pin.title.clone()))
                .collect(),
        }
    }
}

impl Plugin for PinLayer {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        _response: &Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let painter = ui.painter();
        for (pin_position, title) in &self.pins {
            let projected = projector.project(*pin_position);
            let screen = egui::pos2(projected.x, projected.y);
            painter.circle_filled(screen, 6.0, Color32::from_rgb(214, 39, 28));
            painter.circle_stroke(screen, 6.0, Stroke::new(1.5, Color32::WHITE));
            painter.text(
                screen + egui::vec2(10.0, 0.0),
                Align2::LEFT_CENTER,
                title,
                FontId::default(),
                ui.visuals().strong_text_color(),
            );
        }
    }
}

/// Strokes the route polyline with the configured color and width.
pub struct RouteLayer {
    points: Vec<Position>,
    stroke: Stroke,
}

impl RouteLayer {
    pub fn new(route: &RoutePath, config: &Config) -> Self {
        let [r, g, b, a] = config.route_stroke_rgba;
        Self {
            points: route.polyline.iter().copied().map(position).collect(),
            stroke: Stroke::new(
                config.route_stroke_width,
                Color32::from_rgba_unmultiplied(r, g, b, a),
            ),
        }
    }
}

impl Plugin for RouteLayer {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        _response: &Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let painter = ui.painter();
        for pair in self.points.windows(2) {
            let from = projector.project(pair[0]);
            let to = projector.project(pair[1]);
            painter.line_segment(
                [egui::pos2(from.x, from.y), egui::pos2(to.x, to.y)],
                self.stroke,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_matches_the_initial_span() {
        let zoom = zoom_for_span(0.005);
        assert!(zoom > 16.0 && zoom < 17.0, "unexpected zoom {zoom}");
    }

    #[test]
    fn wider_spans_zoom_out() {
        assert!(zoom_for_span(0.5) < zoom_for_span(0.005));
    }

    #[test]
    fn tile_url_substitutes_placeholders() {
        let source = ConfiguredTileSource::from_config(&Config::default());
        let url = source.tile_url(TileId {
            x: 17,
            y: 11,
            zoom: 5,
        });
        assert_eq!(url, "https://tile.openstreetmap.org/5/17/11.png");
    }

    #[test]
    fn coordinate_conversion_round_trips() {
        let original = GeoCoordinate::new(60.035351, 30.228947).unwrap();
        let back = coordinate(position(original)).unwrap();
        assert!((back.lat - original.lat).abs() < 1e-12);
        assert!((back.lon - original.lon).abs() < 1e-12);
    }
}
