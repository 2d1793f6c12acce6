use std::sync::{Arc, Mutex};

use egui::{Align2, Color32, Context, FontId, Ui};
use log::warn;
use walkers::{HttpTiles, Map, MapMemory};

use crate::config::Config;
use crate::coords::GeoCoordinate;
use crate::location::FixedLocation;
use crate::map::{self, ConfiguredTileSource, PinLayer, PressGesture, RouteLayer};
use crate::route::osrm::OsrmRouter;
use crate::route::RouteError;
use crate::session::MapSession;

/// Dialog and panel state, separate from the session it operates on.
#[derive(Default)]
struct UiState {
    coordinate_dialog_open: bool,
    coordinate_text: String,
    show_pin_panel: bool,
}

pub struct PinRouteApp {
    config: Config,
    session: MapSession,
    tiles: HttpTiles,
    map_memory: MapMemory,
    ui_state: UiState,
    pressed: Arc<Mutex<Option<GeoCoordinate>>>,
}

impl PinRouteApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, RouteError> {
        let config = Config::default();
        let router = Arc::new(OsrmRouter::new(&config.routing_url)?);
        let location = Box::new(location_source(&config));
        let mut session = MapSession::new(config.clone(), location, router);
        session.initialize();

        let tiles = HttpTiles::new(ConfiguredTileSource::from_config(&config), cc.egui_ctx.clone());

        Ok(Self {
            config,
            session,
            tiles,
            map_memory: MapMemory::default(),
            ui_state: UiState::default(),
            pressed: Arc::new(Mutex::new(None)),
        })
    }

    fn top_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Pin Route");
            ui.separator();
            if ui.button("Add point").clicked() {
                self.ui_state.coordinate_text.clear();
                self.ui_state.coordinate_dialog_open = true;
            }
            if ui.button("Set route").clicked() {
                self.session.request_route();
            }
            ui.separator();
            ui.toggle_value(&mut self.ui_state.show_pin_panel, "Pins");
            if let Some(route) = self.session.route() {
                ui.separator();
                ui.label(format!(
                    "Route: {} · {}",
                    format_distance(route.distance_m),
                    format_duration(route.duration_s)
                ));
            }
        });
    }

    fn map_panel(&mut self, ui: &mut Ui) {
        if let Some(viewport) = self.session.take_viewport_intent() {
            map::apply_viewport(&mut self.map_memory, viewport);
        }

        let my_position = self
            .session
            .current_fix()
            .unwrap_or(self.config.fallback_center);
        let map_rect = ui.available_rect_before_wrap();

        let mut widget = Map::new(
            Some(&mut self.tiles),
            &mut self.map_memory,
            map::position(my_position),
        )
        .with_plugin(PressGesture {
            pressed: Arc::clone(&self.pressed),
        })
        .with_plugin(PinLayer::new(self.session.pins()));
        if let Some(route) = self.session.route() {
            widget = widget.with_plugin(RouteLayer::new(route, &self.config));
        }
        ui.add(widget);

        ui.painter().text(
            map_rect.max - egui::vec2(6.0, 4.0),
            Align2::RIGHT_BOTTOM,
            format!("© {}", self.config.tile_provider_name),
            FontId::proportional(10.0),
            Color32::from_black_alpha(160),
        );

        // A press reported by the gesture plugin becomes a pin.
        if let Ok(mut slot) = self.pressed.lock() {
            if let Some(coordinate) = slot.take() {
                self.session.drop_pin(coordinate);
            }
        }
    }

    fn coordinate_dialog(&mut self, ctx: &Context) {
        if !self.ui_state.coordinate_dialog_open {
            return;
        }
        egui::Window::new("Enter coordinates")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Enter latitude and longitude separated by a comma");
                ui.add(
                    egui::TextEdit::singleline(&mut self.ui_state.coordinate_text)
                        .hint_text("Latitude, Longitude"),
                );
                ui.horizontal(|ui| {
                    if ui.button("Add").clicked() {
                        self.session
                            .submit_coordinate_text(&self.ui_state.coordinate_text);
                        self.ui_state.coordinate_dialog_open = false;
                    }
                    if ui.button("Cancel").clicked() {
                        self.ui_state.coordinate_dialog_open = false;
                    }
                });
            });
    }

    fn alert_dialog(&mut self, ctx: &Context) {
        let Some(message) = self.session.alert().map(str::to_owned) else {
            return;
        };
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.session.dismiss_alert();
                }
            });
    }

    fn pin_panel(&mut self, ctx: &Context) {
        let lines: Vec<(String, String, String)> = self
            .session
            .pins()
            .iter()
            .enumerate()
            .map(|(index, pin)| {
                (
                    format!("{}. {}", index + 1, pin.coordinate),
                    pin.coordinate.to_string(),
                    format!("{}\n{}", pin.title, pin.subtitle),
                )
            })
            .collect();

        egui::SidePanel::right("pin_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Pins");
                ui.separator();

                if lines.is_empty() {
                    ui.label("Press the map or use \"Add point\" to drop a pin.");
                    return;
                }

                if ui.button("Copy all").clicked() {
                    let all = lines
                        .iter()
                        .map(|(line, _, _)| line.clone())
                        .collect::<Vec<String>>()
                        .join("\n");
                    ctx.copy_text(all);
                }

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (line, coordinates, details) in &lines {
                        ui.horizontal(|ui| {
                            ui.label(line.as_str()).on_hover_text(details.as_str());
                            if ui.button("Copy").clicked() {
                                ctx.copy_text(coordinates.clone());
                            }
                        });
                    }
                });
            });
    }
}

impl eframe::App for PinRouteApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.session.poll();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| self.top_bar(ui));
        if self.ui_state.show_pin_panel {
            self.pin_panel(ctx);
        }
        egui::CentralPanel::default().show(ctx, |ui| self.map_panel(ui));

        self.coordinate_dialog(ctx);
        self.alert_dialog(ctx);

        // Keep polling pending route results even while the pointer is idle.
        ctx.request_repaint();
    }
}

/// Location source for this process. Desktop machines rarely expose a
/// positioning device, so the fix comes from `PINROUTE_LOCATION` when set
/// and the configured fallback center otherwise.
fn location_source(config: &Config) -> FixedLocation {
    match std::env::var("PINROUTE_LOCATION") {
        Ok(text) => match text.parse::<GeoCoordinate>() {
            Ok(coordinate) => FixedLocation::new(coordinate),
            Err(err) => {
                warn!("ignoring PINROUTE_LOCATION {text:?}: {err}");
                FixedLocation::new(config.fallback_center)
            }
        },
        Err(_) => FixedLocation::new(config.fallback_center),
    }
}

fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round() as i64;
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        format!("{} h {} min", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_switch_to_kilometers() {
        assert_eq!(format_distance(880.0), "880 m");
        assert_eq!(format_distance(15210.5), "15.21 km");
    }

    #[test]
    fn durations_switch_to_hours() {
        assert_eq!(format_duration(240.0), "4 min");
        assert_eq!(format_duration(4500.0), "1 h 15 min");
    }
}
