use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};
use ordered_float::NotNan;

use crate::{topology::TrackClass, train::TrainClass, vec2::Vec2};

use super::RailwayApp;

const MAP_MARGIN: f32 = 24.;
const SELECT_PIXEL_RADIUS: f32 = 16.;
const MAJOR_STATION_RADIUS: f32 = 8.;
const MINOR_STATION_RADIUS: f32 = 5.;
const TRAIN_RADIUS: f32 = 6.;

/// Fit-to-viewport mapping from map coordinates to screen pixels.
/// Both spaces have y pointing down, so no flip is involved.
pub(super) struct MapTransform {
    origin: Vec2,
    scale: f32,
    offset: egui::Vec2,
}

impl MapTransform {
    pub fn to_pos2(&self, pos: Vec2) -> Pos2 {
        Pos2::new(
            (pos.x - self.origin.x) as f32 * self.scale,
            (pos.y - self.origin.y) as f32 * self.scale,
        ) + self.offset
    }

    pub fn from_pos2(&self, pos: Pos2) -> Vec2 {
        let local = pos - self.offset;
        Vec2::new(
            (local.x / self.scale) as f64 + self.origin.x,
            (local.y / self.scale) as f64 + self.origin.y,
        )
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl RailwayApp {
    pub(super) fn map_transform(&self, rect: &Rect) -> MapTransform {
        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for station in &self.topology.stations {
            min.x = min.x.min(station.pos.x);
            min.y = min.y.min(station.pos.y);
            max.x = max.x.max(station.pos.x);
            max.y = max.y.max(station.pos.y);
        }
        if !min.x.is_finite() {
            return MapTransform {
                origin: Vec2::zero(),
                scale: 1.,
                offset: rect.min.to_vec2(),
            };
        }
        let span_x = (max.x - min.x).max(1.) as f32;
        let span_y = (max.y - min.y).max(1.) as f32;
        let scale = ((rect.width() - 2. * MAP_MARGIN) / span_x)
            .min((rect.height() - 2. * MAP_MARGIN) / span_y)
            .max(0.01);
        MapTransform {
            origin: min,
            scale,
            offset: rect.min.to_vec2() + egui::vec2(MAP_MARGIN, MAP_MARGIN),
        }
    }

    /// Clicking near a station fills the form: origin first, then destination.
    pub(super) fn pick_station(&mut self, pointer: Pos2, transform: &MapTransform) {
        let pos = transform.from_pos2(pointer);
        let thresh = (SELECT_PIXEL_RADIUS / transform.scale()) as f64;
        let nearest = self
            .topology
            .stations
            .iter()
            .filter_map(|station| {
                NotNan::new((station.pos - pos).length2())
                    .ok()
                    .map(|d2| (d2, station))
            })
            .min_by_key(|(d2, _)| *d2);
        let Some((d2, station)) = nearest else {
            return;
        };
        if thresh.powi(2) < d2.into_inner() {
            return;
        }
        if self.new_train.from.is_empty() {
            self.new_train.from = station.id.clone();
        } else if self.new_train.from != station.id {
            self.new_train.to = station.id.clone();
        }
    }

    pub(super) fn render_tracks(&self, painter: &Painter, transform: &MapTransform) {
        for track in &self.topology.tracks {
            let (Some(from), Some(to)) = (
                self.topology.station(&track.from),
                self.topology.station(&track.to),
            ) else {
                continue;
            };
            let points = [transform.to_pos2(from.pos), transform.to_pos2(to.pos)];
            let stroke = match track.class {
                TrackClass::Main => Stroke::new(2.5, Color32::from_rgb(110, 110, 120)),
                TrackClass::Express => Stroke::new(3., Color32::from_rgb(222, 140, 40)),
                TrackClass::Local => Stroke::new(2., Color32::from_rgb(150, 120, 90)),
            };
            if track.class == TrackClass::Local {
                painter.extend(Shape::dashed_line(&points, stroke, 6., 5.));
            } else {
                painter.line_segment(points, stroke);
            }
        }
    }

    pub(super) fn render_stations(&self, painter: &Painter, transform: &MapTransform) {
        for station in &self.topology.stations {
            let center = transform.to_pos2(station.pos);
            let (radius, fill) = if station.major {
                (MAJOR_STATION_RADIUS, Color32::from_rgb(190, 60, 60))
            } else {
                (MINOR_STATION_RADIUS, Color32::from_rgb(130, 130, 140))
            };
            painter.circle_filled(center, radius, fill);
            painter.text(
                center + egui::vec2(0., -(radius + 4.)),
                Align2::CENTER_BOTTOM,
                &station.name,
                FontId::proportional(12.),
                Color32::LIGHT_GRAY,
            );
        }
    }

    pub(super) fn render_trains(&self, painter: &Painter, transform: &MapTransform) {
        for train in &self.registry.trains {
            let center = transform.to_pos2(train.pos);
            let color = match train.class {
                TrainClass::Express => Color32::from_rgb(230, 60, 60),
                TrainClass::Passenger => Color32::from_rgb(70, 130, 230),
                TrainClass::Freight => Color32::from_rgb(140, 140, 140),
            };
            let color = if train.active {
                color
            } else {
                color.gamma_multiply(0.4)
            };
            painter.circle_filled(center, TRAIN_RADIUS, color);
            painter.text(
                center + egui::vec2(0., -(TRAIN_RADIUS + 4.)),
                Align2::CENTER_BOTTOM,
                &train.name,
                FontId::proportional(11.),
                Color32::WHITE,
            );
        }
    }
}
