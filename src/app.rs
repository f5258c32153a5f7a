mod map;

use eframe::egui::{self, Align2, Color32, FontId, Frame, Ui};

use crate::{
    sim::{self, StepOutcome, TICK_PERIOD},
    topology::Topology,
    train::{TrainClass, TrainRegistry, TrainRequest},
};

/// Simulated seconds per wall-clock second. At 1x a leg takes its real
/// travel time, i.e. hours of staring at a motionless dot.
const DEFAULT_TIME_WARP: f64 = 1000.;
const ERROR_DISPLAY_SECS: f64 = 10.;

pub(crate) struct RailwayApp {
    topology: Topology,
    registry: TrainRegistry,
    new_train: NewTrainForm,
    time_warp: f64,
    paused: bool,
    tick_accum: f64,
    error_msg: Option<(String, f64)>,
}

struct NewTrainForm {
    name: String,
    from: String,
    to: String,
    weight_tonnes: f64,
    speed_kmh: f64,
    class: TrainClass,
}

impl Default for NewTrainForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            from: String::new(),
            to: String::new(),
            weight_tonnes: 500.,
            speed_kmh: 80.,
            class: TrainClass::Passenger,
        }
    }
}

impl RailwayApp {
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            registry: TrainRegistry::default(),
            new_train: NewTrainForm::default(),
            time_warp: DEFAULT_TIME_WARP,
            paused: false,
            tick_accum: 0.,
            error_msg: None,
        }
    }

    fn add_train(&mut self) {
        let request = TrainRequest {
            name: self.new_train.name.clone(),
            from: self.new_train.from.clone(),
            to: self.new_train.to.clone(),
            weight_tonnes: self.new_train.weight_tonnes,
            speed_kmh: self.new_train.speed_kmh,
            class: self.new_train.class,
        };
        match self.registry.add_train(request) {
            Ok(id) => {
                log::info!("Added train {id} ({})", self.new_train.name);
                self.new_train.name.clear();
            }
            Err(e) => {
                log::warn!("Rejected train request: {e}");
                self.error_msg = Some((e.to_string(), ERROR_DISPLAY_SECS));
            }
        }
    }

    fn step_once(&mut self) {
        let sim_dt = TICK_PERIOD.mul_f64(self.time_warp);
        let (trains, outcomes) = sim::step(&self.registry.trains, &self.topology, sim_dt);
        for (train, outcome) in trains.iter().zip(&outcomes) {
            if *outcome == StepOutcome::Reversed {
                log::debug!(
                    "{} arrived at {}, heading back to {}",
                    train.name,
                    train.from,
                    train.to
                );
            }
        }
        self.registry.trains = trains;
    }

    fn render(&mut self, ui: &mut Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());

        let transform = self.map_transform(&response.rect);

        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.pick_station(pointer, &transform);
        }

        self.render_tracks(&painter, &transform);
        self.render_stations(&painter, &transform);
        self.render_trains(&painter, &transform);

        if let Some((ref err, _)) = self.error_msg {
            painter.text(
                response.rect.center(),
                Align2::CENTER_CENTER,
                err,
                FontId::default(),
                Color32::RED,
            );
        }
    }

    fn ui_panel(&mut self, ui: &mut Ui) {
        ui.group(|ui| {
            ui.label("Add train:");
            ui.text_edit_singleline(&mut self.new_train.name);
            egui::ComboBox::from_label("From")
                .selected_text(self.station_label(&self.new_train.from))
                .show_ui(ui, |ui| {
                    for station in &self.topology.stations {
                        ui.selectable_value(
                            &mut self.new_train.from,
                            station.id.clone(),
                            &station.name,
                        );
                    }
                });
            egui::ComboBox::from_label("To")
                .selected_text(self.station_label(&self.new_train.to))
                .show_ui(ui, |ui| {
                    // The map lets a train run either way, but a same-station
                    // leg is pointless, so filter the chosen origin out here.
                    for station in self
                        .topology
                        .stations
                        .iter()
                        .filter(|s| s.id != self.new_train.from)
                    {
                        ui.selectable_value(
                            &mut self.new_train.to,
                            station.id.clone(),
                            &station.name,
                        );
                    }
                });
            ui.horizontal(|ui| {
                ui.label("Weight (t):");
                ui.add(
                    egui::DragValue::new(&mut self.new_train.weight_tonnes)
                        .speed(10.)
                        .range(0. ..=100_000.),
                );
            });
            ui.horizontal(|ui| {
                ui.label("Speed (km/h):");
                ui.add(
                    egui::DragValue::new(&mut self.new_train.speed_kmh)
                        .speed(1.)
                        .range(0. ..=500.),
                );
            });
            ui.horizontal(|ui| {
                for class in [TrainClass::Passenger, TrainClass::Express, TrainClass::Freight] {
                    ui.radio_value(&mut self.new_train.class, class, class.label());
                }
            });
            if ui.button("Add train to network").clicked() {
                self.add_train();
            }
        });
        ui.group(|ui| {
            ui.label(format!("Trains ({}):", self.registry.trains.len()));
            let topology = &self.topology;
            let name_of = |id: &str| {
                topology
                    .station(id)
                    .map_or_else(|| id.to_string(), |s| s.name.clone())
            };
            for train in self.registry.trains.iter_mut() {
                ui.horizontal(|ui| {
                    ui.checkbox(&mut train.active, &train.name);
                    ui.label(format!(
                        "{} → {} ({:.1}%)",
                        name_of(&train.from),
                        name_of(&train.to),
                        train.progress
                    ));
                });
                ui.label(format!(
                    "    {} • {:.0} t • {:.0} km/h",
                    train.class.label(),
                    train.weight_tonnes,
                    train.speed_kmh
                ));
            }
        });
        ui.group(|ui| {
            ui.checkbox(&mut self.paused, "Pause");
            ui.horizontal(|ui| {
                ui.label("Time warp:");
                ui.add(egui::Slider::new(&mut self.time_warp, 1.0..=5000.).logarithmic(true));
            });
        });
    }

    fn station_label(&self, id: &str) -> String {
        self.topology
            .station(id)
            .map_or_else(|| "Select station".to_string(), |s| s.name.clone())
    }
}

impl eframe::App for RailwayApp {
    fn update(&mut self, ctx: &eframe::egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        let dt = ctx.input(|i| i.raw.predicted_dt) as f64;

        // Decay the error message even while paused
        if let Some((_, ref mut time)) = self.error_msg {
            *time -= dt;
            if *time < 0. {
                self.error_msg = None;
            }
        }

        eframe::egui::SidePanel::right("side_panel")
            .min_width(240.)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.ui_panel(ui))
            });

        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            Frame::canvas(ui.style()).show(ui, |ui| {
                self.render(ui);
            });
        });

        // Fixed-period stepping decoupled from the frame rate. The while loop
        // catches up after a dropped frame instead of slowing the clock.
        if !self.paused {
            self.tick_accum += dt;
            let tick_secs = TICK_PERIOD.as_secs_f64();
            while tick_secs <= self.tick_accum {
                self.tick_accum -= tick_secs;
                self.step_once();
            }
        }
    }
}
