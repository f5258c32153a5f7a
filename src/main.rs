mod app;
mod interp;
mod sim;
mod topology;
mod train;
mod travel_time;
mod vec2;

use app::RailwayApp;
use topology::Topology;

fn main() {
    env_logger::init();

    // An optional JSON file replaces the built-in network.
    let topology = match std::env::args().nth(1) {
        Some(path) => Topology::from_file(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load topology from {path}, using the demo network: {e}");
            Topology::demo()
        }),
        None => Topology::demo(),
    };

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size((900 as f32, 600 as f32));

    eframe::run_native(
        "railnet-rs",
        native_options,
        Box::new(|_cc| Ok(Box::new(RailwayApp::new(topology)))),
    )
    .unwrap();
}
