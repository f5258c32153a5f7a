use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vec2::Vec2;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Station {
    pub id: String,
    pub name: String,
    pub pos: Vec2,
    /// Major stations are only drawn bigger; the simulation does not care.
    #[serde(default)]
    pub major: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TrackClass {
    Main,
    Express,
    Local,
}

/// One sample of a track's piecewise-linear elevation profile.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct ElevationPoint {
    pub distance_km: f64,
    pub elevation_m: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Track {
    pub id: String,
    /// Endpoints are undirected; which one a train calls "origin" is up to the train.
    pub from: String,
    pub to: String,
    pub class: TrackClass,
    pub length_km: f64,
    pub elevation_profile: Vec<ElevationPoint>,
    pub num_curves: u32,
}

#[derive(Debug, Error)]
pub(crate) enum TopologyError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid topology: {0}")]
    Invalid(String),
}

/// The static rail graph. Built once at startup and never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Topology {
    pub stations: Vec<Station>,
    pub tracks: Vec<Track>,
}

impl Topology {
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Finds the track joining two stations regardless of endpoint order.
    /// A linear scan is fine at the graph sizes in scope.
    pub fn track_between(&self, a: &str, b: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| (t.from == a && t.to == b) || (t.from == b && t.to == a))
    }

    pub fn from_file(path: &str) -> Result<Self, TopologyError> {
        let file = std::fs::File::open(path)?;
        let topology: Topology = serde_json::from_reader(std::io::BufReader::new(file))?;
        topology.validate()?;
        Ok(topology)
    }

    fn validate(&self) -> Result<(), TopologyError> {
        for track in &self.tracks {
            for endpoint in [&track.from, &track.to] {
                if self.station(endpoint).is_none() {
                    return Err(TopologyError::Invalid(format!(
                        "track {} references unknown station {endpoint}",
                        track.id
                    )));
                }
            }
            if track
                .elevation_profile
                .windows(2)
                .any(|pair| pair[1].distance_km <= pair[0].distance_km)
            {
                return Err(TopologyError::Invalid(format!(
                    "track {} has non-increasing profile distances",
                    track.id
                )));
            }
            if track.elevation_profile.len() < 2 {
                // Tolerated; the travel time model falls back to a fixed estimate.
                log::warn!(
                    "track {} has a degenerate elevation profile ({} points)",
                    track.id,
                    track.elevation_profile.len()
                );
            }
        }
        Ok(())
    }

    /// The built-in network, a stylized map of southern India.
    pub fn demo() -> Self {
        let station = |id: &str, name: &str, x: f64, y: f64, major: bool| Station {
            id: id.to_string(),
            name: name.to_string(),
            pos: Vec2::new(x, y),
            major,
        };
        let track = |id: &str,
                     from: &str,
                     to: &str,
                     class: TrackClass,
                     length_km: f64,
                     profile: &[(f64, f64)],
                     num_curves: u32| Track {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            class,
            length_km,
            elevation_profile: profile
                .iter()
                .map(|&(distance_km, elevation_m)| ElevationPoint {
                    distance_km,
                    elevation_m,
                })
                .collect(),
            num_curves,
        };

        Self {
            stations: vec![
                station("bangalore", "Bangalore", 300., 400., true),
                station("davanagere", "Davanagere", 200., 200., true),
                station("ballari", "Ballari", 350., 150., true),
                station("anantapur", "Anantapur", 400., 250., true),
                station("chennai", "Chennai", 600., 450., true),
                station("mysuru", "Mysuru", 250., 500., true),
                station("tumakuru", "Tumakuru", 250., 350., false),
                station("hosur", "Hosur", 350., 480., false),
                station("krishnagiri", "Krishnagiri", 450., 400., false),
                station("kadapa", "Kadapa", 500., 300., false),
            ],
            tracks: vec![
                track(
                    "t1",
                    "bangalore",
                    "davanagere",
                    TrackClass::Main,
                    180.,
                    &[(0., 900.), (90., 800.), (180., 600.)],
                    8,
                ),
                track(
                    "t2",
                    "davanagere",
                    "ballari",
                    TrackClass::Express,
                    200.,
                    &[(0., 600.), (100., 500.), (200., 450.)],
                    5,
                ),
                track(
                    "t3",
                    "ballari",
                    "anantapur",
                    TrackClass::Main,
                    120.,
                    &[(0., 450.), (60., 500.), (120., 520.)],
                    6,
                ),
                track(
                    "t4",
                    "anantapur",
                    "kadapa",
                    TrackClass::Local,
                    140.,
                    &[(0., 520.), (70., 480.), (140., 400.)],
                    12,
                ),
                track(
                    "t5",
                    "bangalore",
                    "mysuru",
                    TrackClass::Express,
                    150.,
                    &[(0., 900.), (75., 800.), (150., 770.)],
                    4,
                ),
                track(
                    "t6",
                    "bangalore",
                    "tumakuru",
                    TrackClass::Local,
                    80.,
                    &[(0., 900.), (40., 850.), (80., 820.)],
                    7,
                ),
                track(
                    "t7",
                    "bangalore",
                    "hosur",
                    TrackClass::Main,
                    60.,
                    &[(0., 900.), (30., 880.), (60., 850.)],
                    3,
                ),
                track(
                    "t8",
                    "hosur",
                    "krishnagiri",
                    TrackClass::Main,
                    100.,
                    &[(0., 850.), (50., 700.), (100., 600.)],
                    8,
                ),
                track(
                    "t9",
                    "krishnagiri",
                    "chennai",
                    TrackClass::Express,
                    200.,
                    &[(0., 600.), (100., 300.), (200., 50.)],
                    6,
                ),
                track(
                    "t10",
                    "kadapa",
                    "chennai",
                    TrackClass::Main,
                    180.,
                    &[(0., 400.), (90., 200.), (180., 50.)],
                    9,
                ),
            ],
        }
    }
}
