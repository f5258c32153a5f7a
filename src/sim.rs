use std::time::Duration;

use crate::{interp, topology::Topology, train::Train, travel_time};

/// Wall-clock period of the simulation tick.
pub(crate) const TICK_PERIOD: Duration = Duration::from_millis(100);

const FULL_LEG: f64 = 100.;
const SECS_PER_HOUR: f64 = 3600.;

/// What happened to a single train during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    Advanced,
    /// Arrived; endpoints were swapped and progress snapped back to zero.
    Reversed,
    Held(HoldReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HoldReason {
    Inactive,
    /// The train's endpoint pair matched no track this tick. Resolution is
    /// retried on the next one.
    NoTrack,
    /// Infinite travel time, e.g. a non-positive nominal speed.
    Stalled,
}

/// Advances every train by one tick of `sim_dt` simulated time and returns a
/// fresh snapshot; the input slice is never mutated. Anything anomalous
/// degrades to a hold, so the loop driving this can never fail.
pub(crate) fn step(
    trains: &[Train],
    topology: &Topology,
    sim_dt: Duration,
) -> (Vec<Train>, Vec<StepOutcome>) {
    trains
        .iter()
        .map(|train| step_train(train, topology, sim_dt))
        .unzip()
}

fn step_train(train: &Train, topology: &Topology, sim_dt: Duration) -> (Train, StepOutcome) {
    let mut next = train.clone();
    if !train.active {
        return (next, StepOutcome::Held(HoldReason::Inactive));
    }
    let Some(track) = topology.track_between(&train.from, &train.to) else {
        return (next, StepOutcome::Held(HoldReason::NoTrack));
    };

    let travel_hours = travel_time::estimate_travel_time_hours(
        &track.elevation_profile,
        train.weight_tonnes,
        train.speed_kmh,
        track.num_curves,
    );
    if !travel_hours.is_finite() {
        return (next, StepOutcome::Held(HoldReason::Stalled));
    }

    // At a constant rate the leg completes after exactly travel_hours of
    // simulated time, whatever the tick period is.
    let increment = FULL_LEG * sim_dt.as_secs_f64() / (travel_hours * SECS_PER_HOUR);

    if FULL_LEG <= train.progress + increment {
        std::mem::swap(&mut next.from, &mut next.to);
        next.progress = 0.;
        // Progress 0 on the reversed leg is the station just reached.
        next.pos = interp::position_on_leg(topology, &next.from, &next.to, 0.);
        (next, StepOutcome::Reversed)
    } else {
        next.progress += increment;
        next.pos = interp::position_on_leg(topology, &next.from, &next.to, next.progress);
        (next, StepOutcome::Advanced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        topology::{ElevationPoint, Station, Topology, Track, TrackClass},
        train::TrainClass,
        vec2::Vec2,
    };

    /// Two stations joined by a flat 100 km track: a train at 100 km/h takes
    /// exactly one hour end to end.
    fn flat_topology() -> Topology {
        Topology {
            stations: vec![
                Station {
                    id: "a".to_string(),
                    name: "A".to_string(),
                    pos: Vec2::new(0., 0.),
                    major: true,
                },
                Station {
                    id: "b".to_string(),
                    name: "B".to_string(),
                    pos: Vec2::new(100., 200.),
                    major: false,
                },
            ],
            tracks: vec![Track {
                id: "ab".to_string(),
                from: "a".to_string(),
                to: "b".to_string(),
                class: TrackClass::Main,
                length_km: 100.,
                elevation_profile: vec![
                    ElevationPoint {
                        distance_km: 0.,
                        elevation_m: 100.,
                    },
                    ElevationPoint {
                        distance_km: 100.,
                        elevation_m: 100.,
                    },
                ],
                num_curves: 0,
            }],
        }
    }

    fn train() -> Train {
        Train {
            id: 0,
            name: "Test".to_string(),
            from: "a".to_string(),
            to: "b".to_string(),
            weight_tonnes: 500.,
            speed_kmh: 100.,
            class: TrainClass::Passenger,
            pos: Vec2::zero(),
            progress: 0.,
            active: true,
        }
    }

    #[test]
    fn one_tick_advances_by_the_expected_increment() {
        let topology = flat_topology();
        // 36 simulated seconds out of the 3600 s leg = 1 progress unit.
        let (trains, outcomes) = step(&[train()], &topology, Duration::from_secs(36));
        assert_eq!(outcomes, vec![StepOutcome::Advanced]);
        assert!((trains[0].progress - 1.).abs() < 1e-9);
        assert!((trains[0].pos.x - 1.).abs() < 1e-9);
        assert!((trains[0].pos.y - 2.).abs() < 1e-9);
    }

    #[test]
    fn input_snapshot_is_untouched() {
        let topology = flat_topology();
        let before = vec![train()];
        let (after, _) = step(&before, &topology, Duration::from_secs(36));
        assert_eq!(before[0].progress, 0.);
        assert!(after[0].progress > 0.);
    }

    #[test]
    fn inactive_trains_pass_through() {
        let topology = flat_topology();
        let mut parked = train();
        parked.active = false;
        parked.progress = 42.;
        let (trains, outcomes) = step(&[parked], &topology, Duration::from_secs(36));
        assert_eq!(outcomes, vec![StepOutcome::Held(HoldReason::Inactive)]);
        assert_eq!(trains[0].progress, 42.);
    }

    #[test]
    fn unresolvable_track_holds_the_train() {
        let topology = flat_topology();
        let mut lost = train();
        lost.to = "a".to_string();
        let (trains, outcomes) = step(&[lost], &topology, Duration::from_secs(36));
        assert_eq!(outcomes, vec![StepOutcome::Held(HoldReason::NoTrack)]);
        assert_eq!(trains[0].progress, 0.);
    }

    #[test]
    fn zero_speed_stalls_without_progress() {
        let topology = flat_topology();
        let mut stuck = train();
        stuck.speed_kmh = 0.;
        stuck.progress = 10.;
        let (trains, outcomes) = step(&[stuck], &topology, Duration::from_secs(36));
        assert_eq!(outcomes, vec![StepOutcome::Held(HoldReason::Stalled)]);
        assert_eq!(trains[0].progress, 10.);
    }

    #[test]
    fn arrival_reverses_the_leg() {
        let topology = flat_topology();
        let mut arriving = train();
        arriving.progress = 99.9;
        let (trains, outcomes) = step(&[arriving], &topology, Duration::from_secs(36));
        assert_eq!(outcomes, vec![StepOutcome::Reversed]);
        let reversed = &trains[0];
        assert_eq!(reversed.from, "b");
        assert_eq!(reversed.to, "a");
        assert_eq!(reversed.progress, 0.);
        // Sitting on the just-reached station.
        assert_eq!(reversed.pos, Vec2::new(100., 200.));
    }

    #[test]
    fn round_trip_returns_to_the_original_origin() {
        let topology = flat_topology();
        let mut current = train();
        // 10 simulated minutes per tick; each leg takes six ticks.
        let dt = Duration::from_secs(600);
        let mut reversals = 0;
        for _ in 0..40 {
            let (mut trains, outcomes) = step(std::slice::from_ref(&current), &topology, dt);
            current = trains.pop().unwrap();
            if outcomes[0] == StepOutcome::Reversed {
                reversals += 1;
                if reversals == 2 {
                    break;
                }
            }
        }
        assert_eq!(reversals, 2);
        assert_eq!(current.from, "a");
        assert_eq!(current.to, "b");
        assert_eq!(current.pos, Vec2::new(0., 0.));
    }
}
