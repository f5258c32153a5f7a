use crate::topology::ElevationPoint;

/// Estimate to fall back to when a track has no usable elevation profile.
const DEFAULT_TRAVEL_HOURS: f64 = 1.;
/// Time penalty per unit of weight-scaled grade.
const SLOPE_PENALTY: f64 = 1.5e-3;
/// Floor for the effective speed factor, so a steep climb slows a train
/// down to a crawl instead of stopping or reversing it.
const MIN_SPEED_FACTOR: f64 = 0.01;
const CURVE_PENALTY_HOURS: f64 = 0.05;

/// Expected hours to traverse a whole track, segment by segment.
///
/// Each profile segment is timed at the train's nominal speed, then scaled by
/// a grade penalty: uphill and heavy trains lose time, downhill and light
/// trains may beat the nominal speed. Curves cost a fixed 0.05 hours each.
/// A non-positive speed yields infinity; the stepper treats that as "no
/// progress" rather than dividing by it.
pub(crate) fn estimate_travel_time_hours(
    profile: &[ElevationPoint],
    weight_tonnes: f64,
    speed_kmh: f64,
    num_curves: u32,
) -> f64 {
    if profile.len() < 2 {
        return DEFAULT_TRAVEL_HOURS;
    }
    if speed_kmh <= 0. {
        return f64::INFINITY;
    }

    let mut total_hours = 0.;
    for pair in profile.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let segment_length_km = end.distance_km - start.distance_km;
        let elevation_change_m = end.elevation_m - start.elevation_m;

        let base_hours = segment_length_km / speed_kmh;

        // Signed grade, scaled by relative train mass.
        let slope_influence = (elevation_change_m / segment_length_km) * (weight_tonnes / 1000.);
        let effective_speed_factor = (1. - slope_influence * SLOPE_PENALTY).max(MIN_SPEED_FACTOR);

        total_hours += base_hours / effective_speed_factor;
    }

    total_hours + num_curves as f64 * CURVE_PENALTY_HOURS
}
