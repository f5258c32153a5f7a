use crate::{topology::Topology, vec2::Vec2};

/// Maps a train's progress along its current leg to map coordinates.
///
/// Progress is a percentage: 0 sits on the origin station, 100 on the
/// destination. An unresolvable endpoint yields the origin of the plane
/// rather than an error, so a transient bad reference never kills a render
/// pass.
pub(crate) fn position_on_leg(topology: &Topology, from: &str, to: &str, progress: f64) -> Vec2 {
    let (Some(from), Some(to)) = (topology.station(from), topology.station(to)) else {
        return Vec2::zero();
    };
    from.pos.lerp(to.pos, progress / 100.)
}
