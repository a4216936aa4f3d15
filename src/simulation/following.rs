//! Car-following: finding the vehicle directly ahead on the same route
//!
//! Vehicles sharing an origin corner share a lane, so the leader is the
//! same-origin vehicle with the smallest positive lead in distance traveled.
//! This is a linear scan per vehicle (quadratic per tick), which is fine for
//! the tens of vehicles a single intersection holds. Bucketing vehicles per
//! route into sorted sequences would make the lookup constant time if the
//! population ever needs to grow.

use super::types::{FOLLOWING_SPEED_RATIO, VEHICLE_SPACING};
use super::vehicle::SimVehicle;

/// Find the nearest vehicle strictly ahead of `vehicle` on the same route,
/// with the gap in distance traveled
pub fn find_vehicle_ahead<'a>(
    vehicle: &SimVehicle,
    vehicles: &'a [SimVehicle],
) -> Option<(&'a SimVehicle, f32)> {
    let mut ahead: Option<(&'a SimVehicle, f32)> = None;

    for other in vehicles {
        if other.id == vehicle.id || other.route.origin() != vehicle.route.origin() {
            continue;
        }
        let gap = other.distance_traveled - vehicle.distance_traveled;
        if gap > 0.0 && ahead.map_or(true, |(_, best)| gap < best) {
            ahead = Some((other, gap));
        }
    }

    ahead
}

/// Speed cap imposed by the leader, if it is within the spacing distance
pub fn following_speed_limit(vehicle: &SimVehicle, vehicles: &[SimVehicle]) -> Option<f32> {
    match find_vehicle_ahead(vehicle, vehicles) {
        Some((leader, gap)) if gap < VEHICLE_SPACING => Some(leader.speed * FOLLOWING_SPEED_RATIO),
        _ => None,
    }
}
