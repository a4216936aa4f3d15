//! Vehicle arrivals for the intersection simulation
//!
//! Every `spawn_interval` ticks one uniform draw decides whether a vehicle
//! arrives; the chance scales with the speed multiplier so the arrival rate
//! per simulated second stays the same at any speed.

use rand::Rng;

use super::config::SimConfig;
use super::types::{Corner, Livery, Route};

/// A vehicle the spawner decided to add
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub route: Route,
    pub livery: Livery,
}

/// Whether `tick` is one where an arrival is attempted
pub fn is_spawn_tick(tick: u64, config: &SimConfig) -> bool {
    config.spawn_interval > 0 && tick % config.spawn_interval == 0
}

/// Pick a uniformly random livery
pub fn random_livery<R: Rng + ?Sized>(rng: &mut R) -> Livery {
    Livery::ALL[rng.random_range(0..Livery::ALL.len())]
}

/// Pick a uniformly random origin corner, heading to its opposite
pub fn random_route<R: Rng + ?Sized>(rng: &mut R) -> Route {
    let origin = Corner::ALL[rng.random_range(0..Corner::ALL.len())];
    Route::from_origin(origin)
}

/// Roll for an arrival on `tick`
///
/// # Arguments
/// * `rng` - The random source (seeded in tests)
/// * `tick` - The tick counter after it was incremented
/// * `config` - Spawn interval, base probability and admission cap
/// * `time_multiplier` - Current speed multiplier, scales the probability
/// * `population` - Number of active vehicles
pub fn roll_arrival<R: Rng + ?Sized>(
    rng: &mut R,
    tick: u64,
    config: &SimConfig,
    time_multiplier: f32,
    population: usize,
) -> Option<Arrival> {
    if !is_spawn_tick(tick, config) {
        return None;
    }

    let draw: f32 = rng.random();
    if draw >= config.spawn_probability * time_multiplier {
        return None;
    }

    if config.max_vehicles.is_some_and(|cap| population >= cap) {
        return None;
    }

    let route = random_route(rng);
    let livery = random_livery(rng);
    Some(Arrival { route, livery })
}
