//! Standalone intersection simulation module
//!
//! This module contains all the core simulation logic (vehicle kinematics,
//! car-following and the adaptive signal controller) and runs independently
//! of the Bevy game engine, so it can be tested via console without booting
//! up the viewer.

mod config;
mod following;
mod geometry;
mod signal;
mod snapshot;
mod spawner;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use config::{
    SignalTiming, SimConfig, ALL_RED_TIME, IDLE_GREEN_GRACE_TIME, MAX_GREEN_TIME, MIN_GREEN_TIME,
    PRIORITY_THRESHOLD, SPAWN_INTERVAL_TICKS, SPAWN_PROBABILITY, WEIGHT_CAR_COUNT,
    WEIGHT_WAIT_TIME,
};
#[allow(unused_imports)]
pub use following::{find_vehicle_ahead, following_speed_limit};
#[allow(unused_imports)]
pub use geometry::{path_between, perpendicular, unit_direction, PathGeometry};
#[allow(unused_imports)]
pub use signal::{
    measure_demand, FlowDemand, PhaseChange, PhaseController, SignalLight, SignalPhase,
    SwitchReason,
};
#[allow(unused_imports)]
pub use snapshot::{SimSnapshot, VehicleView};
#[allow(unused_imports)]
pub use spawner::{is_spawn_tick, random_livery, random_route, roll_arrival, Arrival};
#[allow(unused_imports)]
pub use types::{
    Corner, Flow, Livery, Position, Route, SimId, VehicleId, ACCELERATION, BRAKING,
    FOLLOWING_SPEED_RATIO, FPS, INTERSECTION_CENTER, LANE_OFFSET, MAX_SPEED, SPEED_EPSILON,
    STOPPED_SPEED_THRESHOLD, STOP_DISTANCE_FROM_CENTER, STOP_LINE_TOLERANCE,
    STOP_LOOKAHEAD_DISTANCE, VEHICLE_SPACING,
};
#[allow(unused_imports)]
pub use vehicle::{stopping_distance, SimVehicle, VehicleUpdateResult};
pub use world::SimWorld;
