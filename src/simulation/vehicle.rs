//! Vehicle movement logic for the intersection simulation
//!
//! Standalone implementation that doesn't depend on Bevy.

use super::geometry::{path_between, PathGeometry};
use super::types::{
    Flow, Livery, Position, Route, VehicleId, ACCELERATION, BRAKING, MAX_SPEED, SPEED_EPSILON,
    STOPPED_SPEED_THRESHOLD,
};

/// Result of a vehicle update indicating what action should be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    Continue, // Vehicle is still on its path
    Arrived,  // Vehicle reached its destination and should be removed
}

/// A vehicle in the intersection simulation
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub route: Route,
    pub livery: Livery,
    /// Static path geometry, fixed at spawn
    pub path: PathGeometry,
    pub max_speed: f32,

    pub position: Position,
    /// Pixels per frame, always within [0, max_speed]
    pub speed: f32,
    /// Never decreases over the vehicle's lifetime
    pub distance_traveled: f32,
    /// Seconds spent below the stopped threshold, reset once moving
    pub wait_time: f32,
}

impl SimVehicle {
    pub fn new(id: VehicleId, route: Route, livery: Livery) -> Self {
        let path = path_between(route.origin(), route.destination());
        Self {
            id,
            route,
            livery,
            path,
            max_speed: MAX_SPEED,
            position: path.entry,
            speed: 0.0,
            distance_traveled: 0.0,
            wait_time: 0.0,
        }
    }

    pub fn flow(&self) -> Flow {
        self.route.flow()
    }

    pub fn is_stopped(&self) -> bool {
        self.speed < STOPPED_SPEED_THRESHOLD
    }

    /// Whether the vehicle is still short of its stop line
    pub fn before_stop_line(&self) -> bool {
        self.distance_traveled < self.path.distance_to_stop_line
    }

    /// Remaining distance to the stop line (negative once past it)
    pub fn distance_to_stop_line(&self) -> f32 {
        self.path.distance_to_stop_line - self.distance_traveled
    }

    pub fn has_arrived(&self) -> bool {
        self.distance_traveled >= self.path.total_distance
    }

    /// Accumulate or clear wait time based on the speed from the last tick
    pub fn update_wait_time(&mut self, delta_secs: f32) {
        if self.is_stopped() {
            self.wait_time += delta_secs;
        } else {
            self.wait_time = 0.0;
        }
    }

    /// Move the vehicle one tick towards `target_speed`
    pub fn update(&mut self, target_speed: f32, time_multiplier: f32) -> VehicleUpdateResult {
        let target_speed = target_speed.clamp(0.0, self.max_speed);

        if self.speed < target_speed {
            self.speed = (self.speed + ACCELERATION).min(target_speed);
        } else if self.speed > target_speed {
            self.speed = (self.speed - BRAKING).max(target_speed);
        }

        if self.speed < SPEED_EPSILON {
            self.speed = 0.0;
        }

        let move_x = self.path.direction.x * self.speed * time_multiplier;
        let move_y = self.path.direction.y * self.speed * time_multiplier;
        self.position.x += move_x;
        self.position.y += move_y;
        // Accumulate the actual displacement so progress stays exact under any multiplier
        self.distance_traveled += (move_x * move_x + move_y * move_y).sqrt();

        if self.has_arrived() {
            VehicleUpdateResult::Arrived
        } else {
            VehicleUpdateResult::Continue
        }
    }
}

/// Distance covered while braking from `speed` to a standstill
///
/// Mirrors [`SimVehicle::update`]: speed drops before each move, and the
/// final sub-epsilon step snaps to zero without moving.
pub fn stopping_distance(speed: f32, time_multiplier: f32) -> f32 {
    let mut speed = speed;
    let mut distance = 0.0;
    while speed > 0.0 {
        speed -= BRAKING;
        if speed < SPEED_EPSILON {
            break;
        }
        distance += speed * time_multiplier;
    }
    distance
}
