//! Read-only view of the simulation handed to renderers

use super::signal::{SignalLight, SignalPhase};
use super::types::{Flow, Livery, Position, Route, VehicleId};
use super::vehicle::SimVehicle;

/// What a renderer needs to draw one vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleView {
    pub id: VehicleId,
    pub position: Position,
    /// Unit heading, for orienting the sprite
    pub direction: Position,
    pub route: Route,
    pub flow: Flow,
    pub livery: Livery,
    pub speed: f32,
    pub wait_time: f32,
}

impl VehicleView {
    /// Asset name for the vehicle, e.g. `blue-tl`
    pub fn asset_name(&self) -> String {
        format!("{}-{}", self.livery.name(), self.route.origin().short_name())
    }
}

impl From<&SimVehicle> for VehicleView {
    fn from(vehicle: &SimVehicle) -> Self {
        Self {
            id: vehicle.id,
            position: vehicle.position,
            direction: vehicle.path.direction,
            route: vehicle.route,
            flow: vehicle.flow(),
            livery: vehicle.livery,
            speed: vehicle.speed,
            wait_time: vehicle.wait_time,
        }
    }
}

/// State of the whole simulation at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct SimSnapshot {
    pub vehicles: Vec<VehicleView>,
    pub phase: SignalPhase,
    pub phase_elapsed: f32,
    /// Signal shown to flow A and flow B
    pub lights: [SignalLight; 2],
    pub completed_vehicles: usize,
    pub spawned_vehicles: usize,
    pub tick: u64,
    pub time: f64,
    pub is_running: bool,
    pub speed_multiplier: f32,
}

impl SimSnapshot {
    pub fn light_for(&self, flow: Flow) -> SignalLight {
        match flow {
            Flow::A => self.lights[0],
            Flow::B => self.lights[1],
        }
    }
}
