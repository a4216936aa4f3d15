//! Main simulation world that ties everything together
//!
//! This is the entry point for running the intersection simulation
//! without any Bevy dependencies.

use anyhow::{bail, Result};
use log::{debug, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Reverse;

use super::config::SimConfig;
use super::following::following_speed_limit;
use super::geometry::path_between;
use super::signal::{PhaseController, SignalPhase};
use super::snapshot::{SimSnapshot, VehicleView};
use super::spawner::{self, Arrival};
use super::types::{
    Corner, Flow, Livery, Position, Route, SimId, VehicleId, FPS, INTERSECTION_CENTER, MAX_SPEED,
    STOP_LINE_TOLERANCE, STOP_LOOKAHEAD_DISTANCE,
};
use super::vehicle::{stopping_distance, SimVehicle, VehicleUpdateResult};

/// The main simulation world
pub struct SimWorld {
    /// Active vehicles, ordered by descending distance traveled after each tick
    pub vehicles: Vec<SimVehicle>,

    /// Adaptive signal controller
    pub signal: PhaseController,

    /// Whether ticks advance the simulation
    pub is_running: bool,

    /// Scales simulated time and distance per tick
    pub speed_multiplier: f32,

    /// Ticks run since the last reset
    pub tick_count: u64,

    /// Simulated seconds since the last reset
    pub time: f64,

    /// Vehicles that reached their destination since the last reset
    pub completed_vehicles: usize,

    /// Vehicles added since the last reset
    pub spawned_vehicles: usize,

    /// Signal phase transitions since the last reset
    pub phase_switches: usize,

    pub config: SimConfig,

    /// Next ID to assign; survives resets so IDs are never reused
    next_id: usize,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(rng: Option<StdRng>, config: SimConfig) -> Self {
        Self {
            vehicles: Vec::new(),
            signal: PhaseController::new(config.timing),
            is_running: true,
            speed_multiplier: 1.0,
            tick_count: 0,
            time: 0.0,
            completed_vehicles: 0,
            spawned_vehicles: 0,
            phase_switches: 0,
            config,
            next_id: 0,
            rng,
        }
    }

    pub fn new() -> Self {
        Self::new_internal(None, SimConfig::default())
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)), SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self::new_internal(None, config)
    }

    /// Create a SimWorld with custom configuration and a seeded RNG
    pub fn with_config_and_seed(config: SimConfig, seed: u64) -> Self {
        Self::new_internal(Some(StdRng::seed_from_u64(seed)), config)
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    /// Pick a livery, using seeded RNG if available
    fn random_livery(&mut self) -> Livery {
        match &mut self.rng {
            Some(rng) => spawner::random_livery(rng),
            None => spawner::random_livery(&mut rand::rng()),
        }
    }

    /// Simulated seconds covered by one tick at the current speed
    pub fn delta_secs(&self) -> f32 {
        self.speed_multiplier / FPS
    }

    pub fn phase(&self) -> SignalPhase {
        self.signal.phase
    }

    pub fn has_right_of_way(&self, flow: Flow) -> bool {
        self.signal.has_right_of_way(flow)
    }

    pub fn get_vehicle(&self, id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Add a vehicle travelling from `origin` to `destination`
    ///
    /// Fails if `destination` is not the corner opposite `origin`.
    pub fn add_vehicle(&mut self, origin: Corner, destination: Corner) -> Result<VehicleId> {
        let route = Route::new(origin, destination)?;
        let livery = self.random_livery();
        Ok(self.spawn_vehicle(route, livery))
    }

    fn spawn_vehicle(&mut self, route: Route, livery: Livery) -> VehicleId {
        let id = self.next_vehicle_id();
        debug!(
            "Spawning vehicle {} on {} ({})",
            id,
            route.key(),
            livery.name()
        );
        self.vehicles.push(SimVehicle::new(id, route, livery));
        self.spawned_vehicles += 1;
        id
    }

    pub fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    pub fn toggle_running(&mut self) {
        self.is_running = !self.is_running;
    }

    /// Change the speed multiplier; it must be finite and positive
    pub fn set_speed_multiplier(&mut self, multiplier: f32) -> Result<()> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            bail!("Speed multiplier must be a positive number, got {}", multiplier);
        }

        let braking_distance = stopping_distance(MAX_SPEED, multiplier);
        if braking_distance > STOP_LOOKAHEAD_DISTANCE {
            warn!(
                "Speed multiplier {} needs {:.1}px to stop from full speed but red signals are only seen {:.1}px ahead; vehicles may run red lights",
                multiplier, braking_distance, STOP_LOOKAHEAD_DISTANCE
            );
        }

        self.speed_multiplier = multiplier;
        Ok(())
    }

    /// Discard all vehicles and signal state
    ///
    /// Configuration, the random source and the ID counter are kept.
    pub fn reset(&mut self) {
        self.vehicles.clear();
        self.signal = PhaseController::new(self.config.timing);
        self.is_running = true;
        self.speed_multiplier = 1.0;
        self.tick_count = 0;
        self.time = 0.0;
        self.completed_vehicles = 0;
        self.spawned_vehicles = 0;
        self.phase_switches = 0;
    }

    /// Speed `vehicle` should aim for this tick, given the signal and its leader
    fn target_speed(&self, vehicle: &SimVehicle) -> f32 {
        let has_right_of_way = self.signal.has_right_of_way(vehicle.flow());
        let mut target = vehicle.max_speed;

        // Vehicles already past the line keep going so they clear the intersection
        if !has_right_of_way
            && vehicle.before_stop_line()
            && vehicle.distance_to_stop_line() < STOP_LOOKAHEAD_DISTANCE
        {
            target = 0.0;
        }

        if let Some(limit) = following_speed_limit(vehicle, &self.vehicles) {
            target = target.min(limit);
        }

        if !has_right_of_way
            && vehicle.is_stopped()
            && vehicle.distance_to_stop_line().abs() < STOP_LINE_TOLERANCE
        {
            target = 0.0;
        }

        target
    }

    /// Main simulation tick
    pub fn tick(&mut self) {
        if !self.is_running {
            return;
        }

        let delta_secs = self.delta_secs();

        // Wait times must reflect last tick's speeds before the signal reads them
        for vehicle in &mut self.vehicles {
            vehicle.update_wait_time(delta_secs);
        }

        if self.signal.advance(delta_secs, &self.vehicles).is_some() {
            self.phase_switches += 1;
        }

        self.vehicles
            .sort_by_key(|v| Reverse(OrderedFloat(v.distance_traveled)));

        // Targets are resolved against the state at the start of the tick
        let targets: Vec<f32> = self
            .vehicles
            .iter()
            .map(|vehicle| self.target_speed(vehicle))
            .collect();

        let multiplier = self.speed_multiplier;
        for (vehicle, target) in self.vehicles.iter_mut().zip(targets) {
            if vehicle.update(target, multiplier) == VehicleUpdateResult::Arrived {
                debug!("Vehicle {} arrived at {:?}", vehicle.id, vehicle.route.destination());
            }
        }

        let before = self.vehicles.len();
        self.vehicles.retain(|v| !v.has_arrived());
        self.completed_vehicles += before - self.vehicles.len();

        self.tick_count += 1;
        self.time += f64::from(self.speed_multiplier) / f64::from(FPS);
        self.spawn_arrivals();
    }

    fn spawn_arrivals(&mut self) {
        let tick = self.tick_count;
        let config = self.config;
        let multiplier = self.speed_multiplier;
        let population = self.vehicles.len();

        let arrival = match &mut self.rng {
            Some(rng) => spawner::roll_arrival(rng, tick, &config, multiplier, population),
            None => spawner::roll_arrival(&mut rand::rng(), tick, &config, multiplier, population),
        };

        if let Some(Arrival { route, livery }) = arrival {
            self.spawn_vehicle(route, livery);
        }
    }

    /// Read-only copy of the state for renderers
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            vehicles: self.vehicles.iter().map(VehicleView::from).collect(),
            phase: self.signal.phase,
            phase_elapsed: self.signal.elapsed,
            lights: [
                self.signal.light_for(Flow::A),
                self.signal.light_for(Flow::B),
            ],
            completed_vehicles: self.completed_vehicles,
            spawned_vehicles: self.spawned_vehicles,
            tick: self.tick_count,
            time: self.time,
            is_running: self.is_running,
            speed_multiplier: self.speed_multiplier,
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Intersection Simulation Summary ===");
        println!(
            "Time: {:.2}s (tick {}), speed x{}, {}",
            self.time,
            self.tick_count,
            self.speed_multiplier,
            if self.is_running { "running" } else { "paused" }
        );
        println!(
            "Signal: {} for {:.1}s (next green: {})",
            self.signal.phase.label(),
            self.signal.elapsed,
            self.signal.next_after_clear().label()
        );
        println!(
            "Vehicles: {} active, {} spawned, {} completed",
            self.vehicles.len(),
            self.spawned_vehicles,
            self.completed_vehicles
        );
        println!("Phase switches: {}", self.phase_switches);

        if !self.vehicles.is_empty() {
            println!("--- Active Vehicles ---");
            for vehicle in &self.vehicles {
                println!(
                    "  Vehicle {}: {} speed={:.2}, position=({:.1}, {:.1}), progress={:.0}/{:.0}, wait={:.1}s",
                    vehicle.id,
                    vehicle.route.key(),
                    vehicle.speed,
                    vehicle.position.x,
                    vehicle.position.y,
                    vehicle.distance_traveled,
                    vehicle.path.total_distance,
                    vehicle.wait_time
                );
            }
        }
    }

    /// Draw a visual map of the intersection in the terminal
    pub fn draw_map(&self) {
        const CELL: f32 = 20.0;
        let min = Position::new(-60.0, -60.0);
        let max = Position::new(1080.0, 580.0);
        let width = ((max.x - min.x) / CELL) as usize + 1;
        let height = ((max.y - min.y) / CELL) as usize + 1;

        let mut grid = vec![vec![' '; width]; height];

        // Helper to convert world coords to grid coords
        let to_grid = |pos: Position| -> Option<(usize, usize)> {
            let col = ((pos.x - min.x) / CELL).round();
            let row = ((pos.y - min.y) / CELL).round();
            if col < 0.0 || row < 0.0 || col as usize >= width || row as usize >= height {
                None
            } else {
                Some((row as usize, col as usize))
            }
        };

        // Roads along each diagonal
        for origin in [Corner::TopLeft, Corner::TopRight] {
            let start = origin.position();
            let end = origin.opposite().position();
            let steps = (start.distance(&end) / (CELL / 2.0)) as usize;
            for step in 0..=steps {
                let t = step as f32 / steps.max(1) as f32;
                let point = Position::new(
                    start.x + (end.x - start.x) * t,
                    start.y + (end.y - start.y) * t,
                );
                if let Some((row, col)) = to_grid(point) {
                    grid[row][col] = '.';
                }
            }
        }

        if let Some((row, col)) = to_grid(INTERSECTION_CENTER) {
            grid[row][col] = '+';
        }

        // Signal heads sit on the stop line of each route
        for origin in Corner::ALL {
            let vehicle_path = path_between(origin, origin.opposite());
            if let Some((row, col)) = to_grid(vehicle_path.stop_line) {
                grid[row][col] = if self.signal.has_right_of_way(origin.flow()) {
                    'G'
                } else {
                    'R'
                };
            }
        }

        for vehicle in &self.vehicles {
            if let Some((row, col)) = to_grid(vehicle.position) {
                grid[row][col] = match (vehicle.flow(), vehicle.is_stopped()) {
                    (Flow::A, false) => 'a',
                    (Flow::A, true) => 'A',
                    (Flow::B, false) => 'b',
                    (Flow::B, true) => 'B',
                };
            }
        }

        println!("\n=== Intersection Map ===");
        println!("Legend: a/b=moving vehicle of flow A/B (upper case when stopped), G/R=signal, +=center, .=road");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line.trim_end());
        }
        println!();
    }
}
