//! Tunable parameters for the signal controller and the spawner

/// Minimum seconds a green phase is held before demand can preempt it
pub const MIN_GREEN_TIME: f32 = 8.0;

/// Hard cap on the length of a green phase
pub const MAX_GREEN_TIME: f32 = 35.0;

/// Length of the all-red clearance interval
pub const ALL_RED_TIME: f32 = 2.0;

/// Seconds an idle green phase is kept before yielding to waiting traffic
pub const IDLE_GREEN_GRACE_TIME: f32 = 3.0;

/// Opposing demand must exceed current demand by this factor to preempt
pub const PRIORITY_THRESHOLD: f32 = 1.5;

/// Priority weight of each stopped vehicle
pub const WEIGHT_CAR_COUNT: f32 = 1.0;

/// Priority weight of each second of accumulated wait
pub const WEIGHT_WAIT_TIME: f32 = 0.2;

/// Ticks between spawn attempts
pub const SPAWN_INTERVAL_TICKS: u64 = 90;

/// Chance of a spawn per attempt at 1x speed
pub const SPAWN_PROBABILITY: f32 = 0.5;

/// Timing and weighting of the adaptive phase controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalTiming {
    pub min_green: f32,
    pub max_green: f32,
    pub all_red: f32,
    pub idle_grace: f32,
    pub priority_threshold: f32,
    pub weight_count: f32,
    pub weight_wait: f32,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            min_green: MIN_GREEN_TIME,
            max_green: MAX_GREEN_TIME,
            all_red: ALL_RED_TIME,
            idle_grace: IDLE_GREEN_GRACE_TIME,
            priority_threshold: PRIORITY_THRESHOLD,
            weight_count: WEIGHT_CAR_COUNT,
            weight_wait: WEIGHT_WAIT_TIME,
        }
    }
}

/// Simulation-wide configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub timing: SignalTiming,
    /// Spawn attempts happen when the tick counter is a multiple of this
    pub spawn_interval: u64,
    /// Base spawn chance per attempt, scaled by the speed multiplier
    pub spawn_probability: f32,
    /// Optional admission cap; the spawner skips arrivals at this population
    pub max_vehicles: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timing: SignalTiming::default(),
            spawn_interval: SPAWN_INTERVAL_TICKS,
            spawn_probability: SPAWN_PROBABILITY,
            max_vehicles: None,
        }
    }
}

impl SimConfig {
    /// Configuration with stochastic arrivals turned off
    pub fn without_spawning() -> Self {
        Self {
            spawn_probability: 0.0,
            ..Self::default()
        }
    }
}
