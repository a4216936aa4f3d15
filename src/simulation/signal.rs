//! Adaptive signal controller for the intersection
//!
//! Standalone implementation that doesn't depend on Bevy.
//!
//! The controller alternates right of way between the two flows, always
//! passing through an all-red clearance interval. A green phase ends early
//! when the red flow has queued demand and the green flow has none, when the
//! red flow's demand outweighs the green flow's after the minimum green time,
//! or unconditionally at the maximum green time.

use log::debug;

use super::config::SignalTiming;
use super::types::Flow;
use super::vehicle::SimVehicle;

/// The right-of-way state of the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalPhase {
    /// The flow has right of way, the other is held
    Green(Flow),
    /// Clearance interval; `next` gets right of way once it elapses
    AllRed { next: Flow },
}

impl SignalPhase {
    /// Whether `flow` may enter the intersection in this phase
    pub fn has_right_of_way(&self, flow: Flow) -> bool {
        matches!(self, SignalPhase::Green(green) if *green == flow)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalPhase::Green(flow) => flow.label(),
            SignalPhase::AllRed { .. } => "ALL_RED",
        }
    }
}

/// What a signal head shows to one flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalLight {
    Red,
    Green,
}

/// Stopped vehicles waiting on a red signal for one flow
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlowDemand {
    pub stopped: usize,
    pub total_wait: f32,
}

impl FlowDemand {
    pub fn score(&self, timing: &SignalTiming) -> f32 {
        self.stopped as f32 * timing.weight_count + self.total_wait * timing.weight_wait
    }
}

/// Demand on both flows, counted from vehicles whose own flow is red
///
/// A green flow's stopped vehicles (e.g. still queued at the line just after
/// the switch) never count towards that flow.
pub fn measure_demand(phase: SignalPhase, vehicles: &[SimVehicle]) -> [FlowDemand; 2] {
    let mut demand = [FlowDemand::default(); 2];
    for vehicle in vehicles {
        let flow = vehicle.flow();
        if vehicle.is_stopped() && !phase.has_right_of_way(flow) {
            let entry = &mut demand[flow_index(flow)];
            entry.stopped += 1;
            entry.total_wait += vehicle.wait_time;
        }
    }
    demand
}

fn flow_index(flow: Flow) -> usize {
    match flow {
        Flow::A => 0,
        Flow::B => 1,
    }
}

/// Why a green phase was ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchReason {
    /// Green flow had no demand while the red flow did
    IdleGreen,
    /// Red flow's demand outweighed the green flow's
    Demand,
    /// Maximum green time reached
    MaxGreen,
    /// Clearance interval finished
    ClearanceDone,
}

/// A phase transition produced by [`PhaseController::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseChange {
    pub from: SignalPhase,
    pub to: SignalPhase,
    pub reason: SwitchReason,
    /// Time spent in `from`
    pub elapsed: f32,
}

/// State machine deciding which flow has right of way
#[derive(Debug, Clone)]
pub struct PhaseController {
    pub phase: SignalPhase,
    /// Seconds spent in the current phase
    pub elapsed: f32,
    pub timing: SignalTiming,
}

impl PhaseController {
    pub fn new(timing: SignalTiming) -> Self {
        Self {
            phase: SignalPhase::Green(Flow::A),
            elapsed: 0.0,
            timing,
        }
    }

    /// The green phase entered after the next (or current) clearance interval
    pub fn next_after_clear(&self) -> Flow {
        match self.phase {
            SignalPhase::Green(flow) => flow.opposite(),
            SignalPhase::AllRed { next } => next,
        }
    }

    pub fn has_right_of_way(&self, flow: Flow) -> bool {
        self.phase.has_right_of_way(flow)
    }

    pub fn light_for(&self, flow: Flow) -> SignalLight {
        if self.has_right_of_way(flow) {
            SignalLight::Green
        } else {
            SignalLight::Red
        }
    }

    /// Advance the controller by `delta_secs`, returning the transition if
    /// the phase changed
    pub fn advance(&mut self, delta_secs: f32, vehicles: &[SimVehicle]) -> Option<PhaseChange> {
        self.elapsed += delta_secs;

        let (to, reason) = match self.phase {
            SignalPhase::AllRed { next } => {
                if self.elapsed < self.timing.all_red {
                    return None;
                }
                (SignalPhase::Green(next), SwitchReason::ClearanceDone)
            }
            SignalPhase::Green(green) => {
                let reason = self.green_switch_reason(green, vehicles)?;
                (
                    SignalPhase::AllRed {
                        next: green.opposite(),
                    },
                    reason,
                )
            }
        };

        let change = PhaseChange {
            from: self.phase,
            to,
            reason,
            elapsed: self.elapsed,
        };
        debug!(
            "Signal {} -> {} after {:.2}s ({:?})",
            change.from.label(),
            change.to.label(),
            change.elapsed,
            reason
        );

        self.phase = to;
        self.elapsed = 0.0;
        Some(change)
    }

    fn green_switch_reason(&self, green: Flow, vehicles: &[SimVehicle]) -> Option<SwitchReason> {
        let demand = measure_demand(self.phase, vehicles);
        let current = demand[flow_index(green)].score(&self.timing);
        let opposing = demand[flow_index(green.opposite())].score(&self.timing);

        if current == 0.0 && opposing > 0.0 && self.elapsed > self.timing.idle_grace {
            Some(SwitchReason::IdleGreen)
        } else if self.elapsed >= self.timing.min_green
            && opposing > current * self.timing.priority_threshold
        {
            Some(SwitchReason::Demand)
        } else if self.elapsed >= self.timing.max_green {
            Some(SwitchReason::MaxGreen)
        } else {
            None
        }
    }
}
