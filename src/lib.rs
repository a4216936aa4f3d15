//! Intersection Signal Simulation Library
//!
//! Simulates two conflicting traffic flows through a four-way intersection
//! under an adaptive signal controller. Runs headless or with a Bevy viewer.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
