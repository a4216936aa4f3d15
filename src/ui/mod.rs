//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI reads a `SimSnapshot` from `SimWorld` each frame and draws it with 2D gizmos.

mod components;
mod input;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::SimWorldResource;

use input::handle_input;
use sync::{draw_roads, draw_signals, draw_vehicles, tick_simulation, update_status_text};
use world::setup_world;

/// Plugin to register all UI systems
pub struct IntersectionSimUIPlugin;

impl Plugin for IntersectionSimUIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimWorldResource>()
            .insert_resource(Time::<Fixed>::from_hz(crate::simulation::FPS as f64))
            .add_systems(Startup, setup_world)
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    handle_input,
                    draw_roads,
                    draw_signals,
                    draw_vehicles,
                    update_status_text,
                ),
            );
    }
}
