//! Input handling systems

use bevy::log::warn;
use bevy::prelude::*;

use super::components::SimWorldResource;
use crate::simulation::random_route;

/// Keyboard controls for the simulation
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim_world: ResMut<SimWorldResource>,
    mut exit: MessageWriter<AppExit>,
) {
    let world = &mut sim_world.0;

    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }

    if keyboard.just_pressed(KeyCode::Space) {
        world.toggle_running();
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        world.reset();
    }

    if keyboard.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        let faster = world.speed_multiplier * 2.0;
        if let Err(err) = world.set_speed_multiplier(faster) {
            warn!("{err:#}");
        }
    }

    if keyboard.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        let slower = world.speed_multiplier / 2.0;
        if let Err(err) = world.set_speed_multiplier(slower) {
            warn!("{err:#}");
        }
    }

    if keyboard.just_pressed(KeyCode::KeyA) {
        let route = random_route(&mut rand::rng());
        if let Err(err) = world.add_vehicle(route.origin(), route.destination()) {
            warn!("{err:#}");
        }
    }
}
