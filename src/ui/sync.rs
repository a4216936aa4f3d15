//! Systems for ticking the simulation and drawing its state

use bevy::math::{Isometry2d, Rot2};
use bevy::prelude::*;

use super::components::{livery_color, to_screen, SimWorldResource, StatusText};
use crate::simulation::{path_between, Corner, SignalLight};

const ROAD_COLOR: Color = Color::srgb(0.35, 0.35, 0.35);
const STOP_LINE_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);
const GREEN_LIGHT: Color = Color::srgb(0.1, 0.9, 0.2);
const RED_LIGHT: Color = Color::srgb(0.9, 0.1, 0.1);
const VEHICLE_SIZE: Vec2 = Vec2::new(26.0, 14.0);

/// System to run one simulation tick per fixed step
pub fn tick_simulation(mut sim_world: ResMut<SimWorldResource>) {
    sim_world.0.tick();
}

/// Draw the lane of every route and its stop line
pub fn draw_roads(mut gizmos: Gizmos) {
    for origin in Corner::ALL {
        let path = path_between(origin, origin.opposite());
        gizmos.line_2d(to_screen(path.entry), to_screen(path.exit), ROAD_COLOR);

        let a = path.stop_line.offset(path.normal, 12.0);
        let b = path.stop_line.offset(path.normal, -12.0);
        gizmos.line_2d(to_screen(a), to_screen(b), STOP_LINE_COLOR);
    }
}

/// Draw a signal lamp beside each stop line
pub fn draw_signals(mut gizmos: Gizmos, sim_world: Res<SimWorldResource>) {
    let snapshot = sim_world.0.snapshot();
    for origin in Corner::ALL {
        let path = path_between(origin, origin.opposite());
        let lamp = path.stop_line.offset(path.normal, -20.0);
        let color = match snapshot.light_for(origin.flow()) {
            SignalLight::Green => GREEN_LIGHT,
            SignalLight::Red => RED_LIGHT,
        };
        gizmos.circle_2d(to_screen(lamp), 7.0, color);
    }
}

/// Draw every active vehicle as an oriented rectangle
pub fn draw_vehicles(mut gizmos: Gizmos, sim_world: Res<SimWorldResource>) {
    for vehicle in sim_world.0.snapshot().vehicles {
        // Screen space flips y, so the heading angle flips sign too
        let angle = (-vehicle.direction.y).atan2(vehicle.direction.x);
        let isometry = Isometry2d::new(to_screen(vehicle.position), Rot2::radians(angle));
        gizmos.rect_2d(isometry, VEHICLE_SIZE, livery_color(vehicle.livery));
    }
}

/// Keep the status overlay in sync with the simulation
pub fn update_status_text(
    sim_world: Res<SimWorldResource>,
    mut text_query: Query<&mut Text, With<StatusText>>,
) {
    let snapshot = sim_world.0.snapshot();
    for mut text in text_query.iter_mut() {
        **text = format!(
            "{} | Signal: {} ({:.1}s) | Speed: x{} | Active: {} | Completed: {}",
            if snapshot.is_running { "Running" } else { "Paused" },
            snapshot.phase.label(),
            snapshot.phase_elapsed,
            snapshot.speed_multiplier,
            snapshot.vehicles.len(),
            snapshot.completed_vehicles
        );
    }
}
