//! UI components and resources for linking Bevy to simulation state

use bevy::prelude::*;

use crate::simulation::{Livery, Position, SimWorld, INTERSECTION_CENTER};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

impl Default for SimWorldResource {
    fn default() -> Self {
        Self(SimWorld::new())
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for the status text overlay
#[derive(Component)]
pub struct StatusText;

/// Convert a simulation position (y down, origin at the top-left) to
/// screen space centered on the intersection (y up)
pub fn to_screen(position: Position) -> Vec2 {
    Vec2::new(
        position.x - INTERSECTION_CENTER.x,
        INTERSECTION_CENTER.y - position.y,
    )
}

pub fn livery_color(livery: Livery) -> Color {
    match livery {
        Livery::Blue => Color::srgb(0.2, 0.4, 0.9),
        Livery::Yellow => Color::srgb(0.95, 0.8, 0.1),
        Livery::Red => Color::srgb(0.85, 0.15, 0.15),
        Livery::Green => Color::srgb(0.2, 0.75, 0.3),
    }
}
