//! World setup systems for the camera and overlay

use bevy::prelude::*;

use super::components::{MainCamera, StatusText};

/// System to setup the 2D camera and the status overlay
pub fn setup_world(mut commands: Commands) {
    commands.spawn((MainCamera, Camera2d));

    commands.spawn((
        StatusText,
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}
