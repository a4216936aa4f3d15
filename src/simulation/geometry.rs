//! Path geometry for the fixed intersection layout
//!
//! Everything here is derived from the corner coordinates and layout
//! constants in [`super::types`]; nothing in this module holds state.

use super::types::{
    Corner, Position, INTERSECTION_CENTER, LANE_OFFSET, STOP_DISTANCE_FROM_CENTER,
};

/// Derived geometry of a single corner-to-corner path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathGeometry {
    /// Unit direction of travel, zero for a degenerate path
    pub direction: Position,
    /// Perpendicular of `direction` the lane offset is applied along
    pub normal: Position,
    /// Lane-offset spawn point
    pub entry: Position,
    /// Lane-offset destination point
    pub exit: Position,
    /// Point the vehicle must not pass while its flow is red
    pub stop_line: Position,
    pub distance_to_stop_line: f32,
    pub total_distance: f32,
}

/// Unit vector from `from` towards `to`, or zero when the points coincide
pub fn unit_direction(from: Position, to: Position) -> Position {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len > 0.0 {
        Position::new(dx / len, dy / len)
    } else {
        Position::new(0.0, 0.0)
    }
}

/// Perpendicular (rotated 90 degrees) of a direction vector
pub fn perpendicular(direction: Position) -> Position {
    Position::new(-direction.y, direction.x)
}

/// Compute the path a vehicle follows between two corners
pub fn path_between(origin: Corner, destination: Corner) -> PathGeometry {
    let start = origin.position();
    let end = destination.position();

    let direction = unit_direction(start, end);
    let normal = perpendicular(direction);

    let entry = start.offset(normal, LANE_OFFSET);
    let exit = end.offset(normal, LANE_OFFSET);

    let stop_line = INTERSECTION_CENTER
        .offset(direction, -STOP_DISTANCE_FROM_CENTER)
        .offset(normal, LANE_OFFSET);

    PathGeometry {
        direction,
        normal,
        entry,
        exit,
        stop_line,
        distance_to_stop_line: entry.distance(&stop_line),
        total_distance: entry.distance(&exit),
    }
}
