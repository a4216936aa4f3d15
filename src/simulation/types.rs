//! Core types for the intersection simulation
//!
//! These are standalone types that don't depend on Bevy.

use anyhow::{bail, Result};
use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 .0)
    }
}

/// A 2D position in the simulation plane (pixels, y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Offset this position by `amount` along `direction`
    pub fn offset(&self, direction: Position, amount: f32) -> Position {
        Position {
            x: self.x + direction.x * amount,
            y: self.y + direction.y * amount,
        }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// One of the four anchor points vehicles enter and leave the scene from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All corners, in the order the spawner draws from
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Fixed coordinates of the corner
    pub fn position(self) -> Position {
        match self {
            Corner::TopLeft => Position::new(-40.0, -50.0),
            Corner::TopRight => Position::new(1070.0, -50.0),
            Corner::BottomLeft => Position::new(-50.0, 570.0),
            Corner::BottomRight => Position::new(1050.0, 545.0),
        }
    }

    /// The diagonally opposite corner
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// The flow a vehicle starting at this corner belongs to
    pub fn flow(self) -> Flow {
        match self {
            Corner::TopLeft | Corner::BottomRight => Flow::A,
            Corner::TopRight | Corner::BottomLeft => Flow::B,
        }
    }

    /// Two-letter tag used in asset names
    pub fn short_name(self) -> &'static str {
        match self {
            Corner::TopLeft => "tl",
            Corner::TopRight => "tr",
            Corner::BottomLeft => "bl",
            Corner::BottomRight => "br",
        }
    }
}

/// One of the two conflicting traffic streams sharing the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// TopLeft <-> BottomRight
    A,
    /// TopRight <-> BottomLeft
    B,
}

impl Flow {
    pub const ALL: [Flow; 2] = [Flow::A, Flow::B];

    pub fn opposite(self) -> Flow {
        match self {
            Flow::A => Flow::B,
            Flow::B => Flow::A,
        }
    }

    /// Label used in console output, named after the route it starts on
    pub fn label(self) -> &'static str {
        match self {
            Flow::A => "TL_BR",
            Flow::B => "TR_BL",
        }
    }
}

/// An origin -> destination corner pair; the destination is always the
/// opposite corner of the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    origin: Corner,
    destination: Corner,
}

impl Route {
    /// Build a route, rejecting pairs that are not diagonally opposite
    pub fn new(origin: Corner, destination: Corner) -> Result<Self> {
        if origin.opposite() != destination {
            bail!(
                "Invalid route {:?} -> {:?}: destination must be the opposite corner ({:?})",
                origin,
                destination,
                origin.opposite()
            );
        }
        Ok(Self {
            origin,
            destination,
        })
    }

    /// The route starting at `origin`
    pub fn from_origin(origin: Corner) -> Self {
        Self {
            origin,
            destination: origin.opposite(),
        }
    }

    pub fn origin(&self) -> Corner {
        self.origin
    }

    pub fn destination(&self) -> Corner {
        self.destination
    }

    pub fn flow(&self) -> Flow {
        self.origin.flow()
    }

    /// Stable key renderers use to pick assets for the route
    pub fn key(&self) -> &'static str {
        match self.origin {
            Corner::TopLeft => "TL_BR",
            Corner::TopRight => "TR_BL",
            Corner::BottomLeft => "BL_TR",
            Corner::BottomRight => "BR_TL",
        }
    }
}

/// Cosmetic color variant of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Livery {
    Blue,
    Yellow,
    Red,
    Green,
}

impl Livery {
    pub const ALL: [Livery; 4] = [Livery::Blue, Livery::Yellow, Livery::Red, Livery::Green];

    pub fn name(self) -> &'static str {
        match self {
            Livery::Blue => "blue",
            Livery::Yellow => "yellow",
            Livery::Red => "red",
            Livery::Green => "green",
        }
    }
}

/// Center of the intersection
pub const INTERSECTION_CENTER: Position = Position::new(1040.0 / 2.0, 585.0 / 2.0);

/// Lateral offset applied along the perpendicular of a route so that
/// opposing directions use distinct lanes
pub const LANE_OFFSET: f32 = -30.0;

/// How far before the intersection center the stop line sits
pub const STOP_DISTANCE_FROM_CENTER: f32 = 60.0;

/// Following distance below which a vehicle matches its leader's speed
pub const VEHICLE_SPACING: f32 = 80.0;

/// Distance before the stop line at which a red signal forces a stop
pub const STOP_LOOKAHEAD_DISTANCE: f32 = VEHICLE_SPACING * 1.5;

/// Ratio of the leader's speed a follower may drive at
pub const FOLLOWING_SPEED_RATIO: f32 = 0.9;

/// Stopped vehicles within this distance of the stop line are held there
pub const STOP_LINE_TOLERANCE: f32 = 5.0;

/// Nominal frames per simulated second
pub const FPS: f32 = 60.0;

/// Speed gained per tick while below target (pixels per frame)
pub const ACCELERATION: f32 = 0.05;

/// Speed shed per tick while above target (pixels per frame)
pub const BRAKING: f32 = 0.15;

/// Top speed of every vehicle (pixels per frame)
pub const MAX_SPEED: f32 = 2.5;

/// Below this speed a vehicle counts as stopped
pub const STOPPED_SPEED_THRESHOLD: f32 = 0.1;

/// Speeds below this snap to zero
pub const SPEED_EPSILON: f32 = 0.01;
