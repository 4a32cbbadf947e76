//! Drift direction between the first and last drop positions.
//!
//! Image rows grow downward, so the vertical displacement is negated before
//! taking the bearing: 0 degrees is East (+x) and 90 degrees is North (-y).

use std::fmt;

use serde::{Serialize, Serializer};

/// Compass direction of the drop's net displacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Stationary,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// Counter-clockwise from East, one entry per 45 degree sector.
const SECTORS: [Direction; 8] = [
    Direction::East,
    Direction::NorthEast,
    Direction::North,
    Direction::NorthWest,
    Direction::West,
    Direction::SouthWest,
    Direction::South,
    Direction::SouthEast,
];

const SECTOR_WIDTH: f64 = 45.0;

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stationary => "Stationary",
            Self::North => "North",
            Self::NorthEast => "North-East",
            Self::East => "East",
            Self::SouthEast => "South-East",
            Self::South => "South",
            Self::SouthWest => "South-West",
            Self::West => "West",
            Self::NorthWest => "North-West",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Bearing of a displacement in image coordinates, in degrees within [0, 360).
pub fn bearing_degrees(dx: f64, dy: f64) -> f64 {
    let bearing = (-dy).atan2(dx).to_degrees();
    let normalized = bearing.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Quantize a bearing into one of the eight compass sectors.
///
/// Each sector spans 45 degrees centered on its direction. A bearing that lies
/// exactly on a sector edge belongs to the sector with the higher angle.
pub fn direction_from_bearing(bearing: f64) -> Direction {
    let index = ((bearing + SECTOR_WIDTH / 2.0) / SECTOR_WIDTH).floor() as usize % SECTORS.len();
    SECTORS[index]
}

/// Direction from `start` to `end`.
///
/// Missing positions and displacements shorter than `noise_floor` pixels are
/// reported as [`Direction::Stationary`].
pub fn determine_direction(
    start: Option<(i32, i32)>,
    end: Option<(i32, i32)>,
    noise_floor: f64,
) -> Direction {
    let (Some((x0, y0)), Some((x1, y1))) = (start, end) else {
        return Direction::Stationary;
    };
    let dx = (x1 - x0) as f64;
    let dy = (y1 - y0) as f64;
    if dx.hypot(dy) < noise_floor {
        return Direction::Stationary;
    }
    direction_from_bearing(bearing_degrees(dx, dy))
}
