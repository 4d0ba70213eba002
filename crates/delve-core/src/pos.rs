//! Grid coordinates and compass directions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::rng::GameRng;

/// A 2D integer position. X grows right, Y grows down (screen coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return a position shifted by (dx, dy).
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four cardinal neighbours (north, east, south, west).
    pub const fn neighbors_4(self) -> [Pos; 4] {
        [
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y),
        ]
    }
}

impl core::fmt::Display for Pos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight compass directions.
///
/// The numeric keypad layout (1 = down-left .. 9 = up-right, 5 unused) is
/// the wire form used by directed-spell commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Dir {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Dir {
    pub const ALL: [Dir; 8] = [
        Dir::North,
        Dir::NorthEast,
        Dir::East,
        Dir::SouthEast,
        Dir::South,
        Dir::SouthWest,
        Dir::West,
        Dir::NorthWest,
    ];

    /// Step delta as (dx, dy).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Dir::North => (0, -1),
            Dir::NorthEast => (1, -1),
            Dir::East => (1, 0),
            Dir::SouthEast => (1, 1),
            Dir::South => (0, 1),
            Dir::SouthWest => (-1, 1),
            Dir::West => (-1, 0),
            Dir::NorthWest => (-1, -1),
        }
    }

    /// Decode a keypad digit (1-9, excluding 5).
    pub const fn from_keypad(digit: u8) -> Option<Dir> {
        match digit {
            1 => Some(Dir::SouthWest),
            2 => Some(Dir::South),
            3 => Some(Dir::SouthEast),
            4 => Some(Dir::West),
            6 => Some(Dir::East),
            7 => Some(Dir::NorthWest),
            8 => Some(Dir::North),
            9 => Some(Dir::NorthEast),
            _ => None,
        }
    }

    /// Uniform random direction.
    pub fn random(rng: &mut GameRng) -> Dir {
        Self::ALL[rng.rn2(8) as usize]
    }
}
