#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PrimitiveAction;

/// A grid cell. `x` grows to the right, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// 4-connected neighbours in a fixed order (up, right, down, left) for determinism.
    pub fn neighbors(self) -> [Cell; 4] {
        [
            self.step(Direction::Up),
            self.step(Direction::Right),
            self.step(Direction::Down),
            self.step(Direction::Left),
        ]
    }

    /// Direction from `self` to an adjacent `other`; `None` when not 4-adjacent.
    pub fn direction_to(self, other: Cell) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| self.step(*dir) == other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Up => (0, -1),
        }
    }

    pub fn action(self) -> PrimitiveAction {
        match self {
            Direction::Left => PrimitiveAction::Left,
            Direction::Right => PrimitiveAction::Right,
            Direction::Down => PrimitiveAction::Down,
            Direction::Up => PrimitiveAction::Up,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Up => 'U',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Direction> {
        match glyph.to_ascii_uppercase() {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'D' => Some(Direction::Down),
            'U' => Some(Direction::Up),
            _ => None,
        }
    }
}
