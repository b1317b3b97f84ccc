use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Direction;

/// The six primitive actions a world accepts each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PrimitiveAction {
    #[default]
    Noop = 0,
    Left = 1,
    Right = 2,
    Down = 3,
    Up = 4,
    Interact = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("primitive action out of range: {0}")]
pub struct InvalidAction(pub u8);

impl PrimitiveAction {
    pub const ALL: [PrimitiveAction; 6] = [
        PrimitiveAction::Noop,
        PrimitiveAction::Left,
        PrimitiveAction::Right,
        PrimitiveAction::Down,
        PrimitiveAction::Up,
        PrimitiveAction::Interact,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The facing/step direction for movement actions.
    pub fn direction(self) -> Option<Direction> {
        match self {
            PrimitiveAction::Left => Some(Direction::Left),
            PrimitiveAction::Right => Some(Direction::Right),
            PrimitiveAction::Down => Some(Direction::Down),
            PrimitiveAction::Up => Some(Direction::Up),
            PrimitiveAction::Noop | PrimitiveAction::Interact => None,
        }
    }
}

impl TryFrom<u8> for PrimitiveAction {
    type Error = InvalidAction;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PrimitiveAction::ALL
            .get(value as usize)
            .copied()
            .ok_or(InvalidAction(value))
    }
}

impl From<PrimitiveAction> for u8 {
    fn from(value: PrimitiveAction) -> Self {
        value.as_u8()
    }
}

impl fmt::Display for PrimitiveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveAction::Noop => "noop",
            PrimitiveAction::Left => "left",
            PrimitiveAction::Right => "right",
            PrimitiveAction::Down => "down",
            PrimitiveAction::Up => "up",
            PrimitiveAction::Interact => "interact",
        };
        f.write_str(name)
    }
}
