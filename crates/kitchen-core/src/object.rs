#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AgentId, Cell, Food, FoodKind, FoodStatus};

/// Stable identifier for a dynamic object; survives pickups, moves, and mixing into a plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ObjectKind {
    Food(Food),
    Plate { content: Option<Food> },
    FireExtinguisher,
    Fire { put_num: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Placement {
    At(Cell),
    HeldBy(AgentId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub placement: Placement,
}

impl WorldObject {
    pub fn cell(&self) -> Option<Cell> {
        match self.placement {
            Placement::At(cell) => Some(cell),
            Placement::HeldBy(_) => None,
        }
    }

    pub fn holder(&self) -> Option<AgentId> {
        match self.placement {
            Placement::HeldBy(agent) => Some(agent),
            Placement::At(_) => None,
        }
    }

    /// The food carried by this object: itself when loose, the content when a plate.
    pub fn food(&self) -> Option<&Food> {
        match &self.kind {
            ObjectKind::Food(food) => Some(food),
            ObjectKind::Plate { content } => content.as_ref(),
            _ => None,
        }
    }

    pub fn loose_food(&self) -> Option<&Food> {
        match &self.kind {
            ObjectKind::Food(food) => Some(food),
            _ => None,
        }
    }

    pub fn is_plate(&self) -> bool {
        matches!(self.kind, ObjectKind::Plate { .. })
    }

    pub fn is_empty_plate(&self) -> bool {
        matches!(self.kind, ObjectKind::Plate { content: None })
    }

    pub fn is_fire(&self) -> bool {
        matches!(self.kind, ObjectKind::Fire { .. })
    }

    pub fn is_extinguisher(&self) -> bool {
        matches!(self.kind, ObjectKind::FireExtinguisher)
    }

    /// Anything an agent can carry.
    pub fn is_pickable(&self) -> bool {
        !self.is_fire()
    }

    pub fn carries(&self, kind: FoodKind, status: Option<FoodStatus>) -> bool {
        self.food().is_some_and(|f| f.matches(kind, status))
    }

    /// Short human-readable description (`Plate(Lettuce done)`, `Beef fresh`).
    pub fn describe(&self) -> String {
        fn food_label(food: &Food) -> String {
            if food.status == FoodStatus::Neutral {
                food.kind.name().to_string()
            } else {
                format!("{} {}", food.kind.name(), food.status)
            }
        }
        match &self.kind {
            ObjectKind::Food(food) => food_label(food),
            ObjectKind::Plate { content: None } => "Plate".to_string(),
            ObjectKind::Plate {
                content: Some(food),
            } => format!("Plate({})", food_label(food)),
            ObjectKind::FireExtinguisher => "FireExtinguisher".to_string(),
            ObjectKind::Fire { put_num } => format!("Fire({put_num})"),
        }
    }
}
