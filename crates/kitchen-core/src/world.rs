use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Cell, Direction, Layout, ObjectId, Tile, WorldObject};

/// Stable identifier for an agent. Ordering is the world's action order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentId(pub u32);

impl AgentId {
    pub fn stable_id(self) -> u64 {
        self.0 as u64
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentState {
    pub id: AgentId,
    pub location: Cell,
    pub orientation: Direction,
    pub holding: Option<ObjectId>,
}

impl AgentState {
    pub fn facing(&self) -> Cell {
        self.location.step(self.orientation)
    }
}

/// Read-only world access.
///
/// Planners never mutate the world through this trait; they only submit primitive actions to
/// whatever owns it. Every read inside one planner call must observe the same tick.
pub trait KitchenView {
    fn layout(&self) -> &Layout;

    fn objects(&self) -> &[WorldObject];

    fn agents(&self) -> &[AgentState];

    fn tick(&self) -> u64 {
        0
    }

    fn tile(&self, cell: Cell) -> Option<Tile> {
        self.layout().tile(cell)
    }

    fn object(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects().iter().find(|o| o.id == id)
    }

    fn objects_at(&self, cell: Cell) -> Vec<&WorldObject> {
        self.objects()
            .iter()
            .filter(|o| o.cell() == Some(cell))
            .collect()
    }

    fn agent(&self, id: AgentId) -> Option<&AgentState> {
        self.agents().iter().find(|a| a.id == id)
    }

    fn agent_at(&self, cell: Cell) -> Option<&AgentState> {
        self.agents().iter().find(|a| a.location == cell)
    }

    fn held_by(&self, id: AgentId) -> Option<&WorldObject> {
        let holding = self.agent(id)?.holding?;
        self.object(holding)
    }

    fn fires(&self) -> Vec<&WorldObject> {
        self.objects().iter().filter(|o| o.is_fire()).collect()
    }
}

/// An owned, consistent copy of the world at one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldSnapshot {
    pub tick: u64,
    pub layout: Layout,
    pub objects: Vec<WorldObject>,
    pub agents: Vec<AgentState>,
}

impl KitchenView for WorldSnapshot {
    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    fn tick(&self) -> u64 {
        self.tick
    }
}
