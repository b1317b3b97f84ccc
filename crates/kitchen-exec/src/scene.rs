use kitchen_core::{AgentId, AgentState, Cell, FoodKind, KitchenView, Tile, WorldObject};
use kitchen_nav::{NavGrid, Occupants, Reach};

use crate::{ItemMatch, Query, Surface};

/// One consistent read of the world from the controlled agent's point of view.
///
/// Reachability here is static: other agents are ignored, so a partner standing in a doorway
/// does not make a sub-task invalid. Execution uses [`Scene::dynamic_grid`] instead.
pub struct Scene<'w> {
    world: &'w dyn KitchenView,
    agent: AgentState,
    grid: NavGrid,
    reach: Reach,
}

impl<'w> Scene<'w> {
    pub fn new(world: &'w dyn KitchenView, agent: AgentId) -> Option<Self> {
        let agent = world.agent(agent)?.clone();
        let grid = NavGrid::from_layout(world.layout());
        let reach = grid.reachable(agent.location, Occupants::Ignore);
        Some(Self {
            world,
            agent,
            grid,
            reach,
        })
    }

    pub fn world(&self) -> &'w dyn KitchenView {
        self.world
    }

    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    pub fn location(&self) -> Cell {
        self.agent.location
    }

    pub fn held(&self) -> Option<&'w WorldObject> {
        let world = self.world;
        world.held_by(self.agent.id)
    }

    pub fn holds(&self, item: &ItemMatch) -> bool {
        self.held().is_some_and(|o| item.matches(o))
    }

    pub fn grid(&self) -> &NavGrid {
        &self.grid
    }

    pub fn reach(&self) -> &Reach {
        &self.reach
    }

    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        self.world.tile(cell)
    }

    /// Stand cell and walking distance for interacting with `cell`.
    pub fn approach(&self, cell: Cell) -> Option<(Cell, u32)> {
        self.reach.approach(&self.grid, cell, Occupants::Ignore)
    }

    pub fn can_reach(&self, cell: Cell) -> bool {
        self.approach(cell).is_some()
    }

    pub fn is_clear(&self, cell: Cell) -> bool {
        self.world.objects_at(cell).is_empty()
    }

    pub fn fire_at(&self, cell: Cell) -> bool {
        self.world.objects_at(cell).iter().any(|o| o.is_fire())
    }

    /// Reachable tiles satisfying `pred`, row-major.
    pub fn tiles(&self, pred: impl Fn(Tile) -> bool) -> Vec<Cell> {
        self.world
            .layout()
            .cells_where(pred)
            .into_iter()
            .filter(|&cell| self.can_reach(cell))
            .collect()
    }

    /// Reachable empty surfaces.
    pub fn free_surfaces(&self, on: Surface) -> Vec<Cell> {
        self.world
            .layout()
            .cells()
            .filter(|&(cell, tile)| tile.holds_objects() && on.matches(cell, tile))
            .map(|(cell, _)| cell)
            .filter(|&cell| self.is_clear(cell) && self.can_reach(cell))
            .collect()
    }

    pub fn has_free(&self, on: Surface) -> bool {
        !self.free_surfaces(on).is_empty()
    }

    pub fn station_reachable(&self, food: FoodKind) -> bool {
        !self.tiles(|t| t == Tile::Station(food)).is_empty()
    }

    pub fn dustbin_reachable(&self) -> bool {
        !self.tiles(|t| t == Tile::Dustbin).is_empty()
    }

    /// Placed objects matching `query` that the agent can walk up to. Objects sharing a cell
    /// with a fire cannot be interacted with and are skipped unless the query asks for fire.
    pub fn find(&self, query: &Query) -> Vec<&'w WorldObject> {
        let world = self.world;
        world
            .objects()
            .iter()
            .filter(|o| query.item.matches(o))
            .filter(|o| {
                let Some(cell) = o.cell() else {
                    return false;
                };
                let on_surface = world
                    .tile(cell)
                    .is_some_and(|tile| query.on.matches(cell, tile));
                let blocked = query.item != ItemMatch::Fire && self.fire_at(cell);
                on_surface && !blocked && self.can_reach(cell)
            })
            .collect()
    }

    /// Whether a matching object is reachable or, for [`Surface::Anywhere`], already in hand.
    pub fn exists(&self, query: &Query) -> bool {
        (query.on == Surface::Anywhere && self.holds(&query.item)) || !self.find(query).is_empty()
    }

    /// Static passability with every other agent painted as occupied.
    pub fn dynamic_grid(&self) -> NavGrid {
        let mut grid = self.grid.clone();
        for other in self.world.agents() {
            if other.id != self.agent.id {
                grid.set_occupied(other.location);
            }
        }
        grid
    }
}
