use kitchen_core::{
    AgentId, AgentState, Cell, Direction, Food, FoodKind, FoodStatus, KitchenView, Layout,
    ObjectId, ObjectKind, Placement, PrimitiveAction, Tile, WorldObject, WorldSnapshot,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::SimConfig;

/// Who a delivery is credited to. `Missed` marks an order that expired; it is recorded as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    Agent(AgentId),
    Missed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub tick: u64,
    pub player: Player,
    pub food: FoodKind,
}

/// Outcome of putting a held object onto another object.
enum Merge {
    /// The target object becomes `0`; the held object is consumed.
    IntoTarget(ObjectKind),
    /// The held object becomes `0`; the target object is consumed.
    IntoHeld(ObjectKind),
    /// Both survive with new kinds (plate-to-plate transfer).
    Transfer { held: ObjectKind, target: ObjectKind },
}

#[derive(Debug, Clone)]
pub struct Kitchen {
    config: SimConfig,
    tick: u64,
    layout: Layout,
    objects: Vec<WorldObject>,
    agents: Vec<AgentState>,
    next_object: u32,
    deliver_log: Vec<Delivery>,
}

impl Kitchen {
    pub fn new(layout: Layout, config: SimConfig) -> Self {
        Self {
            config,
            tick: 0,
            layout,
            objects: Vec::new(),
            agents: Vec::new(),
            next_object: 0,
            deliver_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn add_agent(&mut self, location: Cell, orientation: Direction) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        self.agents.push(AgentState {
            id,
            location,
            orientation,
            holding: None,
        });
        id
    }

    pub fn spawn(&mut self, kind: ObjectKind, cell: Cell) -> ObjectId {
        self.alloc(kind, Placement::At(cell))
    }

    /// Put a new object straight into an empty-handed agent's hands.
    pub fn spawn_held(&mut self, kind: ObjectKind, agent: AgentId) -> Option<ObjectId> {
        let idx = self.agents.iter().position(|a| a.id == agent)?;
        if self.agents[idx].holding.is_some() {
            return None;
        }
        let id = self.alloc(kind, Placement::HeldBy(agent));
        self.agents[idx].holding = Some(id);
        Some(id)
    }

    fn alloc(&mut self, kind: ObjectKind, placement: Placement) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object += 1;
        self.objects.push(WorldObject {
            id,
            kind,
            placement,
        });
        id
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            layout: self.layout.clone(),
            objects: self.objects.clone(),
            agents: self.agents.clone(),
        }
    }

    pub fn deliver_log(&self) -> &[Delivery] {
        &self.deliver_log
    }

    pub fn record_missed(&mut self, food: FoodKind) {
        self.deliver_log.push(Delivery {
            tick: self.tick,
            player: Player::Missed,
            food,
        });
    }

    /// Apply one action per agent (missing agents idle), then advance timers by one tick.
    pub fn step(&mut self, actions: &[(AgentId, PrimitiveAction)]) {
        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        order.sort_by_key(|&i| self.agents[i].id);

        for i in order {
            let id = self.agents[i].id;
            let action = actions
                .iter()
                .find(|(agent, _)| *agent == id)
                .map(|(_, action)| *action)
                .unwrap_or_default();
            trace!(tick = self.tick, agent = %id, %action, "apply");
            match action {
                PrimitiveAction::Noop => {}
                PrimitiveAction::Interact => self.interact(i),
                movement => {
                    if let Some(dir) = movement.direction() {
                        self.walk(i, dir);
                    }
                }
            }
        }

        self.advance_cooking();
        self.tick += 1;
    }

    fn walk(&mut self, i: usize, dir: Direction) {
        self.agents[i].orientation = dir;
        let next = self.agents[i].location.step(dir);
        let free = !self.agents.iter().any(|a| a.location == next);
        if self.layout.is_walkable(next) && free {
            self.agents[i].location = next;
        }
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    fn surface_object(&self, cell: Cell) -> Option<usize> {
        self.objects
            .iter()
            .position(|o| o.cell() == Some(cell) && o.is_pickable())
    }

    fn fire_at(&self, cell: Cell) -> Option<usize> {
        self.objects
            .iter()
            .position(|o| o.cell() == Some(cell) && o.is_fire())
    }

    fn remove(&mut self, id: ObjectId) {
        self.objects.retain(|o| o.id != id);
    }

    fn interact(&mut self, i: usize) {
        let target = self.agents[i].facing();
        let Some(tile) = self.layout.tile(target) else {
            return;
        };
        match self.agents[i].holding {
            None => self.interact_empty(i, target, tile),
            Some(held) => self.interact_holding(i, held, target, tile),
        }
    }

    fn interact_empty(&mut self, i: usize, target: Cell, tile: Tile) {
        let agent = self.agents[i].id;
        match tile {
            Tile::Station(kind) => {
                let id = self.alloc(ObjectKind::Food(Food::fresh(kind)), Placement::HeldBy(agent));
                self.agents[i].holding = Some(id);
            }
            Tile::PlateStation => {
                let id = self.alloc(ObjectKind::Plate { content: None }, Placement::HeldBy(agent));
                self.agents[i].holding = Some(id);
            }
            Tile::CutBoard => {
                let Some(idx) = self.surface_object(target) else {
                    return;
                };
                let chop_steps = self.config.chop_steps;
                if let ObjectKind::Food(food) = &mut self.objects[idx].kind {
                    if food.kind == FoodKind::Lettuce && food.status == FoodStatus::Fresh {
                        food.progress += 1;
                        if food.progress >= chop_steps {
                            food.status = FoodStatus::Done;
                            debug!(tick = self.tick, %agent, "lettuce chopped");
                        }
                        return;
                    }
                }
                self.pick_up(i, idx);
            }
            Tile::Counter { .. } | Tile::DeliverSquare => {
                if let Some(idx) = self.surface_object(target) {
                    self.pick_up(i, idx);
                }
            }
            // Pan contents are taken with a plate; dustbins and floor do nothing.
            Tile::Pan | Tile::Dustbin | Tile::Floor => {}
        }
    }

    fn interact_holding(&mut self, i: usize, held: ObjectId, target: Cell, tile: Tile) {
        let Some(held_idx) = self.index_of(held) else {
            return;
        };

        if let Some(fire_idx) = self.fire_at(target) {
            if self.objects[held_idx].is_extinguisher() {
                let put_steps = self.config.fire_put_steps;
                let out = match &mut self.objects[fire_idx].kind {
                    ObjectKind::Fire { put_num } => {
                        *put_num += 1;
                        *put_num >= put_steps
                    }
                    _ => false,
                };
                if out {
                    let fire = self.objects[fire_idx].id;
                    self.remove(fire);
                    debug!(tick = self.tick, cell = ?target, "fire put out");
                }
            }
            return;
        }

        let surface = self.surface_object(target);
        let held_food = self.objects[held_idx].loose_food().copied();
        match (tile, surface) {
            (Tile::Counter { .. }, None) => self.put_down(i, held_idx, target),
            (Tile::CutBoard, None) => {
                if held_food.is_some_and(|f| f.kind == FoodKind::Lettuce) {
                    self.put_down(i, held_idx, target);
                }
            }
            (Tile::Pan, None) => {
                if held_food.is_some_and(|f| f.kind == FoodKind::Beef && f.status == FoodStatus::Fresh) {
                    self.put_down(i, held_idx, target);
                }
            }
            (Tile::Counter { .. } | Tile::CutBoard | Tile::Pan, Some(other)) => {
                self.combine(i, held_idx, other);
            }
            (Tile::Dustbin, _) => self.discard(i, held_idx),
            (Tile::DeliverSquare, None) => self.deliver(i, held_idx),
            _ => {}
        }
    }

    fn pick_up(&mut self, i: usize, idx: usize) {
        self.objects[idx].placement = Placement::HeldBy(self.agents[i].id);
        self.agents[i].holding = Some(self.objects[idx].id);
    }

    fn put_down(&mut self, i: usize, held_idx: usize, cell: Cell) {
        self.objects[held_idx].placement = Placement::At(cell);
        self.agents[i].holding = None;
    }

    fn combine(&mut self, i: usize, held_idx: usize, target_idx: usize) {
        let merge = match (&self.objects[held_idx].kind, &self.objects[target_idx].kind) {
            (ObjectKind::Food(f), ObjectKind::Food(g)) => {
                f.mix(g).map(|m| Merge::IntoTarget(ObjectKind::Food(m)))
            }
            (ObjectKind::Food(f), ObjectKind::Plate { content: None }) if f.is_plateable() => {
                Some(Merge::IntoTarget(ObjectKind::Plate { content: Some(*f) }))
            }
            (ObjectKind::Food(f), ObjectKind::Plate { content: Some(c) }) => c
                .mix(f)
                .map(|m| Merge::IntoTarget(ObjectKind::Plate { content: Some(m) })),
            (ObjectKind::Plate { content: None }, ObjectKind::Food(g)) if g.is_plateable() => {
                Some(Merge::IntoHeld(ObjectKind::Plate { content: Some(*g) }))
            }
            (ObjectKind::Plate { content: Some(c) }, ObjectKind::Food(g)) => c
                .mix(g)
                .map(|m| Merge::IntoHeld(ObjectKind::Plate { content: Some(m) })),
            (ObjectKind::Plate { content: Some(c) }, ObjectKind::Plate { content: None }) => {
                Some(Merge::Transfer {
                    held: ObjectKind::Plate { content: None },
                    target: ObjectKind::Plate { content: Some(*c) },
                })
            }
            (ObjectKind::Plate { content: Some(c) }, ObjectKind::Plate { content: Some(d) }) => {
                c.mix(d).map(|m| Merge::Transfer {
                    held: ObjectKind::Plate { content: None },
                    target: ObjectKind::Plate { content: Some(m) },
                })
            }
            _ => None,
        };

        let Some(merge) = merge else {
            return;
        };
        let held_id = self.objects[held_idx].id;
        let target_id = self.objects[target_idx].id;
        match merge {
            Merge::IntoTarget(kind) => {
                self.objects[target_idx].kind = kind;
                self.agents[i].holding = None;
                self.remove(held_id);
            }
            Merge::IntoHeld(kind) => {
                self.objects[held_idx].kind = kind;
                self.remove(target_id);
            }
            Merge::Transfer { held, target } => {
                self.objects[held_idx].kind = held;
                self.objects[target_idx].kind = target;
            }
        }
        trace!(tick = self.tick, ?held_id, ?target_id, "combined");
    }

    fn discard(&mut self, i: usize, held_idx: usize) {
        let id = self.objects[held_idx].id;
        match &mut self.objects[held_idx].kind {
            ObjectKind::Plate { content } => *content = None,
            ObjectKind::Food(_) => {
                self.agents[i].holding = None;
                self.remove(id);
            }
            _ => {}
        }
    }

    fn deliver(&mut self, i: usize, held_idx: usize) {
        let ObjectKind::Plate {
            content: Some(food),
        } = self.objects[held_idx].kind
        else {
            return;
        };
        if !food.is_deliverable() {
            return;
        }
        let agent = self.agents[i].id;
        let id = self.objects[held_idx].id;
        self.agents[i].holding = None;
        self.remove(id);
        self.deliver_log.push(Delivery {
            tick: self.tick,
            player: Player::Agent(agent),
            food: food.kind,
        });
        debug!(tick = self.tick, %agent, food = %food.kind, "delivered");
    }

    fn advance_cooking(&mut self) {
        let cfg = self.config;
        let mut ignite = Vec::new();
        for idx in 0..self.objects.len() {
            let Some(cell) = self.objects[idx].cell() else {
                continue;
            };
            if self.layout.tile(cell) != Some(Tile::Pan) || self.fire_at(cell).is_some() {
                continue;
            }
            let ObjectKind::Food(food) = &mut self.objects[idx].kind else {
                continue;
            };
            if food.kind != FoodKind::Beef {
                continue;
            }
            food.progress += 1;
            let reached = if food.progress >= cfg.cook_overcooked {
                FoodStatus::Overcooked
            } else if food.progress >= cfg.cook_done {
                FoodStatus::Done
            } else {
                FoodStatus::InProgress
            };
            if cook_rank(reached) > cook_rank(food.status) {
                food.status = reached;
            }
            if food.progress == cfg.cook_fire {
                ignite.push(cell);
            }
        }
        for cell in ignite {
            debug!(tick = self.tick, ?cell, "pan caught fire");
            self.alloc(ObjectKind::Fire { put_num: 0 }, Placement::At(cell));
        }
    }
}

fn cook_rank(status: FoodStatus) -> u8 {
    match status {
        FoodStatus::Fresh | FoodStatus::Neutral => 0,
        FoodStatus::InProgress => 1,
        FoodStatus::Done => 2,
        FoodStatus::Overcooked => 3,
    }
}

impl KitchenView for Kitchen {
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
