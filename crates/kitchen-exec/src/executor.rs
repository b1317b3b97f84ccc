use core::cmp::Reverse;
use std::collections::BTreeSet;

use kitchen_core::{
    AgentId, Cell, DeterministicRng, Direction, KitchenView, ObjectId, ObjectKind,
    PrimitiveAction, SplitMix64,
};
use kitchen_nav::{NavGrid, Occupants};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::validity::{hands, Hands};
use crate::{is_satisfied, targets, valid_actions, Scene, SubTask, Surface, Target};

/// A sub-task as handed down by the planner, optionally pinned to one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOrder {
    pub task: SubTask,
    pub target: Option<ObjectId>,
}

impl TaskOrder {
    pub fn new(task: SubTask) -> Self {
        Self { task, target: None }
    }

    pub fn at(mut self, object: ObjectId) -> Self {
        self.target = Some(object);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecStatus {
    Act(PrimitiveAction),
    Success,
    Failure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExecutorConfig {
    /// Acting ticks one sub-task may take before it is abandoned.
    pub max_ticks_per_task: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_ticks_per_task: 64,
        }
    }
}

/// Per-sub-task scratch. Dropped whenever a sub-task ends or is replaced.
#[derive(Debug, Clone, Default)]
struct Scratch {
    started: bool,
    hand: Option<(ObjectId, ObjectKind)>,
    parking: bool,
    target: Option<Target>,
    chop: Option<ObjectId>,
    waited: bool,
    ticks: u32,
    blocked: u32,
    trail: [Option<Cell>; 2],
}

fn hand_signature(scene: &Scene<'_>) -> Option<(ObjectId, ObjectKind)> {
    scene.held().map(|o| (o.id, o.kind.clone()))
}

/// Low-level executor for one agent.
#[derive(Debug, Clone)]
pub struct TextAgent<R = SplitMix64> {
    agent: AgentId,
    config: ExecutorConfig,
    rng: R,
    order: Option<TaskOrder>,
    scratch: Scratch,
}

impl TextAgent<SplitMix64> {
    pub fn new(agent: AgentId, config: ExecutorConfig, seed: u64) -> Self {
        Self::with_rng(agent, config, SplitMix64::new(seed))
    }
}

impl<R: DeterministicRng> TextAgent<R> {
    pub fn with_rng(agent: AgentId, config: ExecutorConfig, rng: R) -> Self {
        Self {
            agent,
            config,
            rng,
            order: None,
            scratch: Scratch::default(),
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn assign(&mut self, order: TaskOrder) {
        trace!(agent = %self.agent, task = %order.task, "assign");
        self.order = Some(order);
        self.scratch = Scratch::default();
    }

    /// Drop the current sub-task and its scratch.
    pub fn clear(&mut self) {
        self.order = None;
        self.scratch = Scratch::default();
    }

    pub fn current(&self) -> Option<&TaskOrder> {
        self.order.as_ref()
    }

    pub fn current_task(&self) -> Option<SubTask> {
        self.order.map(|o| o.task)
    }

    /// Whether the held object is being parked on a counter before the real sub-task.
    pub fn is_parking(&self) -> bool {
        self.scratch.parking
    }

    pub fn get_valid_actions(&self, world: &dyn KitchenView) -> BTreeSet<SubTask> {
        Scene::new(world, self.agent)
            .map(|scene| valid_actions(&scene))
            .unwrap_or_default()
    }

    /// Advance the current sub-task by one tick.
    pub fn step(&mut self, world: &dyn KitchenView) -> ExecStatus {
        let Some(order) = self.order else {
            return ExecStatus::Failure("no sub-task".to_string());
        };
        let Some(scene) = Scene::new(world, self.agent) else {
            return self.fail(order.task, "agent not in world");
        };

        if !self.scratch.started {
            self.scratch.started = true;
            self.scratch.hand = hand_signature(&scene);
        }
        if self.scratch.parking && scene.held().is_none() {
            trace!(agent = %self.agent, task = %order.task, "parked");
            self.scratch.parking = false;
            self.scratch.target = None;
            self.scratch.trail = [None; 2];
        }
        if !self.scratch.parking && self.finished(&order, &scene) {
            debug!(agent = %self.agent, task = %order.task, "sub-task succeeded");
            self.clear();
            return ExecStatus::Success;
        }

        self.scratch.ticks += 1;
        if self.scratch.ticks > self.config.max_ticks_per_task {
            return self.fail(order.task, "too many ticks");
        }
        if order.task == SubTask::Wait {
            self.scratch.waited = true;
            return ExecStatus::Act(PrimitiveAction::Noop);
        }

        if !self.scratch.parking {
            match hands(order.task, &scene) {
                Hands::Ready => {}
                Hands::Park => {
                    if !scene.has_free(Surface::Counter) {
                        return self.fail(order.task, "no idle counter");
                    }
                    debug!(agent = %self.agent, task = %order.task, "parking held object first");
                    self.scratch.parking = true;
                    self.scratch.target = None;
                    self.scratch.trail = [None; 2];
                }
                Hands::Wrong => return self.fail(order.task, "wrong object in hand"),
            }
        }

        let (active, designated) = if self.scratch.parking {
            (SubTask::PutOntoCounter, None)
        } else {
            (order.task, order.target)
        };
        let Some(target) = self.pick_target(active, designated, &scene) else {
            return self.fail(order.task, "no such thing");
        };
        let same_target = self
            .scratch
            .target
            .is_some_and(|t| t.cell == target.cell && t.object == target.object);
        if !same_target {
            self.scratch.trail = [None; 2];
        }
        self.scratch.target = Some(target);
        if active == SubTask::ChopLettuce {
            self.scratch.chop = target.object;
        }

        let action = self.approach(&scene, target);
        trace!(agent = %self.agent, task = %active, %action, "step");
        ExecStatus::Act(action)
    }

    fn fail(&mut self, task: SubTask, reason: &str) -> ExecStatus {
        debug!(agent = %self.agent, %task, reason, "sub-task failed");
        self.clear();
        ExecStatus::Failure(reason.to_string())
    }

    fn finished(&self, order: &TaskOrder, scene: &Scene<'_>) -> bool {
        match order.task {
            SubTask::Wait => self.scratch.waited,
            SubTask::ChopLettuce => self
                .scratch
                .chop
                .and_then(|id| scene.world().object(id))
                .and_then(|o| o.food())
                .is_some_and(|f| f.is_ready()),
            task if task.changes_hands() => hand_signature(scene) != self.scratch.hand,
            task => is_satisfied(task, scene),
        }
    }

    /// Keep the current target while it stays valid; otherwise rank by distance, then
    /// urgency, then cell, preferring targets no partner is standing in front of.
    fn pick_target(
        &self,
        task: SubTask,
        designated: Option<ObjectId>,
        scene: &Scene<'_>,
    ) -> Option<Target> {
        let mut candidates = targets(task, scene);
        if let Some(id) = designated {
            candidates.retain(|t| t.object == Some(id));
        }
        if let Some(current) = self.scratch.target {
            let kept = candidates
                .iter()
                .find(|t| t.cell == current.cell && t.object == current.object);
            if let Some(kept) = kept {
                return Some(*kept);
            }
        }

        let here = scene.location();
        candidates.sort_by_key(|t| (t.cell.manhattan(here), Reverse(t.urgency), t.cell));
        let grid = scene.dynamic_grid();
        let reach = grid.reachable(here, Occupants::Block);
        candidates
            .iter()
            .find(|t| reach.approach(&grid, t.cell, Occupants::Block).is_some())
            .or(candidates.first())
            .copied()
    }

    fn approach(&mut self, scene: &Scene<'_>, target: Target) -> PrimitiveAction {
        let here = scene.location();
        let grid = scene.dynamic_grid();
        let reach = grid.reachable(here, Occupants::Block);
        let Some((stand, _)) = reach.approach(&grid, target.cell, Occupants::Block) else {
            return self.blocked(&grid, here);
        };
        self.scratch.blocked = 0;

        if stand == here {
            let Some(dir) = here.direction_to(target.cell) else {
                return PrimitiveAction::Noop;
            };
            return if scene.agent().orientation == dir {
                PrimitiveAction::Interact
            } else {
                dir.action()
            };
        }

        let path = grid.shortest_path(here, stand);
        let Some(&next) = path.get(1) else {
            return self.blocked(&grid, here);
        };
        if self.scratch.trail.contains(&Some(next)) {
            warn!(agent = %self.agent, ?here, ?next, "path oscillation, sidestepping");
            return self.sidestep(&grid, here, Some(next));
        }
        if self.scratch.trail[1] != Some(here) {
            self.scratch.trail = [self.scratch.trail[1], Some(here)];
        }
        here.direction_to(next)
            .map_or(PrimitiveAction::Noop, Direction::action)
    }

    /// Only a partner stands between us and the target: wait, and sidestep now and then.
    fn blocked(&mut self, grid: &NavGrid, here: Cell) -> PrimitiveAction {
        self.scratch.blocked += 1;
        if self.scratch.blocked % 3 == 0 {
            return self.sidestep(grid, here, None);
        }
        PrimitiveAction::Noop
    }

    fn sidestep(&mut self, grid: &NavGrid, here: Cell, avoid: Option<Cell>) -> PrimitiveAction {
        let trail = self.scratch.trail;
        let options: Vec<Cell> = here
            .neighbors()
            .into_iter()
            .filter(|&n| Some(n) != avoid && !trail.contains(&Some(n)))
            .filter(|&n| grid.is_passable(n, Occupants::Block))
            .collect();
        self.scratch.trail = [None; 2];
        if options.is_empty() {
            return PrimitiveAction::Noop;
        }
        let pick = options[self.rng.choose_index(options.len())];
        here.direction_to(pick)
            .map_or(PrimitiveAction::Noop, Direction::action)
    }
}
