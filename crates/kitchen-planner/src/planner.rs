use std::collections::{BTreeMap, BTreeSet};

use kitchen_core::{
    AgentId, Cell, DeterministicRng, FoodKind, FoodStatus, KitchenView, ObjectId, SplitMix64,
    Tile, WorldObject,
};
use kitchen_exec::{
    is_satisfied, is_valid, ItemMatch, Query, Scene, SubTask, Surface, TaskOrder, TaskOutcome,
};
use kitchen_tools::{TraceEvent, TraceLog, TraceSink};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::plan::{self, PlanBook, PlanKey};
use crate::recipe::{RecipeId, RecipeIndex};
use crate::{Guard, Intent, IntentVerb};

pub const REASON_INGREDIENTS: &str = "lack of necessary ingredients";
pub const REASON_NO_COUNTER: &str = "no idle counter";
pub const REASON_NO_THING: &str = "no such thing";
pub const REASON_NO_FIRE: &str = "no fire";
pub const REASON_TOO_MANY_TRIES: &str = "too many tries";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Selection attempts (picks, backtracks, recipe changes) per call.
    pub max_n_try: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { max_n_try: 10 }
    }
}

/// What the planner wants next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    Task(TaskOrder),
    Done,
    Fail(String),
}

/// Per-intent planning state. Rebuilt whenever the intent changes.
#[derive(Debug, Clone)]
struct PlanState {
    intent: Intent,
    /// Fixed key for single-plan intents; compound intents key on the open recipe.
    key: Option<PlanKey>,
    trajectory: Vec<SubTask>,
    recipes: Vec<RecipeId>,
    /// The last recipe on the stack is still being worked on.
    recipe_open: bool,
    failed_recipes: BTreeSet<(Vec<RecipeId>, RecipeId)>,
    designated: Option<ObjectId>,
    failures: u32,
}

impl PlanState {
    fn new(intent: Intent) -> Self {
        Self {
            intent,
            key: None,
            trajectory: Vec::new(),
            recipes: Vec::new(),
            recipe_open: false,
            failed_recipes: BTreeSet::new(),
            designated: None,
            failures: 0,
        }
    }

    fn key(&self) -> Option<PlanKey> {
        match self.key {
            Some(key) => Some(key),
            None if self.recipe_open => self.recipes.last().copied().map(PlanKey::Recipe),
            None => None,
        }
    }

    /// Drop the open recipe and remember that it failed after the current stack.
    fn pop_recipe(&mut self) -> Option<RecipeId> {
        let recipe = self.recipes.pop()?;
        self.failed_recipes.insert((self.recipes.clone(), recipe));
        self.recipe_open = false;
        self.trajectory.clear();
        Some(recipe)
    }
}

/// Table-driven planner turning one intent into a stream of sub-tasks.
#[derive(Debug, Clone)]
pub struct MidPlanner<R = SplitMix64> {
    agent: AgentId,
    config: PlannerConfig,
    rng: R,
    book: PlanBook,
    recipes: RecipeIndex,
    state: Option<PlanState>,
    trace: TraceLog,
}

impl MidPlanner<SplitMix64> {
    pub fn new(agent: AgentId, config: PlannerConfig, seed: u64) -> Self {
        Self::with_rng(agent, config, SplitMix64::new(seed))
    }
}

impl<R: DeterministicRng + Clone> MidPlanner<R> {
    pub fn with_rng(agent: AgentId, config: PlannerConfig, rng: R) -> Self {
        Self {
            agent,
            config,
            rng,
            book: PlanBook::new(),
            recipes: RecipeIndex::new(),
            state: None,
            trace: TraceLog::default(),
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn trace(&self) -> &TraceLog {
        &self.trace
    }

    pub fn intent(&self) -> Option<Intent> {
        self.state.as_ref().map(|s| s.intent)
    }

    pub fn trajectory(&self) -> &[SubTask] {
        self.state
            .as_ref()
            .map(|s| s.trajectory.as_slice())
            .unwrap_or_default()
    }

    pub fn recipe_stack(&self) -> &[RecipeId] {
        self.state
            .as_ref()
            .map(|s| s.recipes.as_slice())
            .unwrap_or_default()
    }

    /// Forget the current intent.
    pub fn clear(&mut self) {
        self.state = None;
    }

    /// Advance planning for `intent`, given how the previously issued sub-task ended.
    pub fn step(
        &mut self,
        world: &dyn KitchenView,
        intent: &Intent,
        last: Option<TaskOutcome>,
    ) -> PlanStep {
        let tick = world.tick();
        let Some(scene) = Scene::new(world, self.agent) else {
            return self.finish(tick, PlanStep::Fail(REASON_NO_THING.to_string()));
        };

        let same_intent = self.state.as_ref().is_some_and(|s| s.intent == *intent);
        if !same_intent {
            if let Err(reason) = self.reset(*intent, &scene) {
                return self.finish(tick, PlanStep::Fail(reason.to_string()));
            }
        } else if let Some(state) = self.state.as_mut() {
            let last_task = state.trajectory.last().copied();
            match (last, last_task) {
                (Some(TaskOutcome::Failure), Some(task)) if task != SubTask::Wait => {
                    state.trajectory.pop();
                    state.failures += 1;
                    debug!(agent = %self.agent, %task, "sub-task failed");
                    self.trace.emit(
                        TraceEvent::new(tick, "planner.backtrack")
                            .with_detail(task.to_string())
                            .with_a(state.trajectory.len() as u64),
                    );
                    if state.failures > self.config.max_n_try {
                        return self.finish(tick, PlanStep::Fail(REASON_TOO_MANY_TRIES.into()));
                    }
                }
                // `wait` loops on its prefix.
                (_, Some(SubTask::Wait)) => {
                    state.trajectory.pop();
                }
                _ => {}
            }
        }

        let step = self.search(&scene);
        self.finish(tick, step)
    }

    fn finish(&mut self, tick: u64, step: PlanStep) -> PlanStep {
        match &step {
            PlanStep::Task(order) => {
                let depth = self.trajectory().len() as u64;
                debug!(agent = %self.agent, task = %order.task, depth, "selected");
                self.trace.emit(
                    TraceEvent::new(tick, "planner.select")
                        .with_detail(order.task.to_string())
                        .with_a(depth),
                );
            }
            PlanStep::Done => {
                let detail = self.intent().map(|i| i.to_string()).unwrap_or_default();
                debug!(agent = %self.agent, intent = %detail, "intent done");
                self.trace
                    .emit(TraceEvent::new(tick, "planner.done").with_detail(detail));
                self.state = None;
            }
            PlanStep::Fail(reason) => {
                debug!(agent = %self.agent, %reason, "intent failed");
                self.trace
                    .emit(TraceEvent::new(tick, "planner.fail").with_detail(reason.clone()));
                self.state = None;
            }
        }
        step
    }

    fn reset(&mut self, intent: Intent, scene: &Scene<'_>) -> Result<(), &'static str> {
        let mut state = PlanState::new(intent);
        state.key = match intent {
            Intent::Prepare { .. } | Intent::Serve { .. } => Some(PlanKey::Intent(intent)),
            Intent::PutoutFire => {
                if scene.world().fires().is_empty() {
                    return Err(REASON_NO_FIRE);
                }
                Some(PlanKey::Intent(intent))
            }
            Intent::PassOn { thing, status } => Some(self.book.ensure_pass_on(thing, status)),
            Intent::CleanACounter { center } => {
                let (cell, object) = dirty_counter(scene, center).ok_or(REASON_NO_THING)?;
                let key = PlanKey::Clean {
                    cell,
                    object: object.id,
                };
                let on_center = scene.tile(cell).is_some_and(Tile::is_center_counter);
                self.book.ensure_clean(key, plan::clean(object, on_center));
                state.designated = Some(object.id);
                Some(key)
            }
            Intent::Assemble { .. } => None,
        };

        if let Some(entry) = state.key.and_then(|key| self.book.entry(key, &[])) {
            let root = entry
                .next
                .iter()
                .find(|e| e.task != SubTask::Wait && is_satisfied(e.task, scene) && e.guard.eval(scene));
            if let Some(edge) = root {
                state.trajectory.push(edge.task);
            }
        }
        debug!(agent = %self.agent, %intent, "intent reset");
        self.state = Some(state);
        Ok(())
    }

    fn search(&mut self, scene: &Scene<'_>) -> PlanStep {
        let tick = scene.world().tick();
        let Self {
            config,
            rng,
            book,
            recipes,
            state,
            trace,
            ..
        } = self;
        let Some(state) = state.as_mut() else {
            return PlanStep::Fail(REASON_NO_THING.to_string());
        };
        let mut excluded: Vec<(Vec<SubTask>, SubTask)> = Vec::new();

        for _ in 0..config.max_n_try {
            if let Intent::Assemble { food } = state.intent {
                if Guard::exists(ItemMatch::food(food, None)).eval(scene) {
                    return PlanStep::Done;
                }
                if !state.recipe_open {
                    match choose_recipe(recipes, rng, state, food, scene) {
                        Some(recipe) => {
                            state.recipes.push(recipe);
                            state.recipe_open = true;
                            state.trajectory.clear();
                            debug!(%recipe, depth = state.recipes.len(), "recipe chosen");
                            trace.emit(
                                TraceEvent::new(tick, "planner.recipe")
                                    .with_detail(recipe.to_string())
                                    .with_a(state.recipes.len() as u64),
                            );
                        }
                        None => match state.pop_recipe() {
                            Some(recipe) => trace.emit(
                                TraceEvent::new(tick, "planner.recipe.pop")
                                    .with_detail(recipe.to_string()),
                            ),
                            None => return PlanStep::Fail(failure_reason(state.intent, scene)),
                        },
                    }
                    continue;
                }
            }

            let Some(key) = state.key() else {
                return PlanStep::Fail(failure_reason(state.intent, scene));
            };
            let entry = book.entry(key, &state.trajectory);
            let complete = entry.is_some_and(|e| e.complete);
            if let Some(rule) = book.done_rule(key) {
                if rule.holds(scene, complete) {
                    if let PlanKey::Recipe(recipe) = key {
                        state.recipe_open = false;
                        state.trajectory.clear();
                        debug!(%recipe, "recipe finished");
                        continue;
                    }
                    return PlanStep::Done;
                }
            }

            let candidates: Vec<(SubTask, SubTask)> = entry
                .map(|entry| {
                    entry
                        .next
                        .iter()
                        .filter(|edge| !excluded.contains(&(state.trajectory.clone(), edge.task)))
                        .filter(|edge| edge.guard.eval(scene))
                        .map(|edge| (edge.task, rewrite(edge.task, key, scene)))
                        .filter(|&(_, task)| is_valid(task, scene))
                        .collect()
                })
                .unwrap_or_default();

            if !candidates.is_empty() {
                let (listed, issued) = candidates[rng.choose_index(candidates.len())];
                let mut order = TaskOrder::new(issued);
                if state.trajectory.is_empty() && listed.needs_empty_hands() {
                    if let Some(object) = state.designated {
                        order = order.at(object);
                    }
                }
                state.trajectory.push(listed);
                return PlanStep::Task(order);
            }

            match state.trajectory.pop() {
                Some(task) => {
                    debug!(%task, depth = state.trajectory.len(), "backtrack");
                    trace.emit(
                        TraceEvent::new(tick, "planner.backtrack")
                            .with_detail(task.to_string())
                            .with_a(state.trajectory.len() as u64),
                    );
                    excluded.push((state.trajectory.clone(), task));
                }
                None if state.recipe_open => {
                    if let Some(recipe) = state.pop_recipe() {
                        debug!(%recipe, "recipe abandoned");
                        trace.emit(
                            TraceEvent::new(tick, "planner.recipe.pop")
                                .with_detail(recipe.to_string()),
                        );
                    }
                }
                None => return PlanStep::Fail(failure_reason(state.intent, scene)),
            }
        }
        PlanStep::Fail(REASON_TOO_MANY_TRIES.to_string())
    }

    /// Every kwargs variant, per verb, that would not fail right away. Each check runs on a
    /// clone, so the live planner is untouched.
    pub fn get_valid_mid_actions(&self, world: &dyn KitchenView) -> BTreeMap<IntentVerb, Vec<Intent>> {
        IntentVerb::ALL
            .into_iter()
            .map(|verb| {
                let valid = Intent::variants(verb)
                    .into_iter()
                    .filter(|intent| {
                        let mut trial = self.clone();
                        trial.state = None;
                        !matches!(trial.step(world, intent, None), PlanStep::Fail(_))
                    })
                    .collect();
                (verb, valid)
            })
            .collect()
    }
}

fn choose_recipe<R: DeterministicRng>(
    index: &RecipeIndex,
    rng: &mut R,
    state: &PlanState,
    target: FoodKind,
    scene: &Scene<'_>,
) -> Option<RecipeId> {
    let open: Vec<_> = index
        .continuations(target, &state.recipes)
        .iter()
        .filter(|c| !state.failed_recipes.contains(&(state.recipes.clone(), c.recipe)))
        .filter(|c| c.available.eval(scene))
        .collect();
    let best = open.iter().map(|c| c.urgency).min()?;
    let group: Vec<RecipeId> = open
        .iter()
        .filter(|c| c.urgency == best)
        .map(|c| c.recipe)
        .collect();
    Some(group[rng.choose_index(group.len())])
}

fn failure_reason(intent: Intent, scene: &Scene<'_>) -> String {
    let reason = match intent {
        Intent::PassOn { .. } if !scene.has_free(Surface::CenterCounter) => REASON_NO_COUNTER,
        Intent::Serve { .. } | Intent::CleanACounter { .. } => REASON_NO_THING,
        Intent::PutoutFire => REASON_NO_FIRE,
        _ => REASON_INGREDIENTS,
    };
    reason.to_string()
}

/// The sub-task to hand to the executor for a table entry.
fn rewrite(task: SubTask, key: PlanKey, scene: &Scene<'_>) -> SubTask {
    match task {
        SubTask::GetFromStation(food) => {
            let here = scene.location();
            let fresh = food.initial_status();
            let nearest_loose = scene
                .find(&Query::new(ItemMatch::loose(food, Some(fresh))).on(Surface::NotPan))
                .iter()
                .filter_map(|o| o.cell())
                .map(|c| c.manhattan(here))
                .min();
            let nearest_station = scene
                .tiles(|t| t == Tile::Station(food))
                .into_iter()
                .map(|c| c.manhattan(here))
                .min();
            match (nearest_loose, nearest_station) {
                (Some(loose), Some(station)) if loose < station => {
                    SubTask::pickup_for(food, fresh).unwrap_or(task)
                }
                (Some(_), None) => SubTask::pickup_for(food, fresh).unwrap_or(task),
                _ => task,
            }
        }
        SubTask::PutOntoPlate if scene.holds(&ItemMatch::EmptyPlate) => key
            .food()
            .and_then(SubTask::plate_for)
            .filter(|&plated| is_valid(plated, scene))
            .unwrap_or(task),
        _ => task,
    }
}

/// The counter `clean_a_counter` works on: burnt beef first, then the nearest occupied counter.
fn dirty_counter<'w>(
    scene: &Scene<'w>,
    center: bool,
) -> Option<(Cell, &'w WorldObject)> {
    let here = scene.location();
    scene
        .world()
        .objects()
        .iter()
        .filter(|o| o.is_pickable() && plan::pickup_verb(o).is_some())
        .filter_map(|o| {
            let cell = o.cell()?;
            let tile = scene.tile(cell)?;
            let fits = if center {
                tile.is_center_counter()
            } else {
                tile.is_counter()
            };
            (fits && !scene.fire_at(cell) && scene.can_reach(cell)).then_some((cell, o))
        })
        .min_by_key(|&(cell, o)| {
            let burnt = o
                .loose_food()
                .is_some_and(|f| f.kind == FoodKind::Beef && f.status == FoodStatus::Overcooked);
            (!burnt, cell.manhattan(here), cell.y, cell.x)
        })
}
