//! The mid-level agent: one call per tick, one primitive action out.
//!
//! [`MidAgent`] owns a [`MidPlanner`] and a [`TextAgent`] and alternates between them inside a
//! single driver loop: the planner picks a sub-task, the executor turns it into primitive actions
//! and reports back when it succeeds or fails. Neither side calls into the other.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod config;

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use kitchen_core::rng::derive_seed;
use kitchen_core::{AgentId, KitchenView, PrimitiveAction};
use kitchen_exec::{ExecStatus, SubTask, TaskOutcome, TextAgent};
use kitchen_planner::{Intent, IntentVerb, MidPlanner, PlanStep, REASON_TOO_MANY_TRIES};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

pub use config::{ConfigError, KitchenConfig};

const PLANNER_STREAM: u64 = 1;
const EXECUTOR_STREAM: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Planner/executor round trips allowed within one tick.
    pub n_max_try: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { n_max_try: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidStatus {
    Working,
    Succeeded,
    Failed(String),
}

impl MidStatus {
    pub fn is_end(&self) -> bool {
        !matches!(self, MidStatus::Working)
    }
}

impl fmt::Display for MidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidStatus::Working => f.write_str("Working..."),
            MidStatus::Succeeded => f.write_str("Succeeded"),
            MidStatus::Failed(reason) => write!(f, "Failed, {reason}"),
        }
    }
}

/// Result of one tick: whether the intent is over, the action to submit, and a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidOutcome {
    pub end: bool,
    pub action: PrimitiveAction,
    pub status: MidStatus,
}

impl MidOutcome {
    fn working(action: PrimitiveAction) -> Self {
        Self {
            end: false,
            action,
            status: MidStatus::Working,
        }
    }

    fn ended(status: MidStatus) -> Self {
        Self {
            end: true,
            action: PrimitiveAction::Noop,
            status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MidAgent {
    agent: AgentId,
    config: AgentConfig,
    planner: MidPlanner,
    executor: TextAgent,
    intent: Option<Intent>,
    last: Option<TaskOutcome>,
}

impl MidAgent {
    pub fn new(agent: AgentId, config: &KitchenConfig) -> Self {
        let id = agent.stable_id();
        Self {
            agent,
            config: config.agent,
            planner: MidPlanner::new(
                agent,
                config.planner,
                derive_seed(config.seed, id, PLANNER_STREAM),
            ),
            executor: TextAgent::new(
                agent,
                config.executor,
                derive_seed(config.seed, id, EXECUTOR_STREAM),
            ),
            intent: None,
            last: None,
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn planner(&self) -> &MidPlanner {
        &self.planner
    }

    pub fn executor(&self) -> &TextAgent {
        &self.executor
    }

    /// The sub-task the executor is working on, if any.
    pub fn current_task(&self) -> Option<SubTask> {
        self.executor.current_task()
    }

    pub fn intent(&self) -> Option<Intent> {
        self.intent
    }

    /// String surface: validate `verb` and `kwargs`, then act.
    pub fn get_action(
        &mut self,
        world: &dyn KitchenView,
        verb: &str,
        kwargs: &Map<String, Value>,
    ) -> MidOutcome {
        match Intent::from_kwargs(verb, kwargs) {
            Ok(intent) => self.act(world, &intent),
            Err(err) => {
                debug!(agent = %self.agent, verb, %err, "rejected intent");
                self.reset();
                MidOutcome::ended(MidStatus::Failed(err.to_string()))
            }
        }
    }

    /// Produce this tick's primitive action for `intent`.
    pub fn act(&mut self, world: &dyn KitchenView, intent: &Intent) -> MidOutcome {
        if self.intent != Some(*intent) {
            if let Some(previous) = self.intent {
                debug!(agent = %self.agent, %previous, "intent replaced");
            }
            self.reset();
            self.intent = Some(*intent);
        }

        for _ in 0..self.config.n_max_try {
            if self.executor.current().is_none() {
                match self.planner.step(world, intent, self.last.take()) {
                    PlanStep::Task(order) => self.executor.assign(order),
                    PlanStep::Done => return self.finish(intent, MidStatus::Succeeded),
                    PlanStep::Fail(reason) => return self.finish(intent, MidStatus::Failed(reason)),
                }
            }
            match self.executor.step(world) {
                ExecStatus::Act(action) => return MidOutcome::working(action),
                ExecStatus::Success => self.last = Some(TaskOutcome::Success),
                ExecStatus::Failure(reason) => {
                    debug!(agent = %self.agent, %reason, "sub-task failed");
                    self.last = Some(TaskOutcome::Failure);
                }
            }
        }
        self.finish(intent, MidStatus::Failed(REASON_TOO_MANY_TRIES.to_string()))
    }

    /// Intents that would not fail right away, per verb. Does not disturb the running intent.
    pub fn get_valid_mid_actions(&self, world: &dyn KitchenView) -> BTreeMap<IntentVerb, Vec<Intent>> {
        self.planner.get_valid_mid_actions(world)
    }

    /// Sub-tasks the executor could start in the current state.
    pub fn get_valid_actions(&self, world: &dyn KitchenView) -> BTreeSet<SubTask> {
        self.executor.get_valid_actions(world)
    }

    fn finish(&mut self, intent: &Intent, status: MidStatus) -> MidOutcome {
        info!(agent = %self.agent, %intent, %status, "intent finished");
        self.reset();
        MidOutcome::ended(status)
    }

    fn reset(&mut self) {
        self.planner.clear();
        self.executor.clear();
        self.intent = None;
        self.last = None;
    }
}
