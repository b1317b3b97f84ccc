//! A small, deterministic kitchen.
//!
//! This stands in for the physics engine the planner talks to: it owns object locations,
//! cooking timers, fires, and the delivery log, and advances one tick per [`Kitchen::step`].
//! Scenarios are YAML files; a handful are embedded for tests and the CLI.

#![forbid(unsafe_code)]

mod kitchen;
mod rules;
mod scenario;

pub use crate::kitchen::{Delivery, Kitchen, Player};
pub use crate::rules::SimConfig;
pub use crate::scenario::{builtin, Scenario, ScenarioAgent, ScenarioError, BUILTIN_SCENARIOS};
