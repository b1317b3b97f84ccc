//! Mid-level planner for the cooperative kitchen.
//!
//! An [`Intent`] ("prepare a plated beef", "pass the lettuce over") is expanded into a stream of
//! sub-tasks for the executor. Expansion is table-driven: every intent has a set of plans whose
//! edges carry [`Guard`]s, indexed by the trajectory walked so far. Compound foods go through a
//! recipe stack that is backtracked when a branch runs dry.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod guard;
pub mod intent;
pub mod plan;
pub mod planner;
pub mod recipe;

pub use guard::Guard;
pub use intent::{Intent, IntentError, IntentVerb, Thing};
pub use plan::{PlanBook, PlanKey};
pub use planner::{
    MidPlanner, PlanStep, PlannerConfig, REASON_INGREDIENTS, REASON_NO_COUNTER, REASON_NO_FIRE,
    REASON_NO_THING, REASON_TOO_MANY_TRIES,
};
pub use recipe::{Continuation, RecipeId, RecipeIndex};
