//! Sub-task execution for the controlled kitchen agent.
//!
//! A [`SubTask`] is one verb of a closed alphabet (`pickup_plate`, `chop_lettuce`, ...). The
//! [`TextAgent`] turns the current sub-task into one primitive action per tick, and reports
//! success or failure once the sub-task's post-condition holds or can no longer be reached.
//! Validity checks ([`is_valid`], [`valid_actions`]) are pure functions of a [`Scene`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

mod executor;
mod query;
mod scene;
mod subtask;
mod validity;

pub use executor::{ExecStatus, ExecutorConfig, TaskOrder, TaskOutcome, TextAgent};
pub use query::{ItemMatch, Plating, Query, Surface};
pub use scene::Scene;
pub use subtask::{Source, SubTask, UnknownSubTask};
pub use validity::{is_satisfied, is_valid, targets, valid_actions, Target};
