//! Deterministic, engine-agnostic data model for the cooperative kitchen.
//!
//! Everything the planner reads about the world goes through [`KitchenView`]. The physics engine
//! that owns positions, timers, and state transitions lives elsewhere and only has to expose
//! this read-only contract.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod food;
pub mod geom;
pub mod object;
pub mod rng;
pub mod tile;
pub mod world;

pub use action::{InvalidAction, PrimitiveAction};
pub use food::{Food, FoodKind, FoodStatus, UnknownFood, UnknownStatus};
pub use geom::{Cell, Direction};
pub use object::{ObjectId, ObjectKind, Placement, WorldObject};
pub use rng::{DeterministicRng, SplitMix64};
pub use tile::{Layout, LayoutError, Tile};
pub use world::{AgentId, AgentState, KitchenView, WorldSnapshot};
