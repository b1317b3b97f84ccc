//! Grid pathfinding for the kitchen planner.
//!
//! Cells are `Open`, permanently `Blocked` (anything that is not floor), or `Occupied` by another
//! agent. Keeping the last two apart lets callers tell "unreachable" from "someone is standing
//! in the way".

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod grid;
pub mod reach;

pub use grid::{CellState, NavGrid, Occupants};
pub use reach::Reach;
