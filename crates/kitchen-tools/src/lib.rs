//! Tooling primitives for the kitchen planner.
//!
//! This crate is intentionally lightweight. Rendering and inspection of traces belong to the
//! CLI or whatever harness embeds the planner.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink};
