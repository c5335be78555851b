//! # Tracker Context
//!
//! Turns tracker state into the text an LLM narrative session consumes. This
//! crate builds on `tracker_model` and produces three views of the same state:
//!
//! - **instructions**: the block telling the model which JSON shape to emit
//! - **formatter**: a flattened summary of the current state
//! - **history**: per-turn summaries positioned inside the transcript window
//!
//! ## Design Philosophy
//!
//! - **Never interrupt the conversation**: every failure degrades to missing context, not an error
//! - **Read-only inputs**: snapshots and configuration belong to the caller and are never mutated
//! - **Deterministic**: identical inputs always produce identical text

pub mod formatter;
pub mod history;
pub mod instructions;

pub use formatter::*;
pub use history::*;
pub use instructions::*;
