//! # Tracker Model
//!
//! The data layer for tracker state: field values, versioned snapshot payloads,
//! tracker configuration, and transcript turns. This crate normalizes whatever
//! shape a snapshot arrives in and does not produce any prompt text.
//!
//! ## Core Components
//!
//! - **value**: `FieldValue` and the total resolver that turns any field into display text
//! - **snapshot**: tracker categories, raw snapshots, and the payload parser
//! - **config**: display configuration and per-field persistence policy
//! - **transcript**: conversation turns and the bounded history window

pub mod config;
pub mod error;
pub mod snapshot;
pub mod transcript;
pub mod value;

pub use config::*;
pub use error::*;
pub use snapshot::*;
pub use transcript::*;
pub use value::*;
