//! Core functionality for fixture.
//!
//! This crate provides the type-directed engine behind fixture: type
//! schemas, classification, dummy value synthesis, object population and
//! structural comparison.

pub mod classify;
pub mod compare;
pub mod copy;
pub mod data;
pub mod error;
pub mod populate;
pub mod random;
pub mod reflect;
pub mod synth;
pub mod value;

// Re-export the main types
pub use classify::*;
pub use compare::*;
pub use copy::*;
pub use data::*;
pub use error::*;
pub use populate::*;
pub use random::*;
pub use reflect::*;
pub use synth::*;
pub use value::*;

// Schema types reference these crates
pub use chrono;
pub use uuid;
