//! The Sketch module recovers a usable interface description for a deployed
//! contract from its runtime bytecode alone.
//!
//! No execution is involved: a linear scan recognizes the compiler-emitted
//! dispatcher and event-logging idioms and reports the 4-byte function
//! selectors (with payability) and 32-byte event topic hashes they reveal.

/// Error types for the sketch module
pub mod error;

mod core;
mod interfaces;

// re-export the public interface
pub use core::{sketch, sketch_from_bytecode};
pub use error::Error;
pub use interfaces::{
    AbiEntry, EventEntry, FunctionEntry, SketchArgs, SketchArgsBuilder,
};
