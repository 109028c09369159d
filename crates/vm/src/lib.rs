//! Instruction-level plumbing for the mimir toolkit.
//!
//! This crate provides the pieces needed to walk raw EVM bytecode without
//! executing it: opcode constants and classification helpers, and a
//! single-pass cursor that supports step-relative lookbehind over the
//! variable-width instruction encoding.

/// Opcode constants, the name table, and the bytecode cursor
pub mod core;

pub use core::{cursor::BytecodeCursor, opcodes};
