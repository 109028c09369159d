mod abi;
mod args;

pub use abi::{AbiEntry, EventEntry, FunctionEntry};
pub use args::{SketchArgs, SketchArgsBuilder};
