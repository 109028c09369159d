/// Single-pass bytecode cursor with step-indexed lookbehind
pub mod cursor;

/// EVM opcode constants and classification helpers
pub mod opcodes;
