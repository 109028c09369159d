//! A single-pass cursor over raw EVM bytecode.

use std::collections::VecDeque;

use crate::core::opcodes::{push_size, STOP};

/// A forward-only decoder over an EVM instruction stream.
///
/// The encoding is variable width: `PUSHn` occupies `1 + n` bytes. "One
/// instruction back" and "one byte back" therefore diverge, and a scanner
/// that wants to match multi-instruction idioms cannot simply subtract from
/// the program counter. The cursor keeps a bounded ring of the byte
/// positions of the most recently decoded instructions so that lookups by
/// *step* (instruction ordinal) stay cheap and correct regardless of how
/// many pushed bytes sit inside the window.
///
/// Decoding never fails. Reads past the end of the buffer saturate to
/// [`STOP`] or an empty slice; a truncated `PUSH` at the tail simply ends
/// the stream. Real-world bytecode ends in non-instruction metadata, so a
/// strict decoder would reject contracts that execute fine.
#[derive(Debug, Clone)]
pub struct BytecodeCursor<'a> {
    /// The raw instruction stream.
    bytecode: &'a [u8],
    /// Byte offset of the next instruction to decode.
    next_pos: usize,
    /// Step ordinal of the next instruction to decode.
    next_step: usize,
    /// Byte positions of the most recently decoded instructions, oldest first.
    ring: VecDeque<usize>,
    /// Maximum number of positions retained in the ring.
    lookback: usize,
}

impl<'a> BytecodeCursor<'a> {
    /// Creates a cursor over `bytecode` retaining the positions of the last
    /// `lookback` decoded instructions. A lookback of zero is clamped to one
    /// so [`pos`](Self::pos) always has something to report.
    pub fn new(bytecode: &'a [u8], lookback: usize) -> Self {
        let lookback = lookback.max(1);
        Self {
            bytecode,
            next_pos: 0,
            next_step: 0,
            ring: VecDeque::with_capacity(lookback),
            lookback,
        }
    }

    /// Whether another instruction starts before the end of the buffer.
    pub fn has_more(&self) -> bool {
        self.next_pos < self.bytecode.len()
    }

    /// Decodes the next instruction and returns its opcode.
    ///
    /// Returns [`STOP`] without advancing once the stream is exhausted. A
    /// `PUSHn` whose immediate runs past the buffer end still advances past
    /// the end; the next [`has_more`](Self::has_more) reports false.
    pub fn next(&mut self) -> u8 {
        let Some(&opcode) = self.bytecode.get(self.next_pos) else {
            return STOP;
        };

        if self.ring.len() == self.lookback {
            self.ring.pop_front();
        }
        self.ring.push_back(self.next_pos);

        self.next_pos += 1 + push_size(opcode);
        self.next_step += 1;

        opcode
    }

    /// Step ordinal of the most recently decoded instruction. Meaningful
    /// only after the first call to [`next`](Self::next).
    pub fn step(&self) -> usize {
        self.next_step.saturating_sub(1)
    }

    /// Byte position of the most recently decoded instruction, taken from
    /// the newest ring entry. Meaningful only after the first call to
    /// [`next`](Self::next).
    pub fn pos(&self) -> usize {
        self.ring.back().copied().unwrap_or_else(|| self.next_pos.saturating_sub(1))
    }

    /// Number of instruction positions currently recorded in the ring.
    ///
    /// Callers matching an idiom `k` instructions wide should refuse to
    /// match while `lookbehind() < k`.
    pub fn lookbehind(&self) -> usize {
        self.ring.len()
    }

    /// Reads the opcode at a byte position (`p >= 0`) or `|p|` decoded steps
    /// back through the ring (`p < 0`, `-1` being the most recently decoded
    /// instruction). Out-of-range byte positions and negative indexes beyond
    /// the recorded history yield [`STOP`].
    pub fn at(&self, p: isize) -> u8 {
        match self.resolve(p) {
            Some(pos) => self.bytecode.get(pos).copied().unwrap_or(STOP),
            None => STOP,
        }
    }

    /// The immediate operand bytes of the most recently decoded instruction.
    /// Empty unless it was a `PUSH1..=PUSH32`.
    pub fn value(&self) -> &'a [u8] {
        self.value_at(-1)
    }

    /// The immediate operand bytes of the instruction at `p`, resolved as in
    /// [`at`](Self::at). Empty for non-push opcodes and unresolvable
    /// positions; shorter than the push size if the buffer ends inside the
    /// immediate (callers treat a short slice as truncated input).
    pub fn value_at(&self, p: isize) -> &'a [u8] {
        let Some(pos) = self.resolve(p) else {
            return &[];
        };
        let Some(&opcode) = self.bytecode.get(pos) else {
            return &[];
        };

        let width = push_size(opcode);
        if width == 0 {
            return &[];
        }

        let start = pos + 1;
        let end = (start + width).min(self.bytecode.len());
        self.bytecode.get(start..end).unwrap_or(&[])
    }

    /// Resolves an absolute or step-relative index to a byte position.
    fn resolve(&self, p: isize) -> Option<usize> {
        if p >= 0 {
            return Some(p as usize);
        }

        let back = p.unsigned_abs();
        if back > self.ring.len() {
            return None;
        }
        Some(self.ring[self.ring.len() - back])
    }
}
