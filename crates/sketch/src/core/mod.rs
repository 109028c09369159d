use std::time::Instant;

use alloy::primitives::U256;
use eyre::eyre;
use hashbrown::HashMap;
use indexmap::IndexMap;
use mimir_common::{ether::bytecode::get_bytecode_from_target, utils::hex::ToLowerHex};
use mimir_vm::core::{
    cursor::BytecodeCursor,
    opcodes::{is_log, is_push, CALLVALUE, DUP1, EQ, ISZERO, JUMPDEST, JUMPI, PUSH32},
};
use tracing::{debug, info};

use crate::{
    error::Error,
    interfaces::{AbiEntry, EventEntry, FunctionEntry, SketchArgs},
};

/// Ring depth required by the widest idiom: the four-instruction comparison
/// tail of the dispatcher.
const DISPATCH_LOOKBACK: usize = 4;

/// Width of a function selector in bytes.
const SELECTOR_WIDTH: usize = 4;

/// The non-payable guard solc plants directly after a dispatch destination.
const VALUE_GUARD: [u8; 3] = [CALLVALUE, DUP1, ISZERO];

pub async fn sketch(args: SketchArgs) -> Result<Vec<AbiEntry>, Error> {
    // init
    let start_time = Instant::now();

    // get the bytecode from the target
    let start_fetch_time = Instant::now();
    let bytecode = get_bytecode_from_target(&args.target)
        .map_err(|e| eyre!("fetching target bytecode failed: {}", e))?;
    debug!("fetching target bytecode took {:?}", start_fetch_time.elapsed());

    // scan the instruction stream for dispatcher and log idioms
    let start_scan_time = Instant::now();
    let abi = sketch_from_bytecode(&bytecode, args.strict);
    debug!("bytecode scan took {:?}", start_scan_time.elapsed());

    info!("recovered {} abi entries from {} bytes of bytecode", abi.len(), bytecode.len());
    debug!("sketch took {:?}", start_time.elapsed());
    Ok(abi)
}

/// Scans runtime bytecode for the compiler's dispatcher and event-logging
/// idioms and returns the interface entries they reveal: events in the order
/// their LOG sites appear, then functions in selector-discovery order.
///
/// The scan never fails. Ill-formed or truncated streams, including the
/// metadata trailer real contracts end with, simply stop matching.
pub fn sketch_from_bytecode(bytecode: &[u8], strict: bool) -> Vec<AbiEntry> {
    let mut cursor = BytecodeCursor::new(bytecode, DISPATCH_LOOKBACK);

    // selector -> claimed jump destination. later sightings overwrite the
    // destination but keep the first discovery position
    let mut jumps: IndexMap<String, usize> = IndexMap::new();
    // JUMPDEST byte offset -> step at which it was decoded
    let mut dests: HashMap<usize, usize> = HashMap::new();
    // subset of dests that open with the non-payable guard
    let mut guarded: HashMap<usize, usize> = HashMap::new();
    // immediate of the most recent PUSH32
    let mut last_push32: Vec<u8> = Vec::new();

    let mut entries: Vec<AbiEntry> = Vec::new();

    while cursor.has_more() {
        let opcode = cursor.next();

        // a 32-byte push is a candidate event topic for a later LOG
        if opcode == PUSH32 {
            last_push32 = cursor.value().to_vec();
            continue;
        }

        // LOG1..LOG4 with a pending 32-byte word reports it as the topic.
        // the word is intentionally not cleared: consecutive LOGs after a
        // single PUSH32 all report the same topic
        if is_log(opcode) && !last_push32.is_empty() {
            entries.push(AbiEntry::Event(EventEntry { hash: last_push32.to_lower_hex() }));
            continue;
        }

        // JUMPDEST bookkeeping. the value guard directly after the
        // destination is three fixed-width opcodes, so byte indexing is
        // sound here
        if opcode == JUMPDEST {
            let pos = cursor.pos();
            dests.insert(pos, cursor.step());
            if bytecode.get(pos + 1..pos + 1 + VALUE_GUARD.len()) == Some(&VALUE_GUARD[..]) {
                guarded.insert(pos, cursor.step());
            }
            continue;
        }

        // the dispatcher comparison tail:
        //
        //   DUP1 PUSH4 <selector> EQ PUSHn <dest> JUMPI
        //
        // matched step-relative through the ring, with the JUMPI just
        // decoded as the newest entry. the pushes have different byte
        // widths, which is exactly why the match is by step and not by byte
        if cursor.lookbehind() >= DISPATCH_LOOKBACK &&
            cursor.at(-1) == JUMPI &&
            is_push(cursor.at(-2)) &&
            cursor.at(-3) == EQ &&
            is_push(cursor.at(-4))
        {
            let selector = selector_hex(cursor.value_at(-4));
            let dest: usize =
                U256::from_be_slice(cursor.value_at(-2)).try_into().unwrap_or(usize::MAX);
            jumps.insert(selector, dest);
        }
    }

    // claimed destinations are not validated against observed JUMPDESTs by
    // default; strict mode drops selectors whose destination never appeared
    for (selector, dest) in jumps {
        if strict && !dests.contains_key(&dest) {
            debug!("dropping selector {} with unobserved jump destination {:#x}", selector, dest);
            continue;
        }
        entries.push(AbiEntry::Function(FunctionEntry {
            selector,
            payable: !guarded.contains_key(&dest),
        }));
    }

    entries
}

/// Renders a selector push immediate as a `0x`-prefixed lowercase hex string
/// of exactly 4 bytes. Short pushes are left-padded (solc may emit `PUSHk`,
/// `k < 4`, when the selector's high bytes are zero); oversized immediates
/// keep their low-order 4 bytes, matching big-endian interpretation.
fn selector_hex(immediate: &[u8]) -> String {
    let mut selector = [0u8; SELECTOR_WIDTH];
    if immediate.len() >= SELECTOR_WIDTH {
        selector.copy_from_slice(&immediate[immediate.len() - SELECTOR_WIDTH..]);
    } else {
        selector[SELECTOR_WIDTH - immediate.len()..].copy_from_slice(immediate);
    }
    selector.to_lower_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytecode() {
        assert!(sketch_from_bytecode(&[], false).is_empty());
    }

    #[test]
    fn test_single_selector_payable() {
        // DUP1 PUSH4 2e64cec1 EQ PUSH1 37 JUMPI STOP
        let bytecode = [0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x37, 0x57, 0x00];
        let abi = sketch_from_bytecode(&bytecode, false);

        assert_eq!(
            abi,
            vec![AbiEntry::Function(FunctionEntry {
                selector: "0x2e64cec1".to_string(),
                payable: true,
            })]
        );
    }

    #[test]
    fn test_selector_with_short_push_is_left_padded() {
        // DUP1 PUSH2 0001 EQ PUSH1 40 JUMPI STOP: solc drops the selector's
        // leading zero bytes
        let bytecode = [0x80, 0x61, 0x00, 0x01, 0x14, 0x60, 0x40, 0x57, 0x00];
        let abi = sketch_from_bytecode(&bytecode, false);

        assert_eq!(
            abi,
            vec![AbiEntry::Function(FunctionEntry {
                selector: "0x00000001".to_string(),
                payable: true,
            })]
        );
    }

    #[test]
    fn test_full_width_selector_with_leading_zeros() {
        // the same selector emitted literally as PUSH4 with leading zeros
        let bytecode = [0x80, 0x63, 0x00, 0x00, 0x00, 0x01, 0x14, 0x60, 0x40, 0x57, 0x00];
        let abi = sketch_from_bytecode(&bytecode, false);

        assert_eq!(
            abi,
            vec![AbiEntry::Function(FunctionEntry {
                selector: "0x00000001".to_string(),
                payable: true,
            })]
        );
    }

    #[test]
    fn test_non_payable_guard_clears_payability() {
        // DUP1 PUSH4 2e64cec1 EQ PUSH1 0b JUMPI STOP, then JUMPDEST
        // CALLVALUE DUP1 ISZERO at offset 0x0b
        let bytecode = [
            0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x0b, 0x57, 0x00, 0x5b, 0x34, 0x80,
            0x15,
        ];
        let abi = sketch_from_bytecode(&bytecode, false);

        assert_eq!(
            abi,
            vec![AbiEntry::Function(FunctionEntry {
                selector: "0x2e64cec1".to_string(),
                payable: false,
            })]
        );
    }

    #[test]
    fn test_jumpdest_without_guard_stays_payable() {
        // destination exists but opens with STOP instead of the guard
        let bytecode =
            [0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x0b, 0x57, 0x00, 0x5b, 0x00];
        let abi = sketch_from_bytecode(&bytecode, false);

        assert_eq!(
            abi,
            vec![AbiEntry::Function(FunctionEntry {
                selector: "0x2e64cec1".to_string(),
                payable: true,
            })]
        );
    }

    #[test]
    fn test_event_topic_from_push32_log() {
        let mut bytecode = vec![0x7f];
        bytecode.extend_from_slice(&[0xab; 32]);
        bytecode.push(0xa1);

        let abi = sketch_from_bytecode(&bytecode, false);
        assert_eq!(
            abi,
            vec![AbiEntry::Event(EventEntry {
                hash: format!("0x{}", "ab".repeat(32)),
            })]
        );
    }

    #[test]
    fn test_consecutive_logs_repeat_the_topic() {
        // PUSH32 <T> LOG1 LOG2: the topic word is not cleared between LOGs
        let mut bytecode = vec![0x7f];
        bytecode.extend_from_slice(&[0xcd; 32]);
        bytecode.push(0xa1);
        bytecode.push(0xa2);

        let abi = sketch_from_bytecode(&bytecode, false);
        assert_eq!(abi.len(), 2);
        assert_eq!(abi[0], abi[1]);
    }

    #[test]
    fn test_log_without_push32_is_ignored() {
        let bytecode = [0xa1, 0xa2, 0x00];
        assert!(sketch_from_bytecode(&bytecode, false).is_empty());
    }

    #[test]
    fn test_truncated_tail_is_absorbed() {
        // a dispatcher entry followed by a PUSH1 with no operand byte
        let bytecode = [0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x37, 0x57, 0x60];
        let abi = sketch_from_bytecode(&bytecode, false);

        assert_eq!(abi.len(), 1);
    }

    #[test]
    fn test_short_stream_cannot_match_dispatcher() {
        // EQ PUSH1 37 JUMPI: only three decoded steps of history
        let bytecode = [0x14, 0x60, 0x37, 0x57];
        assert!(sketch_from_bytecode(&bytecode, false).is_empty());
    }

    #[test]
    fn test_duplicate_selector_last_destination_wins() {
        // the same selector dispatched twice, second time to a guarded
        // destination at 0x16
        let bytecode = [
            0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x37, 0x57, // -> 0x37
            0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x16, 0x57, // -> 0x16
            0x00, 0x00, 0x5b, 0x34, 0x80, 0x15,
        ];
        let abi = sketch_from_bytecode(&bytecode, false);

        assert_eq!(
            abi,
            vec![AbiEntry::Function(FunctionEntry {
                selector: "0x2e64cec1".to_string(),
                payable: false,
            })]
        );
    }

    #[test]
    fn test_strict_drops_unobserved_destinations() {
        // destination 0x37 never appears as a JUMPDEST
        let bytecode = [0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x37, 0x57, 0x00];

        assert_eq!(sketch_from_bytecode(&bytecode, false).len(), 1);
        assert!(sketch_from_bytecode(&bytecode, true).is_empty());
    }

    #[test]
    fn test_events_precede_functions_in_output() {
        let mut bytecode = vec![0x7f];
        bytecode.extend_from_slice(&[0xee; 32]);
        bytecode.push(0xa1);
        bytecode
            .extend_from_slice(&[0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x37, 0x57]);

        let abi = sketch_from_bytecode(&bytecode, false);
        assert_eq!(abi.len(), 2);
        assert!(matches!(abi[0], AbiEntry::Event(_)));
        assert!(matches!(abi[1], AbiEntry::Function(_)));
    }

    #[test]
    fn test_scan_is_pure() {
        let bytecode = [
            0x80, 0x63, 0x2e, 0x64, 0xce, 0xc1, 0x14, 0x60, 0x0b, 0x57, 0x00, 0x5b, 0x34, 0x80,
            0x15,
        ];
        assert_eq!(
            sketch_from_bytecode(&bytecode, false),
            sketch_from_bytecode(&bytecode, false)
        );
    }

    #[test]
    fn test_selector_shapes_are_canonical() {
        let bytecode = [0x80, 0x61, 0x00, 0x01, 0x14, 0x60, 0x40, 0x57, 0x00];
        for entry in sketch_from_bytecode(&bytecode, false) {
            if let AbiEntry::Function(function) = entry {
                assert_eq!(function.selector.len(), 10);
                assert_eq!(function.selector, function.selector.to_lowercase());
            }
        }
    }
}
