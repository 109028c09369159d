use serde::{Deserialize, Serialize};

/// A single recovered interface entry.
///
/// Serializes with an inline `type` tag:
/// `{"type":"function","selector":"0x…","payable":…}` or
/// `{"type":"event","hash":"0x…"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiEntry {
    /// An externally callable function, keyed by its 4-byte selector.
    Function(FunctionEntry),
    /// An event, keyed by its 32-byte signature topic hash.
    Event(EventEntry),
}

/// An externally callable function recovered from the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionEntry {
    /// The selector as a `0x`-prefixed lowercase hex string of exactly 4
    /// bytes. For example, `0xa9059cbb`.
    pub selector: String,
    /// Whether a call carrying value reaches the function body. False iff
    /// the dispatch destination opens with the compiler's value guard.
    pub payable: bool,
}

/// An event topic declaration recovered from a LOG site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventEntry {
    /// The signature topic as a `0x`-prefixed lowercase hex string of
    /// exactly 32 bytes.
    pub hash: String,
}
