use eyre::{bail, eyre, Result};
use std::fmt::Write;

/// Decodes a hex string into a vector of bytes. An optional `0x` prefix and
/// surrounding whitespace are tolerated; odd-length and non-hex input are
/// errors.
///
/// ```
/// use mimir_common::utils::strings::decode_hex;
///
/// let result = decode_hex("0x2e64cec1").expect("should decode hex");
/// assert_eq!(result, vec![0x2e, 0x64, 0xce, 0xc1]);
/// ```
pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    // normalize
    let s = s.trim().trim_start_matches("0x");

    if s.is_empty() {
        return Ok(vec![]);
    }
    if s.len() % 2 != 0 {
        bail!("invalid hex string: odd length");
    }

    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| eyre!("invalid hex string: {}", s))
}

/// Encodes a slice of bytes into a lowercase hex string.
///
/// ```
/// use mimir_common::utils::strings::encode_hex;
///
/// let result = encode_hex(&[0x2e, 0x64, 0xce, 0xc1]);
/// assert_eq!(result, "2e64cec1");
/// ```
pub fn encode_hex(s: &[u8]) -> String {
    s.iter().fold(String::new(), |mut acc, b| {
        write!(acc, "{b:02x}").expect("unable to write");
        acc
    })
}

/// Replaces the last occurrence of a substring in a string.
///
/// ```
/// use mimir_common::utils::strings::replace_last;
///
/// let result = replace_last("transfer(address,uint256)", ")", "");
/// assert_eq!(result, String::from("transfer(address,uint256"));
/// ```
pub fn replace_last(s: &str, old: &str, new: &str) -> String {
    let new = new.chars().rev().collect::<String>();
    s.chars().rev().collect::<String>().replacen(old, &new, 1).chars().rev().collect::<String>()
}
