use crate::utils::strings::decode_hex;
use eyre::{eyre, Result};
use std::fs;

/// Given a target from the module interface, return the bytecode it refers
/// to. The target is either raw hex (with or without a `0x` prefix) or the
/// path of a file containing hex.
pub fn get_bytecode_from_target(target: &str) -> Result<Vec<u8>> {
    // If the target is not a file path, it should be raw bytecode.
    if let Ok(bytecode) = decode_hex(target) {
        return Ok(bytecode);
    }

    // Assuming the target is a file path.
    match fs::read_to_string(target) {
        Ok(contents) => {
            let cleaned_contents = contents.replace('\n', "");
            decode_hex(&cleaned_contents)
                .map_err(|_| eyre!("invalid target: file does not contain valid bytecode"))
        }
        Err(_) => Err(eyre!("invalid target")),
    }
}
