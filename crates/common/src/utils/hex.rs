use super::strings::encode_hex;

/// A convenience trait which renders a byte quantity as the canonical
/// `0x`-prefixed lowercase hex string used throughout recovered interfaces.
pub trait ToLowerHex {
    /// Converts the value to its `0x`-prefixed lowercase hexadecimal
    /// representation.
    fn to_lower_hex(&self) -> String;
}

impl ToLowerHex for [u8] {
    fn to_lower_hex(&self) -> String {
        format!("0x{}", encode_hex(self))
    }
}

impl ToLowerHex for Vec<u8> {
    fn to_lower_hex(&self) -> String {
        self.as_slice().to_lower_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_lower_hex_is_prefixed_and_lowercase() {
        assert_eq!([0x2e, 0x64, 0xce, 0xc1].to_lower_hex(), "0x2e64cec1");
        assert_eq!(vec![0xAB_u8, 0xCD].to_lower_hex(), "0xabcd");
    }

    #[test]
    fn test_to_lower_hex_empty() {
        assert_eq!(Vec::<u8>::new().to_lower_hex(), "0x");
    }
}
