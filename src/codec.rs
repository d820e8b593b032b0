//! Hex text <-> bytes, as used for seeds and nonces on the wire.
use crate::error::Result;

/// Decode hex text into bytes, most-significant nibble first.
///
/// Odd-length input or any non-hex character yields [`Error::Format`](crate::Error::Format).
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(text)?)
}

/// Encode bytes as lowercase, zero-padded hex (two digits per byte).
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn decodes_pairs_high_nibble_first() {
        assert_eq!(decode_hex("00ff10").unwrap(), vec![0x00, 0xff, 0x10]);
        assert_eq!(decode_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn encodes_lowercase_padded() {
        assert_eq!(encode_hex(&[0x0a, 0xff, 0x00]), "0aff00");
    }

    #[test]
    fn rejects_odd_length() {
        let err = decode_hex("abc").expect_err("odd length must fail");
        assert!(matches!(err, Error::Format(hex::FromHexError::OddLength)));
    }

    #[test]
    fn rejects_non_hex_characters() {
        let err = decode_hex("0g").expect_err("non-hex must fail");
        assert!(matches!(
            err,
            Error::Format(hex::FromHexError::InvalidHexCharacter { c: 'g', index: 1 })
        ));
    }
}
