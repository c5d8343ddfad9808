//! Hex helpers used for operator input and APDU rendering

use crate::error::{Error, Result};

/// Parse a hex string into bytes
///
/// Input is case-insensitive and may contain whitespace between digits. Blank
/// input and an odd number of digits are rejected.
pub fn parse_hex_string(input: &str) -> Result<Vec<u8>> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Err(Error::InvalidHex("empty hex string".to_string()));
    }
    hex::decode(&digits).map_err(|e| Error::InvalidHex(format!("{digits}: {e}")))
}

/// Render bytes as uppercase hex, two digits per byte
pub fn to_hex_string(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_string() {
        assert_eq!(parse_hex_string("050A14").unwrap(), vec![0x05, 0x0A, 0x14]);
        assert_eq!(parse_hex_string("00 a4 04 00").unwrap(), vec![0x00, 0xA4, 0x04, 0x00]);
    }

    #[test]
    fn test_parse_hex_string_rejects_malformed_input() {
        assert!(parse_hex_string("050").unwrap_err().is_validation());
        assert!(parse_hex_string("").is_err());
        assert!(parse_hex_string("   ").is_err());
        assert!(parse_hex_string("0G").is_err());
    }

    #[test]
    fn test_to_hex_string() {
        assert_eq!(to_hex_string(&[0x05, 0x0A, 0x14]), "050A14");
        assert_eq!(to_hex_string(&[0xA4]), "A4");
        assert_eq!(to_hex_string(&[]), "");
    }

    #[test]
    fn test_round_trip_canonicalises_case() {
        for input in ["3f00", "3F00", "00a4040008A000000003000000", "fFeE"] {
            let rendered = to_hex_string(&parse_hex_string(input).unwrap());
            assert_eq!(rendered, input.to_uppercase());
        }
    }
}
