//! APDU command definitions and traits
//!
//! This module provides the command APDU buffer and the [`ApduCommand`] trait
//! implemented by the command builders in the submodules.

pub mod select_file;
pub mod transmit;

use std::fmt;

use derive_more::{Deref, DerefMut};

use crate::buffer::ApduBuffer;
use crate::error::Result;
use crate::response::interpreter::ResponseInterpreter;
use crate::utils;

pub use select_file::SelectFile;
pub use transmit::Transmit;

/// Command APDU sent to a card
///
/// A thin wrapper over [`ApduBuffer`]; all buffer operations are available
/// through deref.
#[derive(Clone, PartialEq, Eq, Hash, Deref, DerefMut)]
pub struct CommandApdu(ApduBuffer);

impl CommandApdu {
    /// Create an empty command able to hold `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self(ApduBuffer::with_capacity(capacity))
    }

    /// Create a command holding exactly `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(ApduBuffer::from_bytes(bytes))
    }

    /// Wrap existing storage whose first `len` bytes hold a command
    pub fn from_buffer(storage: Vec<u8>, len: usize) -> Result<Self> {
        ApduBuffer::from_buffer(storage, len).map(Self)
    }

    /// Parse a command from its hex representation
    pub fn from_hex(input: &str) -> Result<Self> {
        utils::parse_hex_string(input).map(|bytes| Self::from_bytes(&bytes))
    }
}

impl fmt::Debug for CommandApdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandApdu")
            .field(&self.to_hex_string())
            .finish()
    }
}

impl fmt::Display for CommandApdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A command builder: a constructed command together with the knowledge of how
/// to interpret the card's answer to it
pub trait ApduCommand: ResponseInterpreter {
    /// The command bytes to transmit
    fn apdu(&self) -> &CommandApdu;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_buffer_operations() {
        let mut command = CommandApdu::with_capacity(5);
        command.append_slice(&[0x00, 0xB0]).unwrap();
        command.append_slice(&[0x00, 0x00]).unwrap();
        command.append(0x10).unwrap();

        assert_eq!(command.as_slice(), &[0x00, 0xB0, 0x00, 0x00, 0x10]);
        assert!(command.append(0x00).is_err());

        command.set_byte(4, 0x20);
        assert_eq!(command.to_string(), "00B0000020");
    }

    #[test]
    fn test_command_from_hex() {
        let command = CommandApdu::from_hex("00a4 0400").unwrap();
        assert_eq!(command.as_slice(), &[0x00, 0xA4, 0x04, 0x00]);
        assert_eq!(command.capacity(), 4);

        assert!(CommandApdu::from_hex("00A").is_err());
    }

    #[test]
    fn test_command_from_buffer() {
        let command = CommandApdu::from_buffer(vec![0x00, 0x84, 0x00, 0x00, 0x08, 0x00], 5).unwrap();
        assert_eq!(command.len(), 5);
        assert_eq!(command.byte(5), None);
    }
}
