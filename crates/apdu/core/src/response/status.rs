//! Status word definitions and ISO/IEC 7816-4 classification

use std::borrow::Cow;
use std::fmt;

/// Status Word (SW1-SW2) from an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

/// Generic meaning of a status word, independent of the command that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Normal processing (90 00, 61 XX)
    Success,
    /// Processing completed with a warning
    Warning(Cow<'static, str>),
    /// Processing aborted
    Error(&'static str),
    /// Not covered by the generic tables; the issuing command has to decide
    Unclassified,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Convert to a u16 value (SW1 | SW2)
    pub const fn to_u16(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Get the number of remaining bytes when SW1 = 61
    pub const fn remaining_bytes(&self) -> Option<u8> {
        if self.sw1 == 0x61 {
            Some(self.sw2)
        } else {
            None
        }
    }

    /// Compact hex form, e.g. `9000`
    pub fn to_hex_string(&self) -> String {
        format!("{:02X}{:02X}", self.sw1, self.sw2)
    }

    /// Classify this status word against the generic ISO/IEC 7816-4 tables
    ///
    /// SW1 selects the table, SW2 the entry. Any SW2 missing from its table yields
    /// [`Classification::Unclassified`], as does any SW1 without a table.
    pub fn classify(&self) -> Classification {
        use Classification::{Error, Unclassified, Warning};

        match self.sw1 {
            0x90 | 0x61 => Classification::Success,
            0x62 => match self.sw2 {
                0x00 => Warning("No information given".into()),
                0x81 => Warning("Part of returned data may be corrupted".into()),
                0x82 => Warning("End of file/record reached before reading Le bytes".into()),
                0x83 => Warning("Selected file invalidated".into()),
                0x84 => Warning("FCI not formatted according to specification".into()),
                _ => Unclassified,
            },
            0x63 => match self.sw2 {
                0x00 => Warning("No information given".into()),
                0x81 => Warning("File filled up by the last write".into()),
                n if n & 0xF0 == 0xC0 => Warning(format!("Counter = {}", n & 0x0F).into()),
                _ => Unclassified,
            },
            0x65 => match self.sw2 {
                0x00 => Error("No information given"),
                0x81 => Error("Memory failure"),
                _ => Unclassified,
            },
            0x67 => match self.sw2 {
                0x00 => Error("Wrong length"),
                _ => Unclassified,
            },
            0x68 => match self.sw2 {
                0x00 => Error("No information given"),
                0x81 => Error("Logical channel not supported"),
                0x82 => Error("Secure messaging not supported"),
                _ => Unclassified,
            },
            0x69 => match self.sw2 {
                0x00 => Error("No information given"),
                0x81 => Error("Command incompatible with file structure"),
                0x82 => Error("Security status not satisfied"),
                0x83 => Error("Authentication method blocked"),
                0x84 => Error("Referenced data invalidated"),
                0x85 => Error("Conditions of use not satisfied"),
                0x86 => Error("Command not allowed (no current EF)"),
                0x87 => Error("Expected SM data objects missing"),
                0x88 => Error("SM data objects incorrect"),
                _ => Unclassified,
            },
            0x6A => match self.sw2 {
                0x00 => Error("No information given"),
                0x80 => Error("Incorrect parameters in the data field"),
                0x81 => Error("Function not supported"),
                0x82 => Error("File not found"),
                0x83 => Error("Record not found"),
                0x84 => Error("Not enough memory space in the file"),
                0x85 => Error("Lc inconsistent with TLV structure"),
                0x86 => Error("Incorrect parameters P1-P2"),
                0x87 => Error("Lc inconsistent with P1-P2"),
                0x88 => Error("Referenced data not found"),
                _ => Unclassified,
            },
            0x6B => match self.sw2 {
                0x00 => Error("Wrong parameter(s) P1-P2"),
                _ => Unclassified,
            },
            0x6C => Error("Wrong length Le: SW2 indicates the exact length"),
            0x6D => match self.sw2 {
                0x00 => Error("Instruction code not supported or invalid"),
                _ => Unclassified,
            },
            0x6E => match self.sw2 {
                0x00 => Error("Class not supported"),
                _ => Unclassified,
            },
            0x6F => match self.sw2 {
                0x00 => Error("No precise diagnosis"),
                _ => Unclassified,
            },
            _ => Unclassified,
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from(tuple: (u8, u8)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

/// Common status words
pub mod common {
    use super::StatusWord;

    /// Success (90 00)
    pub const SUCCESS: StatusWord = StatusWord::new(0x90, 0x00);

    /// Selected file invalidated (62 83)
    pub const FILE_INVALIDATED: StatusWord = StatusWord::new(0x62, 0x83);

    /// Logical channel not supported (68 81)
    pub const LOGICAL_CHANNEL_NOT_SUPPORTED: StatusWord = StatusWord::new(0x68, 0x81);

    /// File not found (6A 82)
    pub const FILE_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x82);

    /// Invalid instruction (6D 00)
    pub const INVALID_INSTRUCTION: StatusWord = StatusWord::new(0x6D, 0x00);
}
