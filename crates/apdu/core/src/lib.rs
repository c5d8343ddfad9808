//! Core types for interactive APDU sessions with smart cards
//!
//! This crate provides the protocol layer of the cardshell workspace, following
//! the APDU model of ISO/IEC 7816-4.
//!
//! ## Overview
//!
//! - [`ApduBuffer`] and its command/response specialisations
//! - status word interpretation ([`response::status`], [`response::interpreter`])
//! - the SELECT FILE and raw transmit command builders ([`command`])
//! - the terminal → card → channel model and the [`CardShell`] selection context
//!
//! Hardware access happens behind the traits in [`transport`]; a PC/SC binding lives
//! in its own crate. With the `mock` feature an in-memory transport is available for
//! tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::Bytes;

// Main modules
pub mod buffer;
pub mod card;
pub mod channel;
pub mod command;
pub mod error;
pub mod file;
pub mod response;
pub mod shell;
pub mod terminal;
pub mod transport;
pub mod utils;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use buffer::ApduBuffer;
pub use card::Card;
pub use channel::Channel;
pub use command::{ApduCommand, CommandApdu, SelectFile, Transmit};
pub use error::{Error, Result, ResultExt};
pub use file::FileId;
pub use response::ResponseApdu;
pub use response::error::TransmissionError;
pub use response::status::StatusWord;
pub use shell::CardShell;
pub use terminal::Terminal;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    // Core types
    pub use crate::{ApduBuffer, Bytes, Error, Result, ResultExt};

    // Commands and responses
    pub use crate::command::{ApduCommand, CommandApdu, SelectFile, Transmit};
    pub use crate::response::interpreter::{Interpretation, ResponseInterpreter};
    pub use crate::response::status::{StatusWord, common as status};
    pub use crate::response::{ResponseApdu, error::TransmissionError};

    // Files
    pub use crate::file::{FileId, MASTER_FILE};

    // Session model
    pub use crate::{Card, CardShell, Channel, Terminal};

    // Transport layer
    pub use crate::transport::{
        CardConnection, ChannelTransport, Protocol, TerminalConnector, TerminalRegistry,
        TransportError,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    // Test the basic types are re-exported correctly
    #[test]
    fn test_reexports() {
        let select = SelectFile::new(0x00, MASTER_FILE);
        assert_eq!(select.apdu().byte(1), Some(0xA4));

        let response = ResponseApdu::new(&[0x01, 0x02, 0x90, 0x00]).unwrap();
        assert_eq!(response.status(), StatusWord::new(0x90, 0x00));
        assert_eq!(response.status(), status::SUCCESS);
        assert_eq!(response.data(), vec![0x01, 0x02]);
    }
}
